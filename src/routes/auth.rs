use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use super::AppState;
use crate::auth::{COOKIE_PATH, SESSION_COOKIE, USER_COOKIE};
use crate::models::{
    AuthFailureResponse, LoginRequest, LoginResponse, LogoutResponse, SessionUser, VerifiedUser,
    VerifyResponse,
};

/// Configure admin authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login_info))
        .route("/login", web::post().to(login))
        .route("/verify", web::get().to(verify))
        .route("/logout", web::post().to(logout));
}

/// Informational endpoint describing the authentication API
async fn login_info() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Admin Authentication API",
        "endpoints": {
            "login": "POST /api/admin/auth/login",
            "logout": "POST /api/admin/auth/logout",
            "verify": "GET /api/admin/auth/verify"
        }
    }))
}

/// Open an administrator session
///
/// POST /api/admin/auth/login
///
/// On success the signed session token and a readable user cookie are
/// set, both scoped to the admin path.
async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    if body.validate().is_err() {
        return invalid_credentials();
    }

    let session = match state.verifier.authenticate(&body.username, &body.password) {
        Ok(session) => session,
        Err(e) => {
            tracing::info!("Login rejected for {}: {}", body.username, e);
            return invalid_credentials();
        }
    };

    let token = match state.verifier.issue_token(&session) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Could not issue session token: {}", e);
            return HttpResponse::InternalServerError().json(AuthFailureResponse {
                success: false,
                error: "Server error".to_string(),
            });
        }
    };

    let ttl = Duration::seconds(state.verifier.session_ttl_secs());
    let session_cookie = Cookie::build(SESSION_COOKIE, token)
        .path(COOKIE_PATH)
        .http_only(true)
        .max_age(ttl)
        .finish();
    let user_cookie = Cookie::build(
        USER_COOKIE,
        format!("{}:{}", session.username, session.role),
    )
    .path(COOKIE_PATH)
    .max_age(ttl)
    .finish();

    tracing::info!("Administrator {} logged in", session.username);

    HttpResponse::Ok()
        .cookie(session_cookie)
        .cookie(user_cookie)
        .json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: SessionUser {
                username: session.username,
                role: session.role,
                permissions: session.permissions,
            },
        })
}

/// Check whether the caller holds a valid session
///
/// GET /api/admin/auth/verify
///
/// Both session cookies must be present. The user block is rebuilt from
/// the signed token, never from the readable cookie.
async fn verify(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session_cookie = req.cookie(SESSION_COOKIE);
    let user_cookie = req.cookie(USER_COOKIE);

    let (Some(session_cookie), Some(_user_cookie)) = (session_cookie, user_cookie) else {
        return HttpResponse::Ok().json(VerifyResponse {
            success: true,
            authenticated: false,
            user: None,
        });
    };

    match state.verifier.verify_token(session_cookie.value()) {
        Ok(session) => HttpResponse::Ok().json(VerifyResponse {
            success: true,
            authenticated: true,
            user: Some(VerifiedUser {
                username: session.username,
                role: session.role,
            }),
        }),
        Err(e) => {
            tracing::debug!("Session verification failed: {}", e);
            HttpResponse::Ok().json(VerifyResponse {
                success: true,
                authenticated: false,
                user: None,
            })
        }
    }
}

/// Close the administrator session
///
/// POST /api/admin/auth/logout
async fn logout() -> impl Responder {
    let session_cookie = Cookie::build(SESSION_COOKIE, "")
        .path(COOKIE_PATH)
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish();
    let user_cookie = Cookie::build(USER_COOKIE, "")
        .path(COOKIE_PATH)
        .max_age(Duration::ZERO)
        .finish();

    HttpResponse::Ok()
        .cookie(session_cookie)
        .cookie(user_cookie)
        .json(LogoutResponse {
            success: true,
            message: "Logout successful".to_string(),
        })
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(AuthFailureResponse {
        success: false,
        error: "Invalid username or password".to_string(),
    })
}
