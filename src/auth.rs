use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthSettings;
use crate::models::Session;

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "admin-session";
/// Readable companion cookie with "username:role" for the admin UI
pub const USER_COOKIE: &str = "admin-user";
/// Admin cookies are scoped to the admin area
pub const COOKIE_PATH: &str = "/admin";

const ADMIN_ROLE: &str = "administrator";
const ADMIN_PERMISSIONS: [&str; 3] = ["email_admin", "docsecure_admin", "system_admin"];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Admin authentication is disabled")]
    Disabled,
    #[error("Invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    permissions: Vec<String>,
    exp: i64,
}

/// Checks admin credentials and signs session tokens.
///
/// Credentials come exclusively from configuration. A deployment that
/// leaves the password or the signing secret empty gets a verifier that
/// rejects every login, so the admin surface stays closed by default.
#[derive(Clone)]
pub struct CredentialVerifier {
    username: String,
    password: String,
    secret: String,
    session_ttl_secs: i64,
    enabled: bool,
}

impl CredentialVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let enabled = !settings.password.is_empty() && !settings.secret.is_empty();
        if !enabled {
            tracing::warn!(
                "admin password or session secret not configured, admin login is disabled"
            );
        }

        Self {
            username: settings.username.clone(),
            password: settings.password.clone(),
            secret: settings.secret.clone(),
            session_ttl_secs: settings.session_ttl_secs,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Lifetime of issued sessions, in seconds
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_secs
    }

    /// Check a login attempt and open a session for it
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if !self.enabled {
            return Err(AuthError::Disabled);
        }
        if username != self.username || password != self.password {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Session {
            username: self.username.clone(),
            role: ADMIN_ROLE.to_string(),
            permissions: ADMIN_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            expires_at: Utc::now() + Duration::seconds(self.session_ttl_secs),
        })
    }

    /// Sign a session into a compact token for the session cookie
    pub fn issue_token(&self, session: &Session) -> Result<String, AuthError> {
        let claims = Claims {
            sub: session.username.clone(),
            role: session.role.clone(),
            permissions: session.permissions.clone(),
            exp: session.expires_at.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    /// Validate a session token and rebuild the session it carries
    pub fn verify_token(&self, token: &str) -> Result<Session, AuthError> {
        if !self.enabled {
            return Err(AuthError::Disabled);
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(Session {
            username: data.claims.sub,
            role: data.claims.role,
            permissions: data.claims.permissions,
            expires_at: DateTime::from_timestamp(data.claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_settings() -> AuthSettings {
        AuthSettings {
            username: "admin".to_string(),
            password: "configured-password".to_string(),
            secret: "unit-test-signing-secret".to_string(),
            session_ttl_secs: 3600,
        }
    }

    #[test]
    fn test_authenticate_with_configured_credentials() {
        let verifier = CredentialVerifier::new(&create_settings());
        let session = verifier.authenticate("admin", "configured-password").unwrap();

        assert_eq!(session.username, "admin");
        assert_eq!(session.role, "administrator");
        assert_eq!(
            session.permissions,
            vec!["email_admin", "docsecure_admin", "system_admin"]
        );
        assert!(session.expires_at > Utc::now());
    }

    #[test]
    fn test_wrong_credentials_rejected() {
        let verifier = CredentialVerifier::new(&create_settings());

        assert!(matches!(
            verifier.authenticate("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verifier.authenticate("root", "configured-password"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_empty_password_disables_login_entirely() {
        let mut settings = create_settings();
        settings.password = String::new();
        let verifier = CredentialVerifier::new(&settings);

        assert!(!verifier.is_enabled());
        // Even a matching empty password must not open a session
        assert!(matches!(
            verifier.authenticate("admin", ""),
            Err(AuthError::Disabled)
        ));
    }

    #[test]
    fn test_empty_secret_disables_login() {
        let mut settings = create_settings();
        settings.secret = String::new();
        let verifier = CredentialVerifier::new(&settings);

        assert!(!verifier.is_enabled());
        assert!(verifier.authenticate("admin", "configured-password").is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let verifier = CredentialVerifier::new(&create_settings());
        let session = verifier.authenticate("admin", "configured-password").unwrap();

        let token = verifier.issue_token(&session).unwrap();
        let restored = verifier.verify_token(&token).unwrap();

        assert_eq!(restored.username, session.username);
        assert_eq!(restored.role, session.role);
        assert_eq!(restored.permissions, session.permissions);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let verifier = CredentialVerifier::new(&create_settings());
        let session = verifier.authenticate("admin", "configured-password").unwrap();
        let token = verifier.issue_token(&session).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(verifier.verify_token(&tampered).is_err());
        assert!(verifier.verify_token("not-a-token").is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let verifier = CredentialVerifier::new(&create_settings());
        let mut other_settings = create_settings();
        other_settings.secret = "a-different-secret".to_string();
        let other = CredentialVerifier::new(&other_settings);

        let session = other.authenticate("admin", "configured-password").unwrap();
        let token = other.issue_token(&session).unwrap();

        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = CredentialVerifier::new(&create_settings());
        let mut session = verifier.authenticate("admin", "configured-password").unwrap();
        session.expires_at = Utc::now() - Duration::hours(2);

        let token = verifier.issue_token(&session).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }
}
