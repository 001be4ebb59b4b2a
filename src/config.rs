use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub screening: ScreeningSettings,
    #[serde(default)]
    pub indexer: IndexerSettings,
    #[serde(default)]
    pub uploads: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Admin credentials and session signing material.
///
/// Password and secret have no baked-in values. Leaving either empty
/// keeps admin login disabled; deployments inject both through the
/// config file or environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: String::new(),
            secret: String::new(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_admin_username() -> String { "admin".to_string() }
fn default_session_ttl() -> i64 { 86_400 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningSettings {
    /// Serve the built-in demo name set when an uploaded workbook cannot
    /// be decoded, instead of failing the request
    #[serde(default = "default_fallback_on_parse_error")]
    pub fallback_on_parse_error: bool,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            fallback_on_parse_error: default_fallback_on_parse_error(),
        }
    }
}

fn default_fallback_on_parse_error() -> bool { true }

/// Document indexer sidecar invocation
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerSettings {
    #[serde(default = "default_indexer_script")]
    pub script_path: String,
    #[serde(default = "default_indexer_interpreters")]
    pub interpreters: Vec<String>,
    #[serde(default = "default_indexer_timeout")]
    pub timeout_secs: u64,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            script_path: default_indexer_script(),
            interpreters: default_indexer_interpreters(),
            timeout_secs: default_indexer_timeout(),
        }
    }
}

fn default_indexer_script() -> String { "scripts/docsecure/indexer.py".to_string() }
fn default_indexer_interpreters() -> Vec<String> {
    vec!["python3".to_string(), "python".to_string()]
}
fn default_indexer_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_size_mb: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_size_mb: default_max_upload_mb(),
        }
    }
}

fn default_upload_dir() -> String { "uploads".to_string() }
fn default_max_upload_mb() -> u64 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with AMLC_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with AMLC_)
            // e.g., AMLC_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("AMLC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Allow the secret material to come from plain env var names
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("AMLC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Pick up credentials from the short env var names operators actually set
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let admin_password = env::var("AMLC_ADMIN_PASSWORD").ok();
    let session_secret = env::var("AMLC_SESSION_SECRET").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(password) = admin_password {
        builder = builder.set_override("auth.password", password)?;
    }
    if let Some(secret) = session_secret {
        builder = builder.set_override("auth.secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_defaults_keep_login_disabled() {
        let auth = AuthSettings::default();
        assert_eq!(auth.username, "admin");
        assert!(auth.password.is_empty());
        assert!(auth.secret.is_empty());
        assert_eq!(auth.session_ttl_secs, 86_400);
    }

    #[test]
    fn test_screening_defaults() {
        let screening = ScreeningSettings::default();
        assert!(screening.fallback_on_parse_error);
    }

    #[test]
    fn test_indexer_defaults() {
        let indexer = IndexerSettings::default();
        assert_eq!(indexer.script_path, "scripts/docsecure/indexer.py");
        assert_eq!(indexer.interpreters, vec!["python3", "python"]);
        assert_eq!(indexer.timeout_secs, 30);
    }

    #[test]
    fn test_upload_defaults() {
        let uploads = UploadSettings::default();
        assert_eq!(uploads.dir, "uploads");
        assert_eq!(uploads.max_size_mb, 50);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
