//! Configuration for the entity gateway and the reference service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST service, without trailing slash
    pub api_url: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_url = env::var("TEAMBOARD_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        Self { api_url }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Browser origin allowed by CORS
    pub ui_origin: String,
    /// Outgoing mail for task assignment notices
    pub smtp: SmtpConfig,
}

/// SMTP relay settings for assignment notices.
///
/// Notices are skipped unless both username and password are set.
#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; defaults to the username
    pub from_email: String,
}

impl SmtpConfig {
    /// Load SMTP settings from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);

        let username = env::var("SMTP_USERNAME").unwrap_or_default();
        let password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_email = env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| username.clone());

        Self {
            host,
            port,
            username,
            password,
            from_email,
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("TEAMBOARD_DB_PATH")
            .unwrap_or_else(|_| "./data/teamboard.sqlite".to_string())
            .into();

        let bind_addr = env::var("TEAMBOARD_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()?;

        let log_level = env::var("TEAMBOARD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let ui_origin =
            env::var("TEAMBOARD_UI_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            ui_origin,
            smtp: SmtpConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases touch the same variables, so they run in one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("TEAMBOARD_API_URL");
        env::remove_var("TEAMBOARD_DB_PATH");
        env::remove_var("TEAMBOARD_BIND_ADDR");
        env::remove_var("TEAMBOARD_LOG_LEVEL");
        env::remove_var("TEAMBOARD_UI_ORIGIN");
        for key in [
            "SMTP_HOST",
            "SMTP_PORT",
            "SMTP_USERNAME",
            "SMTP_PASSWORD",
            "SMTP_FROM_EMAIL",
        ] {
            env::remove_var(key);
        }

        let client = ClientConfig::from_env();
        assert_eq!(client.api_url, "http://localhost:8000");

        let service = ServiceConfig::from_env().unwrap();
        assert_eq!(service.db_path, PathBuf::from("./data/teamboard.sqlite"));
        assert_eq!(service.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(service.log_level, "info");
        assert_eq!(service.ui_origin, "http://localhost:3000");
        assert_eq!(service.smtp.host, "smtp.gmail.com");
        assert_eq!(service.smtp.port, 587);
        assert!(!service.smtp.has_credentials());

        env::set_var("SMTP_USERNAME", "bot@example.com");
        env::set_var("SMTP_PASSWORD", "secret");
        env::set_var("SMTP_PORT", "2525");
        let smtp = SmtpConfig::from_env();
        assert!(smtp.has_credentials());
        assert_eq!(smtp.port, 2525);
        assert_eq!(smtp.from_email, "bot@example.com");
        env::remove_var("SMTP_USERNAME");
        env::remove_var("SMTP_PASSWORD");
        env::remove_var("SMTP_PORT");

        env::set_var("TEAMBOARD_API_URL", "http://api.internal:9000/");
        env::set_var("TEAMBOARD_BIND_ADDR", "not-an-address");

        assert_eq!(ClientConfig::from_env().api_url, "http://api.internal:9000");
        assert!(ServiceConfig::from_env().is_err());

        env::remove_var("TEAMBOARD_API_URL");
        env::remove_var("TEAMBOARD_BIND_ADDR");
    }
}
