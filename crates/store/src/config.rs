//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SUNDRY_DATABASE_URL` - SQLite connection string
//!   (default: `sqlite://sundry.db`; generic `DATABASE_URL` is honored as a
//!   fallback)
//! - `SUNDRY_HOST` - Bind address (default: 127.0.0.1)
//! - `SUNDRY_PORT` - Listen port (default: 8000)
//! - `SUNDRY_SECURE_COOKIES` - Set session cookies with the Secure flag
//!   (default: false; enable behind TLS)
//! - `SUNDRY_IMAGE_DIR` - Directory for uploaded product images
//!   (default: `static/images/products`)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default SQLite database location, next to the binary's working directory.
const DEFAULT_DATABASE_URL: &str = "sqlite://sundry.db";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Whether session cookies carry the Secure flag
    pub secure_cookies: bool,
    /// Directory where uploaded product images are stored
    pub image_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url();
        let host = get_env_or_default("SUNDRY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SUNDRY_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("SUNDRY_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SUNDRY_PORT".to_owned(), e.to_string()))?;
        let secure_cookies = get_env_or_default("SUNDRY_SECURE_COOKIES", "false")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SUNDRY_SECURE_COOKIES".to_owned(), e.to_string())
            })?;
        let image_dir =
            PathBuf::from(get_env_or_default("SUNDRY_IMAGE_DIR", "static/images/products"));

        Ok(Self {
            database_url,
            host,
            port,
            secure_cookies,
            image_dir,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get the database URL, preferring `SUNDRY_DATABASE_URL`, then the generic
/// `DATABASE_URL`, then the embedded default.
fn get_database_url() -> SecretString {
    if let Ok(value) = std::env::var("SUNDRY_DATABASE_URL") {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from(DEFAULT_DATABASE_URL)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = Config {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            secure_cookies: false,
            image_dir: PathBuf::from("static/images/products"),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }
}
