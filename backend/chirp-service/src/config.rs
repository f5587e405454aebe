/// Configuration management for Chirp Service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by the binary). Pool tuning is read separately by `db-pool`.
use db_pool::{parse_env_optional, parse_env_or, require_env};
use serde::{Deserialize, Serialize};

/// Default cap on a single media upload (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Api-key handling
    pub auth: AuthConfig,
    /// Media upload storage
    pub media: MediaConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of actix workers; actix picks one per core when unset
    pub workers: Option<usize>,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, or `*`
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Api key used by the feed endpoint when the header is absent
    pub default_api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded blobs are written to
    pub storage_dir: String,
    /// Prefix prepended to stored file names to form locators
    pub public_prefix: String,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let app = AppConfig {
            host: std::env::var("CHIRP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or("CHIRP_PORT", 8080)?,
            workers: parse_env_optional("CHIRP_WORKERS")?,
            env: app_env,
        };
        if app.workers == Some(0) {
            return Err("CHIRP_WORKERS must be greater than 0".to_string());
        }

        let allowed_origins =
            std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if production && allowed_origins.trim() == "*" {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let database_url = if production {
            require_env("DATABASE_URL")?
        } else {
            std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/chirp".to_string())
        };

        let media = MediaConfig {
            storage_dir: std::env::var("MEDIA_STORAGE_DIR")
                .unwrap_or_else(|_| "./static/images".to_string()),
            public_prefix: std::env::var("MEDIA_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "/images/".to_string()),
            max_upload_bytes: parse_env_or("MEDIA_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };
        if media.max_upload_bytes == 0 {
            return Err("MEDIA_MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }

        let default_api_key =
            std::env::var("DEFAULT_API_KEY").unwrap_or_else(|_| "test".to_string());
        if default_api_key.trim().is_empty() {
            return Err("DEFAULT_API_KEY cannot be empty".to_string());
        }

        Ok(Config {
            app,
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: database_url,
                run_migrations: parse_env_or("RUN_MIGRATIONS", true)?,
            },
            auth: AuthConfig { default_api_key },
            media,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    /// Allowed CORS origins; empty means any origin
    pub fn cors_origins(&self) -> Vec<String> {
        let raw = self.cors.allowed_origins.trim();
        if raw == "*" {
            return Vec::new();
        }
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 11] = [
        "APP_ENV",
        "CHIRP_HOST",
        "CHIRP_PORT",
        "CHIRP_WORKERS",
        "CORS_ALLOWED_ORIGINS",
        "DATABASE_URL",
        "RUN_MIGRATIONS",
        "DEFAULT_API_KEY",
        "MEDIA_STORAGE_DIR",
        "MEDIA_PUBLIC_PREFIX",
        "MEDIA_MAX_UPLOAD_BYTES",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_for_development() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.workers, None);
        assert!(config.database.run_migrations);
        assert_eq!(config.auth.default_api_key, "test");
        assert_eq!(config.media.storage_dir, "./static/images");
        assert_eq!(config.media.public_prefix, "/images/");
        assert_eq!(config.media.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.cors_origins().is_empty());
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn overrides_are_applied() {
        clear_env();
        std::env::set_var("CHIRP_PORT", "9090");
        std::env::set_var("CHIRP_WORKERS", "4");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example");
        std::env::set_var("RUN_MIGRATIONS", "false");
        std::env::set_var("DEFAULT_API_KEY", "guest");
        std::env::set_var("MEDIA_MAX_UPLOAD_BYTES", "1024");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9090);
        assert_eq!(config.app.workers, Some(4));
        assert_eq!(
            config.cors_origins(),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(!config.database.run_migrations);
        assert_eq!(config.auth.default_api_key, "guest");
        assert_eq!(config.media.max_upload_bytes, 1024);

        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_numbers_are_errors() {
        clear_env();
        std::env::set_var("CHIRP_PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        clear_env();
        std::env::set_var("MEDIA_MAX_UPLOAD_BYTES", "0");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn production_rejects_wildcard_cors_and_missing_database() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("DATABASE_URL", "postgresql://db/chirp");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("CORS_ALLOWED_ORIGINS"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://chirp.example");
        std::env::remove_var("DATABASE_URL");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("DATABASE_URL"));

        std::env::set_var("DATABASE_URL", "postgresql://db/chirp");
        let config = Config::from_env().unwrap();
        assert!(config.is_production());

        clear_env();
    }

    #[test]
    #[serial]
    fn database_url_is_redacted_in_debug_output() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgresql://user:secret@db/chirp");

        let config = Config::from_env().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));

        clear_env();
    }
}
