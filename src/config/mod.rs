use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Spool directory for multipart uploads before they are handed to the
    /// media store. Created on demand.
    pub upload_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Secret used to sign session tokens. Must come from SESSION_SECRET
    /// outside of development.
    pub session_secret: String,
    pub session_cookie: String,
    pub session_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub provider: MediaProvider,
    /// Logical folder uploads are filed under at the remote store.
    pub upload_folder: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Directory and URL prefix for the local (dev/test) provider.
    pub local_dir: String,
    pub local_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaProvider {
    Cloudinary,
    Local,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.server.upload_dir = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours =
                v.parse().unwrap_or(self.security.session_expiry_hours);
        }

        // Media overrides. CLD_* names match what the hosting account hands out.
        if let Ok(v) = env::var("MEDIA_PROVIDER") {
            self.media.provider = match v.as_str() {
                "local" => MediaProvider::Local,
                _ => MediaProvider::Cloudinary,
            };
        }
        if let Ok(v) = env::var("MEDIA_UPLOAD_FOLDER") {
            self.media.upload_folder = v;
        }
        if let Ok(v) = env::var("CLD_NAME") {
            self.media.cloud_name = v;
        }
        if let Ok(v) = env::var("CLD_API_KEY") {
            self.media.api_key = v;
        }
        if let Ok(v) = env::var("CLD_API_SECRET") {
            self.media.api_secret = v;
        }
        if let Ok(v) = env::var("MEDIA_LOCAL_DIR") {
            self.media.local_dir = v;
        }
        if let Ok(v) = env::var("MEDIA_LOCAL_BASE_URL") {
            self.media.local_base_url = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5000,
                cors_origins: vec!["http://localhost:3000".to_string()],
                upload_dir: "uploads".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            security: SecurityConfig {
                session_secret: "dev-only-secret".to_string(),
                session_cookie: "token".to_string(),
                session_expiry_hours: 24 * 7, // 1 week
            },
            media: MediaConfig {
                provider: MediaProvider::Local,
                upload_folder: "gallery".to_string(),
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                local_dir: "media".to_string(),
                local_base_url: "http://localhost:5000/media".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 5000,
                cors_origins: vec!["https://staging.example.com".to_string()],
                upload_dir: "uploads".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie: "token".to_string(),
                session_expiry_hours: 24,
            },
            media: MediaConfig {
                provider: MediaProvider::Cloudinary,
                upload_folder: "gallery".to_string(),
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                local_dir: "media".to_string(),
                local_base_url: String::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 5000,
                cors_origins: vec!["https://app.example.com".to_string()],
                upload_dir: "uploads".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie: "token".to_string(),
                session_expiry_hours: 24,
            },
            media: MediaConfig {
                provider: MediaProvider::Cloudinary,
                upload_folder: "gallery".to_string(),
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                local_dir: "media".to_string(),
                local_base_url: String::new(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.media.provider, MediaProvider::Local);
        assert_eq!(config.security.session_cookie, "token");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.media.provider, MediaProvider::Cloudinary);
        assert!(config.security.session_secret.is_empty());
        assert_eq!(config.security.session_expiry_hours, 24);
    }
}
