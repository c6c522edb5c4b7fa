//! Environment configuration for Parley.
//!
//! Everything is read from `PARLEY_*` environment variables with defaults
//! suited to local development. The Bedrock api key is wrapped in
//! [`secrecy::SecretString`] as soon as it is read.

use std::path::PathBuf;

use secrecy::SecretString;

/// Runtime configuration assembled from the environment.
pub struct AppConfig {
    /// Directory holding the SQLite database (`PARLEY_DATA_DIR`,
    /// default `~/.parley`).
    pub data_dir: PathBuf,
    /// Full database URL override (`PARLEY_DATABASE_URL`). When unset the
    /// URL is derived from `data_dir`.
    pub database_url: Option<String>,
    /// Username seeded on first startup (`PARLEY_ADMIN_USERNAME`,
    /// default `admin`).
    pub admin_username: String,
    /// Password seeded on first startup (`PARLEY_ADMIN_PASSWORD`).
    pub admin_password: String,
    /// Bedrock bearer token (`PARLEY_BEDROCK_API_KEY`). Optional so the
    /// server can run without inference configured.
    pub bedrock_api_key: Option<SecretString>,
    /// AWS region for Bedrock Runtime (`PARLEY_BEDROCK_REGION`,
    /// default `us-east-1`).
    pub bedrock_region: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("PARLEY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".parley")
            });

        let database_url = std::env::var("PARLEY_DATABASE_URL").ok();

        let admin_username =
            std::env::var("PARLEY_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = match std::env::var("PARLEY_ADMIN_PASSWORD") {
            Ok(password) => password,
            Err(_) => {
                tracing::warn!(
                    "PARLEY_ADMIN_PASSWORD not set, seeding admin account with the default password"
                );
                "password".to_string()
            }
        };

        let bedrock_api_key = std::env::var("PARLEY_BEDROCK_API_KEY")
            .ok()
            .map(SecretString::from);
        let bedrock_region =
            std::env::var("PARLEY_BEDROCK_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        Self {
            data_dir,
            database_url,
            admin_username,
            admin_password,
            bedrock_api_key,
            bedrock_region,
        }
    }

    /// The SQLite connection URL, explicit override or derived from the
    /// data directory.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "sqlite://{}?mode=rwc",
                self.data_dir.join("parley.db").display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_override_wins() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/parley"),
            database_url: Some("sqlite://custom.db".to_string()),
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
            bedrock_api_key: None,
            bedrock_region: "us-east-1".to_string(),
        };
        assert_eq!(config.database_url(), "sqlite://custom.db");
    }

    #[test]
    fn test_database_url_derived_from_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/parley"),
            database_url: None,
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
            bedrock_api_key: None,
            bedrock_region: "us-east-1".to_string(),
        };
        assert_eq!(config.database_url(), "sqlite:///tmp/parley/parley.db?mode=rwc");
    }
}
