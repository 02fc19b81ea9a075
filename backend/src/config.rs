use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup from environment variables
/// with local-development defaults.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Root of the on-disk document store. Reports land under
    /// `reports/`, email hand-offs under `outbox/`.
    pub data_dir: PathBuf,
    /// Directory holding the TTF font families used for PDF rendering.
    pub fonts_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> AppConfig {
        AppConfig {
            host: env::var("SHOWGUARD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SHOWGUARD_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_path: env::var("SHOWGUARD_DB")
                .unwrap_or_else(|_| "showguard.sqlite".to_string())
                .into(),
            data_dir: env::var("SHOWGUARD_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            fonts_dir: env::var("SHOWGUARD_FONTS_DIR")
                .unwrap_or_else(|_| "./fonts".to_string())
                .into(),
        }
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }

    pub fn outbox_dir(&self) -> PathBuf {
        self.data_dir.join("outbox")
    }
}
