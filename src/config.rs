//! Configuration management for dealscan.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::repository::{AsyncSqlitePool, LogRepository};

/// Default database filename inside the data directory.
pub const DEFAULT_DATABASE_FILENAME: &str = "dealscan.db";

/// Subdirectory of the data directory used for upload scratch files.
const UPLOADS_SUBDIR: &str = "uploads";

/// Runtime settings for the service.
///
/// Defaults live under the user's documents directory; everything can be
/// overridden through the environment (`DEALSCAN_DATA_DIR`, `DATABASE_URL`)
/// or the CLI's `--data-dir` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    /// Supports sqlite: URLs. Set via DATABASE_URL env var.
    pub database_url: Option<String>,
    /// Directory for temporary upload storage.
    pub uploads_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        // Falls back gracefully: Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dealscan");

        Self {
            uploads_dir: data_dir.join(UPLOADS_SUBDIR),
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
        }
    }
}

impl Settings {
    /// Build settings from defaults, environment, and an optional CLI override.
    ///
    /// Precedence: CLI `--data-dir` > `DEALSCAN_DATA_DIR` > default location.
    /// `DATABASE_URL` always wins for the database itself.
    pub fn load(data_dir_override: Option<PathBuf>) -> Self {
        let mut settings = Self::default();

        if let Ok(dir) = std::env::var("DEALSCAN_DATA_DIR") {
            settings.set_data_dir(PathBuf::from(dir));
        }
        if let Some(dir) = data_dir_override {
            settings.set_data_dir(dir);
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.database_url = Some(url);
        }

        settings
    }

    fn set_data_dir(&mut self, dir: PathBuf) {
        self.uploads_dir = dir.join(UPLOADS_SUBDIR);
        self.data_dir = dir;
    }

    /// Resolve the effective database URL.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => self
                .data_dir
                .join(&self.database_filename)
                .display()
                .to_string(),
        }
    }

    /// Create the data and uploads directories if missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.uploads_dir)?;
        Ok(())
    }

    /// Construct the log repository over the configured database.
    pub fn log_repository(&self) -> LogRepository {
        LogRepository::new(AsyncSqlitePool::new(&self.database_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let settings = Settings::default();
        assert!(settings.uploads_dir.starts_with(&settings.data_dir));
        assert_eq!(settings.database_filename, DEFAULT_DATABASE_FILENAME);
        assert!(settings.database_url().ends_with(DEFAULT_DATABASE_FILENAME));
    }

    #[test]
    fn test_explicit_database_url_wins() {
        let settings = Settings {
            database_url: Some("sqlite:/tmp/other.db".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.database_url(), "sqlite:/tmp/other.db");
    }

    #[test]
    fn test_data_dir_override_moves_uploads() {
        let settings = Settings::load(Some(PathBuf::from("/srv/dealscan")));
        assert_eq!(settings.data_dir, PathBuf::from("/srv/dealscan"));
        assert_eq!(settings.uploads_dir, PathBuf::from("/srv/dealscan/uploads"));
    }
}
