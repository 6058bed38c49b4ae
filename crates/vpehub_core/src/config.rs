//! Runtime configuration for opening the store and logging.
//!
//! Resolution order for every field: explicit value, then environment,
//! then built-in default.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "VPEHUB_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "VPEHUB_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "VPEHUB_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "vpehub.sqlite3";

/// Resolved store and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolves settings from explicit overrides and the process environment.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        Self::resolve_with(db_path, log_level, log_dir, |name| std::env::var(name).ok())
    }

    /// Same as `resolve`, reading variables through `lookup`.
    pub fn resolve_with(
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: db_path
                .or_else(|| non_empty(DB_PATH_ENV).map(PathBuf::from))
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: log_level
                .or_else(|| non_empty(LOG_LEVEL_ENV))
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: log_dir.or_else(|| non_empty(LOG_DIR_ENV).map(PathBuf::from)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn explicit_values_win_over_environment() {
        let config = StoreConfig::resolve_with(
            Some(PathBuf::from("/srv/club.sqlite3")),
            Some("warn".to_string()),
            None,
            |_| Some("/from/env".to_string()),
        );
        assert_eq!(config.db_path, PathBuf::from("/srv/club.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/from/env")));
    }

    #[test]
    fn environment_is_used_and_blank_values_fall_back_to_defaults() {
        let config = StoreConfig::resolve_with(None, None, None, |name| match name {
            DB_PATH_ENV => Some("/var/lib/vpehub.db".to_string()),
            LOG_LEVEL_ENV => Some("   ".to_string()),
            LOG_DIR_ENV => None,
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/var/lib/vpehub.db"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn default_db_path_lives_in_temp_dir() {
        let config = StoreConfig::resolve_with(None, None, None, |_| None);
        assert!(config.db_path.starts_with(std::env::temp_dir()));
        assert!(config.db_path.ends_with("vpehub.sqlite3"));
    }
}
