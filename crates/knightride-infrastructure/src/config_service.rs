//! Configuration service implementation.
//!
//! Loads the client configuration from config.toml
//! (~/.config/knight-ride/config.toml), applying environment overrides.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use knightride_core::KnightRideError;
use knightride_core::config::ClientConfig;

use crate::paths::KnightRidePaths;
use crate::storage::AtomicTomlFile;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "KNIGHT_RIDE_API_URL";
/// Overrides `sos_countdown_secs`.
pub const ENV_SOS_COUNTDOWN: &str = "KNIGHT_RIDE_SOS_COUNTDOWN";

/// Configuration service that loads and caches the client configuration.
///
/// The file is created with default values the first time it is loaded.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<ClientConfig>>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service for the config file under `paths`.
    pub fn new(paths: &KnightRidePaths) -> Result<Self, KnightRideError> {
        let path = paths
            .config_file()
            .map_err(|e| KnightRideError::config(format!("Failed to get config path: {}", e)))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service for a config file at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Environment variables take precedence over file values.
    pub fn get_config(&self) -> Result<ClientConfig, KnightRideError> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_or_init()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn load_or_init(&self) -> Result<ClientConfig, KnightRideError> {
        if let Some(config) = self.file.load()? {
            return Ok(config);
        }

        tracing::info!(path = %self.file.path().display(), "Creating default configuration");
        self.file.update(ClientConfig::default(), |_| Ok(()))?;

        Ok(self.file.load()?.unwrap_or_default())
    }
}

/// Applies environment overrides using `lookup` to read variables.
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url;
    }

    if let Some(raw) = lookup(ENV_SOS_COUNTDOWN) {
        match raw.trim().parse::<u32>() {
            Ok(secs) => config.sos_countdown_secs = secs,
            Err(e) => tracing::warn!("Ignoring {}={:?}: {}", ENV_SOS_COUNTDOWN, raw, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knightride_core::config::DEFAULT_API_BASE_URL;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(config_path.clone());

        let loaded = service.load_or_init().unwrap();

        assert_eq!(loaded, ClientConfig::default());
        assert!(config_path.exists());
    }

    #[test]
    fn test_existing_file_is_respected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "api_base_url = \"https://api.knightride.example\"\nsos_countdown_secs = 5\n",
        )
        .unwrap();

        let service = ConfigService::with_path(config_path);
        let loaded = service.load_or_init().unwrap();

        assert_eq!(loaded.api_base_url, "https://api.knightride.example");
        assert_eq!(loaded.sos_countdown_secs, 5);
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "sos_countdown_secs = \"ten\"").unwrap();

        let service = ConfigService::with_path(config_path);
        let err = service.load_or_init().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut config = ClientConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[
                (ENV_API_URL, "http://10.0.2.2:8000"),
                (ENV_SOS_COUNTDOWN, "3"),
            ]),
        );

        assert_eq!(config.api_base_url, "http://10.0.2.2:8000");
        assert_eq!(config.sos_countdown_secs, 3);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[(ENV_API_URL, "  "), (ENV_SOS_COUNTDOWN, "soon")]),
        );

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.sos_countdown_secs, 10);
    }

    #[test]
    fn test_cache_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(config_path.clone());

        let first = service.get_config().unwrap();
        std::fs::write(&config_path, "request_timeout_secs = 5\n").unwrap();
        assert_eq!(service.get_config().unwrap(), first);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().request_timeout_secs, 5);
    }
}
