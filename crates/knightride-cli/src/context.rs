use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use knightride_core::config::ClientConfig;
use knightride_core::session::SessionStore;
use knightride_infrastructure::{ConfigService, FileTokenSlot, KnightRidePaths};
use knightride_interaction::ApiClient;

/// Configuration read at startup, before anything else is opened.
pub struct LoadedConfig {
    pub paths: KnightRidePaths,
    pub config_service: ConfigService,
    pub config: ClientConfig,
}

/// Everything a command needs, wired once per invocation.
pub struct AppContext {
    pub paths: KnightRidePaths,
    pub config_service: ConfigService,
    pub config: ClientConfig,
    pub client: ApiClient,
}

impl AppContext {
    /// Reads config.toml and applies overrides. Touches nothing else.
    pub fn load_config(config_dir: Option<&Path>, api_url: Option<String>) -> Result<LoadedConfig> {
        let paths = KnightRidePaths::new(config_dir);

        let config_service = ConfigService::new(&paths)?;
        let mut config = config_service
            .get_config()
            .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
        if let Some(url) = api_url {
            config.api_base_url = url;
        }

        Ok(LoadedConfig {
            paths,
            config_service,
            config,
        })
    }

    /// Opens the session store and builds the API client.
    pub fn open(loaded: LoadedConfig) -> Result<Self> {
        let slot = FileTokenSlot::from_paths(&loaded.paths)?;
        let session = Arc::new(SessionStore::open(Arc::new(slot)));
        let client = ApiClient::from_config(&loaded.config, session);

        Ok(Self {
            paths: loaded.paths,
            config_service: loaded.config_service,
            config: loaded.config,
            client,
        })
    }
}

/// Reads one line from stdin after printing `prompt`.
pub fn prompt(prompt: &str) -> Result<String> {
    use std::io::Write;

    eprint!("{}", prompt);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
