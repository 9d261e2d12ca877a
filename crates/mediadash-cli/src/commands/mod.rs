pub mod auth;
pub mod config;
pub mod fetch;
pub mod serve;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use mediadash_config::{Config, CredentialStore, PathManager};
use mediadash_core::Dashboard;
use mediadash_sources::SourceRegistry;
use std::path::PathBuf;
use tracing::debug;

/// Container deployments set `MEDIADASH_BASE_PATH`; everyone else uses the
/// user config directory.
pub(crate) fn path_manager() -> Result<PathManager> {
    if std::env::var_os("MEDIADASH_BASE_PATH").is_some() {
        return Ok(PathManager::from_docker_env());
    }
    PathManager::new().map_err(|e| eyre!("{}", e))
}

/// Config and credentials as every command sees them.
pub(crate) struct Loaded {
    pub config: Config,
    pub config_file: PathBuf,
    pub credentials: CredentialStore,
    pub credentials_file: PathBuf,
}

pub(crate) fn load(config_override: Option<PathBuf>) -> Result<Loaded> {
    let paths = path_manager()?;
    let config_file = config_override.unwrap_or_else(|| paths.config_file());

    let config = Config::load(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let credentials_file = paths.credentials_file();
    let credentials = CredentialStore::open(credentials_file.clone())
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    debug!(config = %config_file.display(), "Loaded configuration");
    Ok(Loaded {
        config,
        config_file,
        credentials,
        credentials_file,
    })
}

impl Loaded {
    pub fn registry(&self) -> Result<SourceRegistry> {
        SourceRegistry::from_config(&self.config, &self.credentials)
            .map_err(|e| eyre!("Failed to set up sources: {}", e))
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        Ok(Dashboard::new(self.registry()?))
    }
}
