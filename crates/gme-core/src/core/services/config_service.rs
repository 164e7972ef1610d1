//! Configuration service for managing application configuration

use crate::AppError;
use crate::storage::config::Config;
use crate::utils::validation::validate_url;
use std::path::PathBuf;

pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// URL from the config file or GME_URL, if any
    pub fn get_url(&self) -> Option<String> {
        self.config.get_url()
    }

    /// URL requests will go to, falling back to the public endpoint
    pub fn base_url(&self) -> String {
        self.config.base_url()
    }

    /// Validate and set the base URL. Not persisted until [`save_config`](Self::save_config).
    pub fn set_url(&mut self, url: String) -> Result<(), AppError> {
        validate_url(&url)?;
        self.config.set_url(url.trim_end_matches('/').to_string());
        Ok(())
    }

    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }

    pub fn has_url(&self) -> bool {
        self.get_url().is_some()
    }
}
