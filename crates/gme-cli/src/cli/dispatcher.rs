use crate::cli::command_handlers::{ConfigHandler, DeleteHandler};
use crate::cli::main_types::Commands;
use gme_core::api::client::MapsEngineClient;
use gme_core::core::services::config_service::ConfigService;
use gme_core::error::{AppError, CliError};
use gme_core::storage::config::Config;
use gme_core::storage::credentials::get_access_token;
use gme_core::utils::logging::print_verbose;
use gme_core::utils::validation::validate_access_token;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: bool,
    access_token: Option<String>,
}

impl Dispatcher {
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        verbose: bool,
        access_token: Option<String>,
    ) -> Self {
        Self {
            config,
            config_path,
            verbose,
            access_token,
        }
    }

    // CLI argument > environment variable
    fn get_effective_access_token(&self) -> Option<String> {
        if let Some(ref token) = self.access_token
            && !token.is_empty()
        {
            return Some(token.clone());
        }
        get_access_token()
    }

    fn create_client(&self) -> Result<MapsEngineClient, AppError> {
        let url = self.config.base_url();
        match self.get_effective_access_token() {
            Some(token) => {
                validate_access_token(&token)?;
                self.log_verbose(&format!("Creating client for {} with access token", url));
                Ok(MapsEngineClient::with_access_token(url, token)?)
            }
            None => {
                self.log_verbose(&format!("Creating client for {} without access token", url));
                Ok(MapsEngineClient::new(url)?)
            }
        }
    }

    fn create_authenticated_client(&self) -> Result<MapsEngineClient, AppError> {
        let client = self.create_client()?;
        if !client.is_authenticated() {
            return Err(AppError::Cli(CliError::AuthRequired {
                message: "No access token configured".to_string(),
                hint: "Set GME_ACCESS_TOKEN or pass --access-token".to_string(),
            }));
        }
        Ok(client)
    }

    fn create_config_service(&self) -> ConfigService {
        ConfigService::new(self.config.clone())
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Config { command } => {
                let handler = ConfigHandler::new(self.config_path.clone());
                let mut config_service = self.create_config_service();
                let client = self.create_client()?;
                handler
                    .handle(command, &mut config_service, client, self.verbose)
                    .await
            }
            Commands::Delete(args) => {
                let handler = DeleteHandler::new();
                let client = self.create_authenticated_client()?;
                handler.handle(args, &client, self.verbose).await
            }
        }
    }
}
