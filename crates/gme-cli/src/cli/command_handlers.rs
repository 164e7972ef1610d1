use crate::cli::main_types::{ConfigCommands, DeleteArgs};
use gme_core::api::client::MapsEngineClient;
use gme_core::core::cascade::{CascadeExecutor, CascadeMode};
use gme_core::core::services::config_service::ConfigService;
use gme_core::display::{
    OperationStatus, OutputFormat, ProgressSpinner, ReportDisplay, display_status,
};
use gme_core::error::{AppError, CliError};
use gme_core::storage::credentials::has_access_token;
use gme_core::utils::logging::print_verbose;
use gme_core::utils::validation::validate_asset_id;
use std::path::PathBuf;

pub struct ConfigHandler {
    config_path: Option<PathBuf>,
}

impl ConfigHandler {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    pub async fn handle(
        &self,
        command: ConfigCommands,
        config_service: &mut ConfigService,
        client: MapsEngineClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                print_verbose(verbose, "Showing configuration");

                println!("Current Configuration:");
                println!("=====================");

                match config_service.get_url() {
                    Some(url) => println!("URL: {}", url),
                    None => println!("URL: {} (default)", config_service.base_url()),
                }

                if client.is_authenticated() {
                    println!("Access Token: ✅ Set");
                } else {
                    println!("Access Token: ❌ Not set");
                }

                Ok(())
            }
            ConfigCommands::Set { url } => {
                print_verbose(verbose, &format!("Setting configuration - url: {:?}", url));

                let Some(url_value) = url else {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "No configuration values provided. Use --url or set GME_URL".to_string(),
                    )));
                };

                config_service.set_url(url_value)?;
                config_service.save_config(self.config_path.clone())?;
                println!("✅ Set URL to: {}", config_service.base_url());
                println!("Configuration saved successfully.");
                Ok(())
            }
            ConfigCommands::Validate => {
                print_verbose(verbose, "Validating access token and connection");

                if !client.is_authenticated() {
                    println!("❌ No access token configured.\n");
                    println!("To authenticate, export an OAuth2 token:");
                    println!("  export GME_ACCESS_TOKEN=\"$(gcloud auth print-access-token)\"");
                    return Err(AppError::Cli(CliError::AuthRequired {
                        message: if has_access_token() {
                            "GME_ACCESS_TOKEN is set but unusable".to_string()
                        } else {
                            "GME_ACCESS_TOKEN is not set".to_string()
                        },
                        hint: "Set GME_ACCESS_TOKEN or pass --access-token".to_string(),
                    }));
                }

                let mut spinner = ProgressSpinner::new("Validating access token...".to_string());
                spinner.start();

                match client.list_projects().await {
                    Ok(projects) => {
                        spinner.stop(Some("✅ Access token validated successfully"));
                        println!("Connected to {}", client.base_url);
                        println!("Visible projects: {}", projects.len());
                        for project in &projects {
                            println!("  {} ({})", project.name, project.id);
                        }
                        Ok(())
                    }
                    Err(e) => {
                        spinner.stop(Some("❌ Access token validation failed"));
                        println!("\nPossible causes:");
                        println!("  - The token is invalid or expired");
                        println!("  - The token lacks the mapsengine scope");
                        println!("  - The API endpoint is unreachable");
                        Err(e.into())
                    }
                }
            }
        }
    }
}

#[derive(Default)]
pub struct DeleteHandler;

impl DeleteHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        args: DeleteArgs,
        client: &MapsEngineClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        validate_asset_id(&args.table_id)?;
        let format: OutputFormat = args.format.parse()?;
        let mode = if args.dry_run {
            CascadeMode::DryRun
        } else {
            CascadeMode::Execute
        };

        print_verbose(
            verbose,
            &format!(
                "Deleting table {} - mode: {:?}, format: {:?}",
                args.table_id, mode, format
            ),
        );

        let display = ReportDisplay::new();
        let outcome = CascadeExecutor::new(client)
            .with_mode(mode)
            .delete_table(&args.table_id)
            .await;

        match outcome {
            Ok(report) => {
                match format {
                    OutputFormat::Json => println!("{}", display.report_json(&report)?),
                    OutputFormat::Table => {
                        println!("{}", display.render_report(&report));
                        let status = match mode {
                            CascadeMode::Execute => format!("delete table {}", report.table_id),
                            CascadeMode::DryRun => {
                                format!("dry run for table {}", report.table_id)
                            }
                        };
                        display_status(&status, OperationStatus::Success);
                    }
                }
                Ok(())
            }
            Err(abort) => {
                match format {
                    OutputFormat::Json => println!("{}", display.abort_json(&abort)?),
                    OutputFormat::Table => {
                        display_status(&abort.step.to_string(), OperationStatus::Error);
                        println!("{}", display.render_abort(&abort));
                    }
                }
                Err(abort.into())
            }
        }
    }
}
