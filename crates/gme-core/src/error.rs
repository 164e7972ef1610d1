use crate::core::cascade::CascadeAbort;
use crate::core::services::types::AssetKind;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Aborted(#[from] CascadeAbort),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Authentication required")]
    AuthRequired { message: String, hint: String },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Resource not found: {endpoint}")]
    NotFound { endpoint: String },
    #[error("Rate limit exceeded: {endpoint}")]
    RateLimited { endpoint: String },
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("Cannot build request URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Reasons a table cascade stops. Every variant is fatal for the whole run.
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Asset {asset_id} is not a table (type: {})", found_type.as_deref().unwrap_or("unknown"))]
    NotATable {
        asset_id: String,
        found_type: Option<String>,
    },
    #[error("Could not list dependents of {kind} {asset_id}: {source}")]
    DiscoveryFailed {
        asset_id: String,
        kind: AssetKind,
        source: ApiError,
    },
    #[error("{kind} {asset_id} is published, please un-publish before deleting")]
    PublishedAssetBlocksDeletion { asset_id: String, kind: AssetKind },
    #[error("Could not determine whether {kind} {asset_id} is published: {source}")]
    PublicationCheckFailed {
        asset_id: String,
        kind: AssetKind,
        source: ApiError,
    },
    #[error("Could not read the contents of map {map_id}: {source}")]
    MapContentUnavailable { map_id: String, source: ApiError },
    #[error(
        "Map {map_id} contains layers not scheduled for deletion ({}); remove them before deleting this map",
        surviving.iter().cloned().collect::<Vec<_>>().join(", ")
    )]
    MapHasSurvivingLayers {
        map_id: String,
        surviving: BTreeSet<String>,
    },
    #[error("Failed to delete {kind} {asset_id}: {source}")]
    DeleteFailed {
        asset_id: String,
        kind: AssetKind,
        source: ApiError,
    },
}

impl CascadeError {
    /// Id of the asset the failing step was working on.
    pub fn asset_id(&self) -> &str {
        match self {
            CascadeError::NotATable { asset_id, .. }
            | CascadeError::DiscoveryFailed { asset_id, .. }
            | CascadeError::PublishedAssetBlocksDeletion { asset_id, .. }
            | CascadeError::PublicationCheckFailed { asset_id, .. }
            | CascadeError::DeleteFailed { asset_id, .. } => asset_id,
            CascadeError::MapContentUnavailable { map_id, .. }
            | CascadeError::MapHasSurvivingLayers { map_id, .. } => map_id,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } | ApiError::RateLimited { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Storage(_) => ErrorSeverity::Medium,
            // Something was already removed remotely.
            AppError::Aborted(abort) if !abort.deleted.is_empty() => ErrorSeverity::Critical,
            AppError::Aborted(_) => ErrorSeverity::High,
            AppError::Display(_) => ErrorSeverity::Low,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        if let AppError::Aborted(abort) = self {
            return match &abort.error {
                CascadeError::NotATable { .. } => Some(
                    "The ID may be missing, invalid, not a table, or you may not have access to it"
                        .to_string(),
                ),
                CascadeError::PublishedAssetBlocksDeletion { .. } => {
                    Some("Un-publish the asset in the Maps Engine UI and try again".to_string())
                }
                CascadeError::MapHasSurvivingLayers { .. } => Some(
                    "Remove the listed layers from the map, then run the delete again".to_string(),
                ),
                _ => None,
            };
        }

        match self {
            AppError::Api(ApiError::Unauthorized { .. })
            | AppError::Cli(CliError::AuthRequired { .. }) => {
                Some("Set GME_ACCESS_TOKEN or pass --access-token".to_string())
            }
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check your internet connection and try again".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cascade::{CascadeStep, DeletedAsset};

    #[test]
    fn test_cli_error_display() {
        let cli_err = CliError::InvalidArguments("invalid arguments".to_string());
        assert_eq!(
            format!("{}", cli_err),
            "Invalid arguments: invalid arguments"
        );
    }

    #[test]
    fn test_api_error_display() {
        let api_err = ApiError::Http {
            status: 400,
            endpoint: "/tables/1".to_string(),
            message: "bad".to_string(),
        };
        assert_eq!(format!("{}", api_err), "HTTP error: 400 bad");
        assert!(!api_err.is_not_found());

        let api_err = ApiError::NotFound {
            endpoint: "/layers/1?version=published".to_string(),
        };
        assert!(api_err.is_not_found());
    }

    #[test]
    fn test_cascade_error_display() {
        let err = CascadeError::PublishedAssetBlocksDeletion {
            asset_id: "L1".to_string(),
            kind: AssetKind::Layer,
        };
        assert_eq!(
            format!("{}", err),
            "layer L1 is published, please un-publish before deleting"
        );

        let err = CascadeError::MapHasSurvivingLayers {
            map_id: "M1".to_string(),
            surviving: ["L99".to_string(), "L42".to_string()].into_iter().collect(),
        };
        assert_eq!(err.asset_id(), "M1");
        assert!(format!("{}", err).contains("(L42, L99)"));

        let err = CascadeError::NotATable {
            asset_id: "X".to_string(),
            found_type: None,
        };
        assert_eq!(format!("{}", err), "Asset X is not a table (type: unknown)");
    }

    #[test]
    fn test_abort_severity_depends_on_partial_deletion() {
        let abort = CascadeAbort {
            step: CascadeStep::DeleteTable,
            error: CascadeError::DeleteFailed {
                asset_id: "T1".to_string(),
                kind: AssetKind::Table,
                source: ApiError::Http {
                    status: 500,
                    endpoint: "/tables/T1/delete".to_string(),
                    message: "boom".to_string(),
                },
            },
            deleted: vec![DeletedAsset {
                id: "L1".to_string(),
                kind: AssetKind::Layer,
            }],
        };
        assert_eq!(AppError::from(abort).severity(), ErrorSeverity::Critical);

        let abort = CascadeAbort {
            step: CascadeStep::Validate,
            error: CascadeError::NotATable {
                asset_id: "T1".to_string(),
                found_type: Some("layer".to_string()),
            },
            deleted: vec![],
        };
        let app_err = AppError::from(abort);
        assert_eq!(app_err.severity(), ErrorSeverity::High);
        assert!(app_err.troubleshooting_hint().is_some());
    }

    #[test]
    fn test_unauthorized_hint() {
        let app_err = AppError::Api(ApiError::Unauthorized {
            status: 401,
            endpoint: "/projects".to_string(),
            server_message: "Invalid Credentials".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);
        assert_eq!(
            app_err.troubleshooting_hint(),
            Some("Set GME_ACCESS_TOKEN or pass --access-token".to_string())
        );
    }
}
