//! # gme-core
//!
//! Core library for deleting Google Maps Engine tables together with the
//! layers and maps built on top of them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gme_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> gme_core::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = MapsEngineClient::with_access_token(config.base_url(), token)?;
//!
//!     let report = CascadeExecutor::new(&client)
//!         .with_mode(CascadeMode::DryRun)
//!         .delete_table("01234567890123456789-12345678901234567890")
//!         .await?;
//!     println!("{} assets would be deleted", report.deleted.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  HTTP client, request/response models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Cascade state machine, service trait
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration, access token lookup
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, retry, error helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! The cascade only talks to the [`AssetService`](core::services::traits::AssetService)
//! trait, so it runs the same against the HTTP client and against in-memory
//! fakes in tests.

pub use error::AppError;

/// Commonly used types behind a single import.
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::{AppError, CascadeError};

    pub use crate::api::client::MapsEngineClient;
    pub use crate::api::models::{Asset, MapDocument, MapItem};

    pub use crate::core::cascade::{
        CascadeAbort, CascadeExecutor, CascadeMode, CascadeReport, CascadeStep, DeletedAsset,
    };
    pub use crate::core::services::config_service::ConfigService;
    pub use crate::core::services::traits::AssetService;
    pub use crate::core::services::types::AssetKind;

    pub use crate::storage::config::Config;
    pub use crate::storage::credentials::{get_access_token, has_access_token};

    pub use crate::display::{OutputFormat, ReportDisplay};
}

/// Business logic layer - the cascade and the service seam it runs against.
pub mod core;

/// Storage layer - configuration file and access token lookup.
pub mod storage;

/// Utilities layer - validation, retry, logging and error helpers.
pub mod utils;

/// API layer - Maps Engine HTTP client and data models.
pub mod api;

/// Display layer - report tables, JSON output, progress indicators.
pub mod display;

/// Hierarchical error system with severity levels and troubleshooting hints.
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
