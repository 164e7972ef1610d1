use crate::api::models::{Asset, MapDocument};
use crate::core::services::types::{AssetKind, ParentsPage, PublishedVersion};
use crate::error::ApiError;
use async_trait::async_trait;

/// Remote operations the cascade needs from the asset service.
///
/// Every call is a single attempt from the caller's point of view: timeouts
/// and retries are the implementation's business.
#[async_trait]
pub trait AssetService: Send + Sync {
    /// Fetch an asset by id. Absent assets yield [`ApiError::NotFound`].
    async fn get_asset(&self, id: &str) -> Result<Asset, ApiError>;

    /// One page of the assets that reference `child_id`.
    ///
    /// `kind` is the kind of the child (tables are parented by layers,
    /// layers by maps).
    async fn list_parents(
        &self,
        kind: AssetKind,
        child_id: &str,
        page_token: Option<&str>,
    ) -> Result<ParentsPage, ApiError>;

    /// Whether a published version of the asset exists.
    ///
    /// "No published version" must come back as `Ok(NotPublished)`, never as
    /// an error, so that transport failures stay distinguishable.
    async fn get_published_version(
        &self,
        id: &str,
        kind: AssetKind,
    ) -> Result<PublishedVersion, ApiError>;

    /// Fetch a map together with its content tree.
    async fn get_map_content(&self, map_id: &str) -> Result<MapDocument, ApiError>;

    async fn delete_layer(&self, id: &str) -> Result<(), ApiError>;

    async fn delete_map(&self, id: &str) -> Result<(), ApiError>;

    async fn delete_table(&self, id: &str) -> Result<(), ApiError>;
}
