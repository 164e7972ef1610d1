use crate::core::services::traits::AssetService;
use crate::core::services::types::{AssetKind, PublishedVersion};
use crate::error::CascadeError;

/// Refuses to let a published asset be deleted.
///
/// Only an explicit "no published version" answer lets the check pass. A
/// failed lookup is reported as [`CascadeError::PublicationCheckFailed`], so an
/// outage is never mistaken for permission to delete.
pub async fn assert_not_published<S>(
    service: &S,
    asset_id: &str,
    kind: AssetKind,
) -> Result<(), CascadeError>
where
    S: AssetService + ?Sized,
{
    let published = service
        .get_published_version(asset_id, kind)
        .await
        .map_err(|source| CascadeError::PublicationCheckFailed {
            asset_id: asset_id.to_string(),
            kind,
            source,
        })?;

    match published {
        PublishedVersion::NotPublished => {
            log::debug!("{} {} has no published version", kind, asset_id);
            Ok(())
        }
        PublishedVersion::Published => Err(CascadeError::PublishedAssetBlocksDeletion {
            asset_id: asset_id.to_string(),
            kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Asset, MapDocument};
    use crate::core::services::types::ParentsPage;
    use crate::error::ApiError;
    use async_trait::async_trait;

    enum Answer {
        Published,
        NotPublished,
        Unavailable,
    }

    struct PublicationOnly(Answer);

    #[async_trait]
    impl AssetService for PublicationOnly {
        async fn get_asset(&self, _id: &str) -> Result<Asset, ApiError> {
            unreachable!()
        }

        async fn list_parents(
            &self,
            _kind: AssetKind,
            _child_id: &str,
            _page_token: Option<&str>,
        ) -> Result<ParentsPage, ApiError> {
            unreachable!()
        }

        async fn get_published_version(
            &self,
            id: &str,
            kind: AssetKind,
        ) -> Result<PublishedVersion, ApiError> {
            match self.0 {
                Answer::Published => Ok(PublishedVersion::Published),
                Answer::NotPublished => Ok(PublishedVersion::NotPublished),
                Answer::Unavailable => Err(ApiError::Http {
                    status: 503,
                    endpoint: format!("/{}/{}?version=published", kind.collection(), id),
                    message: "Backend Error".to_string(),
                }),
            }
        }

        async fn get_map_content(&self, _map_id: &str) -> Result<MapDocument, ApiError> {
            unreachable!()
        }

        async fn delete_layer(&self, _id: &str) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn delete_map(&self, _id: &str) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn delete_table(&self, _id: &str) -> Result<(), ApiError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_unpublished_asset_passes() {
        let service = PublicationOnly(Answer::NotPublished);
        assert!(
            assert_not_published(&service, "L1", AssetKind::Layer)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_published_asset_blocks_deletion() {
        let service = PublicationOnly(Answer::Published);
        let err = assert_not_published(&service, "M1", AssetKind::Map)
            .await
            .unwrap_err();
        match err {
            CascadeError::PublishedAssetBlocksDeletion { asset_id, kind } => {
                assert_eq!(asset_id, "M1");
                assert_eq!(kind, AssetKind::Map);
            }
            other => panic!("Expected PublishedAssetBlocksDeletion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unavailable_service_is_not_treated_as_unpublished() {
        let service = PublicationOnly(Answer::Unavailable);
        let err = assert_not_published(&service, "L1", AssetKind::Layer)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CascadeError::PublicationCheckFailed {
                kind: AssetKind::Layer,
                ..
            }
        ));
    }
}
