use crate::core::services::traits::AssetService;
use crate::core::services::types::AssetKind;
use crate::error::{ApiError, CascadeError};
use std::collections::{BTreeSet, HashSet};

/// Layers that display the given table.
pub async fn find_parent_layers<S>(
    service: &S,
    table_id: &str,
) -> Result<BTreeSet<String>, CascadeError>
where
    S: AssetService + ?Sized,
{
    list_all_parents(service, AssetKind::Table, table_id).await
}

/// Maps that embed the given layer.
pub async fn find_parent_maps<S>(
    service: &S,
    layer_id: &str,
) -> Result<BTreeSet<String>, CascadeError>
where
    S: AssetService + ?Sized,
{
    list_all_parents(service, AssetKind::Layer, layer_id).await
}

// Follows page tokens until the listing is exhausted. Any failing page fails
// the whole listing; callers never see a partial set.
async fn list_all_parents<S>(
    service: &S,
    kind: AssetKind,
    child_id: &str,
) -> Result<BTreeSet<String>, CascadeError>
where
    S: AssetService + ?Sized,
{
    let mut parent_ids = BTreeSet::new();
    let mut seen_tokens = HashSet::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = service
            .list_parents(kind, child_id, page_token.as_deref())
            .await
            .map_err(|source| CascadeError::DiscoveryFailed {
                asset_id: child_id.to_string(),
                kind,
                source,
            })?;

        parent_ids.extend(page.parent_ids);

        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                if !seen_tokens.insert(token.clone()) {
                    return Err(CascadeError::DiscoveryFailed {
                        asset_id: child_id.to_string(),
                        kind,
                        source: ApiError::Http {
                            status: 0,
                            endpoint: format!("/{}/{}/parents", kind.collection(), child_id),
                            message: format!("page token '{}' returned twice", token),
                        },
                    });
                }
                page_token = Some(token);
            }
            None => break,
        }
    }

    log::debug!(
        "Found {} parent(s) of {} {}",
        parent_ids.len(),
        kind,
        child_id
    );

    Ok(parent_ids)
}
