use super::LayerIdSet;
use crate::api::models::MapItem;
use crate::core::services::traits::AssetService;
use crate::error::CascadeError;
use std::collections::BTreeSet;

/// What to do with a map that embeds a doomed layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapDecision {
    /// Nothing would be left on the map, delete it.
    DeleteMap,
    /// The map still needs these layers, which are not being deleted.
    Blocked { surviving: BTreeSet<String> },
}

/// Ids of every layer referenced anywhere in a content tree.
///
/// Folders are expanded with a worklist instead of recursion so deeply nested
/// trees cannot exhaust the stack. KML links have no id and are skipped.
pub fn collect_layer_ids(contents: &[MapItem]) -> BTreeSet<String> {
    let mut layer_ids = BTreeSet::new();
    let mut pending: Vec<&MapItem> = contents.iter().collect();

    while let Some(item) = pending.pop() {
        match item {
            MapItem::Layer { id, .. } => {
                layer_ids.insert(id.clone());
            }
            MapItem::Folder { contents, .. } => pending.extend(contents.iter()),
            MapItem::KmlLink { .. } => {}
        }
    }

    layer_ids
}

/// Decide a map's fate from its content tree and the pending deletions.
pub fn reduce_map(contents: &[MapItem], layer_ids: &LayerIdSet) -> MapDecision {
    let surviving: BTreeSet<String> = collect_layer_ids(contents)
        .into_iter()
        .filter(|id| !layer_ids.contains(id))
        .collect();

    if surviving.is_empty() {
        MapDecision::DeleteMap
    } else {
        MapDecision::Blocked { surviving }
    }
}

/// Fetch a map and decide whether it can be deleted outright.
///
/// There is no partial-edit path: a map that would keep any layer is
/// reported as blocked and left untouched.
pub async fn resolve_map_for_deletion<S>(
    service: &S,
    map_id: &str,
    layer_ids: &LayerIdSet,
) -> Result<MapDecision, CascadeError>
where
    S: AssetService + ?Sized,
{
    let map = service
        .get_map_content(map_id)
        .await
        .map_err(|source| CascadeError::MapContentUnavailable {
            map_id: map_id.to_string(),
            source,
        })?;

    let decision = reduce_map(&map.contents, layer_ids);
    log::debug!("Map {} resolved to {:?}", map_id, decision);
    Ok(decision)
}
