use super::LayerIdSet;
use super::discovery::{find_parent_layers, find_parent_maps};
use super::guard::assert_not_published;
use super::reduction::{MapDecision, resolve_map_for_deletion};
use crate::core::services::traits::AssetService;
use crate::core::services::types::AssetKind;
use crate::error::{ApiError, CascadeError};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Whether delete calls are actually issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    #[default]
    Execute,
    /// Run every read and check, record what would go, delete nothing.
    DryRun,
}

/// Named points of the cascade state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStep {
    Validate,
    DiscoverLayers,
    GuardLayer,
    DiscoverMaps,
    GuardMap,
    ResolveMap,
    DeleteMap,
    DeleteLayer,
    DeleteTable,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CascadeStep::Validate => "table validation",
            CascadeStep::DiscoverLayers => "layer discovery",
            CascadeStep::GuardLayer => "layer publication check",
            CascadeStep::DiscoverMaps => "map discovery",
            CascadeStep::GuardMap => "map publication check",
            CascadeStep::ResolveMap => "map content check",
            CascadeStep::DeleteMap => "map deletion",
            CascadeStep::DeleteLayer => "layer deletion",
            CascadeStep::DeleteTable => "table deletion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedAsset {
    pub id: String,
    pub kind: AssetKind,
}

/// Result of a cascade that ran to the end
#[derive(Debug, Clone, Serialize)]
pub struct CascadeReport {
    pub table_id: String,
    pub mode: CascadeMode,
    pub layer_ids: Vec<String>,
    /// Assets in the order they were deleted (or would be, in a dry run).
    pub deleted: Vec<DeletedAsset>,
}

impl CascadeReport {
    pub fn count(&self, kind: AssetKind) -> usize {
        self.deleted.iter().filter(|a| a.kind == kind).count()
    }
}

/// A cascade that stopped early.
///
/// `deleted` holds every asset removed before the failure. Nothing is rolled
/// back, so those assets are gone.
#[derive(Error, Debug)]
#[error("Cascade aborted during {step}: {error}")]
pub struct CascadeAbort {
    pub step: CascadeStep,
    #[source]
    pub error: CascadeError,
    pub deleted: Vec<DeletedAsset>,
}

impl CascadeAbort {
    /// True when the remote asset graph was left half deleted.
    pub fn is_partial(&self) -> bool {
        !self.deleted.is_empty()
    }
}

// Mutable bookkeeping for one run
struct CascadeRun {
    step: CascadeStep,
    deleted: Vec<DeletedAsset>,
    removed: HashSet<(AssetKind, String)>,
}

impl CascadeRun {
    fn new() -> Self {
        Self {
            step: CascadeStep::Validate,
            deleted: Vec::new(),
            removed: HashSet::new(),
        }
    }

    fn enter(&mut self, step: CascadeStep) {
        self.step = step;
    }

    fn record(&mut self, kind: AssetKind, id: &str) {
        self.removed.insert((kind, id.to_string()));
        self.deleted.push(DeletedAsset {
            id: id.to_string(),
            kind,
        });
    }

    fn is_removed(&self, kind: AssetKind, id: &str) -> bool {
        self.removed.contains(&(kind, id.to_string()))
    }
}

/// Deletes a table together with its layers and the maps that use them.
pub struct CascadeExecutor<'a, S: AssetService + ?Sized> {
    service: &'a S,
    mode: CascadeMode,
}

impl<'a, S: AssetService + ?Sized> CascadeExecutor<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            mode: CascadeMode::Execute,
        }
    }

    pub fn with_mode(mut self, mode: CascadeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the cascade for `table_id`, stopping at the first failure.
    pub async fn delete_table(&self, table_id: &str) -> Result<CascadeReport, CascadeAbort> {
        let mut run = CascadeRun::new();

        match self.run(table_id, &mut run).await {
            Ok(layer_ids) => Ok(CascadeReport {
                table_id: table_id.to_string(),
                mode: self.mode,
                layer_ids: layer_ids.iter().cloned().collect(),
                deleted: run.deleted,
            }),
            Err(error) => {
                log::warn!(
                    "Cascade for table {} aborted during {} after {} deletion(s)",
                    table_id,
                    run.step,
                    run.deleted.len()
                );
                Err(CascadeAbort {
                    step: run.step,
                    error,
                    deleted: run.deleted,
                })
            }
        }
    }

    async fn run(&self, table_id: &str, run: &mut CascadeRun) -> Result<LayerIdSet, CascadeError> {
        run.enter(CascadeStep::Validate);
        self.validate_table(table_id).await?;

        run.enter(CascadeStep::DiscoverLayers);
        log::info!("Finding layers belonging to table {}", table_id);
        let layer_ids = LayerIdSet::new(find_parent_layers(self.service, table_id).await?);
        log::info!("Found {} layer(s)", layer_ids.len());

        for layer_id in layer_ids.iter() {
            self.delete_layer(layer_id, &layer_ids, run).await?;
        }

        self.remove(run, AssetKind::Table, table_id).await?;
        Ok(layer_ids)
    }

    async fn validate_table(&self, table_id: &str) -> Result<(), CascadeError> {
        match self.service.get_asset(table_id).await {
            Ok(asset) if asset.is_table() => Ok(()),
            Ok(asset) => Err(CascadeError::NotATable {
                asset_id: table_id.to_string(),
                found_type: Some(asset.asset_type),
            }),
            // The service answers 400 for malformed ids and 404 for unknown ones
            Err(e) if e.is_not_found() || matches!(e, ApiError::Http { status: 400, .. }) => {
                Err(CascadeError::NotATable {
                    asset_id: table_id.to_string(),
                    found_type: None,
                })
            }
            Err(source) => Err(CascadeError::DiscoveryFailed {
                asset_id: table_id.to_string(),
                kind: AssetKind::Table,
                source,
            }),
        }
    }

    async fn delete_layer(
        &self,
        layer_id: &str,
        layer_ids: &LayerIdSet,
        run: &mut CascadeRun,
    ) -> Result<(), CascadeError> {
        run.enter(CascadeStep::GuardLayer);
        assert_not_published(self.service, layer_id, AssetKind::Layer).await?;

        run.enter(CascadeStep::DiscoverMaps);
        log::info!("Layer {}: finding maps", layer_id);
        let map_ids = find_parent_maps(self.service, layer_id).await?;

        for map_id in &map_ids {
            if run.is_removed(AssetKind::Map, map_id) {
                log::debug!("Map {} already handled in this run", map_id);
                continue;
            }

            run.enter(CascadeStep::GuardMap);
            assert_not_published(self.service, map_id, AssetKind::Map).await?;

            run.enter(CascadeStep::ResolveMap);
            log::info!("Checking for other layers on map {}", map_id);
            match resolve_map_for_deletion(self.service, map_id, layer_ids).await? {
                MapDecision::DeleteMap => self.remove(run, AssetKind::Map, map_id).await?,
                MapDecision::Blocked { surviving } => {
                    return Err(CascadeError::MapHasSurvivingLayers {
                        map_id: map_id.clone(),
                        surviving,
                    });
                }
            }
        }

        self.remove(run, AssetKind::Layer, layer_id).await
    }

    async fn remove(
        &self,
        run: &mut CascadeRun,
        kind: AssetKind,
        id: &str,
    ) -> Result<(), CascadeError> {
        run.enter(match kind {
            AssetKind::Map => CascadeStep::DeleteMap,
            AssetKind::Layer => CascadeStep::DeleteLayer,
            AssetKind::Table => CascadeStep::DeleteTable,
        });

        if self.mode == CascadeMode::DryRun {
            log::info!("Would delete {} {}", kind, id);
            run.record(kind, id);
            return Ok(());
        }

        log::info!("Deleting {} {}", kind, id);
        let result = match kind {
            AssetKind::Map => self.service.delete_map(id).await,
            AssetKind::Layer => self.service.delete_layer(id).await,
            AssetKind::Table => self.service.delete_table(id).await,
        };
        result.map_err(|source| CascadeError::DeleteFailed {
            asset_id: id.to_string(),
            kind,
            source,
        })?;

        log::info!("Deleted {} {}", kind, id);
        run.record(kind, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(CascadeStep::GuardLayer.to_string(), "layer publication check");
        assert_eq!(CascadeStep::DeleteTable.to_string(), "table deletion");
    }

    #[test]
    fn test_report_counts() {
        let report = CascadeReport {
            table_id: "T1".to_string(),
            mode: CascadeMode::Execute,
            layer_ids: vec!["L1".to_string()],
            deleted: vec![
                DeletedAsset {
                    id: "M1".to_string(),
                    kind: AssetKind::Map,
                },
                DeletedAsset {
                    id: "L1".to_string(),
                    kind: AssetKind::Layer,
                },
                DeletedAsset {
                    id: "T1".to_string(),
                    kind: AssetKind::Table,
                },
            ],
        };
        assert_eq!(report.count(AssetKind::Map), 1);
        assert_eq!(report.count(AssetKind::Layer), 1);
        assert_eq!(report.count(AssetKind::Table), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "execute");
        assert_eq!(json["deleted"][0]["kind"], "map");
    }

    #[test]
    fn test_abort_message_names_step() {
        let abort = CascadeAbort {
            step: CascadeStep::ResolveMap,
            error: CascadeError::MapHasSurvivingLayers {
                map_id: "M1".to_string(),
                surviving: ["L99".to_string()].into_iter().collect(),
            },
            deleted: vec![],
        };
        assert!(!abort.is_partial());
        assert!(
            abort
                .to_string()
                .starts_with("Cascade aborted during map content check: Map M1")
        );
    }
}
