//! Cascading deletion of a table and everything that depends on it.
//!
//! The pieces run in this order for every table:
//!
//! ```text
//! validate ─► discover layers ─► for each layer:
//!                                  guard ─► discover maps ─► for each map:
//!                                                              guard ─► reduce ─► delete map
//!                                  delete layer
//!             delete table
//! ```
//!
//! The remote service has no multi-object transactions, so an abort leaves
//! whatever was deleted before it deleted. [`CascadeAbort::deleted`] lists
//! those assets.

pub mod discovery;
pub mod executor;
pub mod guard;
pub mod reduction;

pub use discovery::{find_parent_layers, find_parent_maps};
pub use executor::{
    CascadeAbort, CascadeExecutor, CascadeMode, CascadeReport, CascadeStep, DeletedAsset,
};
pub use guard::assert_not_published;
pub use reduction::{MapDecision, collect_layer_ids, reduce_map, resolve_map_for_deletion};

use std::collections::BTreeSet;

/// Layer ids scheduled for deletion in one cascade run.
///
/// Built once from the table's parents and only ever read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerIdSet(BTreeSet<String>);

impl LayerIdSet {
    pub fn new(ids: BTreeSet<String>) -> Self {
        Self(ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LayerIdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
