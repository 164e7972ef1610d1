use serde::Serialize;
use std::fmt;

/// Kinds of assets that take part in a table cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Table,
    Layer,
    Map,
}

impl AssetKind {
    /// REST collection segment, e.g. `/layers/{id}`
    pub fn collection(&self) -> &'static str {
        match self {
            AssetKind::Table => "tables",
            AssetKind::Layer => "layers",
            AssetKind::Map => "maps",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Table => "table",
            AssetKind::Layer => "layer",
            AssetKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// Outcome of asking for the published version of a layer or map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedVersion {
    Published,
    NotPublished,
}

/// One page of a parents listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentsPage {
    pub parent_ids: Vec<String>,
    pub next_page_token: Option<String>,
}
