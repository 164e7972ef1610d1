use serde::{Deserialize, Serialize};

/// Generic asset as returned by `GET /assets/{id}`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl Asset {
    pub fn is_table(&self) -> bool {
        self.asset_type.eq_ignore_ascii_case("table")
    }
}

// Parents endpoints
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Parent {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentsListResponse {
    #[serde(default)]
    pub parents: Vec<Parent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One entry of a map's content tree
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum MapItem {
    #[serde(rename = "layer")]
    Layer {
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
    #[serde(rename = "folder")]
    Folder {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        contents: Vec<MapItem>,
    },
    // KML links carry no asset id
    #[serde(rename = "kmlLink")]
    KmlLink {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "kmlUrl")]
        kml_url: Option<String>,
    },
}

/// Map as returned by `GET /maps/{id}`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MapDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contents: Vec<MapItem>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProjectsListResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_is_case_insensitive() {
        let json = r#"{ "id": "T1", "type": "TABLE", "name": "Parcels" }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert!(asset.is_table());
        assert_eq!(asset.name.as_deref(), Some("Parcels"));
        assert_eq!(asset.project_id, None);

        let json = r#"{ "id": "L1", "type": "layer" }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert!(!asset.is_table());
    }

    #[test]
    fn test_parents_list_without_parents_field() {
        let response: ParentsListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.parents.is_empty());
        assert!(response.next_page_token.is_none());

        let json = r#"{ "parents": [{ "id": "L1" }], "nextPageToken": "abc" }"#;
        let response: ParentsListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.parents[0].id, "L1");
        assert_eq!(response.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_map_contents_deserialization() {
        let json = r#"{
            "id": "M1",
            "name": "City",
            "contents": [
                { "type": "layer", "id": "L1", "name": "Roads" },
                {
                    "type": "folder",
                    "name": "Overlays",
                    "visibility": "visible",
                    "contents": [
                        { "type": "kmlLink", "kmlUrl": "http://example.test/a.kml", "name": "A" },
                        { "type": "folder", "contents": [ { "type": "layer", "id": "L2" } ] }
                    ]
                }
            ]
        }"#;

        let map: MapDocument = serde_json::from_str(json).unwrap();
        assert_eq!(map.contents.len(), 2);
        assert!(matches!(&map.contents[0], MapItem::Layer { id, .. } if id == "L1"));
        match &map.contents[1] {
            MapItem::Folder { contents, .. } => {
                assert!(matches!(&contents[0], MapItem::KmlLink { kml_url: Some(_), .. }));
                assert!(matches!(&contents[1], MapItem::Folder { .. }));
            }
            other => panic!("Expected folder, got {:?}", other),
        }
    }

    #[test]
    fn test_map_without_contents() {
        let map: MapDocument = serde_json::from_str(r#"{ "id": "M1" }"#).unwrap();
        assert!(map.contents.is_empty());
    }
}
