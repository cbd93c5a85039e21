use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BulkData: Descriptor of a downloadable bulk export
// ---------------------------------------------------------------------------

/// Metadata for one of Scryfall's bulk data files (`default_cards`,
/// `oracle_cards`, `all_cards`, ...). The file itself lives at
/// [`download_uri`](Self::download_uri) on external storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkData {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub id: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub bulk_type: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub uri: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub download_uri: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub content_type: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub content_encoding: String,
    /// Size in bytes of the file as served.
    pub size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub permalink_uri: Option<String>,
}

/// Envelope used by list endpoints: `{"object": "list", "data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_descriptor() {
        let bulk: BulkData = serde_json::from_value(serde_json::json!({
            "object": "bulk_data",
            "id": "e2ef41e3-5778-4bc2-af3f-78eca4dd9c23",
            "type": "default_cards",
            "updated_at": "2024-01-01T10:02:09.263+00:00",
            "uri": "https://api.scryfall.com/bulk-data/e2ef41e3",
            "name": "Default Cards",
            "download_uri": "https://data.scryfall.io/default-cards/default-cards.json",
            "content_type": "application/json",
            "content_encoding": "gzip",
            "size": 431_000_000u64
        }))
        .unwrap();
        assert_eq!(bulk.bulk_type, "default_cards");
        assert_eq!(bulk.size, Some(431_000_000));
        assert!(bulk.compressed_size.is_none());
        assert!(bulk.download_uri.ends_with("default-cards.json"));
    }

    #[test]
    fn list_envelope_tolerates_missing_data() {
        let list: ListResponse<BulkData> = serde_json::from_str(r#"{"object":"list"}"#).unwrap();
        assert!(list.data.is_empty());
    }
}
