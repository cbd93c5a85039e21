use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardSet: A Scryfall set object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSet {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    pub released_at: Option<String>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub set_type: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub card_count: u32,
    pub parent_set_code: Option<String>,
    pub block: Option<String>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub digital: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub nonfoil_only: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub foil_only: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub icon_svg_uri: String,
}
