use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Card: The subset of the Scryfall card object ingested by the SDK
// ---------------------------------------------------------------------------

/// A single card printing.
///
/// Every field tolerates absence and `null`; a `null` in a non-`Option`
/// field decodes as the default value. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    // -- Core identifiers --
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub id: String,
    pub oracle_id: Option<String>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub lang: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub released_at: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub set: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub collector_number: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub rarity: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub layout: String,

    // -- Gameplay fields --
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub cmc: Option<f64>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub keywords: Vec<String>,

    // -- Nested objects --
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub prices: CardPrices,
    pub image_uris: Option<HashMap<String, String>>,
    pub card_faces: Option<Vec<CardFace>>,

    // -- External ids and links --
    pub tcgplayer_id: Option<i64>,
    pub cardmarket_id: Option<i64>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub uri: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub scryfall_uri: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub rulings_uri: String,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub prints_search_uri: String,

    // -- Print attributes --
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub digital: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub reserved: bool,
    pub edhrec_rank: Option<i64>,
    pub penny_rank: Option<i64>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub games: Vec<String>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub promo: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub reprint: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub variation: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub oversized: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub story_spotlight: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub full_art: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub textless: bool,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub booster: bool,
    pub frame_effects: Option<Vec<String>>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub frame: String,
    pub security_stamp: Option<String>,
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub border_color: String,
    pub watermark: Option<String>,
}

impl Card {
    /// Whether the card has more than one face (transform, modal DFC, split, ...).
    pub fn is_multi_faced(&self) -> bool {
        self.card_faces.as_ref().is_some_and(|faces| faces.len() > 1)
    }

    /// Image URL for the given size (`"small"`, `"normal"`, `"large"`, `"png"`, ...).
    ///
    /// Falls back to the first face's images for multi-faced cards, which
    /// carry no top-level `image_uris`.
    pub fn image_uri(&self, size: &str) -> Option<&str> {
        self.image_uris
            .as_ref()
            .and_then(|uris| uris.get(size))
            .or_else(|| {
                self.card_faces
                    .as_ref()
                    .and_then(|faces| faces.first())
                    .and_then(|face| face.image_uris.as_ref())
                    .and_then(|uris| uris.get(size))
            })
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// CardPrices: Market prices, reported by Scryfall as decimal strings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPrices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub usd_etched: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
    pub tix: Option<String>,
}

// ---------------------------------------------------------------------------
// CardFace: One face of a multi-faced card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFace {
    #[serde(deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub colors: Option<Vec<String>>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub flavor_text: Option<String>,
    pub image_uris: Option<HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_empty_object() {
        let card: Card = serde_json::from_str("{}").unwrap();
        assert_eq!(card, Card::default());
    }

    #[test]
    fn decodes_nulls_and_unknown_fields() {
        let card: Card = serde_json::from_value(serde_json::json!({
            "object": "card",
            "id": "abc-123",
            "name": "Lightning Bolt",
            "cmc": 1.0,
            "prices": {"usd": "1.99", "usd_foil": null, "eur": null},
            "watermark": null,
            "edhrec_rank": 12,
            "legalities": {"modern": "legal"}
        }))
        .unwrap();
        assert_eq!(card.id, "abc-123");
        assert_eq!(card.cmc, Some(1.0));
        assert_eq!(card.prices.usd.as_deref(), Some("1.99"));
        assert!(card.prices.usd_foil.is_none());
        assert!(card.watermark.is_none());
        assert_eq!(card.edhrec_rank, Some(12));
    }

    #[test]
    fn null_in_required_fields_decodes_as_default() {
        let card: Card = serde_json::from_value(serde_json::json!({
            "id": "abc-123",
            "name": null,
            "games": null,
            "digital": null,
            "prices": null,
            "card_faces": [{"name": null, "mana_cost": "{U}"}]
        }))
        .unwrap();
        assert_eq!(card.id, "abc-123");
        assert_eq!(card.name, "");
        assert!(card.games.is_empty());
        assert!(!card.digital);
        assert_eq!(card.prices, CardPrices::default());
        let faces = card.card_faces.unwrap();
        assert_eq!(faces[0].name, "");
        assert_eq!(faces[0].mana_cost.as_deref(), Some("{U}"));
    }

    #[test]
    fn image_uri_falls_back_to_first_face() {
        let card: Card = serde_json::from_value(serde_json::json!({
            "name": "Delver of Secrets // Insectile Aberration",
            "card_faces": [
                {"name": "Delver of Secrets", "image_uris": {"normal": "https://img/front.jpg"}},
                {"name": "Insectile Aberration", "image_uris": {"normal": "https://img/back.jpg"}}
            ]
        }))
        .unwrap();
        assert!(card.is_multi_faced());
        assert_eq!(card.image_uri("normal"), Some("https://img/front.jpg"));
        assert_eq!(card.image_uri("png"), None);
    }

    #[test]
    fn top_level_image_uri_takes_precedence() {
        let card: Card = serde_json::from_value(serde_json::json!({
            "image_uris": {"small": "https://img/small.jpg"}
        }))
        .unwrap();
        assert!(!card.is_multi_faced());
        assert_eq!(card.image_uri("small"), Some("https://img/small.jpg"));
    }
}
