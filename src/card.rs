//! Card record types.
//!
//! Defines [`RawCard`] (one record from the bulk dump, optionality kept
//! explicit), [`PromptFields`] (the normalized subset sent to the
//! enrichment service), and the small predicates the filter stage is built
//! from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One card record as it appears in the bulk JSON dump.
///
/// `oracle_id` identifies the card across printings and is NOT unique in
/// the dump — reprints share it. `Option` fields distinguish absent from
/// present-but-empty; the filter and text builder both key off that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCard {
    pub oracle_id: String,
    pub name: String,
    pub released_at: String,
    pub mana_cost: String,
    pub cmc: f64,
    pub type_line: String,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub hand_modifier: Option<String>,
    pub life_modifier: Option<String>,
    pub colors: Option<Vec<String>>,
    pub color_identity: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub produced_mana: Option<Vec<String>>,
    pub image_uris: HashMap<String, String>,
    pub scryfall_uri: String,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
}

impl RawCard {
    /// Token variants are never indexed.
    pub fn is_token(&self) -> bool {
        self.type_line.contains("Token")
    }

    /// A card with neither rules text nor keywords has nothing meaningful
    /// to vectorize. Whitespace-only text and empty keyword lists count as
    /// absent.
    pub fn has_vector_content(&self) -> bool {
        let has_text = self
            .oracle_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let has_keywords = self.keywords.as_deref().is_some_and(|k| !k.is_empty());
        has_text || has_keywords
    }
}

/// The normalized field subset posted to the enrichment endpoint.
///
/// Every field is omitted from the JSON body when empty, so the generation
/// service only sees what the card actually carries. Built by
/// [`PromptFields::from_card`] — an explicit mapping with a fixed contract,
/// checked field by field at compile time.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PromptFields {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mana_cost: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub cmc: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub type_line: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub oracle_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub power: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub toughness: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub loyalty: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hand_modifier: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub life_modifier: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color_identity: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produced_mana: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rarity: String,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl PromptFields {
    pub fn from_card(card: &RawCard) -> Self {
        Self {
            mana_cost: card.mana_cost.clone(),
            cmc: card.cmc,
            type_line: card.type_line.clone(),
            oracle_text: card.oracle_text.clone().unwrap_or_default(),
            power: card.power.clone().unwrap_or_default(),
            toughness: card.toughness.clone().unwrap_or_default(),
            loyalty: card.loyalty.clone().unwrap_or_default(),
            hand_modifier: card.hand_modifier.clone().unwrap_or_default(),
            life_modifier: card.life_modifier.clone().unwrap_or_default(),
            colors: card.colors.clone().unwrap_or_default(),
            color_identity: card.color_identity.clone().unwrap_or_default(),
            keywords: card.keywords.clone().unwrap_or_default(),
            produced_mana: card.produced_mana.clone().unwrap_or_default(),
            rarity: card.rarity.clone().unwrap_or_default(),
        }
    }
}

/// Map color-identity letters to full color words for display metadata.
/// Unrecognized letters pass through unchanged.
pub fn map_colors(letters: &[String]) -> Vec<String> {
    letters
        .iter()
        .map(|letter| match letter.to_ascii_uppercase().as_str() {
            "B" => "Black".to_string(),
            "U" => "Blue".to_string(),
            "G" => "Green".to_string(),
            "R" => "Red".to_string(),
            "W" => "White".to_string(),
            _ => {
                tracing::warn!(color = %letter, "unrecognized color letter");
                letter.clone()
            }
        })
        .collect()
}
