//! Wire-shaped Scryfall records.
//!
//! These mirror the upstream JSON closely and stay separate from the
//! canonical gameplay types: upstream schema drift is absorbed here and in
//! [`crate::normalize`], never past it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RawCard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCard {
    // -- Identity --
    pub id: Uuid,
    pub oracle_id: Option<Uuid>,
    pub name: String,
    pub lang: Option<String>,
    pub layout: Option<String>,

    // -- Gameplay fields --
    pub mana_cost: Option<String>,
    pub cmc: Option<f32>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    pub color_indicator: Option<Vec<String>>,
    pub produced_mana: Option<Vec<String>>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub defense: Option<String>,
    pub hand_modifier: Option<String>,
    pub life_modifier: Option<String>,
    #[serde(default)]
    pub legalities: HashMap<String, String>,
    #[serde(default)]
    pub all_parts: Vec<RawRelatedCard>,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub game_changer: bool,
    pub edhrec_rank: Option<i32>,
    pub penny_rank: Option<i32>,
    #[serde(default)]
    pub card_faces: Vec<RawCardFace>,

    // -- Print fields --
    #[serde(default)]
    pub set: String,
    pub set_id: Option<Uuid>,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub collector_number: String,
    pub released_at: Option<String>,
    pub rarity: Option<String>,
    pub border_color: Option<String>,
    pub image_status: Option<String>,
    pub security_stamp: Option<String>,
    #[serde(default)]
    pub finishes: Vec<String>,
    #[serde(default)]
    pub games: Vec<String>,
    pub image_uris: Option<RawImageUris>,
    pub artist: Option<String>,
    #[serde(default)]
    pub artist_ids: Vec<Uuid>,
    pub illustration_id: Option<Uuid>,
    pub flavor_name: Option<String>,
    pub flavor_text: Option<String>,
    pub watermark: Option<String>,
    #[serde(default)]
    pub promo: bool,
    #[serde(default)]
    pub reprint: bool,
    #[serde(default)]
    pub full_art: bool,
    #[serde(default)]
    pub oversized: bool,
    #[serde(default)]
    pub textless: bool,
    #[serde(default)]
    pub story_spotlight: bool,
    #[serde(default)]
    pub booster: bool,
    #[serde(default)]
    pub digital: bool,
    #[serde(default)]
    pub variation: bool,
    #[serde(default)]
    pub content_warning: bool,
    #[serde(default)]
    pub highres_image: bool,
    pub mtgo_id: Option<u32>,
    pub arena_id: Option<u32>,
    pub tcgplayer_id: Option<u32>,
    pub cardmarket_id: Option<u32>,
    #[serde(default)]
    pub prices: RawPrices,
}

impl RawCard {
    /// Decode one record from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Missing `lang` is treated as English.
    pub fn is_english(&self) -> bool {
        self.lang.as_deref().map_or(true, |l| l == "en")
    }
}

// ---------------------------------------------------------------------------
// RawCardFace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCardFace {
    pub name: String,
    pub mana_cost: Option<String>,
    pub cmc: Option<f32>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub colors: Option<Vec<String>>,
    pub color_indicator: Option<Vec<String>>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub defense: Option<String>,
    pub layout: Option<String>,
    pub oracle_id: Option<Uuid>,
    pub artist: Option<String>,
    pub artist_id: Option<Uuid>,
    pub illustration_id: Option<Uuid>,
    pub flavor_name: Option<String>,
    pub flavor_text: Option<String>,
    pub watermark: Option<String>,
    pub image_uris: Option<RawImageUris>,
}

// ---------------------------------------------------------------------------
// RawRelatedCard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelatedCard {
    pub id: Uuid,
    #[serde(default)]
    pub component: String,
    pub name: String,
    #[serde(default)]
    pub type_line: String,
}

// ---------------------------------------------------------------------------
// RawImageUris
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
    pub art_crop: Option<String>,
    pub border_crop: Option<String>,
}

// ---------------------------------------------------------------------------
// RawPrices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPrices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub usd_etched: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
    pub tix: Option<String>,
}
