use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{BorderColor, ImageStatus, Rarity, SecurityStamp};
use super::flags::{Finishes, Games, PrintFlags};
use super::raw::{RawImageUris, RawPrices};

// ---------------------------------------------------------------------------
// GameplayPrinting — one physical print of a card
// ---------------------------------------------------------------------------

/// One row of the printing blob, keyed by `scryfall_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayPrinting {
    // -- Links --
    pub scryfall_id: Uuid,
    /// `None` for prints without oracle text; such rows are unreachable
    /// through oracle-keyed queries.
    pub oracle_id: Option<Uuid>,
    pub name: String,
    pub lang: String,

    // -- Set metadata --
    pub set_code: String,
    pub set_id: Option<Uuid>,
    pub set_name: String,
    pub collector_number: String,
    pub released_at: Option<String>,

    // -- Print characteristics --
    pub rarity: Rarity,
    pub border_color: BorderColor,
    pub image_status: ImageStatus,
    pub security_stamp: SecurityStamp,
    pub finishes: Finishes,
    pub games: Games,
    pub flags: PrintFlags,

    // -- Art --
    /// Absent when art lives per face.
    pub image_uris: Option<ImageUris>,
    /// Positionally aligned with the card's faces.
    pub faces: Vec<FaceArt>,

    pub external_ids: ExternalIds,
    pub prices: Prices,
}

impl GameplayPrinting {
    pub fn is_promo(&self) -> bool {
        self.flags.contains(PrintFlags::PROMO)
    }

    pub fn is_highres(&self) -> bool {
        self.flags.contains(PrintFlags::HIGHRES_IMAGE)
    }

    pub fn in_paper(&self) -> bool {
        self.games.contains(Games::PAPER)
    }

    /// Every oracle id this printing carries: the record's own, then any
    /// distinct face oracle ids (reversible cards), first occurrence first.
    pub fn oracle_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        let faces = self.faces.iter().map(|f| f.oracle_id);
        for id in std::iter::once(self.oracle_id).chain(faces).flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

// ---------------------------------------------------------------------------
// FaceArt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceArt {
    /// Only set when the face has an oracle identity of its own.
    pub oracle_id: Option<Uuid>,
    pub artist: Option<String>,
    pub artist_id: Option<Uuid>,
    pub illustration_id: Option<Uuid>,
    pub flavor_name: Option<String>,
    pub flavor_text: Option<String>,
    pub watermark: Option<String>,
    pub image_uris: Option<ImageUris>,
}

// ---------------------------------------------------------------------------
// ImageUris
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
    pub art_crop: Option<String>,
    pub border_crop: Option<String>,
}

impl From<&RawImageUris> for ImageUris {
    fn from(raw: &RawImageUris) -> Self {
        Self {
            small: raw.small.clone(),
            normal: raw.normal.clone(),
            large: raw.large.clone(),
            png: raw.png.clone(),
            art_crop: raw.art_crop.clone(),
            border_crop: raw.border_crop.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// ExternalIds
// ---------------------------------------------------------------------------

/// Marketplace and client identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    pub mtgo_id: Option<u32>,
    pub arena_id: Option<u32>,
    pub tcgplayer_id: Option<u32>,
    pub cardmarket_id: Option<u32>,
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Price snapshot, kept exactly as the source rendered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub usd_etched: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
    pub tix: Option<String>,
}

impl From<&RawPrices> for Prices {
    fn from(raw: &RawPrices) -> Self {
        Self {
            usd: raw.usd.clone(),
            usd_foil: raw.usd_foil.clone(),
            usd_etched: raw.usd_etched.clone(),
            eur: raw.eur.clone(),
            eur_foil: raw.eur_foil.clone(),
            tix: raw.tix.clone(),
        }
    }
}
