use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Layout, RelatedComponent};
use super::flags::{CardFlags, Colors};
use crate::parse::{Legalities, ManaCost, StatValue, TypeLine};

// ---------------------------------------------------------------------------
// GameplayCard — oracle-level card (rules text, no art)
// ---------------------------------------------------------------------------

/// One row of the card blob, keyed by `oracle_id`.
///
/// `faces` always holds at least one entry; a single-faced card is modeled as
/// exactly one face mirroring the top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayCard {
    // -- Identity --
    pub scryfall_id: Uuid,
    pub oracle_id: Option<Uuid>,
    pub name: String,
    pub layout: Layout,

    // -- Colors --
    pub colors: Colors,
    pub color_identity: Colors,
    pub produced_mana: Colors,

    // -- Cost and types --
    /// `None` means the cost is stored per face; `Some` with no symbols is a
    /// card without a mana cost.
    pub mana_cost: Option<ManaCost>,
    pub mana_value: f32,
    pub type_line: TypeLine,
    pub oracle_text: Option<String>,
    pub keywords: Vec<String>,

    // -- Stats --
    pub power: Option<StatValue>,
    pub toughness: Option<StatValue>,
    pub loyalty: Option<StatValue>,
    pub defense: Option<StatValue>,
    pub hand_modifier: Option<String>,
    pub life_modifier: Option<String>,

    // -- Play metadata --
    pub legalities: Legalities,
    pub related: Vec<RelatedCard>,
    pub flags: CardFlags,
    pub edhrec_rank: Option<i32>,
    pub penny_rank: Option<i32>,

    pub faces: Vec<GameplayFace>,
}

impl GameplayCard {
    pub fn is_reserved(&self) -> bool {
        self.flags.contains(CardFlags::RESERVED)
    }

    pub fn is_game_changer(&self) -> bool {
        self.flags.contains(CardFlags::GAME_CHANGER)
    }

    pub fn is_multi_faced(&self) -> bool {
        self.faces.len() > 1
    }
}

// ---------------------------------------------------------------------------
// GameplayFace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayFace {
    pub name: String,
    pub mana_cost: Option<ManaCost>,
    pub type_line: TypeLine,
    pub oracle_text: Option<String>,
    pub colors: Colors,
    pub color_indicator: Option<Colors>,
    pub power: Option<StatValue>,
    pub toughness: Option<StatValue>,
    pub loyalty: Option<StatValue>,
    pub defense: Option<StatValue>,
    /// Only set when a face carries its own layout (reversible cards).
    pub layout: Option<Layout>,
    /// Only set when a face carries its own oracle identity (reversible cards).
    pub oracle_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// RelatedCard
// ---------------------------------------------------------------------------

/// A link to another card by identity, never by object reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedCard {
    pub id: Uuid,
    pub component: RelatedComponent,
    pub name: String,
    pub type_line: String,
}
