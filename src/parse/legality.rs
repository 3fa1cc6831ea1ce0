//! Per-format legality packed two bits per format into a `u64`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Known formats in bit order. Appending is safe; reordering breaks blobs.
pub const FORMATS: &[&str] = &[
    "standard",
    "future",
    "historic",
    "timeless",
    "gladiator",
    "pioneer",
    "explorer",
    "modern",
    "legacy",
    "pauper",
    "vintage",
    "penny",
    "commander",
    "oathbreaker",
    "standardbrawl",
    "brawl",
    "alchemy",
    "paupercommander",
    "duel",
    "oldschool",
    "premodern",
    "predh",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum LegalityStatus {
    #[default]
    NotLegal = 0,
    Legal = 1,
    Restricted = 2,
    Banned = 3,
}

impl LegalityStatus {
    /// Accepts Scryfall (`not_legal`) and MTGJSON (`Not Legal`) spellings.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "legal" => LegalityStatus::Legal,
            "restricted" => LegalityStatus::Restricted,
            "banned" => LegalityStatus::Banned,
            _ => LegalityStatus::NotLegal,
        }
    }

    fn from_bits(bits: u64) -> Self {
        match bits & 0b11 {
            1 => LegalityStatus::Legal,
            2 => LegalityStatus::Restricted,
            3 => LegalityStatus::Banned,
            _ => LegalityStatus::NotLegal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Legalities(u64);

impl Legalities {
    /// Build from a format → status map. Unknown format keys are ignored.
    pub fn parse(map: &HashMap<String, String>) -> Self {
        let mut legalities = Legalities::default();
        for (format, status) in map {
            legalities.set(format, LegalityStatus::parse(status));
        }
        legalities
    }

    pub fn from_bits(bits: u64) -> Self {
        Legalities(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// `None` when `format` is not a known format.
    pub fn get(self, format: &str) -> Option<LegalityStatus> {
        let slot = slot_of(format)?;
        Some(LegalityStatus::from_bits(self.0 >> (slot * 2)))
    }

    /// Returns `false` (and changes nothing) for an unknown format.
    pub fn set(&mut self, format: &str, status: LegalityStatus) -> bool {
        let Some(slot) = slot_of(format) else {
            return false;
        };
        let shift = slot * 2;
        self.0 = (self.0 & !(0b11 << shift)) | ((status as u64) << shift);
        true
    }

    pub fn is_legal(self, format: &str) -> bool {
        matches!(
            self.get(format),
            Some(LegalityStatus::Legal | LegalityStatus::Restricted)
        )
    }

    pub fn iter(self) -> impl Iterator<Item = (&'static str, LegalityStatus)> {
        FORMATS
            .iter()
            .enumerate()
            .map(move |(slot, format)| (*format, LegalityStatus::from_bits(self.0 >> (slot * 2))))
    }
}

fn slot_of(format: &str) -> Option<usize> {
    FORMATS.iter().position(|f| f.eq_ignore_ascii_case(format))
}
