//! Read-side facade over one card blob and one printing blob.

use log::info;
use std::path::Path;
use uuid::Uuid;

use crate::blob::{BlobLookup, CardBlobReader, PrintingBlobReader};
use crate::build::BuiltBlobs;
use crate::error::Result;
use crate::models::{GameplayCard, GameplayPrinting};

/// A sealed pair of readers. Immutable once opened and safe to share
/// across threads.
#[derive(Debug)]
pub struct CardDatabase {
    cards: CardBlobReader,
    printings: PrintingBlobReader,
}

impl CardDatabase {
    pub fn new(cards: CardBlobReader, printings: PrintingBlobReader) -> Self {
        Self { cards, printings }
    }

    pub fn open(card_path: &Path, printing_path: &Path, mmap: bool) -> Result<Self> {
        let db = Self::new(
            CardBlobReader::open(card_path, mmap)?,
            PrintingBlobReader::open(printing_path, mmap)?,
        );
        info!(
            "Opened card database: {} cards, {} printings",
            db.card_count(),
            db.printing_count()
        );
        Ok(db)
    }

    /// Open straight from an in-memory build, without touching the disk.
    pub fn from_built(built: &BuiltBlobs) -> Result<Self> {
        Ok(Self::new(
            CardBlobReader::from_bytes(built.card_blob.clone())?,
            PrintingBlobReader::from_bytes(built.printing_blob.clone())?,
        ))
    }

    // -- Cards --------------------------------------------------------------

    pub fn card(&self, oracle_id: &Uuid) -> Result<Option<GameplayCard>> {
        self.cards.fetch(oracle_id)
    }

    /// Fetch several cards; unknown ids are skipped.
    pub fn cards(&self, oracle_ids: &[Uuid]) -> Result<Vec<GameplayCard>> {
        self.cards.fetch_batch(oracle_ids)
    }

    pub fn contains_card(&self, oracle_id: &Uuid) -> bool {
        self.cards.contains(oracle_id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    // -- Printings ----------------------------------------------------------

    pub fn printing(&self, scryfall_id: &Uuid) -> Result<Option<GameplayPrinting>> {
        self.printings.fetch(scryfall_id)
    }

    pub fn printings(&self, scryfall_ids: &[Uuid]) -> Result<Vec<GameplayPrinting>> {
        self.printings.fetch_batch(scryfall_ids)
    }

    /// Every printing of a card, in the order the source listed them.
    pub fn printings_for_oracle(&self, oracle_id: &Uuid) -> Result<Vec<GameplayPrinting>> {
        self.printings.fetch_all_for_oracle(oracle_id)
    }

    /// The printing to show for a card: non-promo first, then high-res
    /// images, then paper availability. Ties keep source order.
    pub fn preferred_printing(&self, oracle_id: &Uuid) -> Result<Option<GameplayPrinting>> {
        self.printings.fetch_preferred(oracle_id)
    }

    pub fn contains_printing(&self, scryfall_id: &Uuid) -> bool {
        self.printings.contains(scryfall_id)
    }

    pub fn printing_count(&self) -> usize {
        self.printings.len()
    }

    // -- Readers ------------------------------------------------------------

    pub fn card_reader(&self) -> &CardBlobReader {
        &self.cards
    }

    pub fn printing_reader(&self) -> &PrintingBlobReader {
        &self.printings
    }
}

// ---------------------------------------------------------------------------
// Preferred printing
// ---------------------------------------------------------------------------

fn preference_key(p: &GameplayPrinting) -> (bool, bool, bool) {
    (p.is_promo(), !p.is_highres(), !p.in_paper())
}

/// Stable sort, most preferred first.
pub fn rank_printings(printings: &mut [GameplayPrinting]) {
    printings.sort_by_key(preference_key);
}

/// Pick the most preferred printing. A lone printing is returned as is.
pub fn preferred(printings: Vec<GameplayPrinting>) -> Option<GameplayPrinting> {
    if printings.len() <= 1 {
        return printings.into_iter().next();
    }
    // min_by_key keeps the first of equal keys
    printings.into_iter().min_by_key(preference_key)
}
