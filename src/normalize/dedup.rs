//! One card per oracle id.

use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::GameplayCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// First card seen for its oracle id.
    Inserted,
    /// Replaced a non-English card in place.
    Replaced,
    /// An earlier card for the oracle id was kept.
    Dropped,
}

/// Collapses cards sharing an oracle id.
///
/// The first card seen wins, except that with `prefer_english` a later English
/// card replaces a non-English one in the same slot. Output order is
/// first-seen order of oracle ids.
#[derive(Debug)]
pub struct CardDeduplicator {
    prefer_english: bool,
    slots: HashMap<Uuid, usize>,
    cards: Vec<(GameplayCard, bool)>,
    replaced: usize,
    dropped: usize,
}

impl CardDeduplicator {
    pub fn new(prefer_english: bool) -> Self {
        Self {
            prefer_english,
            slots: HashMap::new(),
            cards: Vec::new(),
            replaced: 0,
            dropped: 0,
        }
    }

    /// Offer a card. Cards without an oracle id are dropped.
    pub fn offer(&mut self, card: GameplayCard, is_english: bool) -> DedupOutcome {
        let Some(oracle_id) = card.oracle_id else {
            self.dropped += 1;
            return DedupOutcome::Dropped;
        };

        match self.slots.get(&oracle_id) {
            None => {
                self.slots.insert(oracle_id, self.cards.len());
                self.cards.push((card, is_english));
                DedupOutcome::Inserted
            }
            Some(&slot) => {
                let existing_english = self.cards[slot].1;
                if self.prefer_english && is_english && !existing_english {
                    debug!("Replacing non-English card for oracle id {} with {}", oracle_id, card.name);
                    self.cards[slot] = (card, true);
                    self.replaced += 1;
                    DedupOutcome::Replaced
                } else {
                    self.dropped += 1;
                    DedupOutcome::Dropped
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_cards(self) -> Vec<GameplayCard> {
        self.cards.into_iter().map(|(card, _)| card).collect()
    }
}
