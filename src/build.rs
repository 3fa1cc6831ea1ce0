//! Raw records → sealed blob images.
//!
//! A build normalizes every record twice (card and printing), collapses
//! cards per oracle id, enforces the skip-rate limit and encodes both blobs
//! in memory. Nothing touches the disk here; see [`crate::cache::BlobCache`]
//! for committing the result.

use log::{info, warn};
use std::collections::HashSet;

use crate::blob::{encode_card_blob, encode_printing_blob};
use crate::config::DEFAULT_MAX_SKIP_RATIO;
use crate::error::{Result, StoreError};
use crate::models::{GameplayCard, GameplayPrinting, RawCard};
use crate::normalize::{
    normalize_cards, normalize_printing, CardDeduplicator, NormalizeIssue, NormalizeOptions,
};

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub normalize: NormalizeOptions,
    /// Let a later English card replace a non-English one with the same oracle id.
    pub prefer_english: bool,
    /// Fraction of source records that may be skipped before the build fails.
    pub max_skip_ratio: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            prefer_english: true,
            max_skip_ratio: DEFAULT_MAX_SKIP_RATIO,
        }
    }
}

/// What a build kept, dropped and degraded.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub source_records: usize,
    pub cards: usize,
    pub printings: usize,
    /// Records that produced no card (unreadable, no oracle id, strict-policy failure).
    pub skipped_cards: usize,
    pub duplicates_replaced: usize,
    pub duplicates_dropped: usize,
    pub issues: Vec<NormalizeIssue>,
}

impl BuildReport {
    pub fn skip_ratio(&self) -> f64 {
        if self.source_records == 0 {
            0.0
        } else {
            self.skipped_cards as f64 / self.source_records as f64
        }
    }
}

/// Both encoded blobs of one build plus its report.
#[derive(Debug)]
pub struct BuiltBlobs {
    pub card_blob: Vec<u8>,
    pub printing_blob: Vec<u8>,
    pub report: BuildReport,
}

// ---------------------------------------------------------------------------
// BlobBuilder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct BlobBuilder {
    options: BuildOptions,
}

impl BlobBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Normalize and deduplicate without encoding. Cards come out in
    /// first-seen order of their oracle ids, printings in source order.
    pub fn normalize(
        &self,
        records: &[RawCard],
    ) -> (Vec<GameplayCard>, Vec<GameplayPrinting>, BuildReport) {
        self.normalize_with(records, Vec::new())
    }

    /// Build both blobs from decoded records.
    pub fn build(&self, records: &[RawCard]) -> Result<BuiltBlobs> {
        self.build_with(records, Vec::new())
    }

    /// Build both blobs from untyped JSON values. Values that do not decode
    /// as a card record count as skipped.
    pub fn build_values(&self, values: Vec<serde_json::Value>) -> Result<BuiltBlobs> {
        let mut records = Vec::with_capacity(values.len());
        let mut unreadable = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            match RawCard::from_value(value) {
                Ok(raw) => records.push(raw),
                Err(e) => unreadable.push(NormalizeIssue::Unreadable {
                    index,
                    message: e.to_string(),
                }),
            }
        }
        self.build_with(&records, unreadable)
    }

    fn build_with(&self, records: &[RawCard], unreadable: Vec<NormalizeIssue>) -> Result<BuiltBlobs> {
        let (cards, printings, report) = self.normalize_with(records, unreadable);

        let ratio = report.skip_ratio();
        if ratio > self.options.max_skip_ratio {
            warn!(
                "Build aborted: {} of {} records skipped",
                report.skipped_cards, report.source_records
            );
            return Err(StoreError::SkipRateExceeded {
                skipped: report.skipped_cards,
                total: report.source_records,
                limit: self.options.max_skip_ratio,
            });
        }

        let card_blob = encode_card_blob(&cards)?;
        let printing_blob = encode_printing_blob(&printings)?;

        if !report.issues.is_empty() {
            warn!(
                "Build finished with {} data issues ({} records skipped)",
                report.issues.len(),
                report.skipped_cards
            );
        }
        info!(
            "Built {} cards ({} bytes) and {} printings ({} bytes) from {} records",
            report.cards,
            card_blob.len(),
            report.printings,
            printing_blob.len(),
            report.source_records
        );

        Ok(BuiltBlobs {
            card_blob,
            printing_blob,
            report,
        })
    }

    fn normalize_with(
        &self,
        records: &[RawCard],
        unreadable: Vec<NormalizeIssue>,
    ) -> (Vec<GameplayCard>, Vec<GameplayPrinting>, BuildReport) {
        let mut report = BuildReport {
            source_records: records.len() + unreadable.len(),
            skipped_cards: unreadable.len(),
            issues: unreadable,
            ..BuildReport::default()
        };

        let mut dedup = CardDeduplicator::new(self.options.prefer_english);
        let mut printings = Vec::with_capacity(records.len());
        let mut seen_printings = HashSet::with_capacity(records.len());

        for raw in records {
            match normalize_cards(raw, &self.options.normalize) {
                Ok(normalized) => {
                    report.issues.extend(normalized.issues);
                    for card in normalized.record {
                        dedup.offer(card, raw.is_english());
                    }
                }
                Err(issue) => {
                    report.skipped_cards += 1;
                    report.issues.push(issue);
                }
            }

            if seen_printings.insert(raw.id) {
                printings.push(normalize_printing(raw));
            } else {
                report
                    .issues
                    .push(NormalizeIssue::DuplicatePrinting { scryfall_id: raw.id });
            }
        }

        report.duplicates_replaced = dedup.replaced();
        report.duplicates_dropped = dedup.dropped();
        let cards = dedup.into_cards();
        report.cards = cards.len();
        report.printings = printings.len();

        (cards, printings, report)
    }
}
