//! Raw Scryfall records → canonical gameplay records.
//!
//! Both transforms are pure. Data-quality problems never abort a build: they
//! surface as [`NormalizeIssue`] values, either attached to a kept record
//! (the field was defaulted) or returned as the reason a record was skipped.

mod card;
pub mod dedup;
mod printing;

pub use card::{normalize_card, normalize_cards};
pub use dedup::{CardDeduplicator, DedupOutcome};
pub use printing::normalize_printing;

use uuid::Uuid;

use crate::parse::{ManaCost, StatValue};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a stat or mana cost the parsers do not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatPolicy {
    /// Degrade to the variable/lenient value and record an issue.
    #[default]
    Collect,
    /// Degrade silently.
    Lenient,
    /// Skip the whole record and record an issue.
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub stat_policy: StatPolicy,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeIssue {
    #[error("record #{index} could not be read: {message}")]
    Unreadable { index: usize, message: String },

    #[error("{name} ({scryfall_id}) has no oracle id")]
    MissingOracleId { scryfall_id: Uuid, name: String },

    #[error("{scryfall_id}: malformed {field} '{value}'")]
    MalformedStat {
        scryfall_id: Uuid,
        field: &'static str,
        value: String,
    },

    #[error("{scryfall_id}: malformed mana cost '{value}'")]
    MalformedManaCost { scryfall_id: Uuid, value: String },

    #[error("{scryfall_id}: duplicate printing ignored")]
    DuplicatePrinting { scryfall_id: Uuid },
}

/// A kept record plus the fields that had to be defaulted on the way.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub record: T,
    pub issues: Vec<NormalizeIssue>,
}

// ---------------------------------------------------------------------------
// FieldContext
// ---------------------------------------------------------------------------

/// Applies the stat policy to individual fields of one record.
pub(crate) struct FieldContext {
    scryfall_id: Uuid,
    policy: StatPolicy,
    issues: Vec<NormalizeIssue>,
}

impl FieldContext {
    pub(crate) fn new(scryfall_id: Uuid, options: &NormalizeOptions) -> Self {
        Self {
            scryfall_id,
            policy: options.stat_policy,
            issues: Vec::new(),
        }
    }

    pub(crate) fn stat(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Result<Option<StatValue>, NormalizeIssue> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        match StatValue::parse(raw) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                let issue = NormalizeIssue::MalformedStat {
                    scryfall_id: self.scryfall_id,
                    field,
                    value: raw.to_string(),
                };
                self.degrade(issue)?;
                Ok(Some(StatValue::Star))
            }
        }
    }

    pub(crate) fn mana_cost(&mut self, raw: Option<&str>) -> Result<Option<ManaCost>, NormalizeIssue> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        match ManaCost::try_parse(raw) {
            Ok(cost) => Ok(Some(cost)),
            Err(_) => {
                let issue = NormalizeIssue::MalformedManaCost {
                    scryfall_id: self.scryfall_id,
                    value: raw.to_string(),
                };
                self.degrade(issue)?;
                Ok(Some(ManaCost::parse(raw)))
            }
        }
    }

    fn degrade(&mut self, issue: NormalizeIssue) -> Result<(), NormalizeIssue> {
        match self.policy {
            StatPolicy::Strict => Err(issue),
            StatPolicy::Collect => {
                self.issues.push(issue);
                Ok(())
            }
            StatPolicy::Lenient => Ok(()),
        }
    }

    pub(crate) fn finish<T>(self, record: T) -> Normalized<T> {
        Normalized {
            record,
            issues: self.issues,
        }
    }
}
