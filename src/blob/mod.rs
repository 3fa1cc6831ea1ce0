//! Binary blob codecs.
//!
//! Two blob kinds share one layout (see [`wire`]): the card blob keyed by
//! oracle id and the printing blob keyed by Scryfall id. Encoders take fully
//! normalized records and produce a complete file image in memory; readers
//! load the index and catalogs and decode record bodies on demand.

pub mod card;
pub mod printing;
pub mod reader;
pub mod strings;
pub mod upgrade;
pub mod wire;

pub use card::{encode_card_blob, CardBlobReader};
pub use printing::{encode_printing_blob, PrintingBlobReader};
pub use reader::BlobBytes;
pub use upgrade::upgrade_card_blob;

use uuid::Uuid;

use crate::error::Result;

/// Keyed random access over a sealed blob.
pub trait BlobLookup {
    type Record;

    /// Decode the record stored under `key`, or `None` when it is not indexed.
    fn fetch(&self, key: &Uuid) -> Result<Option<Self::Record>>;

    fn contains(&self, key: &Uuid) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch each key in order, skipping keys that are not indexed.
    fn fetch_batch(&self, keys: &[Uuid]) -> Result<Vec<Self::Record>> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = self.fetch(key)? {
                out.push(record);
            }
        }
        Ok(out)
    }
}
