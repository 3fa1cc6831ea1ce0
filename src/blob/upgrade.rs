//! Migration of older card blobs to the current layout.
//!
//! Card blob v1 stored card flags in a single byte and had no EDHREC or
//! Penny rank fields. Upgrading decodes every record with the v1 layout and
//! re-encodes it; the missing fields come out as absent.

use log::info;

use super::card::{encode_card_blob, CardBlobReader};
use super::reader::BlobBytes;
use super::wire::Header;
use crate::config::{CARD_BLOB_VERSION, CARD_MAGIC};
use crate::error::Result;

/// Rewrite a card blob in the current version. A blob already at the current
/// version is returned unchanged.
pub fn upgrade_card_blob(bytes: &[u8]) -> Result<Vec<u8>> {
    let header = Header::read(bytes)?;
    header.validate(CARD_MAGIC, "card", &[1, CARD_BLOB_VERSION])?;
    if header.version == CARD_BLOB_VERSION {
        return Ok(bytes.to_vec());
    }

    let reader = CardBlobReader::load(BlobBytes::from(bytes.to_vec()), &[header.version])?;
    let cards = reader.iter().collect::<Result<Vec<_>>>()?;
    let upgraded = encode_card_blob(&cards)?;
    info!(
        "Upgraded card blob from v{} to v{} ({} cards)",
        header.version,
        CARD_BLOB_VERSION,
        cards.len()
    );
    Ok(upgraded)
}
