use std::path::PathBuf;

/// File name of the oracle-level card blob inside the data directory.
pub const CARD_BLOB_FILE: &str = "cards.blob";
/// File name of the printing blob inside the data directory.
pub const PRINTING_BLOB_FILE: &str = "printings.blob";
/// Holds the opaque source version the committed blobs were built from.
pub const VERSION_FILE: &str = "version.txt";

pub const CARD_MAGIC: [u8; 4] = *b"SFCB";
pub const PRINTING_MAGIC: [u8; 4] = *b"SFPB";

/// Current card blob layout. Version 1 is readable only through
/// [`crate::blob::upgrade::upgrade_card_blob`].
pub const CARD_BLOB_VERSION: u16 = 2;
pub const PRINTING_BLOB_VERSION: u16 = 1;

/// Default fraction of source records that may be skipped before a build fails.
pub const DEFAULT_MAX_SKIP_RATIO: f64 = 0.05;

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("scryfall-store")
    } else {
        PathBuf::from(".scryfall-store")
    }
}
