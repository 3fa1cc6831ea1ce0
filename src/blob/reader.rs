//! Backing bytes and the shared prefix (header + primary index) of both readers.

use log::debug;
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;
use uuid::Uuid;

use super::wire::{ByteReader, Header, HEADER_LEN, INDEX_ENTRY_LEN};
use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// BlobBytes
// ---------------------------------------------------------------------------

/// The bytes a reader decodes records from, either owned or memory-mapped.
pub enum BlobBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl BlobBytes {
    pub fn read(path: &Path) -> Result<Self> {
        Ok(BlobBytes::Owned(std::fs::read(path)?))
    }

    pub fn map(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: committed blobs are only ever replaced by rename, never
        // written in place, so the mapped inode does not change under us.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(BlobBytes::Mapped(mmap))
    }

    pub fn open(path: &Path, mmap: bool) -> Result<Self> {
        if mmap {
            Self::map(path)
        } else {
            Self::read(path)
        }
    }
}

impl Deref for BlobBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            BlobBytes::Owned(bytes) => bytes,
            BlobBytes::Mapped(mmap) => mmap,
        }
    }
}

impl From<Vec<u8>> for BlobBytes {
    fn from(bytes: Vec<u8>) -> Self {
        BlobBytes::Owned(bytes)
    }
}

impl std::fmt::Debug for BlobBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            BlobBytes::Owned(_) => "Owned",
            BlobBytes::Mapped(_) => "Mapped",
        };
        write!(f, "BlobBytes::{}({} bytes)", kind, self.len())
    }
}

// ---------------------------------------------------------------------------
// PrimaryIndex
// ---------------------------------------------------------------------------

/// Key → record offset, plus the keys in on-disk (sorted) order.
#[derive(Debug)]
pub(crate) struct PrimaryIndex {
    offsets: HashMap<Uuid, u32>,
    keys: Vec<Uuid>,
}

impl PrimaryIndex {
    pub(crate) fn get(&self, key: &Uuid) -> Option<u32> {
        self.offsets.get(key).copied()
    }

    pub(crate) fn contains(&self, key: &Uuid) -> bool {
        self.offsets.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> &[Uuid] {
        &self.keys
    }
}

/// Validate the header and read the primary index. Returns a cursor
/// positioned right after the index.
pub(crate) fn read_prefix<'a>(
    bytes: &'a [u8],
    magic: [u8; 4],
    kind: &'static str,
    supported: &[u16],
) -> Result<(Header, PrimaryIndex, ByteReader<'a>)> {
    let header = Header::read(bytes)?;
    header.validate(magic, kind, supported)?;

    let data_offset = header.data_offset as usize;
    if data_offset < HEADER_LEN || data_offset > bytes.len() {
        return Err(StoreError::Corrupt(format!(
            "data offset {} outside a {}-byte blob",
            data_offset,
            bytes.len()
        )));
    }
    let record_area = bytes.len() - data_offset;

    let count = header.record_count as usize;
    let index_end = count
        .checked_mul(INDEX_ENTRY_LEN)
        .and_then(|len| len.checked_add(HEADER_LEN));
    if index_end.map_or(true, |end| end > data_offset) {
        return Err(StoreError::Corrupt(format!(
            "{} index of {} entries does not fit before data offset {}",
            kind, count, data_offset
        )));
    }

    let mut r = ByteReader::new(bytes, HEADER_LEN);
    let mut offsets = HashMap::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    for _ in 0..count {
        let key = r.uuid()?;
        let offset = r.u32()?;
        if keys.last().is_some_and(|prev| *prev >= key) {
            return Err(StoreError::Corrupt(format!(
                "{} index is not strictly sorted at {}",
                kind, key
            )));
        }
        if offset as usize >= record_area {
            return Err(StoreError::Corrupt(format!(
                "{} record {} at offset {} is past the {}-byte record area",
                kind, key, offset, record_area
            )));
        }
        offsets.insert(key, offset);
        keys.push(key);
    }
    debug!("Loaded {} index: {} entries, data at {}", kind, count, data_offset);

    Ok((header, PrimaryIndex { offsets, keys }, r))
}

/// Check that the regions between the index and the record area were
/// consumed exactly.
pub(crate) fn expect_data_start(r: &ByteReader<'_>, header: &Header, kind: &str) -> Result<()> {
    if r.position() != header.data_offset as usize {
        return Err(StoreError::Corrupt(format!(
            "{} tables end at {} but records start at {}",
            kind,
            r.position(),
            header.data_offset
        )));
    }
    Ok(())
}
