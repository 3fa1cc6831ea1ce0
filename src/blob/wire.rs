//! Fixed-width primitives and the shared region layout of both blob kinds.
//!
//! ```text
//! [16 bytes]  Header: magic[4] | version u16 | reserved u16 | record_count u32 | data_offset u32
//! [20 × N]    Primary index: key[16] | record offset u32 (relative to data_offset), sorted by key
//! [variable]  Secondary index (printing blob only)
//! [variable]  Catalogs: count u16, then per entry len u16 + UTF-8
//! [variable]  String table: count u32 | start offsets u32 × count | data_len u32 | data
//! [variable]  Record area, starting at data_offset
//! ```
//!
//! All integers are little-endian.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use uuid::Uuid;

use super::strings::{Catalog, StringInterner};
use crate::error::{Result, StoreError};

pub const HEADER_LEN: usize = 16;
pub const KEY_LEN: usize = 16;
pub const INDEX_ENTRY_LEN: usize = KEY_LEN + 4;

/// Absent string id.
pub const NONE_STR: u32 = u32::MAX;
/// Absent catalog index.
pub const NONE_IDX: u16 = u16::MAX;
/// Absent single-byte enum or color set.
pub const NONE_U8: u8 = u8::MAX;
/// Absent external id.
pub const NONE_U32: u32 = u32::MAX;
/// Absent rank.
pub const NONE_RANK: i32 = -1;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u16,
    pub record_count: u32,
    pub data_offset: u32,
}

impl Header {
    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.magic);
        out.write_u16::<LittleEndian>(self.version)?;
        out.write_u16::<LittleEndian>(0)?;
        out.write_u32::<LittleEndian>(self.record_count)?;
        out.write_u32::<LittleEndian>(self.data_offset)?;
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(StoreError::Corrupt(format!(
                "blob is {} bytes, shorter than its {}-byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: LittleEndian::read_u16(&bytes[4..6]),
            record_count: LittleEndian::read_u32(&bytes[8..12]),
            data_offset: LittleEndian::read_u32(&bytes[12..16]),
        })
    }

    /// Reject a foreign or unsupported blob before anything else is read.
    pub fn validate(&self, magic: [u8; 4], kind: &'static str, supported: &[u16]) -> Result<()> {
        if self.magic != magic {
            return Err(StoreError::BadMagic {
                expected: magic,
                found: self.magic,
            });
        }
        if !supported.contains(&self.version) {
            return Err(StoreError::UnsupportedVersion {
                kind,
                found: self.version,
                supported: supported.iter().copied().max().unwrap_or(0),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

pub fn write_uuid(out: &mut Vec<u8>, id: &Uuid) {
    out.extend_from_slice(id.as_bytes());
}

pub fn write_opt_uuid(out: &mut Vec<u8>, id: Option<&Uuid>) -> Result<()> {
    match id {
        Some(id) => {
            out.write_u8(1)?;
            write_uuid(out, id);
        }
        None => out.write_u8(0)?,
    }
    Ok(())
}

pub fn write_opt_u32(out: &mut Vec<u8>, value: Option<u32>) -> Result<()> {
    if value == Some(NONE_U32) {
        return Err(StoreError::InvalidArgument(format!(
            "{} is reserved as the absent marker",
            NONE_U32
        )));
    }
    out.write_u32::<LittleEndian>(value.unwrap_or(NONE_U32))?;
    Ok(())
}

pub fn write_rank(out: &mut Vec<u8>, rank: Option<i32>) -> Result<()> {
    if let Some(r) = rank.filter(|r| *r < 0) {
        return Err(StoreError::InvalidArgument(format!("negative rank {}", r)));
    }
    out.write_i32::<LittleEndian>(rank.unwrap_or(NONE_RANK))?;
    Ok(())
}

pub fn checked_u8(field: &'static str, len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| StoreError::FieldOverflow { field, len })
}

pub fn checked_u16(field: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| StoreError::FieldOverflow { field, len })
}

pub fn checked_u32(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| StoreError::FieldOverflow { field, len })
}

/// Lay out every region behind the header and compute `data_offset`.
pub(crate) fn assemble(
    magic: [u8; 4],
    version: u16,
    index: &[(Uuid, u32)],
    secondary: &[u8],
    catalogs: &[&Catalog],
    strings: &StringInterner,
    records: &[u8],
) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(index.len() * INDEX_ENTRY_LEN + secondary.len());
    for (key, offset) in index {
        write_uuid(&mut body, key);
        body.write_u32::<LittleEndian>(*offset)?;
    }
    body.extend_from_slice(secondary);
    for catalog in catalogs {
        catalog.write_to(&mut body)?;
    }
    strings.write_to(&mut body)?;

    let header = Header {
        magic,
        version,
        record_count: checked_u32("record_count", index.len())?,
        data_offset: checked_u32("data_offset", HEADER_LEN + body.len())?,
    };
    checked_u32("record area", records.len())?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len() + records.len());
    header.write(&mut out)?;
    out.extend_from_slice(&body);
    out.extend_from_slice(records);
    Ok(out)
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// Bounds-checked cursor over a whole blob. Running off the end is reported
/// as corruption, never as an I/O error.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "unexpected end of blob reading {} bytes at offset {}",
                    n, self.pos
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn bool(&mut self) -> Result<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StoreError::Corrupt(format!(
                "invalid presence byte {} at offset {}",
                other,
                self.pos - 1
            ))),
        }
    }

    pub fn uuid(&mut self) -> Result<Uuid> {
        Uuid::from_slice(self.take(KEY_LEN)?)
            .map_err(|e| StoreError::Corrupt(format!("invalid uuid: {}", e)))
    }

    pub fn opt_uuid(&mut self) -> Result<Option<Uuid>> {
        if self.bool()? {
            Ok(Some(self.uuid()?))
        } else {
            Ok(None)
        }
    }

    pub fn opt_u32(&mut self) -> Result<Option<u32>> {
        let value = self.u32()?;
        Ok((value != NONE_U32).then_some(value))
    }

    pub fn rank(&mut self) -> Result<Option<i32>> {
        let value = self.i32()?;
        Ok((value != NONE_RANK).then_some(value))
    }
}
