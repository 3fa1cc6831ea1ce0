//! String interning for the blob writers and lazy string lookup for readers.
//!
//! Two kinds of table exist. A [`Catalog`] holds a small shared vocabulary
//! (keywords, type words, set codes, artists) referenced by 16-bit index and
//! loaded fully into memory by readers. The [`StringInterner`] holds every
//! other string once per blob, referenced by 32-bit id and resolved lazily
//! from the backing bytes.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::collections::HashMap;

use super::wire::{checked_u16, checked_u32, ByteReader, NONE_IDX, NONE_STR};
use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// StringInterner
// ---------------------------------------------------------------------------

/// Append-only string table. Ids follow first-intern order, so a fixed
/// record order yields a byte-identical table.
#[derive(Debug, Default)]
pub struct StringInterner {
    ids: HashMap<String, u32>,
    strings: Vec<String>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Result<u32> {
        if let Some(&id) = self.ids.get(s) {
            return Ok(id);
        }
        let id = checked_u32("string table", self.strings.len())?;
        if id == NONE_STR {
            return Err(StoreError::FieldOverflow {
                field: "string table",
                len: self.strings.len(),
            });
        }
        self.ids.insert(s.to_string(), id);
        self.strings.push(s.to_string());
        Ok(id)
    }

    pub fn intern_opt(&mut self, s: Option<&str>) -> Result<u32> {
        match s {
            Some(s) => self.intern(s),
            None => Ok(NONE_STR),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.write_u32::<LittleEndian>(checked_u32("string table", self.strings.len())?)?;
        let mut start = 0usize;
        for s in &self.strings {
            out.write_u32::<LittleEndian>(checked_u32("string data", start)?)?;
            start += s.len();
        }
        out.write_u32::<LittleEndian>(checked_u32("string data", start)?)?;
        for s in &self.strings {
            out.extend_from_slice(s.as_bytes());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StringTable
// ---------------------------------------------------------------------------

/// Reader-side view of a string table: positions only, strings stay in the blob.
#[derive(Debug, Clone, Copy)]
pub struct StringTable {
    count: u32,
    offsets_pos: usize,
    data_pos: usize,
    data_len: usize,
}

impl StringTable {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let count = r.u32()?;
        let offsets_pos = r.position();
        r.take(count as usize * 4)?;
        let data_len = r.u32()? as usize;
        let data_pos = r.position();
        r.take(data_len)?;
        Ok(Self {
            count,
            offsets_pos,
            data_pos,
            data_len,
        })
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get<'b>(&self, bytes: &'b [u8], id: u32) -> Result<&'b str> {
        if id >= self.count {
            return Err(StoreError::Corrupt(format!(
                "string id {} out of range ({} strings)",
                id, self.count
            )));
        }
        let offset_at = |i: u32| {
            let pos = self.offsets_pos + i as usize * 4;
            LittleEndian::read_u32(&bytes[pos..pos + 4]) as usize
        };
        let start = offset_at(id);
        let end = if id + 1 < self.count {
            offset_at(id + 1)
        } else {
            self.data_len
        };
        if start > end || end > self.data_len {
            return Err(StoreError::Corrupt(format!(
                "string {} spans {}..{} outside {} data bytes",
                id, start, end, self.data_len
            )));
        }
        std::str::from_utf8(&bytes[self.data_pos + start..self.data_pos + end])
            .map_err(|e| StoreError::Corrupt(format!("string {} is not UTF-8: {}", id, e)))
    }

    pub fn get_opt<'b>(&self, bytes: &'b [u8], id: u32) -> Result<Option<&'b str>> {
        if id == NONE_STR {
            return Ok(None);
        }
        self.get(bytes, id).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A deduplicated vocabulary referenced by 16-bit index.
#[derive(Debug)]
pub struct Catalog {
    name: &'static str,
    ids: HashMap<String, u16>,
    entries: Vec<String>,
}

impl Catalog {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ids: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn intern(&mut self, s: &str) -> Result<u16> {
        if let Some(&idx) = self.ids.get(s) {
            return Ok(idx);
        }
        let idx = u16::try_from(self.entries.len())
            .ok()
            .filter(|idx| *idx != NONE_IDX)
            .ok_or(StoreError::CatalogOverflow {
                catalog: self.name,
                len: self.entries.len() + 1,
            })?;
        self.ids.insert(s.to_string(), idx);
        self.entries.push(s.to_string());
        Ok(idx)
    }

    pub fn intern_opt(&mut self, s: Option<&str>) -> Result<u16> {
        match s {
            Some(s) => self.intern(s),
            None => Ok(NONE_IDX),
        }
    }

    /// Intern a list, writing `count u8` followed by one index per entry.
    pub fn write_refs<S: AsRef<str>>(&mut self, out: &mut Vec<u8>, words: &[S]) -> Result<()> {
        out.write_u8(super::wire::checked_u8(self.name, words.len())?)?;
        for word in words {
            let idx = self.intern(word.as_ref())?;
            out.write_u16::<LittleEndian>(idx)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.write_u16::<LittleEndian>(checked_u16(self.name, self.entries.len())?)?;
        for entry in &self.entries {
            out.write_u16::<LittleEndian>(checked_u16(self.name, entry.len())?)?;
            out.extend_from_slice(entry.as_bytes());
        }
        Ok(())
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Vec<String>> {
        let count = r.u16()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let len = r.u16()? as usize;
            let text = std::str::from_utf8(r.take(len)?)
                .map_err(|e| StoreError::Corrupt(format!("catalog entry is not UTF-8: {}", e)))?;
            entries.push(text.to_string());
        }
        Ok(entries)
    }
}

/// Resolve a catalog index read from a record body.
pub fn catalog_entry<'c>(catalog: &'c [String], name: &str, idx: u16) -> Result<&'c str> {
    catalog.get(idx as usize).map(String::as_str).ok_or_else(|| {
        StoreError::Corrupt(format!(
            "{} index {} out of range ({} entries)",
            name,
            idx,
            catalog.len()
        ))
    })
}

/// Read `count u8` followed by that many catalog indexes.
pub fn read_refs(r: &mut ByteReader<'_>, catalog: &[String], name: &str) -> Result<Vec<String>> {
    let count = r.u8()? as usize;
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = r.u16()?;
        words.push(catalog_entry(catalog, name, idx)?.to_string());
    }
    Ok(words)
}
