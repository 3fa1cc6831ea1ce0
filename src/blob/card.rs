//! Card blob: oracle-level cards keyed by oracle id.
//!
//! Catalogs: `keywords`, then `type_words` (supertypes, types and subtypes
//! share one vocabulary). Record body, in order:
//!
//! ```text
//! scryfall_id[16] | oracle_id opt | name str | layout u8
//! colors u8 | color_identity u8 | produced_mana u8
//! mana block | mana_value f32 | type line block | oracle_text str | keywords refs
//! power, toughness, loyalty, defense stat blocks | hand str | life str
//! legalities u64 | related: count u16, then id[16] component u8 name str type_line str
//! flags u16 (u8 in v1) | edhrec i32 | penny i32 (both absent in v1)
//! face count u8 | faces
//! ```

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, trace};
use std::path::Path;
use uuid::Uuid;

use super::reader::{expect_data_start, read_prefix, BlobBytes, PrimaryIndex};
use super::strings::{read_refs, Catalog, StringInterner, StringTable};
use super::wire::{
    assemble, checked_u16, checked_u32, checked_u8, write_opt_uuid, write_rank, write_uuid,
    ByteReader, Header, NONE_U8,
};
use super::BlobLookup;
use crate::config::{CARD_BLOB_VERSION, CARD_MAGIC};
use crate::error::{Result, StoreError};
use crate::models::{
    CardFlags, Colors, GameplayCard, GameplayFace, Layout, RelatedCard, RelatedComponent,
};
use crate::parse::{Legalities, ManaCost, ManaSymbol, StatValue, SymbolColor, SymbolFlags, TypeLine};

const KIND: &str = "card";

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode cards into a card blob of the current version.
///
/// Every card needs an oracle id and at least one face, and oracle ids must
/// be unique. Output is byte-identical for the same set of cards regardless
/// of input order.
pub fn encode_card_blob(cards: &[GameplayCard]) -> Result<Vec<u8>> {
    encode_card_blob_version(cards, CARD_BLOB_VERSION)
}

pub(crate) fn encode_card_blob_version(cards: &[GameplayCard], version: u16) -> Result<Vec<u8>> {
    if !(1..=CARD_BLOB_VERSION).contains(&version) {
        return Err(StoreError::InvalidArgument(format!(
            "cannot encode card blob version {}",
            version
        )));
    }

    let mut keyed = cards
        .iter()
        .map(|card| {
            card.oracle_id.map(|id| (id, card)).ok_or_else(|| {
                StoreError::InvalidArgument(format!(
                    "card '{}' ({}) has no oracle id",
                    card.name, card.scryfall_id
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(key, _)| *key);
    if let Some(pair) = keyed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(StoreError::InvalidArgument(format!(
            "duplicate oracle id {}",
            pair[0].0
        )));
    }

    let mut encoder = CardEncoder {
        version,
        keywords: Catalog::new("keywords"),
        type_words: Catalog::new("type_words"),
        strings: StringInterner::new(),
    };
    let mut records = Vec::new();
    let mut index = Vec::with_capacity(keyed.len());
    for (key, card) in keyed {
        index.push((key, checked_u32("record offset", records.len())?));
        encoder.card(&mut records, card)?;
    }

    debug!(
        "Encoded {} cards: {} keywords, {} type words, {} strings, {} record bytes",
        index.len(),
        encoder.keywords.len(),
        encoder.type_words.len(),
        encoder.strings.len(),
        records.len()
    );

    assemble(
        CARD_MAGIC,
        version,
        &index,
        &[],
        &[&encoder.keywords, &encoder.type_words],
        &encoder.strings,
        &records,
    )
}

struct CardEncoder {
    version: u16,
    keywords: Catalog,
    type_words: Catalog,
    strings: StringInterner,
}

impl CardEncoder {
    fn card(&mut self, out: &mut Vec<u8>, card: &GameplayCard) -> Result<()> {
        if card.faces.is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "card '{}' ({}) has no faces",
                card.name, card.scryfall_id
            )));
        }

        write_uuid(out, &card.scryfall_id);
        write_opt_uuid(out, card.oracle_id.as_ref())?;
        self.str(out, &card.name)?;
        out.write_u8(card.layout.as_u8())?;
        out.write_u8(card.colors.bits())?;
        out.write_u8(card.color_identity.bits())?;
        out.write_u8(card.produced_mana.bits())?;

        self.mana(out, card.mana_cost.as_ref())?;
        out.write_f32::<LittleEndian>(card.mana_value)?;
        self.type_line(out, &card.type_line)?;
        self.opt_str(out, card.oracle_text.as_deref())?;
        self.keywords.write_refs(out, &card.keywords)?;

        for stat in [card.power, card.toughness, card.loyalty, card.defense] {
            write_stat(out, stat)?;
        }
        self.opt_str(out, card.hand_modifier.as_deref())?;
        self.opt_str(out, card.life_modifier.as_deref())?;

        out.write_u64::<LittleEndian>(card.legalities.bits())?;

        out.write_u16::<LittleEndian>(checked_u16("related", card.related.len())?)?;
        for related in &card.related {
            write_uuid(out, &related.id);
            out.write_u8(related.component.as_u8())?;
            self.str(out, &related.name)?;
            self.str(out, &related.type_line)?;
        }

        if self.version == 1 {
            out.write_u8(card.flags.difference(CardFlags::GAME_CHANGER).bits() as u8)?;
        } else {
            out.write_u16::<LittleEndian>(card.flags.bits())?;
            write_rank(out, card.edhrec_rank)?;
            write_rank(out, card.penny_rank)?;
        }

        out.write_u8(checked_u8("faces", card.faces.len())?)?;
        for face in &card.faces {
            self.face(out, face)?;
        }
        Ok(())
    }

    fn face(&mut self, out: &mut Vec<u8>, face: &GameplayFace) -> Result<()> {
        self.str(out, &face.name)?;
        self.mana(out, face.mana_cost.as_ref())?;
        self.type_line(out, &face.type_line)?;
        self.opt_str(out, face.oracle_text.as_deref())?;
        out.write_u8(face.colors.bits())?;
        out.write_u8(face.color_indicator.map_or(NONE_U8, |c| c.bits()))?;
        for stat in [face.power, face.toughness, face.loyalty, face.defense] {
            write_stat(out, stat)?;
        }
        out.write_u8(face.layout.map_or(NONE_U8, Layout::as_u8))?;
        write_opt_uuid(out, face.oracle_id.as_ref())?;
        Ok(())
    }

    fn mana(&mut self, out: &mut Vec<u8>, cost: Option<&ManaCost>) -> Result<()> {
        let Some(cost) = cost else {
            out.write_u8(0)?;
            return Ok(());
        };
        out.write_u8(1)?;
        self.str(out, &cost.raw)?;
        out.write_u8(checked_u8("mana symbols", cost.symbols.len())?)?;
        for symbol in &cost.symbols {
            self.str(out, &symbol.raw)?;
            out.write_u8(symbol.colors[0].as_u8())?;
            out.write_u8(symbol.colors[1].as_u8())?;
            out.write_f32::<LittleEndian>(symbol.mana_value)?;
            out.write_u8(symbol.flags.bits())?;
        }
        Ok(())
    }

    fn type_line(&mut self, out: &mut Vec<u8>, line: &TypeLine) -> Result<()> {
        self.str(out, &line.raw)?;
        self.type_words.write_refs(out, &line.supertypes)?;
        self.type_words.write_refs(out, &line.types)?;
        self.type_words.write_refs(out, &line.subtypes)?;
        Ok(())
    }

    fn str(&mut self, out: &mut Vec<u8>, s: &str) -> Result<()> {
        let id = self.strings.intern(s)?;
        out.write_u32::<LittleEndian>(id)?;
        Ok(())
    }

    fn opt_str(&mut self, out: &mut Vec<u8>, s: Option<&str>) -> Result<()> {
        let id = self.strings.intern_opt(s)?;
        out.write_u32::<LittleEndian>(id)?;
        Ok(())
    }
}

fn write_stat(out: &mut Vec<u8>, stat: Option<StatValue>) -> Result<()> {
    match stat {
        None => out.write_u8(0)?,
        Some(stat) => {
            out.write_u8(1)?;
            out.write_u8(stat.kind())?;
            out.write_i32::<LittleEndian>(stat.value())?;
            out.write_i32::<LittleEndian>(stat.modifier())?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CardBlobReader
// ---------------------------------------------------------------------------

/// Random-access reader over a card blob.
///
/// The index and catalogs are loaded up front; record bodies stay in the
/// backing bytes and are decoded one at a time.
#[derive(Debug)]
pub struct CardBlobReader {
    bytes: BlobBytes,
    header: Header,
    index: PrimaryIndex,
    keywords: Vec<String>,
    type_words: Vec<String>,
    strings: StringTable,
}

impl CardBlobReader {
    pub fn open(path: &Path, mmap: bool) -> Result<Self> {
        let reader = Self::from_bytes(BlobBytes::open(path, mmap)?)?;
        debug!("Opened card blob {} ({} cards)", path.display(), reader.len());
        Ok(reader)
    }

    pub fn from_bytes(bytes: impl Into<BlobBytes>) -> Result<Self> {
        Self::load(bytes.into(), &[CARD_BLOB_VERSION])
    }

    pub(crate) fn load(bytes: BlobBytes, supported: &[u16]) -> Result<Self> {
        let (header, index, mut r) = read_prefix(&bytes, CARD_MAGIC, KIND, supported)?;
        let keywords = Catalog::read(&mut r)?;
        let type_words = Catalog::read(&mut r)?;
        let strings = StringTable::read(&mut r)?;
        expect_data_start(&r, &header, KIND)?;

        Ok(Self {
            bytes,
            header,
            index,
            keywords,
            type_words,
            strings,
        })
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    /// Oracle ids in ascending order.
    pub fn keys(&self) -> &[Uuid] {
        self.index.keys()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn type_words(&self) -> &[String] {
        &self.type_words
    }

    /// Decode every card in key order.
    pub fn iter(&self) -> impl Iterator<Item = Result<GameplayCard>> + '_ {
        self.keys()
            .iter()
            .filter_map(move |key| self.fetch(key).transpose())
    }

    fn decode_at(&self, key: &Uuid, offset: u32) -> Result<GameplayCard> {
        let pos = self.header.data_offset as usize + offset as usize;
        trace!("Decoding card {} at {}", key, pos);
        let mut decoder = CardDecoder {
            r: ByteReader::new(&self.bytes, pos),
            bytes: &self.bytes,
            strings: &self.strings,
            keywords: &self.keywords,
            type_words: &self.type_words,
            version: self.header.version,
        };
        let card = decoder.card()?;
        if card.oracle_id.as_ref() != Some(key) {
            return Err(StoreError::Corrupt(format!(
                "card record at offset {} belongs to {:?}, indexed as {}",
                offset, card.oracle_id, key
            )));
        }
        Ok(card)
    }
}

impl BlobLookup for CardBlobReader {
    type Record = GameplayCard;

    fn fetch(&self, key: &Uuid) -> Result<Option<GameplayCard>> {
        match self.index.get(key) {
            Some(offset) => self.decode_at(key, offset).map(Some),
            None => Ok(None),
        }
    }

    fn contains(&self, key: &Uuid) -> bool {
        self.index.contains(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

struct CardDecoder<'a> {
    r: ByteReader<'a>,
    bytes: &'a [u8],
    strings: &'a StringTable,
    keywords: &'a [String],
    type_words: &'a [String],
    version: u16,
}

impl CardDecoder<'_> {
    fn card(&mut self) -> Result<GameplayCard> {
        let scryfall_id = self.r.uuid()?;
        let oracle_id = self.r.opt_uuid()?;
        let name = self.str()?;
        let layout = decode_layout(self.r.u8()?)?;
        let colors = self.colors()?;
        let color_identity = self.colors()?;
        let produced_mana = self.colors()?;

        let mana_cost = self.mana()?;
        let mana_value = self.r.f32()?;
        let type_line = self.type_line()?;
        let oracle_text = self.opt_str()?;
        let keywords = read_refs(&mut self.r, self.keywords, "keywords")?;

        let power = self.stat()?;
        let toughness = self.stat()?;
        let loyalty = self.stat()?;
        let defense = self.stat()?;
        let hand_modifier = self.opt_str()?;
        let life_modifier = self.opt_str()?;

        let legalities = Legalities::from_bits(self.r.u64()?);

        let related_count = self.r.u16()? as usize;
        let mut related = Vec::with_capacity(related_count);
        for _ in 0..related_count {
            let id = self.r.uuid()?;
            let component = RelatedComponent::from_u8(self.r.u8()?)
                .ok_or_else(|| StoreError::Corrupt("invalid related component".into()))?;
            related.push(RelatedCard {
                id,
                component,
                name: self.str()?,
                type_line: self.str()?,
            });
        }

        let (flags, edhrec_rank, penny_rank) = if self.version == 1 {
            let bits = self.r.u8()? as u16;
            (decode_card_flags(bits)?, None, None)
        } else {
            let bits = self.r.u16()?;
            (decode_card_flags(bits)?, self.r.rank()?, self.r.rank()?)
        };

        let face_count = self.r.u8()? as usize;
        if face_count == 0 {
            return Err(StoreError::Corrupt(format!(
                "card {} has no faces",
                scryfall_id
            )));
        }
        let mut faces = Vec::with_capacity(face_count);
        for _ in 0..face_count {
            faces.push(self.face()?);
        }

        Ok(GameplayCard {
            scryfall_id,
            oracle_id,
            name,
            layout,
            colors,
            color_identity,
            produced_mana,
            mana_cost,
            mana_value,
            type_line,
            oracle_text,
            keywords,
            power,
            toughness,
            loyalty,
            defense,
            hand_modifier,
            life_modifier,
            legalities,
            related,
            flags,
            edhrec_rank,
            penny_rank,
            faces,
        })
    }

    fn face(&mut self) -> Result<GameplayFace> {
        let name = self.str()?;
        let mana_cost = self.mana()?;
        let type_line = self.type_line()?;
        let oracle_text = self.opt_str()?;
        let colors = self.colors()?;
        let color_indicator = match self.r.u8()? {
            NONE_U8 => None,
            bits => Some(decode_colors(bits)?),
        };
        let power = self.stat()?;
        let toughness = self.stat()?;
        let loyalty = self.stat()?;
        let defense = self.stat()?;
        let layout = match self.r.u8()? {
            NONE_U8 => None,
            value => Some(decode_layout(value)?),
        };
        let oracle_id = self.r.opt_uuid()?;

        Ok(GameplayFace {
            name,
            mana_cost,
            type_line,
            oracle_text,
            colors,
            color_indicator,
            power,
            toughness,
            loyalty,
            defense,
            layout,
            oracle_id,
        })
    }

    fn mana(&mut self) -> Result<Option<ManaCost>> {
        if !self.r.bool()? {
            return Ok(None);
        }
        let raw = self.str()?;
        let count = self.r.u8()? as usize;
        let mut symbols = Vec::with_capacity(count);
        for _ in 0..count {
            let raw = self.str()?;
            let first = decode_symbol_color(self.r.u8()?)?;
            let second = decode_symbol_color(self.r.u8()?)?;
            let mana_value = self.r.f32()?;
            let flags = SymbolFlags::from_bits(self.r.u8()?)
                .ok_or_else(|| StoreError::Corrupt("invalid mana symbol flags".into()))?;
            symbols.push(ManaSymbol {
                raw,
                colors: [first, second],
                mana_value,
                flags,
            });
        }
        Ok(Some(ManaCost { raw, symbols }))
    }

    fn type_line(&mut self) -> Result<TypeLine> {
        Ok(TypeLine {
            raw: self.str()?,
            supertypes: read_refs(&mut self.r, self.type_words, "type_words")?,
            types: read_refs(&mut self.r, self.type_words, "type_words")?,
            subtypes: read_refs(&mut self.r, self.type_words, "type_words")?,
        })
    }

    fn stat(&mut self) -> Result<Option<StatValue>> {
        if !self.r.bool()? {
            return Ok(None);
        }
        let kind = self.r.u8()?;
        let value = self.r.i32()?;
        let modifier = self.r.i32()?;
        StatValue::from_parts(kind, value, modifier)
            .map(Some)
            .ok_or_else(|| StoreError::Corrupt(format!("invalid stat kind {}", kind)))
    }

    fn colors(&mut self) -> Result<Colors> {
        decode_colors(self.r.u8()?)
    }

    fn str(&mut self) -> Result<String> {
        let id = self.r.u32()?;
        Ok(self.strings.get(self.bytes, id)?.to_string())
    }

    fn opt_str(&mut self) -> Result<Option<String>> {
        let id = self.r.u32()?;
        Ok(self.strings.get_opt(self.bytes, id)?.map(str::to_string))
    }
}

fn decode_layout(value: u8) -> Result<Layout> {
    Layout::from_u8(value).ok_or_else(|| StoreError::Corrupt(format!("invalid layout {}", value)))
}

fn decode_colors(bits: u8) -> Result<Colors> {
    Colors::from_bits(bits).ok_or_else(|| StoreError::Corrupt(format!("invalid color set {:#04x}", bits)))
}

fn decode_card_flags(bits: u16) -> Result<CardFlags> {
    CardFlags::from_bits(bits).ok_or_else(|| StoreError::Corrupt(format!("invalid card flags {:#06x}", bits)))
}

fn decode_symbol_color(value: u8) -> Result<SymbolColor> {
    SymbolColor::from_u8(value)
        .ok_or_else(|| StoreError::Corrupt(format!("invalid symbol color {}", value)))
}
