//! Printing blob: physical printings keyed by Scryfall id, with a secondary
//! oracle id → printing ids index.
//!
//! The secondary index sits between the primary index and the catalogs:
//! `group count u32`, then per group `oracle_id[16] | n u32 | n × scryfall_id[16]`.
//! Groups are sorted by oracle id; ids inside a group keep encounter order.
//! A reversible printing is listed under each of its face oracle ids.
//!
//! Catalogs: `set_codes`, then `artists`.

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use uuid::Uuid;

use super::reader::{expect_data_start, read_prefix, BlobBytes, PrimaryIndex};
use super::strings::{catalog_entry, Catalog, StringInterner, StringTable};
use super::wire::{
    assemble, checked_u32, checked_u8, write_opt_u32, write_opt_uuid, write_uuid, ByteReader,
    Header, KEY_LEN, NONE_IDX,
};
use super::BlobLookup;
use crate::config::{PRINTING_BLOB_VERSION, PRINTING_MAGIC};
use crate::error::{Result, StoreError};
use crate::models::{
    BorderColor, ExternalIds, FaceArt, Finishes, GameplayPrinting, Games, ImageStatus, ImageUris,
    PrintFlags, Prices, Rarity, SecurityStamp,
};

const KIND: &str = "printing";

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode printings into a printing blob.
///
/// Scryfall ids must be unique. Printings without any oracle id are stored
/// but left out of the secondary index.
pub fn encode_printing_blob(printings: &[GameplayPrinting]) -> Result<Vec<u8>> {
    let mut groups: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    for printing in printings {
        for oracle_id in printing.oracle_ids() {
            groups.entry(oracle_id).or_default().push(printing.scryfall_id);
        }
    }

    let mut sorted: Vec<&GameplayPrinting> = printings.iter().collect();
    sorted.sort_by_key(|p| p.scryfall_id);
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0].scryfall_id == pair[1].scryfall_id) {
        return Err(StoreError::InvalidArgument(format!(
            "duplicate scryfall id {}",
            pair[0].scryfall_id
        )));
    }

    let mut secondary = Vec::new();
    secondary.write_u32::<LittleEndian>(checked_u32("oracle groups", groups.len())?)?;
    for (oracle_id, ids) in &groups {
        write_uuid(&mut secondary, oracle_id);
        secondary.write_u32::<LittleEndian>(checked_u32("oracle group", ids.len())?)?;
        for id in ids {
            write_uuid(&mut secondary, id);
        }
    }

    let mut encoder = PrintingEncoder {
        set_codes: Catalog::new("set_codes"),
        artists: Catalog::new("artists"),
        strings: StringInterner::new(),
    };
    let mut records = Vec::new();
    let mut index = Vec::with_capacity(sorted.len());
    for printing in sorted {
        index.push((printing.scryfall_id, checked_u32("record offset", records.len())?));
        encoder.printing(&mut records, printing)?;
    }

    debug!(
        "Encoded {} printings in {} oracle groups: {} sets, {} artists, {} strings",
        index.len(),
        groups.len(),
        encoder.set_codes.len(),
        encoder.artists.len(),
        encoder.strings.len()
    );

    assemble(
        PRINTING_MAGIC,
        PRINTING_BLOB_VERSION,
        &index,
        &secondary,
        &[&encoder.set_codes, &encoder.artists],
        &encoder.strings,
        &records,
    )
}

struct PrintingEncoder {
    set_codes: Catalog,
    artists: Catalog,
    strings: StringInterner,
}

impl PrintingEncoder {
    fn printing(&mut self, out: &mut Vec<u8>, p: &GameplayPrinting) -> Result<()> {
        write_uuid(out, &p.scryfall_id);
        write_opt_uuid(out, p.oracle_id.as_ref())?;
        self.str(out, &p.name)?;
        self.str(out, &p.lang)?;
        out.write_u16::<LittleEndian>(self.set_codes.intern(&p.set_code)?)?;
        write_opt_uuid(out, p.set_id.as_ref())?;
        self.str(out, &p.set_name)?;
        self.str(out, &p.collector_number)?;
        self.opt_str(out, p.released_at.as_deref())?;

        out.write_u8(p.rarity.as_u8())?;
        out.write_u8(p.border_color.as_u8())?;
        out.write_u8(p.image_status.as_u8())?;
        out.write_u8(p.security_stamp.as_u8())?;
        out.write_u8(p.finishes.bits())?;
        out.write_u8(p.games.bits())?;

        self.image_uris(out, p.image_uris.as_ref())?;

        out.write_u8(checked_u8("face art", p.faces.len())?)?;
        for face in &p.faces {
            write_opt_uuid(out, face.oracle_id.as_ref())?;
            let artist = self.artists.intern_opt(face.artist.as_deref())?;
            out.write_u16::<LittleEndian>(artist)?;
            write_opt_uuid(out, face.artist_id.as_ref())?;
            write_opt_uuid(out, face.illustration_id.as_ref())?;
            self.opt_str(out, face.flavor_name.as_deref())?;
            self.opt_str(out, face.flavor_text.as_deref())?;
            self.opt_str(out, face.watermark.as_deref())?;
            self.image_uris(out, face.image_uris.as_ref())?;
        }

        out.write_u16::<LittleEndian>(p.flags.bits())?;

        let ids = &p.external_ids;
        for id in [ids.mtgo_id, ids.arena_id, ids.tcgplayer_id, ids.cardmarket_id] {
            write_opt_u32(out, id)?;
        }

        let prices = &p.prices;
        for price in [
            &prices.usd,
            &prices.usd_foil,
            &prices.usd_etched,
            &prices.eur,
            &prices.eur_foil,
            &prices.tix,
        ] {
            self.opt_str(out, price.as_deref())?;
        }
        Ok(())
    }

    fn image_uris(&mut self, out: &mut Vec<u8>, uris: Option<&ImageUris>) -> Result<()> {
        let Some(uris) = uris else {
            out.write_u8(0)?;
            return Ok(());
        };
        out.write_u8(1)?;
        for uri in [
            &uris.small,
            &uris.normal,
            &uris.large,
            &uris.png,
            &uris.art_crop,
            &uris.border_crop,
        ] {
            self.opt_str(out, uri.as_deref())?;
        }
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

// ---------------------------------------------------------------------------
// PrintingBlobReader
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PrintingBlobReader {
    bytes: BlobBytes,
    header: Header,
    index: PrimaryIndex,
    by_oracle: HashMap<Uuid, Vec<Uuid>>,
    oracle_ids: Vec<Uuid>,
    set_codes: Vec<String>,
    artists: Vec<String>,
    strings: StringTable,
}

impl PrintingBlobReader {
    pub fn open(path: &Path, mmap: bool) -> Result<Self> {
        let reader = Self::from_bytes(BlobBytes::open(path, mmap)?)?;
        debug!(
            "Opened printing blob {} ({} printings, {} oracle ids)",
            path.display(),
            reader.len(),
            reader.oracle_ids.len()
        );
        Ok(reader)
    }

    pub fn from_bytes(bytes: impl Into<BlobBytes>) -> Result<Self> {
        let bytes = bytes.into();
        let (header, index, mut r) =
            read_prefix(&bytes, PRINTING_MAGIC, KIND, &[PRINTING_BLOB_VERSION])?;

        let group_count = r.u32()? as usize;
        // every group holds at least its key and length
        let room = (header.data_offset as usize).saturating_sub(r.position());
        if group_count > room / (KEY_LEN + 4) {
            return Err(StoreError::Corrupt(format!(
                "oracle index of {} groups does not fit before data offset {}",
                group_count, header.data_offset
            )));
        }
        let mut by_oracle = HashMap::with_capacity(group_count);
        let mut oracle_ids: Vec<Uuid> = Vec::with_capacity(group_count);
        for _ in 0..group_count {
            let oracle_id = r.uuid()?;
            if oracle_ids.last().is_some_and(|prev| *prev >= oracle_id) {
                return Err(StoreError::Corrupt(format!(
                    "oracle index is not strictly sorted at {}",
                    oracle_id
                )));
            }
            let n = r.u32()? as usize;
            let mut ids = Vec::with_capacity(n.min(index.len()));
            for _ in 0..n {
                let id = r.uuid()?;
                if !index.contains(&id) {
                    return Err(StoreError::Corrupt(format!(
                        "oracle {} lists unindexed printing {}",
                        oracle_id, id
                    )));
                }
                ids.push(id);
            }
            oracle_ids.push(oracle_id);
            by_oracle.insert(oracle_id, ids);
        }

        let set_codes = Catalog::read(&mut r)?;
        let artists = Catalog::read(&mut r)?;
        let strings = StringTable::read(&mut r)?;
        expect_data_start(&r, &header, KIND)?;

        Ok(Self {
            bytes,
            header,
            index,
            by_oracle,
            oracle_ids,
            set_codes,
            artists,
            strings,
        })
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    /// Scryfall ids in ascending order.
    pub fn keys(&self) -> &[Uuid] {
        self.index.keys()
    }

    /// Oracle ids with at least one printing, in ascending order.
    pub fn oracle_ids(&self) -> &[Uuid] {
        &self.oracle_ids
    }

    /// Printing ids for an oracle id in encounter order; empty when unknown.
    pub fn printing_ids_for_oracle(&self, oracle_id: &Uuid) -> &[Uuid] {
        self.by_oracle
            .get(oracle_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn fetch_all_for_oracle(&self, oracle_id: &Uuid) -> Result<Vec<GameplayPrinting>> {
        self.fetch_batch(self.printing_ids_for_oracle(oracle_id))
    }

    /// The printing to show for a card. See [`crate::database::preferred`].
    pub fn fetch_preferred(&self, oracle_id: &Uuid) -> Result<Option<GameplayPrinting>> {
        Ok(crate::database::preferred(self.fetch_all_for_oracle(oracle_id)?))
    }

    pub fn set_codes(&self) -> &[String] {
        &self.set_codes
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<GameplayPrinting>> + '_ {
        self.keys()
            .iter()
            .filter_map(move |key| self.fetch(key).transpose())
    }

    fn decode_at(&self, key: &Uuid, offset: u32) -> Result<GameplayPrinting> {
        let pos = self.header.data_offset as usize + offset as usize;
        trace!("Decoding printing {} at {}", key, pos);
        let mut decoder = PrintingDecoder {
            r: ByteReader::new(&self.bytes, pos),
            bytes: &self.bytes,
            strings: &self.strings,
            set_codes: &self.set_codes,
            artists: &self.artists,
        };
        let printing = decoder.printing()?;
        if printing.scryfall_id != *key {
            return Err(StoreError::Corrupt(format!(
                "printing record at offset {} belongs to {}, indexed as {}",
                offset, printing.scryfall_id, key
            )));
        }
        Ok(printing)
    }
}

impl BlobLookup for PrintingBlobReader {
    type Record = GameplayPrinting;

    fn fetch(&self, key: &Uuid) -> Result<Option<GameplayPrinting>> {
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

struct PrintingDecoder<'a> {
    r: ByteReader<'a>,
    bytes: &'a [u8],
    strings: &'a StringTable,
    set_codes: &'a [String],
    artists: &'a [String],
}

impl PrintingDecoder<'_> {
    fn printing(&mut self) -> Result<GameplayPrinting> {
        let scryfall_id = self.r.uuid()?;
        let oracle_id = self.r.opt_uuid()?;
        let name = self.str()?;
        let lang = self.str()?;
        let set_code = catalog_entry(self.set_codes, "set_codes", self.r.u16()?)?.to_string();
        let set_id = self.r.opt_uuid()?;
        let set_name = self.str()?;
        let collector_number = self.str()?;
        let released_at = self.opt_str()?;

        let rarity = enum_byte(Rarity::from_u8, self.r.u8()?, "rarity")?;
        let border_color = enum_byte(BorderColor::from_u8, self.r.u8()?, "border color")?;
        let image_status = enum_byte(ImageStatus::from_u8, self.r.u8()?, "image status")?;
        let security_stamp = enum_byte(SecurityStamp::from_u8, self.r.u8()?, "security stamp")?;
        let finishes = enum_byte(Finishes::from_bits, self.r.u8()?, "finishes")?;
        let games = enum_byte(Games::from_bits, self.r.u8()?, "games")?;

        let image_uris = self.image_uris()?;

        let face_count = self.r.u8()? as usize;
        let mut faces = Vec::with_capacity(face_count);
        for _ in 0..face_count {
            let oracle_id = self.r.opt_uuid()?;
            let artist = match self.r.u16()? {
                NONE_IDX => None,
                idx => Some(catalog_entry(self.artists, "artists", idx)?.to_string()),
            };
            faces.push(FaceArt {
                oracle_id,
                artist,
                artist_id: self.r.opt_uuid()?,
                illustration_id: self.r.opt_uuid()?,
                flavor_name: self.opt_str()?,
                flavor_text: self.opt_str()?,
                watermark: self.opt_str()?,
                image_uris: self.image_uris()?,
            });
        }

        let flags_bits = self.r.u16()?;
        let flags = PrintFlags::from_bits(flags_bits)
            .ok_or_else(|| StoreError::Corrupt(format!("invalid print flags {:#06x}", flags_bits)))?;

        let external_ids = ExternalIds {
            mtgo_id: self.r.opt_u32()?,
            arena_id: self.r.opt_u32()?,
            tcgplayer_id: self.r.opt_u32()?,
            cardmarket_id: self.r.opt_u32()?,
        };

        let prices = Prices {
            usd: self.opt_str()?,
            usd_foil: self.opt_str()?,
            usd_etched: self.opt_str()?,
            eur: self.opt_str()?,
            eur_foil: self.opt_str()?,
            tix: self.opt_str()?,
        };

        Ok(GameplayPrinting {
            scryfall_id,
            oracle_id,
            name,
            lang,
            set_code,
            set_id,
            set_name,
            collector_number,
            released_at,
            rarity,
            border_color,
            image_status,
            security_stamp,
            finishes,
            games,
            flags,
            image_uris,
            faces,
            external_ids,
            prices,
        })
    }

    fn image_uris(&mut self) -> Result<Option<ImageUris>> {
        if !self.r.bool()? {
            return Ok(None);
        }
        Ok(Some(ImageUris {
            small: self.opt_str()?,
            normal: self.opt_str()?,
            large: self.opt_str()?,
            png: self.opt_str()?,
            art_crop: self.opt_str()?,
            border_crop: self.opt_str()?,
        }))
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

fn enum_byte<T>(decode: fn(u8) -> Option<T>, value: u8, what: &str) -> Result<T> {
    decode(value).ok_or_else(|| StoreError::Corrupt(format!("invalid {} byte {}", what, value)))
}
