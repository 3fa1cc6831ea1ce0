use crate::models::{
    BorderColor, ExternalIds, FaceArt, Finishes, GameplayPrinting, Games, ImageStatus, ImageUris,
    PrintFlags, Prices, Rarity, RawCard, SecurityStamp,
};

/// Normalize one raw record into its printing row.
///
/// Produces one [`FaceArt`] per source face. Faces missing an artist,
/// illustration or watermark inherit the card-level value; a source without
/// faces yields a single entry built from the card-level fields.
pub fn normalize_printing(raw: &RawCard) -> GameplayPrinting {
    let faces = if raw.card_faces.is_empty() {
        vec![FaceArt {
            oracle_id: None,
            artist: raw.artist.clone(),
            artist_id: raw.artist_ids.first().copied(),
            illustration_id: raw.illustration_id,
            flavor_name: raw.flavor_name.clone(),
            flavor_text: raw.flavor_text.clone(),
            watermark: raw.watermark.clone(),
            image_uris: None,
        }]
    } else {
        raw.card_faces
            .iter()
            .enumerate()
            .map(|(i, face)| FaceArt {
                oracle_id: face.oracle_id,
                artist: face.artist.clone().or_else(|| raw.artist.clone()),
                artist_id: face
                    .artist_id
                    .or_else(|| raw.artist_ids.get(i).copied())
                    .or_else(|| raw.artist_ids.first().copied()),
                illustration_id: face.illustration_id.or(raw.illustration_id),
                flavor_name: face.flavor_name.clone(),
                flavor_text: face.flavor_text.clone(),
                watermark: face.watermark.clone().or_else(|| raw.watermark.clone()),
                image_uris: face.image_uris.as_ref().map(ImageUris::from),
            })
            .collect()
    };

    let mut flags = PrintFlags::empty();
    for (flag, on) in [
        (PrintFlags::PROMO, raw.promo),
        (PrintFlags::REPRINT, raw.reprint),
        (PrintFlags::FULL_ART, raw.full_art),
        (PrintFlags::OVERSIZED, raw.oversized),
        (PrintFlags::TEXTLESS, raw.textless),
        (PrintFlags::STORY_SPOTLIGHT, raw.story_spotlight),
        (PrintFlags::BOOSTER, raw.booster),
        (PrintFlags::DIGITAL, raw.digital),
        (PrintFlags::VARIATION, raw.variation),
        (PrintFlags::CONTENT_WARNING, raw.content_warning),
        (PrintFlags::HIGHRES_IMAGE, raw.highres_image),
    ] {
        flags.set(flag, on);
    }

    GameplayPrinting {
        scryfall_id: raw.id,
        oracle_id: raw
            .oracle_id
            .or_else(|| raw.card_faces.iter().find_map(|f| f.oracle_id)),
        name: raw.name.clone(),
        lang: raw.lang.clone().unwrap_or_else(|| "en".to_string()),
        set_code: raw.set.clone(),
        set_id: raw.set_id,
        set_name: raw.set_name.clone(),
        collector_number: raw.collector_number.clone(),
        released_at: raw.released_at.clone(),
        rarity: raw.rarity.as_deref().map(Rarity::parse).unwrap_or_default(),
        border_color: raw.border_color.as_deref().map(BorderColor::parse).unwrap_or_default(),
        image_status: raw.image_status.as_deref().map(ImageStatus::parse).unwrap_or_default(),
        security_stamp: raw
            .security_stamp
            .as_deref()
            .map(SecurityStamp::parse)
            .unwrap_or_default(),
        finishes: Finishes::parse(&raw.finishes),
        games: Games::parse(&raw.games),
        flags,
        image_uris: raw.image_uris.as_ref().map(ImageUris::from),
        faces,
        external_ids: ExternalIds {
            mtgo_id: external_id(raw.mtgo_id),
            arena_id: external_id(raw.arena_id),
            tcgplayer_id: external_id(raw.tcgplayer_id),
            cardmarket_id: external_id(raw.cardmarket_id),
        },
        prices: Prices::from(&raw.prices),
    }
}

// u32::MAX is the blob's absent marker.
fn external_id(id: Option<u32>) -> Option<u32> {
    id.filter(|id| *id != u32::MAX)
}
