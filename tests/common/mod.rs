//! Shared test fixtures for the scryfall-store integration tests.
//!
//! Records are Scryfall-shaped JSON built with `serde_json::json!`, trimmed to
//! the fields the store reads.

#![allow(dead_code)]

use scryfall_store::models::{GameplayCard, GameplayPrinting, RawCard};
use scryfall_store::normalize::{normalize_card, normalize_printing, NormalizeOptions};
use serde_json::{json, Value};
use uuid::Uuid;

// -- Ids ----------------------------------------------------------------------

pub const BOLT_ORACLE: &str = "4457ed35-7c10-48c8-9776-456485fdf070";
pub const BOLT_A25: &str = "e3285e6b-3e79-4d7c-bf96-d920f973b122";
pub const BOLT_PROMO: &str = "f29ba16f-c8fb-42fe-aabf-87089cb214a7";
pub const BOLT_JA: &str = "8b2b0dc6-6f1b-4a7e-9c3e-5e1d2f0a9c11";

pub const DELVER_ORACLE: &str = "6a8f5d4b-5f0c-4d62-a6a6-1f3c3d2a4e55";
pub const DELVER_ISD: &str = "11bf83bb-c95b-4b4f-9a56-ce7a1816307a";

pub const GOYF_ORACLE: &str = "a1f3c2d4-0b7e-4f5a-9d8c-2e6b4a1c3f70";
pub const GOYF_MMA: &str = "5f3e2a1b-9c8d-4e7f-a6b5-c4d3e2f1a0b9";

pub const REVERSIBLE_ID: &str = "0c1d2e3f-4a5b-4c6d-8e7f-9a0b1c2d3e4f";
pub const REVERSIBLE_FRONT_ORACLE: &str = "b7e8f9a0-1b2c-4d3e-8f4a-5b6c7d8e9f01";
pub const REVERSIBLE_BACK_ORACLE: &str = "c8f9a0b1-2c3d-4e4f-9a5b-6c7d8e9f0a12";

pub const NO_ORACLE_ID: &str = "d9a0b1c2-3d4e-4f5a-8b6c-7d8e9f0a1b23";

pub const A25_SET_ID: &str = "41ee6e2f-8c0f-4b2a-9a2e-7c1c5d3b4a21";
pub const MOELLER_ID: &str = "0b8f2a3c-4d5e-4f6a-8b7c-9d0e1f2a3b4c";
pub const BOLT_ILLUSTRATION: &str = "f3a2b1c0-d9e8-4f7a-8b6c-5d4e3f2a1b0c";

pub fn uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

// -- Records --------------------------------------------------------------------

/// Lightning Bolt, Masters 25: a plain single-faced English printing.
pub fn bolt() -> Value {
    json!({
        "id": BOLT_A25,
        "oracle_id": BOLT_ORACLE,
        "name": "Lightning Bolt",
        "lang": "en",
        "layout": "normal",
        "mana_cost": "{R}",
        "cmc": 1.0,
        "type_line": "Instant",
        "oracle_text": "Lightning Bolt deals 3 damage to any target.",
        "colors": ["R"],
        "color_identity": ["R"],
        "keywords": [],
        "legalities": {
            "standard": "not_legal",
            "modern": "legal",
            "legacy": "legal",
            "vintage": "legal",
            "pauper": "legal",
            "commander": "legal"
        },
        "reserved": false,
        "edhrec_rank": 5,
        "set": "a25",
        "set_id": A25_SET_ID,
        "set_name": "Masters 25",
        "collector_number": "141",
        "released_at": "2018-03-16",
        "rarity": "uncommon",
        "border_color": "black",
        "image_status": "highres_scan",
        "finishes": ["nonfoil", "foil"],
        "games": ["paper", "mtgo"],
        "image_uris": {
            "small": "https://cards.scryfall.io/small/front/e/3/e3285e6b.jpg",
            "normal": "https://cards.scryfall.io/normal/front/e/3/e3285e6b.jpg",
            "large": "https://cards.scryfall.io/large/front/e/3/e3285e6b.jpg",
            "png": "https://cards.scryfall.io/png/front/e/3/e3285e6b.png",
            "art_crop": "https://cards.scryfall.io/art_crop/front/e/3/e3285e6b.jpg",
            "border_crop": "https://cards.scryfall.io/border_crop/front/e/3/e3285e6b.jpg"
        },
        "artist": "Christopher Moeller",
        "artist_ids": [MOELLER_ID],
        "illustration_id": BOLT_ILLUSTRATION,
        "flavor_text": "The sparkmage shrieked, calling on the rage of the storms of his youth.",
        "reprint": true,
        "highres_image": true,
        "mtgo_id": 67196,
        "tcgplayer_id": 155586,
        "cardmarket_id": 319238,
        "prices": {
            "usd": "1.95",
            "usd_foil": "7.99",
            "usd_etched": null,
            "eur": "1.50",
            "eur_foil": "6.00",
            "tix": "0.02"
        }
    })
}

/// A digital-only promo Bolt with a high-res scan.
pub fn bolt_promo() -> Value {
    with(
        bolt(),
        json!({
            "id": BOLT_PROMO,
            "set": "pana",
            "set_name": "MTG Arena Promos",
            "collector_number": "1",
            "promo": true,
            "digital": true,
            "reprint": true,
            "highres_image": true,
            "games": ["arena"],
            "mtgo_id": null,
            "tcgplayer_id": null,
            "cardmarket_id": null
        }),
    )
}

/// A Japanese Bolt printing with a low-res scan, available in paper.
pub fn bolt_japanese() -> Value {
    with(
        bolt(),
        json!({
            "id": BOLT_JA,
            "lang": "ja",
            "name": "Lightning Bolt",
            "oracle_text": "稲妻は任意の対象1つに3点のダメージを与える。",
            "set": "jmp",
            "set_name": "Jumpstart",
            "collector_number": "342",
            "highres_image": false,
            "image_status": "lowres",
            "games": ["paper"]
        }),
    )
}

/// Delver of Secrets: a transform card with per-face art and stats.
pub fn delver() -> Value {
    json!({
        "id": DELVER_ISD,
        "oracle_id": DELVER_ORACLE,
        "name": "Delver of Secrets // Insectile Aberration",
        "lang": "en",
        "layout": "transform",
        "cmc": 1.0,
        "type_line": "Creature — Human Wizard // Creature — Human Insect",
        "colors": ["U"],
        "color_identity": ["U"],
        "keywords": ["Flying", "Transform"],
        "legalities": { "modern": "legal", "pauper": "legal", "legacy": "legal" },
        "card_faces": [
            {
                "name": "Delver of Secrets",
                "mana_cost": "{U}",
                "type_line": "Creature — Human Wizard",
                "oracle_text": "At the beginning of your upkeep, look at the top card of your library.",
                "colors": ["U"],
                "power": "1",
                "toughness": "1",
                "artist": "Nils Hamm",
                "illustration_id": "aa11bb22-cc33-4d44-8e55-ff6677889900",
                "image_uris": { "normal": "https://cards.scryfall.io/normal/front/1/1/11bf83bb.jpg" }
            },
            {
                "name": "Insectile Aberration",
                "mana_cost": "",
                "type_line": "Creature — Human Insect",
                "oracle_text": "Flying",
                "colors": ["U"],
                "color_indicator": ["U"],
                "power": "3",
                "toughness": "2",
                "artist": "Nils Hamm",
                "illustration_id": "bb22cc33-dd44-4e55-8f66-001122334455",
                "image_uris": { "normal": "https://cards.scryfall.io/normal/back/1/1/11bf83bb.jpg" }
            }
        ],
        "set": "isd",
        "set_name": "Innistrad",
        "collector_number": "51",
        "released_at": "2011-09-30",
        "rarity": "common",
        "border_color": "black",
        "image_status": "highres_scan",
        "finishes": ["nonfoil", "foil"],
        "games": ["paper", "mtgo"],
        "artist": "Nils Hamm",
        "highres_image": true,
        "prices": { "usd": "0.45" }
    })
}

/// Tarmogoyf: characteristic-defining stats.
pub fn tarmogoyf() -> Value {
    json!({
        "id": GOYF_MMA,
        "oracle_id": GOYF_ORACLE,
        "name": "Tarmogoyf",
        "lang": "en",
        "layout": "normal",
        "mana_cost": "{1}{G}",
        "cmc": 2.0,
        "type_line": "Creature — Lhurgoyf",
        "oracle_text": "Tarmogoyf's power is equal to the number of card types among cards in all graveyards and its toughness is equal to that number plus 1.",
        "colors": ["G"],
        "color_identity": ["G"],
        "power": "*",
        "toughness": "1+*",
        "legalities": { "modern": "legal", "legacy": "legal" },
        "edhrec_rank": 4012,
        "penny_rank": 1200,
        "set": "mma",
        "set_name": "Modern Masters",
        "collector_number": "166",
        "rarity": "mythic",
        "border_color": "black",
        "image_status": "highres_scan",
        "finishes": ["nonfoil", "foil"],
        "games": ["paper"],
        "artist": "Ryan Barger",
        "highres_image": true
    })
}

/// A reversible card: no top-level oracle id, each face carries its own.
pub fn reversible() -> Value {
    json!({
        "id": REVERSIBLE_ID,
        "name": "Zndrsplt, Eye of Wisdom // Zndrsplt, Eye of Wisdom",
        "lang": "en",
        "layout": "reversible_card",
        "card_faces": [
            {
                "oracle_id": REVERSIBLE_FRONT_ORACLE,
                "name": "Zndrsplt, Eye of Wisdom",
                "layout": "normal",
                "mana_cost": "{4}{U}",
                "cmc": 5.0,
                "type_line": "Legendary Creature — Homunculus",
                "oracle_text": "Partner with Okaun, Eye of Chaos",
                "colors": ["U"],
                "power": "1",
                "toughness": "4",
                "artist": "Alexander Forssberg"
            },
            {
                "oracle_id": REVERSIBLE_BACK_ORACLE,
                "name": "Zndrsplt, Eye of Wisdom",
                "layout": "normal",
                "mana_cost": "{4}{U}",
                "cmc": 5.0,
                "type_line": "Legendary Creature — Homunculus",
                "oracle_text": "Partner with Okaun, Eye of Chaos",
                "colors": ["U"],
                "power": "1",
                "toughness": "4"
            }
        ],
        "set": "sld",
        "set_name": "Secret Lair Drop",
        "collector_number": "379",
        "rarity": "rare",
        "border_color": "borderless",
        "image_status": "highres_scan",
        "finishes": ["foil"],
        "games": ["paper"],
        "artist": "Alexander Forssberg",
        "highres_image": true
    })
}

/// An art-series style record with no oracle identity at all.
pub fn without_oracle() -> Value {
    json!({
        "id": NO_ORACLE_ID,
        "name": "Art Card",
        "lang": "en",
        "layout": "art_series",
        "type_line": "Card",
        "set": "amh2",
        "set_name": "Modern Horizons 2 Art Series",
        "collector_number": "1",
        "rarity": "common",
        "games": ["paper"]
    })
}

/// The records most tests build from: three cards, five printings.
pub fn sample_records() -> Vec<Value> {
    vec![bolt(), delver(), tarmogoyf(), bolt_promo(), bolt_japanese()]
}

// -- Helpers ---------------------------------------------------------------------

/// Shallow-merge `overrides` into `base`.
pub fn with(mut base: Value, overrides: Value) -> Value {
    if let (Some(obj), Value::Object(extra)) = (base.as_object_mut(), overrides) {
        for (key, value) in extra {
            obj.insert(key, value);
        }
    }
    base
}

pub fn raw(value: Value) -> RawCard {
    RawCard::from_value(value).unwrap()
}

pub fn raw_records(values: Vec<Value>) -> Vec<RawCard> {
    values.into_iter().map(raw).collect()
}

pub fn card(value: Value) -> GameplayCard {
    normalize_card(&raw(value), &NormalizeOptions::default())
        .unwrap()
        .record
}

pub fn printing(value: Value) -> GameplayPrinting {
    normalize_printing(&raw(value))
}
