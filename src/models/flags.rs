use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// A set of the five colors, packed into the low five bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Colors: u8 {
        const WHITE = 1 << 0;
        const BLUE = 1 << 1;
        const BLACK = 1 << 2;
        const RED = 1 << 3;
        const GREEN = 1 << 4;
    }
}

impl Colors {
    /// WUBRG-ordered single-letter rendering, e.g. `"WU"`.
    pub fn letters(self) -> String {
        let mut out = String::with_capacity(5);
        for (flag, letter) in [
            (Colors::WHITE, 'W'),
            (Colors::BLUE, 'U'),
            (Colors::BLACK, 'B'),
            (Colors::RED, 'R'),
            (Colors::GREEN, 'G'),
        ] {
            if self.contains(flag) {
                out.push(letter);
            }
        }
        out
    }
}

bitflags! {
    /// Card-level boolean markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CardFlags: u16 {
        const RESERVED = 1 << 0;
        const GAME_CHANGER = 1 << 1;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Finishes: u8 {
        const NONFOIL = 1 << 0;
        const FOIL = 1 << 1;
        const ETCHED = 1 << 2;
        const GLOSSY = 1 << 3;
    }
}

impl Finishes {
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Self {
        values
            .iter()
            .map(|v| match v.as_ref() {
                "nonfoil" => Finishes::NONFOIL,
                "foil" => Finishes::FOIL,
                "etched" => Finishes::ETCHED,
                "glossy" => Finishes::GLOSSY,
                _ => Finishes::empty(),
            })
            .fold(Finishes::empty(), |acc, f| acc | f)
    }
}

bitflags! {
    /// Games a printing is available in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Games: u8 {
        const PAPER = 1 << 0;
        const ARENA = 1 << 1;
        const MTGO = 1 << 2;
        const ASTRAL = 1 << 3;
        const SEGA = 1 << 4;
    }
}

impl Games {
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Self {
        values
            .iter()
            .map(|v| match v.as_ref() {
                "paper" => Games::PAPER,
                "arena" => Games::ARENA,
                "mtgo" => Games::MTGO,
                "astral" => Games::ASTRAL,
                "sega" => Games::SEGA,
                _ => Games::empty(),
            })
            .fold(Games::empty(), |acc, g| acc | g)
    }
}

bitflags! {
    /// Per-printing boolean markers, packed in one 16-bit word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PrintFlags: u16 {
        const PROMO = 1 << 0;
        const REPRINT = 1 << 1;
        const FULL_ART = 1 << 2;
        const OVERSIZED = 1 << 3;
        const TEXTLESS = 1 << 4;
        const STORY_SPOTLIGHT = 1 << 5;
        const BOOSTER = 1 << 6;
        const DIGITAL = 1 << 7;
        const VARIATION = 1 << 8;
        const CONTENT_WARNING = 1 << 9;
        const HIGHRES_IMAGE = 1 << 10;
    }
}
