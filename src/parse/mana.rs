//! Mana cost parsing.
//!
//! A cost is a run of `{...}` tokens. [`ManaCost::spans`] scans the tokens
//! without allocating; [`ManaSymbol::parse`] classifies one token into its
//! typed breakdown (generic amount, colors, hybrid/phyrexian/variable flags).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::models::Colors;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SymbolFlags: u8 {
        const GENERIC = 1 << 0;
        const HYBRID = 1 << 1;
        const PHYREXIAN = 1 << 2;
        const VARIABLE = 1 << 3;
    }
}

// ---------------------------------------------------------------------------
// SymbolColor
// ---------------------------------------------------------------------------

/// One color slot of a symbol. A symbol carries up to two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymbolColor {
    #[default]
    None = 0,
    White = 1,
    Blue = 2,
    Black = 3,
    Red = 4,
    Green = 5,
    Colorless = 6,
}

impl SymbolColor {
    /// Unresolvable letters map to `None` so new symbol kinds never fail a parse.
    pub fn from_letter(letter: &str) -> Self {
        match letter {
            "W" => SymbolColor::White,
            "U" => SymbolColor::Blue,
            "B" => SymbolColor::Black,
            "R" => SymbolColor::Red,
            "G" => SymbolColor::Green,
            "C" => SymbolColor::Colorless,
            _ => SymbolColor::None,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SymbolColor::None),
            1 => Some(SymbolColor::White),
            2 => Some(SymbolColor::Blue),
            3 => Some(SymbolColor::Black),
            4 => Some(SymbolColor::Red),
            5 => Some(SymbolColor::Green),
            6 => Some(SymbolColor::Colorless),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The color-set bit for this slot; empty for colorless and none.
    pub fn as_colors(self) -> Colors {
        match self {
            SymbolColor::White => Colors::WHITE,
            SymbolColor::Blue => Colors::BLUE,
            SymbolColor::Black => Colors::BLACK,
            SymbolColor::Red => Colors::RED,
            SymbolColor::Green => Colors::GREEN,
            SymbolColor::None | SymbolColor::Colorless => Colors::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// ManaSymbol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManaSymbol {
    /// The token including braces, e.g. `"{W/U}"`.
    pub raw: String,
    pub colors: [SymbolColor; 2],
    pub mana_value: f32,
    pub flags: SymbolFlags,
}

impl ManaSymbol {
    /// Classify the text between one pair of braces.
    pub fn parse(inner: &str) -> Self {
        let raw = format!("{{{}}}", inner);
        let token = inner.trim().to_ascii_uppercase();

        if let Some(amount) = generic_amount(&token) {
            return Self {
                raw,
                colors: [SymbolColor::None; 2],
                mana_value: amount,
                flags: SymbolFlags::GENERIC,
            };
        }

        if matches!(token.as_str(), "X" | "Y" | "Z") {
            return Self {
                raw,
                colors: [SymbolColor::None; 2],
                mana_value: 0.0,
                flags: SymbolFlags::VARIABLE,
            };
        }

        if token.contains('/') {
            let parts: Vec<&str> = token.split('/').collect();
            let phyrexian = parts.last() == Some(&"P") || parts.first() == Some(&"P");
            let components: Vec<&str> = parts.iter().copied().filter(|p| *p != "P").collect();

            let mut colors = [SymbolColor::None; 2];
            for (slot, part) in colors.iter_mut().zip(components.iter()) {
                *slot = SymbolColor::from_letter(part);
            }

            if phyrexian {
                return Self {
                    raw,
                    colors,
                    mana_value: 1.0,
                    flags: SymbolFlags::PHYREXIAN,
                };
            }

            // {2/B} costs two generic or one black: its value is the larger half.
            let mana_value = components
                .iter()
                .map(|part| generic_amount(part).unwrap_or(1.0))
                .fold(0.0_f32, f32::max);
            return Self {
                raw,
                colors,
                mana_value,
                flags: SymbolFlags::HYBRID,
            };
        }

        let color = SymbolColor::from_letter(&token);
        let mana_value = match (color, token.as_str()) {
            (SymbolColor::None, "S") => 1.0,
            (SymbolColor::None, _) => 0.0,
            _ => 1.0,
        };
        Self {
            raw,
            colors: [color, SymbolColor::None],
            mana_value,
            flags: SymbolFlags::empty(),
        }
    }

    pub fn color_set(&self) -> Colors {
        self.colors[0].as_colors() | self.colors[1].as_colors()
    }
}

fn generic_amount(token: &str) -> Option<f32> {
    if token == "½" {
        return Some(0.5);
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse::<f32>().ok();
    }
    None
}

// ---------------------------------------------------------------------------
// SymbolSpans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManaCostError {
    #[error("unterminated mana symbol at byte {offset}")]
    Unterminated { offset: usize },
}

/// Iterator over the inner text of each `{...}` token, borrowing the source.
///
/// Text between tokens (such as the ` // ` joining split halves) is skipped.
/// An opening brace with no closing brace yields one error and ends the scan.
pub struct SymbolSpans<'a> {
    src: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for SymbolSpans<'a> {
    type Item = Result<&'a str, ManaCostError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rest = &self.src[self.pos..];
        let Some(open) = rest.find('{') else {
            self.done = true;
            return None;
        };
        let start = self.pos + open + 1;
        match self.src[start..].find('}') {
            Some(close) => {
                self.pos = start + close + 1;
                Some(Ok(&self.src[start..start + close]))
            }
            None => {
                self.done = true;
                Some(Err(ManaCostError::Unterminated { offset: start - 1 }))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ManaCost
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ManaCost {
    pub raw: String,
    pub symbols: Vec<ManaSymbol>,
}

impl ManaCost {
    pub fn spans(raw: &str) -> SymbolSpans<'_> {
        SymbolSpans {
            src: raw,
            pos: 0,
            done: false,
        }
    }

    /// Parse, rejecting an unterminated token.
    pub fn try_parse(raw: &str) -> Result<Self, ManaCostError> {
        let symbols = Self::spans(raw)
            .map(|span| span.map(ManaSymbol::parse))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw: raw.to_string(),
            symbols,
        })
    }

    /// Parse, keeping every well-formed token before any unterminated one.
    pub fn parse(raw: &str) -> Self {
        let symbols = Self::spans(raw)
            .map_while(|span| span.ok())
            .map(ManaSymbol::parse)
            .collect();
        Self {
            raw: raw.to_string(),
            symbols,
        }
    }

    /// True for a card that has no mana cost at all (as opposed to a zero cost `{0}`).
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn mana_value(&self) -> f32 {
        self.symbols.iter().map(|s| s.mana_value).sum()
    }

    pub fn colors(&self) -> Colors {
        self.symbols
            .iter()
            .fold(Colors::empty(), |acc, s| acc | s.color_set())
    }

    /// Hybrid, phyrexian and variable markers present anywhere in the cost.
    /// Plain generic amounts do not count.
    pub fn flags(&self) -> SymbolFlags {
        self.symbols
            .iter()
            .fold(SymbolFlags::empty(), |acc, s| acc | s.flags)
            .difference(SymbolFlags::GENERIC)
    }

    /// Colored pips of `color`, counting hybrid symbols toward each of their colors.
    pub fn devotion(&self, color: Colors) -> u32 {
        self.symbols
            .iter()
            .filter(|s| s.color_set().intersects(color))
            .count() as u32
    }
}
