//! Closed vocabularies stored as one byte each in the blobs.
//!
//! Every enum reserves discriminant `0` for its fallback variant so that a
//! value Scryfall introduces later still normalizes instead of failing.

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $default:ident = 0 => $default_text:literal,
            $($variant:ident = $value:literal => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            #[default]
            $default = 0,
            $($variant = $value),+
        }

        impl $name {
            /// Map a source string to a variant, falling back to the default.
            pub fn parse(s: &str) -> Self {
                match s {
                    $($text => $name::$variant,)+
                    _ => $name::$default,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$default => $default_text,
                    $($name::$variant => $text,)+
                }
            }

            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    0 => Some($name::$default),
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn as_u8(self) -> u8 {
                self as u8
            }
        }
    };
}

wire_enum! {
    /// Physical card layout.
    pub enum Layout {
        Unknown = 0 => "unknown",
        Normal = 1 => "normal",
        Split = 2 => "split",
        Flip = 3 => "flip",
        Transform = 4 => "transform",
        ModalDfc = 5 => "modal_dfc",
        Meld = 6 => "meld",
        Leveler = 7 => "leveler",
        Class = 8 => "class",
        Case = 9 => "case",
        Saga = 10 => "saga",
        Adventure = 11 => "adventure",
        Mutate = 12 => "mutate",
        Prototype = 13 => "prototype",
        Battle = 14 => "battle",
        Planar = 15 => "planar",
        Scheme = 16 => "scheme",
        Vanguard = 17 => "vanguard",
        Token = 18 => "token",
        DoubleFacedToken = 19 => "double_faced_token",
        Emblem = 20 => "emblem",
        Augment = 21 => "augment",
        Host = 22 => "host",
        ArtSeries = 23 => "art_series",
        ReversibleCard = 24 => "reversible_card",
    }
}

impl Layout {
    /// Layouts whose source records carry a `card_faces` array.
    pub fn is_multi_faced(self) -> bool {
        matches!(
            self,
            Layout::Split
                | Layout::Flip
                | Layout::Transform
                | Layout::ModalDfc
                | Layout::Meld
                | Layout::Adventure
                | Layout::Battle
                | Layout::DoubleFacedToken
                | Layout::ArtSeries
                | Layout::ReversibleCard
        )
    }
}

wire_enum! {
    pub enum Rarity {
        Unknown = 0 => "unknown",
        Common = 1 => "common",
        Uncommon = 2 => "uncommon",
        Rare = 3 => "rare",
        Mythic = 4 => "mythic",
        Special = 5 => "special",
        Bonus = 6 => "bonus",
    }
}

wire_enum! {
    pub enum BorderColor {
        Unknown = 0 => "unknown",
        Black = 1 => "black",
        White = 2 => "white",
        Borderless = 3 => "borderless",
        Silver = 4 => "silver",
        Gold = 5 => "gold",
        Yellow = 6 => "yellow",
    }
}

wire_enum! {
    pub enum ImageStatus {
        Missing = 0 => "missing",
        Placeholder = 1 => "placeholder",
        LowRes = 2 => "lowres",
        HighResScan = 3 => "highres_scan",
    }
}

wire_enum! {
    pub enum SecurityStamp {
        None = 0 => "none",
        Oval = 1 => "oval",
        Triangle = 2 => "triangle",
        Acorn = 3 => "acorn",
        Circle = 4 => "circle",
        Arena = 5 => "arena",
        Heart = 6 => "heart",
    }
}

wire_enum! {
    /// Role of a linked card in a related-card stub.
    pub enum RelatedComponent {
        Unknown = 0 => "unknown",
        Token = 1 => "token",
        MeldPart = 2 => "meld_part",
        MeldResult = 3 => "meld_result",
        ComboPiece = 4 => "combo_piece",
    }
}
