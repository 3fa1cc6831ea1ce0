//! Pure parsers turning raw source strings into typed values.

pub mod colors;
pub mod legality;
pub mod mana;
pub mod stats;
pub mod type_line;

pub use colors::{parse_color_letter, parse_colors};
pub use legality::{Legalities, LegalityStatus, FORMATS};
pub use mana::{ManaCost, ManaCostError, ManaSymbol, SymbolColor, SymbolFlags, SymbolSpans};
pub use stats::{StatParseError, StatValue};
pub use type_line::{TypeLine, SUPERTYPES};
