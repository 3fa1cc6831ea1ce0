use serde::{Deserialize, Serialize};

/// Words that are supertypes when they appear left of the dash.
pub const SUPERTYPES: &[&str] = &[
    "Legendary",
    "Basic",
    "Snow",
    "World",
    "Ongoing",
    "Elite",
    "Host",
    "Token",
];

/// A type line and its decomposition.
///
/// `"Legendary Creature — Elf Druid"` splits into supertypes `[Legendary]`,
/// types `[Creature]` and subtypes `[Elf, Druid]`. Subtypes are never checked
/// against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeLine {
    pub raw: String,
    pub supertypes: Vec<String>,
    pub types: Vec<String>,
    pub subtypes: Vec<String>,
}

impl TypeLine {
    /// Decompose a type line. Multi-face lines joined by `//` merge the words
    /// of every half, first occurrence first.
    pub fn parse(raw: &str) -> Self {
        let mut line = TypeLine {
            raw: raw.to_string(),
            ..Default::default()
        };

        for half in raw.split("//") {
            let (left, right) = match half.split_once('—') {
                Some((l, r)) => (l, r),
                None => (half, ""),
            };
            for word in left.split_whitespace() {
                if SUPERTYPES.contains(&word) {
                    push_unique(&mut line.supertypes, word);
                } else {
                    push_unique(&mut line.types, word);
                }
            }
            for word in right.split_whitespace() {
                push_unique(&mut line.subtypes, word);
            }
        }

        line
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn has_type(&self, card_type: &str) -> bool {
        self.types.iter().any(|t| t == card_type)
    }

    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|t| t == subtype)
    }
}

fn push_unique(words: &mut Vec<String>, word: &str) {
    if !words.iter().any(|w| w == word) {
        words.push(word.to_string());
    }
}
