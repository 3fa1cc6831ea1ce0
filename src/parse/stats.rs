use serde::{Deserialize, Serialize};
use std::fmt;

/// Power, toughness, loyalty or defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatValue {
    Fixed(i32),
    /// `*`
    Star,
    /// `N+*`, also written `*+N`.
    StarPlus(i32),
    /// `X`
    X,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized stat value '{input}'")]
pub struct StatParseError {
    pub input: String,
}

impl StatValue {
    pub fn parse(input: &str) -> Result<Self, StatParseError> {
        let s = input.trim();
        let err = || StatParseError {
            input: input.to_string(),
        };

        match s {
            "*" => return Ok(StatValue::Star),
            "X" | "x" => return Ok(StatValue::X),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Ok(StatValue::Fixed(n));
        }

        if let Some(n) = s.strip_suffix("+*") {
            return n.trim().parse::<i32>().map(StatValue::StarPlus).map_err(|_| err());
        }
        if let Some(n) = s.strip_prefix("*+") {
            return n.trim().parse::<i32>().map(StatValue::StarPlus).map_err(|_| err());
        }

        Err(err())
    }

    /// Parse, degrading anything unrecognized to [`StatValue::Star`].
    pub fn parse_or_star(input: &str) -> Self {
        Self::parse(input).unwrap_or(StatValue::Star)
    }

    /// Wire kind byte.
    pub fn kind(self) -> u8 {
        match self {
            StatValue::Fixed(_) => 0,
            StatValue::Star => 1,
            StatValue::StarPlus(_) => 2,
            StatValue::X => 3,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            StatValue::Fixed(n) => n,
            _ => 0,
        }
    }

    pub fn modifier(self) -> i32 {
        match self {
            StatValue::StarPlus(n) => n,
            _ => 0,
        }
    }

    pub fn from_parts(kind: u8, value: i32, modifier: i32) -> Option<Self> {
        match kind {
            0 => Some(StatValue::Fixed(value)),
            1 => Some(StatValue::Star),
            2 => Some(StatValue::StarPlus(modifier)),
            3 => Some(StatValue::X),
            _ => None,
        }
    }

    pub fn is_variable(self) -> bool {
        !matches!(self, StatValue::Fixed(_))
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Fixed(n) => write!(f, "{}", n),
            StatValue::Star => write!(f, "*"),
            StatValue::StarPlus(n) => write!(f, "{}+*", n),
            StatValue::X => write!(f, "X"),
        }
    }
}
