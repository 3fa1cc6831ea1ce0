use crate::models::Colors;

/// Map one color letter; `C` and anything unknown are not colors.
pub fn parse_color_letter(letter: &str) -> Option<Colors> {
    match letter.trim().to_ascii_uppercase().as_str() {
        "W" => Some(Colors::WHITE),
        "U" => Some(Colors::BLUE),
        "B" => Some(Colors::BLACK),
        "R" => Some(Colors::RED),
        "G" => Some(Colors::GREEN),
        _ => None,
    }
}

/// Fold a list of color letters into a set, skipping unknown letters.
pub fn parse_colors<S: AsRef<str>>(letters: &[S]) -> Colors {
    letters
        .iter()
        .filter_map(|l| parse_color_letter(l.as_ref()))
        .fold(Colors::empty(), |acc, c| acc | c)
}
