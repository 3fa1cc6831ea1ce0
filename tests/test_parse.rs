//! Value parser tests: mana costs, type lines, stats, colors, legalities.

use scryfall_store::models::Colors;
use scryfall_store::parse::{
    parse_colors, Legalities, LegalityStatus, ManaCost, ManaCostError, StatValue, SymbolColor,
    SymbolFlags, TypeLine, FORMATS,
};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Mana costs
// ---------------------------------------------------------------------------

#[test]
fn mana_cost_generic_and_colored() {
    let cost = ManaCost::try_parse("{2}{W}{U}").unwrap();
    assert_eq!(cost.symbols.len(), 3);
    assert_eq!(cost.mana_value(), 4.0);
    assert_eq!(cost.colors(), Colors::WHITE | Colors::BLUE);
    assert!(cost.flags().is_empty());
    assert_eq!(cost.symbols[0].raw, "{2}");
    assert!(cost.symbols[0].flags.contains(SymbolFlags::GENERIC));
}

#[test]
fn mana_cost_variable() {
    let cost = ManaCost::try_parse("{X}{R}").unwrap();
    assert!(cost.flags().contains(SymbolFlags::VARIABLE));
    assert_eq!(cost.colors(), Colors::RED);
    assert_eq!(cost.mana_value(), 1.0);
}

#[test]
fn mana_cost_monocolored_hybrid() {
    let cost = ManaCost::try_parse("{2/B}").unwrap();
    assert_eq!(cost.flags(), SymbolFlags::HYBRID);
    assert_eq!(cost.colors(), Colors::BLACK);
    assert_eq!(cost.devotion(Colors::BLACK), 1);
    assert_eq!(cost.devotion(Colors::RED), 0);
    assert_eq!(cost.mana_value(), 2.0);
}

#[test]
fn mana_cost_two_color_hybrid_counts_for_both() {
    let cost = ManaCost::try_parse("{W/U}{W/U}").unwrap();
    assert_eq!(cost.devotion(Colors::WHITE), 2);
    assert_eq!(cost.devotion(Colors::BLUE), 2);
    assert_eq!(cost.symbols[0].colors, [SymbolColor::White, SymbolColor::Blue]);
    assert_eq!(cost.mana_value(), 2.0);
}

#[test]
fn mana_cost_phyrexian() {
    let cost = ManaCost::try_parse("{1}{W/P}").unwrap();
    assert!(cost.flags().contains(SymbolFlags::PHYREXIAN));
    assert!(!cost.flags().contains(SymbolFlags::HYBRID));
    assert_eq!(cost.colors(), Colors::WHITE);
    assert_eq!(cost.mana_value(), 2.0);
}

#[test]
fn mana_cost_colorless_symbol_is_not_a_color() {
    let cost = ManaCost::try_parse("{C}{C}").unwrap();
    assert_eq!(cost.symbols[0].colors[0], SymbolColor::Colorless);
    assert!(cost.colors().is_empty());
    assert_eq!(cost.mana_value(), 2.0);
}

#[test]
fn mana_cost_unknown_letter_maps_to_no_color() {
    let cost = ManaCost::try_parse("{Q}").unwrap();
    assert_eq!(cost.symbols[0].colors[0], SymbolColor::None);
    assert_eq!(cost.mana_value(), 0.0);
}

#[test]
fn mana_cost_empty_string_has_no_symbols() {
    let cost = ManaCost::try_parse("").unwrap();
    assert!(cost.is_empty());
    assert_eq!(cost.raw, "");
    assert_eq!(cost.mana_value(), 0.0);
}

#[test]
fn mana_cost_zero_is_not_empty() {
    let cost = ManaCost::try_parse("{0}").unwrap();
    assert!(!cost.is_empty());
    assert_eq!(cost.mana_value(), 0.0);
}

#[test]
fn mana_spans_skip_split_separator() {
    let spans: Vec<&str> = ManaCost::spans("{1}{U} // {B}")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(spans, vec!["1", "U", "B"]);
}

#[test]
fn mana_cost_unterminated() {
    assert_eq!(
        ManaCost::try_parse("{2}{W"),
        Err(ManaCostError::Unterminated { offset: 3 })
    );
    let lenient = ManaCost::parse("{2}{W");
    assert_eq!(lenient.symbols.len(), 1);
    assert_eq!(lenient.raw, "{2}{W");
}

// ---------------------------------------------------------------------------
// Type lines
// ---------------------------------------------------------------------------

#[test]
fn type_line_with_supertype_and_subtypes() {
    let line = TypeLine::parse("Legendary Creature — Elf Druid");
    assert_eq!(line.supertypes, vec!["Legendary"]);
    assert_eq!(line.types, vec!["Creature"]);
    assert_eq!(line.subtypes, vec!["Elf", "Druid"]);
    assert!(line.has_type("Creature"));
    assert!(line.has_subtype("Druid"));
}

#[test]
fn type_line_without_dash() {
    let line = TypeLine::parse("Instant");
    assert!(line.supertypes.is_empty());
    assert_eq!(line.types, vec!["Instant"]);
    assert!(line.subtypes.is_empty());
}

#[test]
fn type_line_multiple_supertypes() {
    let line = TypeLine::parse("Basic Snow Land — Forest");
    assert_eq!(line.supertypes, vec!["Basic", "Snow"]);
    assert_eq!(line.types, vec!["Land"]);
    assert_eq!(line.subtypes, vec!["Forest"]);
}

#[test]
fn type_line_faces_merge_without_duplicates() {
    let line = TypeLine::parse("Creature — Human Wizard // Creature — Human Insect");
    assert_eq!(line.types, vec!["Creature"]);
    assert_eq!(line.subtypes, vec!["Human", "Wizard", "Insect"]);
}

#[test]
fn type_line_subtypes_are_not_checked() {
    let line = TypeLine::parse("Creature — Made Up Thing");
    assert_eq!(line.subtypes, vec!["Made", "Up", "Thing"]);
}

#[test]
fn type_line_empty() {
    assert!(TypeLine::parse("").is_empty());
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[test]
fn stat_values() {
    assert_eq!(StatValue::parse("3"), Ok(StatValue::Fixed(3)));
    assert_eq!(StatValue::parse("-1"), Ok(StatValue::Fixed(-1)));
    assert_eq!(StatValue::parse("*"), Ok(StatValue::Star));
    assert_eq!(StatValue::parse("1+*"), Ok(StatValue::StarPlus(1)));
    assert_eq!(StatValue::parse("*+1"), Ok(StatValue::StarPlus(1)));
    assert_eq!(StatValue::parse("X"), Ok(StatValue::X));
}

#[test]
fn stat_malformed_is_an_error_not_a_panic() {
    let err = StatValue::parse("1.5?").unwrap_err();
    assert_eq!(err.input, "1.5?");
    assert_eq!(StatValue::parse_or_star("1.5?"), StatValue::Star);
    assert!(StatValue::parse("").is_err());
}

#[test]
fn stat_parts_round_trip() {
    for stat in [
        StatValue::Fixed(7),
        StatValue::Star,
        StatValue::StarPlus(2),
        StatValue::X,
    ] {
        assert_eq!(
            StatValue::from_parts(stat.kind(), stat.value(), stat.modifier()),
            Some(stat)
        );
    }
    assert_eq!(StatValue::from_parts(9, 0, 0), None);
}

#[test]
fn stat_display() {
    assert_eq!(StatValue::StarPlus(1).to_string(), "1+*");
    assert_eq!(StatValue::Fixed(4).to_string(), "4");
    assert!(StatValue::X.is_variable());
    assert!(!StatValue::Fixed(0).is_variable());
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[test]
fn colors_from_letters() {
    let colors = parse_colors(&["U", "W", "Q"]);
    assert_eq!(colors, Colors::WHITE | Colors::BLUE);
    assert_eq!(colors.letters(), "WU");
    assert!(parse_colors::<&str>(&[]).is_empty());
}

// ---------------------------------------------------------------------------
// Legalities
// ---------------------------------------------------------------------------

fn legality_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn legalities_pack_known_formats() {
    let legalities = Legalities::parse(&legality_map(&[
        ("modern", "legal"),
        ("vintage", "restricted"),
        ("legacy", "banned"),
        ("standard", "not_legal"),
        ("not_a_format", "legal"),
    ]));
    assert_eq!(legalities.get("modern"), Some(LegalityStatus::Legal));
    assert_eq!(legalities.get("vintage"), Some(LegalityStatus::Restricted));
    assert_eq!(legalities.get("legacy"), Some(LegalityStatus::Banned));
    assert_eq!(legalities.get("standard"), Some(LegalityStatus::NotLegal));
    assert_eq!(legalities.get("pauper"), Some(LegalityStatus::NotLegal));
    assert_eq!(legalities.get("not_a_format"), None);

    assert!(legalities.is_legal("modern"));
    assert!(legalities.is_legal("vintage"));
    assert!(!legalities.is_legal("legacy"));
}

#[test]
fn legalities_bits_round_trip() {
    let legalities = Legalities::parse(&legality_map(&[("commander", "legal"), ("pauper", "banned")]));
    let restored = Legalities::from_bits(legalities.bits());
    assert_eq!(restored, legalities);
    assert_eq!(restored.iter().count(), FORMATS.len());
}

#[test]
fn legalities_set_rejects_unknown_format() {
    let mut legalities = Legalities::default();
    assert!(legalities.set("pioneer", LegalityStatus::Legal));
    assert!(!legalities.set("unknown", LegalityStatus::Legal));
    assert!(legalities.is_legal("pioneer"));
}
