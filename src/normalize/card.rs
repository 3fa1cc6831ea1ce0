use crate::models::{
    CardFlags, Colors, GameplayCard, GameplayFace, Layout, RawCard, RawCardFace, RelatedCard,
    RelatedComponent,
};
use crate::parse::{parse_colors, Legalities, StatValue, TypeLine};

use super::{FieldContext, NormalizeIssue, NormalizeOptions, Normalized};

/// Normalize one raw record into an oracle-level card.
///
/// Fields missing at the top level fall back, in order, to the first face
/// that has them. Returns `Err` with the reason when the record must be
/// skipped (no oracle id anywhere, or a malformed field under
/// [`StatPolicy::Strict`](super::StatPolicy::Strict)).
pub fn normalize_card(
    raw: &RawCard,
    options: &NormalizeOptions,
) -> Result<Normalized<GameplayCard>, NormalizeIssue> {
    let oracle_id = raw
        .oracle_id
        .or_else(|| raw.card_faces.iter().find_map(|f| f.oracle_id))
        .ok_or_else(|| NormalizeIssue::MissingOracleId {
            scryfall_id: raw.id,
            name: raw.name.clone(),
        })?;

    let mut ctx = FieldContext::new(raw.id, options);

    let mut faces = raw
        .card_faces
        .iter()
        .map(|face| normalize_face(&mut ctx, face))
        .collect::<Result<Vec<_>, _>>()?;

    let mana_cost = ctx.mana_cost(raw.mana_cost.as_deref())?;

    let type_line = match raw.type_line.as_deref() {
        Some(line) => TypeLine::parse(line),
        None => {
            let joined = raw
                .card_faces
                .iter()
                .filter_map(|f| f.type_line.as_deref())
                .collect::<Vec<_>>()
                .join(" // ");
            TypeLine::parse(&joined)
        }
    };

    let oracle_text = raw
        .oracle_text
        .clone()
        .or_else(|| raw.card_faces.iter().find_map(|f| f.oracle_text.clone()));

    let colors = match &raw.colors {
        Some(letters) => parse_colors(letters),
        None => faces.iter().fold(Colors::empty(), |acc, f| acc | f.colors),
    };

    let mana_value = raw
        .cmc
        .or_else(|| mana_cost.as_ref().map(|c| c.mana_value()))
        .or_else(|| raw.card_faces.first().and_then(|f| f.cmc))
        .or_else(|| faces.first().and_then(|f| f.mana_cost.as_ref()).map(|c| c.mana_value()))
        .unwrap_or(0.0);

    let first = faces.first();
    let power = stat_or_face(&mut ctx, "power", raw.power.as_deref(), first.and_then(|f| f.power))?;
    let toughness = stat_or_face(
        &mut ctx,
        "toughness",
        raw.toughness.as_deref(),
        first.and_then(|f| f.toughness),
    )?;
    let loyalty = stat_or_face(
        &mut ctx,
        "loyalty",
        raw.loyalty.as_deref(),
        first.and_then(|f| f.loyalty),
    )?;
    let defense = stat_or_face(
        &mut ctx,
        "defense",
        raw.defense.as_deref(),
        first.and_then(|f| f.defense),
    )?;

    let color_indicator = raw.color_indicator.as_deref().map(parse_colors);

    if faces.is_empty() {
        faces.push(GameplayFace {
            name: raw.name.clone(),
            mana_cost: mana_cost.clone(),
            type_line: type_line.clone(),
            oracle_text: oracle_text.clone(),
            colors,
            color_indicator,
            power,
            toughness,
            loyalty,
            defense,
            layout: None,
            oracle_id: None,
        });
    }

    let related = raw
        .all_parts
        .iter()
        .filter(|part| part.id != raw.id)
        .map(|part| RelatedCard {
            id: part.id,
            component: RelatedComponent::parse(&part.component),
            name: part.name.clone(),
            type_line: part.type_line.clone(),
        })
        .collect();

    let mut flags = CardFlags::empty();
    flags.set(CardFlags::RESERVED, raw.reserved);
    flags.set(CardFlags::GAME_CHANGER, raw.game_changer);

    let card = GameplayCard {
        scryfall_id: raw.id,
        oracle_id: Some(oracle_id),
        name: raw.name.clone(),
        layout: raw.layout.as_deref().map(Layout::parse).unwrap_or_default(),
        colors,
        color_identity: parse_colors(&raw.color_identity),
        produced_mana: raw.produced_mana.as_deref().map(parse_colors).unwrap_or_default(),
        mana_cost,
        mana_value,
        type_line,
        oracle_text,
        keywords: raw.keywords.clone(),
        power,
        toughness,
        loyalty,
        defense,
        hand_modifier: raw.hand_modifier.clone(),
        life_modifier: raw.life_modifier.clone(),
        legalities: Legalities::parse(&raw.legalities),
        related,
        flags,
        edhrec_rank: raw.edhrec_rank.filter(|r| *r >= 0),
        penny_rank: raw.penny_rank.filter(|r| *r >= 0),
        faces,
    };

    Ok(ctx.finish(card))
}

/// Normalize one raw record into every oracle-level card it carries.
///
/// A reversible card whose faces have distinct oracle ids yields one card per
/// face, each built from that face alone. Any other record yields the single
/// card of [`normalize_card`].
pub fn normalize_cards(
    raw: &RawCard,
    options: &NormalizeOptions,
) -> Result<Normalized<Vec<GameplayCard>>, NormalizeIssue> {
    let face_records = reversible_faces(raw);
    if face_records.is_empty() {
        let normalized = normalize_card(raw, options)?;
        return Ok(Normalized {
            record: vec![normalized.record],
            issues: normalized.issues,
        });
    }

    let mut cards = Vec::with_capacity(face_records.len());
    let mut issues = Vec::new();
    for record in &face_records {
        let normalized = normalize_card(record, options)?;
        cards.push(normalized.record);
        issues.extend(normalized.issues);
    }
    Ok(Normalized {
        record: cards,
        issues,
    })
}

/// One standalone record per distinct face oracle id, or none when the record
/// is not a reversible card with at least two identities.
fn reversible_faces(raw: &RawCard) -> Vec<RawCard> {
    if raw.layout.as_deref().map(Layout::parse) != Some(Layout::ReversibleCard) {
        return Vec::new();
    }
    let mut seen = Vec::new();
    let faces: Vec<&RawCardFace> = raw
        .card_faces
        .iter()
        .filter(|face| match face.oracle_id {
            Some(id) if !seen.contains(&id) => {
                seen.push(id);
                true
            }
            _ => false,
        })
        .collect();
    if faces.len() < 2 {
        return Vec::new();
    }
    faces.into_iter().map(|face| face_record(raw, face)).collect()
}

fn face_record(raw: &RawCard, face: &RawCardFace) -> RawCard {
    RawCard {
        oracle_id: face.oracle_id,
        name: face.name.clone(),
        layout: face.layout.clone().or_else(|| raw.layout.clone()),
        mana_cost: face.mana_cost.clone(),
        cmc: face.cmc,
        type_line: face.type_line.clone(),
        oracle_text: face.oracle_text.clone(),
        colors: face.colors.clone(),
        color_indicator: face.color_indicator.clone(),
        power: face.power.clone(),
        toughness: face.toughness.clone(),
        loyalty: face.loyalty.clone(),
        defense: face.defense.clone(),
        card_faces: Vec::new(),
        ..raw.clone()
    }
}

fn normalize_face(ctx: &mut FieldContext, face: &RawCardFace) -> Result<GameplayFace, NormalizeIssue> {
    let mana_cost = ctx.mana_cost(face.mana_cost.as_deref())?;
    let colors = match &face.colors {
        Some(letters) => parse_colors(letters),
        None => mana_cost.as_ref().map(|c| c.colors()).unwrap_or_default(),
    };

    Ok(GameplayFace {
        name: face.name.clone(),
        type_line: TypeLine::parse(face.type_line.as_deref().unwrap_or("")),
        oracle_text: face.oracle_text.clone(),
        colors,
        color_indicator: face.color_indicator.as_deref().map(parse_colors),
        power: ctx.stat("power", face.power.as_deref())?,
        toughness: ctx.stat("toughness", face.toughness.as_deref())?,
        loyalty: ctx.stat("loyalty", face.loyalty.as_deref())?,
        defense: ctx.stat("defense", face.defense.as_deref())?,
        layout: face.layout.as_deref().map(Layout::parse),
        oracle_id: face.oracle_id,
        mana_cost,
    })
}

fn stat_or_face(
    ctx: &mut FieldContext,
    field: &'static str,
    raw: Option<&str>,
    face_value: Option<StatValue>,
) -> Result<Option<StatValue>, NormalizeIssue> {
    match raw {
        Some(_) => ctx.stat(field, raw),
        None => Ok(face_value),
    }
}
