//! Card blob encoder/decoder tests.
#![recursion_limit = "256"]

mod common;

use common::*;
use scryfall_store::blob::{encode_card_blob, BlobLookup, CardBlobReader};
use scryfall_store::models::{CardFlags, GameplayCard};
use scryfall_store::StoreError;
use uuid::Uuid;

fn sample_cards() -> Vec<GameplayCard> {
    vec![card(bolt()), card(delver()), card(tarmogoyf()), card(reversible())]
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn every_card_round_trips() {
    let cards = sample_cards();
    let reader = CardBlobReader::from_bytes(encode_card_blob(&cards).unwrap()).unwrap();

    assert_eq!(reader.len(), cards.len());
    for card in &cards {
        let oracle_id = card.oracle_id.unwrap();
        assert!(reader.contains(&oracle_id));
        assert_eq!(reader.fetch(&oracle_id).unwrap().as_ref(), Some(card));
    }
}

#[test]
fn empty_lists_round_trip() {
    let card = card(bolt());
    assert!(card.keywords.is_empty());
    assert!(card.related.is_empty());
    assert!(card.type_line.subtypes.is_empty());

    let reader = CardBlobReader::from_bytes(encode_card_blob(&[card.clone()]).unwrap()).unwrap();
    let decoded = reader.fetch(&uuid(BOLT_ORACLE)).unwrap().unwrap();
    assert_eq!(decoded, card);
}

#[test]
fn flags_and_ranks_round_trip() {
    let mut card = card(tarmogoyf());
    card.flags = CardFlags::RESERVED | CardFlags::GAME_CHANGER;
    card.edhrec_rank = Some(0);

    let reader = CardBlobReader::from_bytes(encode_card_blob(&[card.clone()]).unwrap()).unwrap();
    let decoded = reader.fetch(&uuid(GOYF_ORACLE)).unwrap().unwrap();
    assert!(decoded.is_reserved());
    assert!(decoded.is_game_changer());
    assert_eq!(decoded.edhrec_rank, Some(0));
    assert_eq!(decoded.penny_rank, Some(1200));
}

#[test]
fn empty_blob() {
    let reader = CardBlobReader::from_bytes(encode_card_blob(&[]).unwrap()).unwrap();
    assert!(reader.is_empty());
    assert!(reader.keys().is_empty());
    assert_eq!(reader.fetch(&uuid(BOLT_ORACLE)).unwrap(), None);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn encoding_ignores_input_order() {
    let cards = sample_cards();
    let mut reversed = cards.clone();
    reversed.reverse();
    assert_eq!(encode_card_blob(&cards).unwrap(), encode_card_blob(&reversed).unwrap());
}

#[test]
fn re_encoding_decoded_cards_is_byte_identical() {
    let bytes = encode_card_blob(&sample_cards()).unwrap();
    let reader = CardBlobReader::from_bytes(bytes.clone()).unwrap();
    let decoded: Vec<GameplayCard> = reader.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(encode_card_blob(&decoded).unwrap(), bytes);
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[test]
fn unknown_key_is_not_found() {
    let reader = CardBlobReader::from_bytes(encode_card_blob(&sample_cards()).unwrap()).unwrap();
    let unknown = Uuid::from_u128(42);
    assert!(!reader.contains(&unknown));
    assert_eq!(reader.fetch(&unknown).unwrap(), None);
    // printing ids are not card keys
    assert_eq!(reader.fetch(&uuid(BOLT_A25)).unwrap(), None);
}

#[test]
fn batch_fetch_skips_misses_and_keeps_order() {
    let reader = CardBlobReader::from_bytes(encode_card_blob(&sample_cards()).unwrap()).unwrap();
    let cards = reader
        .fetch_batch(&[uuid(GOYF_ORACLE), Uuid::from_u128(7), uuid(BOLT_ORACLE)])
        .unwrap();
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Tarmogoyf", "Lightning Bolt"]);
}

#[test]
fn keys_are_sorted() {
    let reader = CardBlobReader::from_bytes(encode_card_blob(&sample_cards()).unwrap()).unwrap();
    let keys = reader.keys();
    assert_eq!(keys.len(), 4);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn catalogs_hold_shared_words() {
    let reader = CardBlobReader::from_bytes(encode_card_blob(&sample_cards()).unwrap()).unwrap();
    assert_eq!(reader.keywords(), &["Flying".to_string(), "Transform".to_string()]);
    let words = reader.type_words();
    for word in ["Creature", "Instant", "Legendary", "Human", "Lhurgoyf"] {
        assert_eq!(words.iter().filter(|w| *w == word).count(), 1, "{}", word);
    }
}

// ---------------------------------------------------------------------------
// Encoding errors
// ---------------------------------------------------------------------------

#[test]
fn duplicate_oracle_ids_are_rejected() {
    let err = encode_card_blob(&[card(bolt()), card(bolt_japanese())]).unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
}

#[test]
fn card_without_oracle_id_is_rejected() {
    let mut card = card(bolt());
    card.oracle_id = None;
    assert!(matches!(
        encode_card_blob(&[card]),
        Err(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn card_without_faces_is_rejected() {
    let mut card = card(bolt());
    card.faces.clear();
    assert!(matches!(
        encode_card_blob(&[card]),
        Err(StoreError::InvalidArgument(_))
    ));
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

#[test]
fn flipped_magic_byte_is_structural() {
    let mut bytes = encode_card_blob(&sample_cards()).unwrap();
    bytes[0] ^= 0xFF;
    let err = CardBlobReader::from_bytes(bytes).unwrap_err();
    assert!(matches!(err, StoreError::BadMagic { .. }));
    assert!(err.is_structural());
}

#[test]
fn unknown_version_is_rejected() {
    let mut bytes = encode_card_blob(&sample_cards()).unwrap();
    bytes[4] = 9;
    let err = CardBlobReader::from_bytes(bytes).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedVersion { found: 9, .. }));
}

#[test]
fn truncated_header_is_corrupt() {
    let bytes = encode_card_blob(&sample_cards()).unwrap();
    let err = CardBlobReader::from_bytes(bytes[..10].to_vec()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn truncated_record_is_corrupt_on_fetch() {
    let mut bytes = encode_card_blob(&sample_cards()).unwrap();
    bytes.truncate(bytes.len() - 5);
    let reader = CardBlobReader::from_bytes(bytes).unwrap();
    let last = *reader.keys().last().unwrap();
    let err = reader.fetch(&last).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn index_key_mismatch_is_corrupt_on_fetch() {
    let mut bytes = encode_card_blob(&sample_cards()).unwrap();
    // the last index entry holds the largest key; raising its first byte keeps the order
    let last_entry = 16 + 3 * 20;
    bytes[last_entry] = 0xFF;
    let mut key = [0u8; 16];
    key.copy_from_slice(&bytes[last_entry..last_entry + 16]);

    let reader = CardBlobReader::from_bytes(bytes).unwrap();
    let err = reader.fetch(&Uuid::from_bytes(key)).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn printing_blob_is_not_a_card_blob() {
    let printings = scryfall_store::blob::encode_printing_blob(&[printing(bolt())]).unwrap();
    assert!(matches!(
        CardBlobReader::from_bytes(printings),
        Err(StoreError::BadMagic { .. })
    ));
}

#[test]
fn oversized_record_count_is_corrupt() {
    let mut bytes = encode_card_blob(&sample_cards()).unwrap();
    bytes[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = CardBlobReader::from_bytes(bytes).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert!(err.is_structural());
}

#[test]
fn record_count_past_the_index_is_corrupt() {
    let mut bytes = encode_card_blob(&sample_cards()).unwrap();
    bytes[8..12].copy_from_slice(&5u32.to_le_bytes());
    let err = CardBlobReader::from_bytes(bytes).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}
