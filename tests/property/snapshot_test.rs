// tests/property/snapshot_test.rs

//! Property-based tests for snapshot invariants across the whole clock face.

use crate::test_helpers::{STATUS_FIELDS, producer_at};
use hoststat::core::info::Character;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_minute_parity_selects_character(
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let snapshot = producer_at(hour, minute, second).snapshot();

        prop_assert_eq!(snapshot.current_minute, minute);
        prop_assert_eq!(snapshot.message, format!("{hour:02}:{minute:02}:{second:02}"));

        let expected = if minute % 2 == 1 { Character::Irene } else { Character::Maeko };
        prop_assert_eq!(snapshot.character_art.as_str(), expected.art());
        prop_assert_eq!(snapshot.character_message.as_str(), expected.message());
    }

    #[test]
    fn test_snapshot_serializes_with_fixed_fields(
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let value = serde_json::to_value(producer_at(hour, minute, 0).snapshot()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        prop_assert_eq!(keys, STATUS_FIELDS.to_vec());
    }
}
