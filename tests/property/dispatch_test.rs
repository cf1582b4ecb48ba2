// tests/property/dispatch_test.rs

//! Property-based tests for request classification.

use crate::test_helpers::producer_at;
use hoststat::connection::dispatch;
use hoststat::core::{Reply, Request};
use proptest::prelude::*;

const COMMAND: &str = "GET_DATA";

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_anything_but_the_command_gets_the_error_reply(
        payload in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        let is_command = std::str::from_utf8(&payload)
            .map(|text| text.trim() == COMMAND)
            .unwrap_or(false);
        prop_assume!(!is_command);

        let producer = producer_at(12, 7, 30);
        let reply = dispatch(&Request::new(payload), COMMAND, &producer);
        prop_assert_eq!(reply, Reply::invalid_request(COMMAND));
    }

    #[test]
    fn test_command_matches_with_surrounding_whitespace(
        leading in "[ \t\r\n]{0,8}",
        trailing in "[ \t\r\n]{0,8}",
    ) {
        let producer = producer_at(12, 7, 30);
        let request = Request::new(format!("{leading}{COMMAND}{trailing}"));
        let reply = dispatch(&request, COMMAND, &producer);
        prop_assert!(!reply.is_error());
    }

    #[test]
    fn test_error_reply_has_only_the_error_key(command in "[A-Z_]{1,16}") {
        let value = serde_json::to_value(Reply::invalid_request(&command)).unwrap();
        let object = value.as_object().unwrap();
        prop_assert_eq!(object.len(), 1);
        prop_assert_eq!(
            object["error"].as_str().unwrap(),
            format!("Invalid request. Expected '{command}'.")
        );
    }
}
