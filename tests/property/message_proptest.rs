//! Property-based tests for client message resolution

use proptest::prelude::*;
use sage3::shared::message::RequestError;
use sage3::shared::{ClientMessage, Method, RouteRequest};

const VERBS: [&str; 6] = ["GET", "POST", "PUT", "DELETE", "SUB", "UNSUB"];

proptest! {
    #[test]
    fn test_unknown_verbs_are_rejected_first(verb in "[A-Z]{1,8}", route in ".*") {
        prop_assume!(!VERBS.contains(&verb.as_str()));
        let message = ClientMessage::new("r", Method::from(verb.clone()), route);
        let error = RouteRequest::from_message(&message).unwrap_err();
        prop_assert_eq!(error.reply_message(), "Invalid method.");
        prop_assert_eq!(error, RequestError::InvalidMethod(verb));
    }

    #[test]
    fn test_unsub_ignores_route(route in ".*") {
        let message = ClientMessage::new("s", Method::Unsub, route);
        prop_assert_eq!(RouteRequest::from_message(&message), Ok(RouteRequest::Unsubscribe));
    }

    #[test]
    fn test_method_decodes_from_wire(verb in prop::sample::select(VERBS.to_vec())) {
        let json = format!(r#"{{"id":"r","method":"{}","route":"/api/users"}}"#, verb);
        let message: ClientMessage = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(message.method.as_str(), verb);
    }
}
