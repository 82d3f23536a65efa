//! Custom assertion macros
//!
//! Envelope checks for server replies plus a few general helpers.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert that a JSON reply is a successful response to `id`
#[macro_export]
macro_rules! assert_success {
    ($reply:expr, $id:expr) => {
        let reply: &serde_json::Value = &$reply;
        assert_eq!(reply["id"], $id, "wrong correlation id in {}", reply);
        assert_eq!(reply["success"], true, "expected success, got {}", reply);
    };
}

/// Assert that a JSON reply is a failed response to `id` with a fixed message
#[macro_export]
macro_rules! assert_failure {
    ($reply:expr, $id:expr, $message:expr) => {
        let reply: &serde_json::Value = &$reply;
        assert_eq!(
            reply,
            &serde_json::json!({"id": $id, "success": false, "message": $message}),
            "unexpected reply"
        );
    };
}
