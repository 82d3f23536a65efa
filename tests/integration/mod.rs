//! Integration tests against a full app

mod rest_test;
mod ws_test;
