//! Property-based tests

mod message_proptest;
mod route_proptest;
