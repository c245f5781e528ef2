//! WebSocket layer: connection handling and message parsing.
//!
//! The WebSocket channel is served at `/` (upgrade requests only) and at
//! `/ws`. A checkout page registers a transaction id and later receives
//! exactly one result message for it.

pub mod connection;
pub mod handler;
pub mod messages;
