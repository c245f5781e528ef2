//! Service layer: relay orchestration.
//!
//! [`RelayService`] sits between the HTTP/WebSocket handlers and the
//! [`super::domain::TransactionRegistry`].

pub mod relay_service;

pub use relay_service::RelayService;
