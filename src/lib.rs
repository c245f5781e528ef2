//! # checkout-relay
//!
//! HTTP and WebSocket relay that pairs a browser checkout session with an
//! external payment confirmation.
//!
//! A checkout page opens a WebSocket and registers a transaction id. Later
//! an external confirmation source (e.g. a mobile payment simulator) calls
//! `POST /api/confirm-payment`, and the relay pushes `payment_success` or
//! `payment_cancelled` to the registered socket. The relay makes itself
//! reachable through an outbound tunnel and serves the discovered public
//! address to clients.
//!
//! ## Architecture
//!
//! ```text
//! Checkout page (WebSocket)     Confirmation source (HTTP)
//!     │                               │
//!     ├── WS Handler (ws/)            ├── REST Handlers (api/)
//!     │                               │
//!     └──────────── RelayService (service/)
//!                        │
//!          ├── TransactionRegistry (domain/)
//!          └── PublicEndpoint (domain/) ◄── Tunnel (tunnel/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod tunnel;
pub mod ws;
