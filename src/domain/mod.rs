//! Domain layer: identifiers, result messages, the transaction registry,
//! and the public endpoint record.
//!
//! Everything here is in-memory and scoped to the process lifetime.

pub mod connection_handle;
pub mod connection_id;
pub mod payment_outcome;
pub mod public_endpoint;
pub mod transaction_id;
pub mod transaction_registry;

pub use connection_handle::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use payment_outcome::{PaymentOutcome, ResultMessage};
pub use public_endpoint::PublicEndpoint;
pub use transaction_id::TransactionId;
pub use transaction_registry::{Delivery, TransactionRegistry};
