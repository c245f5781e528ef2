//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names follow the checkout frontend's camelCase convention.

pub mod endpoint_dto;
pub mod payment_dto;

pub use endpoint_dto::*;
pub use payment_dto::*;
