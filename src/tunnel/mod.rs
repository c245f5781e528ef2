//! Public endpoint exposer.
//!
//! Makes the relay reachable from outside the local network by opening an
//! outbound tunnel and discovering the address the tunnel service assigns.
//! The discovered address is published once to a
//! [`crate::domain::PublicEndpoint`].

pub mod process;
pub mod scanner;

pub use process::{TunnelHandle, spawn_tunnel};
pub use scanner::UrlScanner;

use crate::config::ExposureConfig;
use crate::domain::PublicEndpoint;
use crate::error::RelayError;

/// Applies the configured exposure strategy for a relay bound to `port`.
///
/// Returns the tunnel handle when a tunnel was started. The caller must keep
/// it alive for as long as the relay should stay reachable.
///
/// # Errors
///
/// Returns [`RelayError::Tunnel`] if the tunnel cannot be started. Callers
/// treat this as fatal.
pub fn expose(
    config: &ExposureConfig,
    port: u16,
    endpoint: &PublicEndpoint,
) -> Result<Option<TunnelHandle>, RelayError> {
    match config {
        ExposureConfig::Tunnel(tunnel) => Ok(Some(spawn_tunnel(tunnel, port, endpoint.clone())?)),
        ExposureConfig::Fixed(url) => {
            if endpoint.publish(url.clone()) {
                tracing::info!(%url, "using fixed public URL");
            }
            Ok(None)
        }
        ExposureConfig::Disabled => {
            tracing::info!("public exposure disabled; discovery endpoints will report not ready");
            Ok(None)
        }
    }
}
