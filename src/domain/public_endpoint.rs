//! Publicly reachable address of the relay.
//!
//! The address is discovered asynchronously (normally by scanning tunnel
//! output) and resolved exactly once. [`PublicEndpoint`] models it as a
//! one-shot value on top of a [`tokio::sync::watch`] channel: readers can
//! poll it without blocking or await it, and only the first published
//! address sticks.

use std::sync::Arc;

use tokio::sync::watch;

/// One-shot record of the relay's public HTTP address.
#[derive(Debug, Clone)]
pub struct PublicEndpoint {
    sender: Arc<watch::Sender<Option<String>>>,
}

impl PublicEndpoint {
    /// Creates an endpoint record that is not yet resolved.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publishes the public HTTP address.
    ///
    /// Returns `true` if this call resolved the record. Once set, the address
    /// never changes and later calls return `false`.
    pub fn publish(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        self.sender.send_if_modified(move |current| {
            if current.is_some() {
                return false;
            }
            *current = Some(url);
            true
        })
    }

    /// Returns `true` once an address has been published.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Returns the public HTTP address, if known.
    #[must_use]
    pub fn http_url(&self) -> Option<String> {
        self.sender.borrow().clone()
    }

    /// Returns the public WebSocket address, if known.
    ///
    /// Same host as [`Self::http_url`]; a leading `http` becomes `ws`, so
    /// `https://` maps to `wss://`.
    #[must_use]
    pub fn ws_url(&self) -> Option<String> {
        self.http_url().map(|url| to_ws_scheme(&url))
    }

    /// Waits until an address is published and returns it.
    pub async fn wait_ready(&self) -> Option<String> {
        let mut rx = self.sender.subscribe();
        match rx.wait_for(Option::is_some).await {
            Ok(url) => url.clone(),
            Err(_) => None,
        }
    }
}

impl Default for PublicEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

fn to_ws_scheme(url: &str) -> String {
    match url.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => url.to_string(),
    }
}
