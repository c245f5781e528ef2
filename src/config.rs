//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::RelayError;

/// Default pattern matching the address announced by `serveo.net`.
pub const DEFAULT_URL_PATTERN: &str = r"https?://[a-zA-Z0-9-]+\.serveo\.net";

/// Default tunnel arguments. `{port}` is replaced with the bound port.
pub const DEFAULT_TUNNEL_ARGS: &str = "-R 80:localhost:{port} serveo.net";

const PORT_PLACEHOLDER: &str = "{port}";

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP/WebSocket server to.
    pub listen_addr: SocketAddr,

    /// Directory served as static assets.
    pub static_dir: PathBuf,

    /// Timeout applied to plain HTTP requests, in seconds.
    pub request_timeout_secs: u64,

    /// How the relay obtains its public address.
    pub exposure: ExposureConfig,
}

/// Strategy for discovering the relay's public address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExposureConfig {
    /// Spawn an outbound tunnel and scan its output for the address.
    Tunnel(TunnelConfig),
    /// Use a fixed, externally provisioned address.
    Fixed(String),
    /// Do not expose the relay; discovery calls stay "not ready".
    Disabled,
}

/// Settings for the tunnel process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelConfig {
    /// Program to execute (e.g. `ssh`).
    pub program: String,
    /// Argument template; `{port}` is substituted at spawn time.
    pub args: Vec<String>,
    /// Regular expression matching the announced public address.
    pub url_pattern: String,
}

impl TunnelConfig {
    /// Returns the arguments with the local port substituted.
    #[must_use]
    pub fn args_for_port(&self, port: u16) -> Vec<String> {
        let port = port.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace(PORT_PLACEHOLDER, &port))
            .collect()
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            args: split_args(DEFAULT_TUNNEL_ARGS),
            url_pattern: DEFAULT_URL_PATTERN.to_string(),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` is set but cannot be
    /// parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `lookup` returns the value of a variable, or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr_raw = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:4000".to_string());
        let listen_addr: SocketAddr = listen_addr_raw
            .parse()
            .map_err(|e| RelayError::Config(format!("LISTEN_ADDR `{listen_addr_raw}`: {e}")))?;

        let static_dir = PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()));
        let request_timeout_secs = parse_var(lookup("REQUEST_TIMEOUT_SECS"), 30);

        let exposure = match lookup("PUBLIC_URL").filter(|v| !v.is_empty()) {
            Some(url) => ExposureConfig::Fixed(url),
            None if !parse_bool(lookup("TUNNEL_ENABLED").as_deref(), true) => {
                ExposureConfig::Disabled
            }
            None => ExposureConfig::Tunnel(TunnelConfig {
                program: lookup("TUNNEL_COMMAND").unwrap_or_else(|| "ssh".to_string()),
                args: split_args(
                    &lookup("TUNNEL_ARGS").unwrap_or_else(|| DEFAULT_TUNNEL_ARGS.to_string()),
                ),
                url_pattern: lookup("TUNNEL_URL_PATTERN")
                    .unwrap_or_else(|| DEFAULT_URL_PATTERN.to_string()),
            }),
        };

        Ok(Self {
            listen_addr,
            static_dir,
            request_timeout_secs,
            exposure,
        })
    }
}

fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Parses a variable value as `T`, returning `default` on missing or
/// invalid values.
fn parse_var<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
