//! Configuration types for server synchronization.
//!
//! All configuration is loaded from environment variables with defaults
//! suitable for a relay on the local machine. Lookups go through a closure
//! so tests can supply their own variables.

use std::time::Duration;

use crate::error::SyncError;

/// Complete sync configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Server base URL, without a trailing slash (e.g. `http://127.0.0.1:4000`).
    pub server_url: String,
    /// Path of the entry endpoint outbound messages are posted to.
    pub entry_path: String,
    /// Path of the server-sent event stream.
    pub stream_path: String,
    /// Total deadline for one outbound POST.
    pub request_timeout: Duration,
    /// Deadline for establishing any connection, including the stream.
    pub connect_timeout: Duration,
    /// Retry policy for outbound forwarding.
    pub retry: RetryPolicy,
}

/// Retry policy for a single outbound entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure. Zero disables retries.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// No retries at all.
    pub const NONE: Self = Self {
        max_retries: 0,
        backoff: Duration::from_millis(500),
    };

    /// Delay before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff.saturating_mul(2_u32.saturating_pow(retry))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:4000".to_owned(),
            entry_path: "/entry".to_owned(),
            stream_path: "/sse".to_owned(),
            request_timeout: Duration::from_millis(10_000),
            connect_timeout: Duration::from_millis(5_000),
            retry: RetryPolicy::NONE,
        }
    }
}

impl SyncConfig {
    /// Config pointing at a server, everything else defaulted.
    pub fn for_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `CARDO_SERVER_URL` -- server base URL (default `http://127.0.0.1:4000`)
    /// - `CARDO_ENTRY_PATH` -- entry endpoint path (default `/entry`)
    /// - `CARDO_STREAM_PATH` -- event stream path (default `/sse`)
    /// - `CARDO_REQUEST_TIMEOUT_MS` -- POST deadline (default 10000)
    /// - `CARDO_CONNECT_TIMEOUT_MS` -- connect deadline (default 5000)
    /// - `CARDO_OUTBOUND_MAX_RETRIES` -- outbound retries (default 0)
    /// - `CARDO_OUTBOUND_BACKOFF_MS` -- first retry delay (default 500)
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_url = lookup("CARDO_SERVER_URL").unwrap_or(defaults.server_url);
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "CARDO_SERVER_URL must be an http(s) URL, got {server_url}"
            )));
        }

        let entry_path = path_var(&lookup, "CARDO_ENTRY_PATH", defaults.entry_path)?;
        let stream_path = path_var(&lookup, "CARDO_STREAM_PATH", defaults.stream_path)?;

        let request_timeout_ms: u64 = parse_var(&lookup, "CARDO_REQUEST_TIMEOUT_MS", 10_000)?;
        let connect_timeout_ms: u64 = parse_var(&lookup, "CARDO_CONNECT_TIMEOUT_MS", 5_000)?;
        let max_retries: u32 = parse_var(&lookup, "CARDO_OUTBOUND_MAX_RETRIES", 0)?;
        let backoff_ms: u64 = parse_var(&lookup, "CARDO_OUTBOUND_BACKOFF_MS", 500)?;

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
            entry_path,
            stream_path,
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            retry: RetryPolicy {
                max_retries,
                backoff: Duration::from_millis(backoff_ms),
            },
        })
    }

    /// Full URL of the entry endpoint.
    pub fn entry_url(&self) -> String {
        format!("{}{}", self.server_url, self.entry_path)
    }

    /// Full URL of the event stream.
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.server_url, self.stream_path)
    }
}

/// Read an optional variable and parse it, falling back to `default`.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, SyncError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| SyncError::Config(format!("invalid {name}: {e}"))),
        None => Ok(default),
    }
}

/// Read an optional path variable; it must start with `/`.
fn path_var<F>(lookup: &F, name: &str, default: String) -> Result<String, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = lookup(name).unwrap_or(default);
    if path.starts_with('/') {
        Ok(path)
    } else {
        Err(SyncError::Config(format!("{name} must start with '/', got {path}")))
    }
}
