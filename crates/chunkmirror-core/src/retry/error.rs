//! Single-attempt fetch error.

use thiserror::Error;

/// Error from one HTTP attempt. The retry loop surfaces the last one.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u32 },
    /// Failure reported by a non-curl transport.
    #[error("transport: {0}")]
    Transport(String),
}
