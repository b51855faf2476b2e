//! Retrying HTTP GET.
//!
//! A [`Transport`] performs one attempt; [`Fetcher`] wraps it with the
//! retry policy. Each fetch worker owns its own fetcher, so there is no
//! shared session state between workers.

mod curl_transport;

pub use curl_transport::{CurlTransport, HttpOptions};

use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// One GET attempt returning the full response body.
pub trait Transport {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url)
    }
}

/// Creates one transport per fetch worker.
pub trait TransportFactory: Send + Sync + 'static {
    type Transport: Transport;

    fn make_transport(&self) -> Result<Self::Transport, FetchError>;
}

impl TransportFactory for HttpOptions {
    type Transport = CurlTransport;

    fn make_transport(&self) -> Result<CurlTransport, FetchError> {
        CurlTransport::new(self)
    }
}

/// Transport plus retry policy.
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl Fetcher<CurlTransport> {
    /// Fetcher backed by a fresh curl handle.
    pub fn curl(opts: &HttpOptions, policy: RetryPolicy) -> Result<Self, FetchError> {
        Ok(Self::new(CurlTransport::new(opts)?, policy))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// GET `url`, retrying per policy. Returns the body of the first
    /// successful attempt or the error of the last failed one.
    pub fn fetch(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        let policy = self.policy;
        let transport = &mut self.transport;
        run_with_retry(&policy, |attempt| {
            transport.get(url).inspect_err(|e| {
                tracing::warn!(url, attempt, max_attempts = policy.max_attempts, error = %e, "fetch attempt failed");
            })
        })
    }
}
