//! libcurl-backed transport with a reused Easy handle.

use std::time::Duration;

use super::Transport;
use crate::retry::FetchError;

/// Explicit HTTP settings shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Upper bound on one attempt, transfer included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(15),
        }
    }
}

/// One curl Easy handle; connections are kept alive between requests.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub struct CurlTransport {
    easy: curl::easy::Easy,
}

impl CurlTransport {
    pub fn new(opts: &HttpOptions) -> Result<Self, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.useragent(&opts.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(opts.connect_timeout)?;
        easy.timeout(opts.timeout)?;
        easy.accept_encoding("")?;
        Ok(Self { easy })
    }
}

impl Transport for CurlTransport {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        self.easy.url(url)?;
        self.easy.get(true)?;
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http { status: code });
        }
        Ok(body)
    }
}
