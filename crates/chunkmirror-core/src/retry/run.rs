//! Retry loop: run a closure until success or policy says stop.

use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` (given the 1-based attempt number) until it succeeds or the
/// policy says to stop, sleeping on the current thread between attempts.
/// Returns the last error; earlier errors are only logged.
pub fn run_with_retry<T, E, F>(policy: &RetryPolicy, mut f: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_ms = d.as_millis() as u64, error = %e, "retrying");
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
