//! Retry and backoff policy.
//!
//! Every fetch failure is retryable; the policy only bounds the number of
//! attempts and spaces them with a linear backoff (`step * attempt`).

mod error;
mod policy;
mod run;

pub use error::FetchError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
