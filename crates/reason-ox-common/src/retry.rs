//! Retry with exponential backoff for fallible async operations.
//!
//! [`RetryPolicy::retry`] re-invokes an operation while it fails with an error
//! that reports itself as retryable, sleeping `d, 2d, 4d, ...` between
//! attempts. Errors that are not retryable are handed back after the first
//! attempt.

use std::{
    fmt,
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use backon::{BackoffBuilder, Retryable};
use thiserror::Error;

/// Classifies an error as transient (worth another attempt) or not
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

/// Why a retried operation gave up
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error; `last` is the final one
    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: E,
    },

    /// The operation failed with an error that is not retried
    #[error(transparent)]
    Permanent(E),
}

impl<E> RetryError<E> {
    /// The error returned by the last attempt
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Permanent(err) => err,
        }
    }
}

/// Attempt budget and backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first call; values below 1 are raised to 1.
    pub fn new(max_attempts: usize, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Sleeps taken before attempts `2..=max_attempts`
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        self.build()
    }

    /// Run `operation` until it succeeds, fails permanently or the attempt
    /// budget is spent.
    ///
    /// # Errors
    ///
    /// [`RetryError::Permanent`] for the first non-retryable error,
    /// [`RetryError::Exhausted`] when the last allowed attempt failed with a
    /// retryable one.
    pub async fn retry<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + fmt::Display,
    {
        let attempts = AtomicUsize::new(0);

        let result = (|| {
            attempts.fetch_add(1, Ordering::Relaxed);
            operation()
        })
        .retry(*self)
        .sleep(tokio::time::sleep)
        .when(|err: &E| err.is_retryable())
        .notify(|err: &E, delay: Duration| {
            tracing::warn!(
                attempt = attempts.load(Ordering::Relaxed),
                max_attempts = self.max_attempts,
                ?delay,
                "attempt failed with error: {err}"
            );
        })
        .await;

        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_retryable() => {
                let attempts = attempts.load(Ordering::Relaxed);
                tracing::error!(attempts, "max retry attempts reached: {err}");
                Err(RetryError::Exhausted { attempts, last: err })
            }
            Err(err) => Err(RetryError::Permanent(err)),
        }
    }
}

impl BackoffBuilder for RetryPolicy {
    type Backoff = Doubling;

    fn build(self) -> Doubling {
        Doubling {
            next: self.initial_delay,
            remaining: self.max_attempts - 1,
        }
    }
}

/// Exact `d, 2d, 4d, ...` schedule in integer `Duration` arithmetic,
/// saturating at `Duration::MAX`
#[derive(Debug, Clone, Copy)]
pub struct Doubling {
    next: Duration,
    remaining: usize,
}

impl Iterator for Doubling {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let delay = self.next;
        self.next = delay.saturating_mul(2);
        Some(delay)
    }
}
