#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use reason_ox_common::{RetryError, RetryPolicy, RetryableError};
    use thiserror::Error;
    use tokio::time::Instant;

    #[derive(Debug, Error, PartialEq, Eq)]
    enum TestError {
        #[error("connection reset")]
        Transient,
        #[error("bug in caller")]
        Fatal,
    }

    impl RetryableError for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, TestError::Transient)
        }
    }

    /// Records when each attempt started relative to the test start
    struct Attempts {
        start: Instant,
        calls: AtomicUsize,
        offsets: Mutex<Vec<Duration>>,
    }

    impl Attempts {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                calls: AtomicUsize::new(0),
                offsets: Mutex::new(Vec::new()),
            }
        }

        fn record(&self) -> usize {
            self.offsets.lock().unwrap().push(self.start.elapsed());
            self.calls.fetch_add(1, Ordering::SeqCst) + 1
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn gaps(&self) -> Vec<Duration> {
            let offsets = self.offsets.lock().unwrap();
            offsets.windows(2).map(|w| w[1] - w[0]).collect()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_operation_runs_exactly_max_attempts() {
        for max_attempts in 1..=4 {
            let attempts = Attempts::new();
            let policy = RetryPolicy::new(max_attempts, Duration::from_secs(1));

            let result: Result<(), _> = policy
                .retry(|| {
                    attempts.record();
                    async { Err(TestError::Transient) }
                })
                .await;

            assert_eq!(attempts.calls(), max_attempts);
            match result {
                Err(RetryError::Exhausted { attempts: n, last }) => {
                    assert_eq!(n, max_attempts);
                    assert_eq!(last, TestError::Transient);
                }
                other => panic!("expected Exhausted, got {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_and_does_not_sleep_after_last_attempt() {
        let attempts = Attempts::new();
        let policy = RetryPolicy::new(4, Duration::from_secs(1));

        let result: Result<(), _> = policy
            .retry(|| {
                attempts.record();
                async { Err(TestError::Transient) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 4, .. })));
        assert_eq!(
            attempts.gaps(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        // 1 + 2 + 4; a trailing sleep would have added another 8s
        assert_eq!(attempts.start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_is_exact_for_non_power_of_two_delay() {
        let attempts = Attempts::new();
        let policy = RetryPolicy::new(4, Duration::from_millis(300));

        let result: Result<(), _> = policy
            .retry(|| {
                attempts.record();
                async { Err(TestError::Transient) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 4, .. })));
        assert_eq!(
            attempts.gaps(),
            vec![
                Duration::from_millis(300),
                Duration::from_millis(600),
                Duration::from_millis(1200)
            ]
        );
        assert_eq!(attempts.start.elapsed(), Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_kth_attempt_stops_retrying() {
        let attempts = Attempts::new();
        let policy = RetryPolicy::new(5, Duration::from_secs(1));

        let result = policy
            .retry(|| {
                let n = attempts.record();
                async move {
                    if n < 3 {
                        Err(TestError::Transient)
                    } else {
                        Ok(format!("ok on {n}"))
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok on 3");
        assert_eq!(attempts.calls(), 3);
        assert_eq!(attempts.start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_never_sleeps() {
        let attempts = Attempts::new();
        let policy = RetryPolicy::default();

        let result = policy
            .retry(|| {
                attempts.record();
                async { Ok::<_, TestError>(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.calls(), 1);
        assert_eq!(attempts.start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_is_not_retried() {
        let attempts = Attempts::new();
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        let result: Result<(), _> = policy
            .retry(|| {
                attempts.record();
                async { Err(TestError::Fatal) }
            })
            .await;

        assert_eq!(attempts.calls(), 1);
        assert!(matches!(result, Err(RetryError::Permanent(TestError::Fatal))));
        assert_eq!(attempts.start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_after_transient_ones_stops_immediately() {
        let attempts = Attempts::new();
        let policy = RetryPolicy::new(5, Duration::from_secs(1));

        let result: Result<(), _> = policy
            .retry(|| {
                let n = attempts.record();
                async move {
                    if n == 1 {
                        Err(TestError::Transient)
                    } else {
                        Err(TestError::Fatal)
                    }
                }
            })
            .await;

        assert_eq!(attempts.calls(), 2);
        assert_eq!(result.unwrap_err().into_inner(), TestError::Fatal);
    }

    #[test]
    fn exhausted_error_mentions_attempts_and_cause() {
        let err = RetryError::Exhausted {
            attempts: 3,
            last: TestError::Transient,
        };
        assert_eq!(err.to_string(), "giving up after 3 attempts: connection reset");
        assert_eq!(
            RetryError::Permanent(TestError::Fatal).to_string(),
            "bug in caller"
        );
    }
}
