//! Reusable retry combinator with exponential backoff and jitter, taking a
//! predicate over error kinds so callers decide what counts as transient.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

/// Run `op`, retrying up to `config.max_retries` times while `is_transient`
/// holds for the error. Delays grow exponentially, capped at `max_delay`,
/// with each sleep jittered to between half and the full computed delay so
/// concurrent retriers do not thunder in lockstep.
pub async fn retry_if<F, Fut, T, E, P>(config: &RetryConfig, mut op: F, is_transient: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0usize;
    let mut delay = config.initial_delay;

    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempt += 1;
                if attempt > config.max_retries || !is_transient(&e) {
                    return Err(e);
                }
                let jittered = delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0));
                warn!(%e, attempt, ?jittered, "transient failure, retrying");
                tokio::time::sleep(jittered).await;
                delay = Duration::from_millis(
                    ((delay.as_millis() as f64) * config.multiplier)
                        .min(config.max_delay.as_millis() as f64) as u64,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicUsize::new(0);
        let result = retry_if(
            &fast_config(),
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("transient")
                    } else {
                        Ok(42)
                    }
                }
            },
            |_| true,
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = retry_if(
            &fast_config(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("always") }
            },
            |_| true,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4); // initial try + 3 retries
    }

    #[tokio::test]
    async fn non_transient_errors_fail_immediately() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = retry_if(
            &fast_config(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("fatal") }
            },
            |e: &&str| *e != "fatal",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
