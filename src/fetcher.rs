/*!
 * Transcript payload fetching with bounded retry.
 *
 * Each attempt is bounded by a timeout. Transient failures (connection
 * errors, timeouts, 5xx) are retried with exponential backoff and jitter,
 * throttling is surfaced immediately and any other failure ends the fetch.
 */

use log::{debug, error, warn};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::{ProviderError, TranscriptError};
use crate::providers::CaptionProvider;
use crate::transcript::CaptionTrack;

/// Retry and timeout policy of the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry
    pub base_backoff: Duration,
    /// Upper bound for a single backoff
    pub max_backoff: Duration,
    /// Deadline of a single attempt
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_fetch_retries,
            base_backoff: Duration::from_millis(config.retry_backoff_ms),
            max_backoff: Duration::from_millis(config.max_retry_backoff_ms),
            attempt_timeout: config.fetch_timeout(),
        }
    }

    /// Total number of attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff ceiling before retry number `retry` (1-based), without jitter
    pub fn backoff_ceiling(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(20);
        let delay = self.base_backoff.saturating_mul(1u32 << exponent);
        delay.min(self.max_backoff)
    }

    /// Backoff before retry number `retry`, with equal jitter
    ///
    /// The delay lies in `[ceiling / 2, ceiling]`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let ceiling = self.backoff_ceiling(retry).as_millis() as u64;
        let half = ceiling / 2;
        let jitter = if ceiling > half {
            rand::rng().random_range(0..=ceiling - half)
        } else {
            0
        };
        Duration::from_millis(half + jitter)
    }
}

/// Counters of fetch activity
#[derive(Debug, Default)]
pub struct FetchMetrics {
    attempts: AtomicU64,
    retries: AtomicU64,
    timeouts: AtomicU64,
    rate_limited: AtomicU64,
    failures: AtomicU64,
}

/// Point-in-time copy of `FetchMetrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchStats {
    pub attempts: u64,
    pub retries: u64,
    pub timeouts: u64,
    pub rate_limited: u64,
    pub failures: u64,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FetchStats {
        FetchStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Downloads caption payloads through a provider
#[derive(Debug, Clone)]
pub struct TranscriptFetcher {
    provider: Arc<dyn CaptionProvider>,
    policy: RetryPolicy,
    metrics: Arc<FetchMetrics>,
}

impl TranscriptFetcher {
    pub fn new(provider: Arc<dyn CaptionProvider>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            metrics: Arc::new(FetchMetrics::new()),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn metrics(&self) -> &FetchMetrics {
        &self.metrics
    }

    /// Fetch the raw payload of a track
    pub async fn fetch(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        let max_attempts = self.policy.max_attempts();
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=max_attempts {
            FetchMetrics::incr(&self.metrics.attempts);

            let outcome = tokio::time::timeout(self.policy.attempt_timeout, self.provider.download(track)).await;

            let failure = match outcome {
                Ok(Ok(payload)) => {
                    debug!("Fetched {} bytes for {} on attempt {}/{}", payload.len(), track, attempt, max_attempts);
                    return Ok(payload);
                }
                Ok(Err(ProviderError::RateLimitExceeded { retry_after_secs, message })) => {
                    FetchMetrics::incr(&self.metrics.rate_limited);
                    warn!("Caption download rate limited: {}", message);
                    return Err(TranscriptError::RateLimited { retry_after_secs });
                }
                Ok(Err(e @ ProviderError::Timeout(_))) => {
                    FetchMetrics::incr(&self.metrics.timeouts);
                    e
                }
                Ok(Err(e)) if e.is_transient() => e,
                Ok(Err(e)) => {
                    FetchMetrics::incr(&self.metrics.failures);
                    error!("Caption download failed permanently: {}", e);
                    return Err(TranscriptError::FetchFailed {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
                Err(_) => {
                    FetchMetrics::incr(&self.metrics.timeouts);
                    ProviderError::Timeout(self.policy.attempt_timeout.as_millis() as u64)
                }
            };

            error!("Caption download error: {} - attempt {}/{}", failure, attempt, max_attempts);
            last_error = Some(failure);

            if attempt < max_attempts {
                FetchMetrics::incr(&self.metrics.retries);
                let backoff = self.policy.backoff_delay(attempt);
                debug!("Retrying caption download in {:?}", backoff);
                tokio::time::sleep(backoff).await;
            }
        }

        FetchMetrics::incr(&self.metrics.failures);
        Err(TranscriptError::FetchFailed {
            attempts: max_attempts,
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }
}
