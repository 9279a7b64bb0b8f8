/*!
 * Tests for payload fetching with retry, backoff and timeouts
 */

use std::sync::Arc;
use std::time::Duration;

use yttranscript::errors::{ProviderError, TranscriptError};
use yttranscript::fetcher::{RetryPolicy, TranscriptFetcher};

use crate::common::mock_providers::{MockCaptionProvider, MockResponse};
use crate::common::{init_logging, test_config, track};

fn fetcher_for(provider: &Arc<MockCaptionProvider>) -> TranscriptFetcher {
    TranscriptFetcher::new(provider.clone(), RetryPolicy::from_config(&test_config()))
}

fn server_error() -> ProviderError {
    ProviderError::ApiError {
        status_code: 503,
        message: "unavailable".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withImmediateSuccess_shouldMakeOneAttempt() {
    init_logging();
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    let fetcher = fetcher_for(&provider);

    assert_eq!(fetcher.fetch(&track("en", false)).await.unwrap(), "payload");
    assert_eq!(provider.download_calls(), 1);
    assert_eq!(fetcher.metrics().snapshot().retries, 0);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withTransientFailures_shouldRetryUntilSuccess() {
    init_logging();
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_error(ProviderError::ConnectionError("reset".to_string()));
    provider.push_error(server_error());
    let fetcher = fetcher_for(&provider);

    let started = tokio::time::Instant::now();
    assert_eq!(fetcher.fetch(&track("en", false)).await.unwrap(), "payload");

    assert_eq!(provider.download_calls(), 3);
    let stats = fetcher.metrics().snapshot();
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.failures, 0);

    // backoffs of [50, 100] ms and [100, 200] ms
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(150), "elapsed {:?}", elapsed);
    assert!(elapsed <= Duration::from_millis(300), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withPersistentFailures_shouldStopAfterMaxRetries() {
    init_logging();
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    for _ in 0..5 {
        provider.push_error(server_error());
    }
    let fetcher = fetcher_for(&provider);

    let error = fetcher.fetch(&track("en", false)).await.unwrap_err();

    match error {
        TranscriptError::FetchFailed { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(message.contains("503"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // max_fetch_retries = 2 -> exactly 3 attempts
    assert_eq!(provider.download_calls(), 3);
    assert_eq!(fetcher.metrics().snapshot().failures, 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withZeroRetries_shouldMakeSingleAttempt() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_error(server_error());
    let mut config = test_config();
    config.max_fetch_retries = 0;
    let fetcher = TranscriptFetcher::new(provider.clone(), RetryPolicy::from_config(&config));

    let error = fetcher.fetch(&track("en", false)).await.unwrap_err();
    assert!(matches!(error, TranscriptError::FetchFailed { attempts: 1, .. }));
    assert_eq!(provider.download_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withRateLimit_shouldSurfaceWithoutRetry() {
    init_logging();
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_error(ProviderError::RateLimitExceeded {
        message: "slow down".to_string(),
        retry_after_secs: Some(30),
    });
    let fetcher = fetcher_for(&provider);

    let error = fetcher.fetch(&track("en", false)).await.unwrap_err();

    assert_eq!(error, TranscriptError::RateLimited { retry_after_secs: Some(30) });
    assert_eq!(provider.download_calls(), 1);
    let stats = fetcher.metrics().snapshot();
    assert_eq!(stats.rate_limited, 1);
    assert_eq!(stats.retries, 0);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withRateLimitAfterTransientFailure_shouldStopRetrying() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_error(server_error());
    provider.push_error(ProviderError::RateLimitExceeded {
        message: "slow down".to_string(),
        retry_after_secs: None,
    });
    let fetcher = fetcher_for(&provider);

    let error = fetcher.fetch(&track("en", false)).await.unwrap_err();
    assert_eq!(error, TranscriptError::RateLimited { retry_after_secs: None });
    assert_eq!(provider.download_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withClientError_shouldFailWithoutRetry() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_error(ProviderError::ApiError {
        status_code: 404,
        message: "not found".to_string(),
    });
    let fetcher = fetcher_for(&provider);

    let error = fetcher.fetch(&track("en", false)).await.unwrap_err();
    assert!(matches!(error, TranscriptError::FetchFailed { attempts: 1, .. }));
    assert_eq!(provider.download_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withHangingAttempt_shouldTimeOutAndRetry() {
    init_logging();
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_response(MockResponse::Hang);
    let fetcher = fetcher_for(&provider);

    let started = tokio::time::Instant::now();
    assert_eq!(fetcher.fetch(&track("en", false)).await.unwrap(), "payload");

    assert_eq!(provider.download_calls(), 2);
    assert_eq!(fetcher.metrics().snapshot().timeouts, 1);
    assert!(started.elapsed() >= Duration::from_millis(1_000));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withOnlyTimeouts_shouldFailAfterAllAttempts() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    for _ in 0..3 {
        provider.push_response(MockResponse::Hang);
    }
    let fetcher = fetcher_for(&provider);

    let error = fetcher.fetch(&track("en", false)).await.unwrap_err();
    match error {
        TranscriptError::FetchFailed { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(message.contains("timed out"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fetcher.metrics().snapshot().timeouts, 3);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withClientSideTimeout_shouldCountTimeoutAndRetry() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_error(ProviderError::Timeout(250));
    let fetcher = fetcher_for(&provider);

    assert_eq!(fetcher.fetch(&track("en", false)).await.unwrap(), "payload");

    assert_eq!(provider.download_calls(), 2);
    let stats = fetcher.metrics().snapshot();
    assert_eq!(stats.timeouts, 1);
    assert_eq!(stats.retries, 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_withSlowButTimelyResponse_shouldNotTimeOut() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], "payload"));
    provider.push_response(MockResponse::Delayed(Duration::from_millis(900), "slow".to_string()));
    let fetcher = fetcher_for(&provider);

    assert_eq!(fetcher.fetch(&track("en", false)).await.unwrap(), "slow");
    assert_eq!(fetcher.metrics().snapshot().timeouts, 0);
}

#[test]
fn test_retryPolicy_fromConfig_shouldMirrorSettings() {
    let policy = RetryPolicy::from_config(&test_config());
    assert_eq!(policy.max_retries, 2);
    assert_eq!(policy.max_attempts(), 3);
    assert_eq!(policy.base_backoff, Duration::from_millis(100));
    assert_eq!(policy.max_backoff, Duration::from_millis(400));
    assert_eq!(policy.attempt_timeout, Duration::from_millis(1_000));
}
