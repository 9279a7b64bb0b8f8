/*!
 * Tests for caption track discovery
 */

use std::sync::Arc;
use std::time::Duration;

use yttranscript::discovery::TrackDiscovery;
use yttranscript::errors::{ErrorKind, ProviderError, TranscriptError};
use yttranscript::video_id::VideoId;

use crate::common::example_tracks;
use crate::common::mock_providers::MockCaptionProvider;

fn video() -> VideoId {
    VideoId::parse("abc123XYZ9").unwrap()
}

#[tokio::test]
async fn test_discover_withTracks_shouldReturnThemInOrder() {
    let provider = Arc::new(MockCaptionProvider::new(example_tracks(), ""));
    let discovery = TrackDiscovery::new(provider.clone(), Duration::from_secs(1));

    let tracks = discovery.discover(&video()).await.unwrap();

    assert_eq!(tracks, example_tracks());
    assert_eq!(provider.list_calls(), 1);
}

#[tokio::test]
async fn test_discover_withZeroTracks_shouldReportNoCaptions() {
    let provider = Arc::new(MockCaptionProvider::new(vec![], ""));
    let discovery = TrackDiscovery::new(provider, Duration::from_secs(1));

    let error = discovery.discover(&video()).await.unwrap_err();
    assert_eq!(
        error,
        TranscriptError::NoCaptionsAvailable {
            video_id: "abc123XYZ9".to_string()
        }
    );
}

#[tokio::test]
async fn test_discover_withConnectionError_shouldReportUpstreamUnavailableWithoutRetry() {
    let provider = Arc::new(MockCaptionProvider::failing_listing(ProviderError::ConnectionError(
        "refused".to_string(),
    )));
    let discovery = TrackDiscovery::new(provider.clone(), Duration::from_secs(1));

    let error = discovery.discover(&video()).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UpstreamUnavailable);
    assert_eq!(provider.list_calls(), 1);
}

#[tokio::test]
async fn test_discover_withUnplayableVideo_shouldReportUpstreamUnavailable() {
    let provider = Arc::new(MockCaptionProvider::failing_listing(ProviderError::Unplayable(
        "LOGIN_REQUIRED".to_string(),
    )));
    let discovery = TrackDiscovery::new(provider, Duration::from_secs(1));

    let error = discovery.discover(&video()).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UpstreamUnavailable);
    assert!(error.to_string().contains("LOGIN_REQUIRED"));
}

#[tokio::test]
async fn test_discover_withThrottledListing_shouldReportRateLimited() {
    let provider = Arc::new(MockCaptionProvider::failing_listing(ProviderError::RateLimitExceeded {
        message: "too many requests".to_string(),
        retry_after_secs: Some(12),
    }));
    let discovery = TrackDiscovery::new(provider, Duration::from_secs(1));

    let error = discovery.discover(&video()).await.unwrap_err();
    assert_eq!(error, TranscriptError::RateLimited { retry_after_secs: Some(12) });
}
