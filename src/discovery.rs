/*!
 * Caption track discovery.
 *
 * One listing request per call, bounded by the configured timeout and never
 * retried. Provider failures are folded into the transcript error taxonomy.
 */

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ProviderError, TranscriptError};
use crate::providers::CaptionProvider;
use crate::transcript::CaptionTrack;
use crate::video_id::VideoId;

/// Lists the caption tracks of a video through a provider
#[derive(Debug, Clone)]
pub struct TrackDiscovery {
    provider: Arc<dyn CaptionProvider>,
    timeout: Duration,
}

impl TrackDiscovery {
    pub fn new(provider: Arc<dyn CaptionProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Discover the caption tracks of a video
    ///
    /// Returns the tracks in upstream order. Zero tracks is reported as
    /// `NoCaptionsAvailable`, a throttled listing as `RateLimited` and every
    /// other upstream failure as `UpstreamUnavailable`.
    pub async fn discover(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let outcome = tokio::time::timeout(self.timeout, self.provider.list_tracks(video_id)).await;

        let tracks = match outcome {
            Ok(Ok(tracks)) => tracks,
            Ok(Err(e)) => return Err(listing_error(video_id, e)),
            Err(_) => {
                warn!("Track listing for {} timed out after {:?}", video_id, self.timeout);
                return Err(TranscriptError::UpstreamUnavailable(format!(
                    "track listing timed out after {} ms",
                    self.timeout.as_millis()
                )));
            }
        };

        if tracks.is_empty() {
            debug!("No caption tracks listed for {}", video_id);
            return Err(TranscriptError::NoCaptionsAvailable {
                video_id: video_id.to_string(),
            });
        }

        debug!("Found {} caption track(s) for {}", tracks.len(), video_id);
        Ok(tracks)
    }
}

fn listing_error(video_id: &VideoId, error: ProviderError) -> TranscriptError {
    warn!("Track listing for {} failed: {}", video_id, error);
    match error {
        ProviderError::RateLimitExceeded { retry_after_secs, .. } => {
            TranscriptError::RateLimited { retry_after_secs }
        }
        other => TranscriptError::UpstreamUnavailable(other.to_string()),
    }
}
