/*!
 * Caption provider implementations.
 *
 * A provider performs single-shot calls against a caption host:
 * - listing the caption tracks of a video
 * - downloading the raw payload of one track
 *
 * Timeouts, retries and error classification into `TranscriptError` are
 * applied by the discovery and fetcher layers on top of this trait.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::transcript::CaptionTrack;
use crate::video_id::VideoId;

/// Common trait for all caption providers
///
/// Implementations must not retry on their own; every call maps to exactly
/// one upstream request.
#[async_trait]
pub trait CaptionProvider: Send + Sync + Debug {
    /// List the caption tracks of a video
    ///
    /// # Arguments
    /// * `video_id` - The validated video identifier
    ///
    /// # Returns
    /// * `Result<Vec<CaptionTrack>, ProviderError>` - Tracks in upstream order, possibly empty
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, ProviderError>;

    /// Download the raw payload of a track
    ///
    /// # Arguments
    /// * `track` - The track to download
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The payload text in `track.format`
    async fn download(&self, track: &CaptionTrack) -> Result<String, ProviderError>;
}

pub mod youtube;
