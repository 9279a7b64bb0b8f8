use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::app_config::UpstreamConfig;
use crate::errors::ProviderError;
use crate::providers::CaptionProvider;
use crate::transcript::{CaptionTrack, TrackFormat};
use crate::video_id::VideoId;

/// Referer sent along with player requests
const REFERER: &str = "https://www.youtube.com/";

/// Player API response, reduced to the fields used for track discovery
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<PlayerCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptionTrack {
    base_url: String,
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.first().map(|r| r.text.clone()))
    }
}

/// Caption provider backed by the YouTube player API
#[derive(Debug, Clone)]
pub struct YouTubeProvider {
    /// HTTP client for making requests
    client: Client,
    /// Player endpoint used for track listing
    player_endpoint: String,
    /// Client name reported in the request context
    client_name: String,
    /// Client version reported in the request context
    client_version: String,
    /// Format requested for every track payload
    format: TrackFormat,
    /// Request timeout, reported back in timeout errors
    timeout: Duration,
}

impl YouTubeProvider {
    /// Create a new provider from the upstream settings
    pub fn new(
        upstream: &UpstreamConfig,
        format: TrackFormat,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
        let accept_language = HeaderValue::from_str(&upstream.accept_language)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Accept-Language header: {}", e)))?;
        headers.insert(header::ACCEPT_LANGUAGE, accept_language);

        let client = Client::builder()
            .user_agent(upstream.user_agent.clone())
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            player_endpoint: upstream.player_endpoint.clone(),
            client_name: upstream.client_name.clone(),
            client_version: upstream.client_version.clone(),
            format,
            timeout,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout.as_millis() as u64)
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }

    /// Turn a non-success status into the matching provider error
    async fn status_error(&self, response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let retry_after_secs = retry_after(response.headers());
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Caption host throttled request ({}), retry after {:?}s", status, retry_after_secs);
            return ProviderError::RateLimitExceeded {
                message: truncate(&message, 200),
                retry_after_secs,
            };
        }

        error!("Caption host error ({}): {}", status, truncate(&message, 200));
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message: truncate(&message, 500),
        }
    }

    fn convert_tracks(&self, tracks: Vec<PlayerCaptionTrack>) -> Vec<CaptionTrack> {
        tracks
            .into_iter()
            .map(|t| {
                let name = t
                    .name
                    .as_ref()
                    .and_then(TrackName::text)
                    .unwrap_or_else(|| t.language_code.clone());
                let auto_generated = t.kind.as_deref() == Some("asr");

                CaptionTrack::new(
                    t.language_code,
                    name,
                    self.format,
                    auto_generated,
                    strip_format_param(&t.base_url),
                )
            })
            .collect()
    }
}

#[async_trait]
impl CaptionProvider for YouTubeProvider {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, ProviderError> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": self.client_name,
                    "clientVersion": self.client_version,
                }
            },
            "videoId": video_id.as_str(),
        });

        debug!("Requesting caption tracks for {} from {}", video_id, self.player_endpoint);

        let response = self
            .client
            .post(&self.player_endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(self.status_error(response).await);
        }

        let player: PlayerResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid player response: {}", e)))?;

        let tracks = player
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|r| r.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            if let Some(status) = player.playability_status {
                let state = status.status.unwrap_or_default();
                if !state.is_empty() && state != "OK" {
                    let reason = status.reason.unwrap_or_default();
                    return Err(ProviderError::Unplayable(format!("{} {}", state, reason).trim().to_string()));
                }
            }
        }

        Ok(self.convert_tracks(tracks))
    }

    async fn download(&self, track: &CaptionTrack) -> Result<String, ProviderError> {
        let url = payload_url(track)?;
        debug!("Downloading {} track from {}", track, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(self.status_error(response).await);
        }

        response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))
    }
}

/// Drop any `fmt` parameter the host put on a track locator
pub(crate) fn strip_format_param(base_url: &str) -> String {
    let mut url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => return base_url.replace("&fmt=srv3", ""),
    };

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}

/// Locator of a track payload in the track's requested format
pub(crate) fn payload_url(track: &CaptionTrack) -> Result<Url, ProviderError> {
    let mut url = Url::parse(&track.base_url)
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid track URL '{}': {}", track.base_url, e)))?;

    if let Some(fmt) = track.format.query_value() {
        url.query_pairs_mut().append_pair("fmt", fmt);
    }

    Ok(url)
}

fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect()
    } else {
        text.to_string()
    }
}
