/*!
 * Video identifier validation.
 *
 * A `VideoId` can only be built through validation, so holding one means the
 * token has the platform identifier shape. Validation is pure and happens
 * before any network call.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::errors::TranscriptError;

/// Shortest accepted identifier length
pub const MIN_VIDEO_ID_LEN: usize = 10;

/// Longest accepted identifier length (the canonical platform length)
pub const MAX_VIDEO_ID_LEN: usize = 11;

/// A validated video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate a raw identifier
    ///
    /// Surrounding whitespace is trimmed. The remaining token must be 10 or 11
    /// characters of ASCII letters, digits, `-` or `_`.
    pub fn parse(raw: &str) -> Result<Self, TranscriptError> {
        let candidate = raw.trim();

        if candidate.is_empty() {
            return Err(TranscriptError::invalid_identifier(raw, "identifier is empty"));
        }

        let len = candidate.chars().count();
        if !(MIN_VIDEO_ID_LEN..=MAX_VIDEO_ID_LEN).contains(&len) {
            return Err(TranscriptError::invalid_identifier(
                raw,
                format!(
                    "expected {} to {} characters, got {}",
                    MIN_VIDEO_ID_LEN, MAX_VIDEO_ID_LEN, len
                ),
            ));
        }

        if let Some(bad) = candidate.chars().find(|c| !is_id_char(*c)) {
            return Err(TranscriptError::invalid_identifier(
                raw,
                format!("character '{}' is not allowed", bad),
            ));
        }

        Ok(Self(candidate.to_string()))
    }

    /// Accept either a bare identifier or a video URL
    ///
    /// Recognized URL shapes are `watch?v=<id>`, `youtu.be/<id>`,
    /// `/embed/<id>`, `/shorts/<id>` and `/live/<id>`. The scheme may be omitted.
    pub fn from_url_or_id(input: &str) -> Result<Self, TranscriptError> {
        let trimmed = input.trim();

        if !looks_like_url(trimmed) {
            return Self::parse(trimmed);
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&with_scheme)
            .map_err(|e| TranscriptError::invalid_identifier(input, format!("invalid URL: {}", e)))?;

        let candidate = id_from_url(&url).ok_or_else(|| {
            TranscriptError::invalid_identifier(input, "URL does not reference a video")
        })?;

        Self::parse(&candidate).map_err(|_| {
            TranscriptError::invalid_identifier(input, format!("URL carries malformed video id '{}'", candidate))
        })
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn looks_like_url(input: &str) -> bool {
    input.contains("://") || input.contains("youtube.com") || input.contains("youtu.be")
}

fn id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    if host == "youtu.be" || host.ends_with(".youtu.be") {
        return url
            .path_segments()?
            .find(|s| !s.is_empty())
            .map(str::to_string);
    }

    if !(host == "youtube.com" || host.ends_with(".youtube.com")) {
        return None;
    }

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        return Some(v.into_owned());
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if matches!(segment, "embed" | "shorts" | "live" | "v") {
            return segments.next().map(str::to_string);
        }
    }

    None
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = TranscriptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}
