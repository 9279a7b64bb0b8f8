/*!
 * Error types for the yttranscript library.
 *
 * `ProviderError` classifies a single upstream call, `TranscriptError` is the
 * typed failure returned by the retrieval facade. Both use thiserror.
 */

use thiserror::Error;

/// Errors that can occur during a single call to a caption provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when building or sending the request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within its deadline
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// The upstream signalled throttling
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Message from the upstream
        message: String,
        /// Value of the Retry-After header, when present
        retry_after_secs: Option<u64>,
    },

    /// The video exists but cannot be played (private, removed, blocked)
    #[error("Video unplayable: {0}")]
    Unplayable(String),
}

impl ProviderError {
    /// Whether repeating the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::ConnectionError(_) | ProviderError::Timeout(_) => true,
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Discriminant of a `TranscriptError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    NoCaptionsAvailable,
    UpstreamUnavailable,
    RateLimited,
    FetchFailed,
    MalformedPayload,
}

impl ErrorKind {
    /// Check if this error type may go away on a later invocation
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::UpstreamUnavailable | ErrorKind::RateLimited | ErrorKind::FetchFailed
        )
    }

    /// Conventional HTTP status for a controller exposing the facade
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidIdentifier => 400,
            ErrorKind::NoCaptionsAvailable => 404,
            ErrorKind::UpstreamUnavailable => 502,
            ErrorKind::RateLimited => 429,
            ErrorKind::FetchFailed => 502,
            ErrorKind::MalformedPayload => 422,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidIdentifier => "InvalidIdentifier",
            ErrorKind::NoCaptionsAvailable => "NoCaptionsAvailable",
            ErrorKind::UpstreamUnavailable => "UpstreamUnavailable",
            ErrorKind::RateLimited => "RateLimited",
            ErrorKind::FetchFailed => "FetchFailed",
            ErrorKind::MalformedPayload => "MalformedPayload",
        };
        write!(f, "{}", name)
    }
}

/// Typed failure of a transcript retrieval
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// The raw identifier does not have the video-ID shape
    #[error("Invalid video identifier '{input}': {reason}")]
    InvalidIdentifier { input: String, reason: String },

    /// The upstream lists zero caption tracks for the video
    #[error("No captions available for video {video_id}")]
    NoCaptionsAvailable { video_id: String },

    /// Track listing failed on network or protocol level
    #[error("Caption service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream is throttling us; the caller should back off
    #[error("Rate limited by caption service{}", retry_after_secs.map(|s| format!(" (retry after {}s)", s)).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<u64> },

    /// Downloading the track payload failed after all attempts
    #[error("Failed to fetch transcript after {attempts} attempt(s): {message}")]
    FetchFailed { attempts: u32, message: String },

    /// The payload could not be turned into a complete segment list
    #[error("Malformed caption payload: {0}")]
    MalformedPayload(String),
}

impl TranscriptError {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            TranscriptError::NoCaptionsAvailable { .. } => ErrorKind::NoCaptionsAvailable,
            TranscriptError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            TranscriptError::RateLimited { .. } => ErrorKind::RateLimited,
            TranscriptError::FetchFailed { .. } => ErrorKind::FetchFailed,
            TranscriptError::MalformedPayload(_) => ErrorKind::MalformedPayload,
        }
    }

    /// Conventional HTTP status for this failure
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    pub(crate) fn invalid_identifier(input: &str, reason: impl Into<String>) -> Self {
        TranscriptError::InvalidIdentifier {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TranscriptError::MalformedPayload(reason.into())
    }
}
