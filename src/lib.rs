/*!
 * # yttranscript - YouTube transcript retrieval
 *
 * A Rust library that fetches the transcript of a video and returns it as a
 * normalized, time-aligned list of caption segments.
 *
 * ## Features
 *
 * - Video identifier validation (bare IDs and common URL forms)
 * - Caption track discovery through the player API
 * - Language-preference track selection, manual tracks first
 * - Payload download with timeouts, bounded retry and jittered backoff
 * - Timed-text XML and WebVTT parsing
 * - In-process LRU cache with TTL
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `video_id`: Identifier validation
 * - `providers`: Caption provider trait and the YouTube client
 * - `discovery`: Caption track listing
 * - `selector`: Track selection policy
 * - `fetcher`: Payload download with retry
 * - `parser`: XML and WebVTT payload parsing
 * - `cache`: Transcript result cache
 * - `transcript_service`: The retrieval facade
 * - `transcript`: Data model and output renderings
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod cache;
pub mod discovery;
pub mod errors;
pub mod fetcher;
pub mod language_utils;
pub mod parser;
pub mod providers;
pub mod selector;
pub mod transcript;
pub mod transcript_service;
pub mod video_id;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{ErrorKind, ProviderError, TranscriptError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use providers::CaptionProvider;
pub use transcript::{CaptionSegment, CaptionTrack, TrackFormat, Transcript};
pub use transcript_service::TranscriptService;
pub use video_id::VideoId;
