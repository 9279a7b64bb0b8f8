/*!
 * Transcript data model.
 *
 * Caption tracks as reported by the upstream, the normalized segments produced
 * by the parser and the `Transcript` handed back to callers, together with the
 * text renderings used by the CLI.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::video_id::VideoId;

/// Payload format of a caption track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackFormat {
    /// Timed-text XML (`<text start dur>` or `<p t d>` cues)
    #[default]
    Xml,
    /// WebVTT blocks
    Vtt,
}

impl TrackFormat {
    /// Value of the `fmt` query parameter requesting this format, if any
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            TrackFormat::Xml => None,
            TrackFormat::Vtt => Some("vtt"),
        }
    }
}

impl fmt::Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackFormat::Xml => write!(f, "xml"),
            TrackFormat::Vtt => write!(f, "vtt"),
        }
    }
}

/// One caption track available for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Language tag as reported by the upstream (`en`, `en-GB`, ...)
    pub language_code: String,

    /// Human readable track name
    pub name: String,

    /// Payload format that will be requested for this track
    pub format: TrackFormat,

    /// Whether the track was generated by speech recognition
    pub auto_generated: bool,

    /// Location of the track payload
    pub base_url: String,
}

impl CaptionTrack {
    /// Create a new caption track
    pub fn new(
        language_code: impl Into<String>,
        name: impl Into<String>,
        format: TrackFormat,
        auto_generated: bool,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            language_code: language_code.into(),
            name: name.into(),
            format,
            auto_generated,
            base_url: base_url.into(),
        }
    }

    /// Short label used in logs and by the `tracks` subcommand
    pub fn kind_label(&self) -> &'static str {
        if self.auto_generated { "auto" } else { "manual" }
    }
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.language_code, self.kind_label(), self.format)
    }
}

/// A single timed line of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Offset from the start of the video in seconds
    pub start: f64,

    /// Display duration in seconds
    pub duration: f64,

    /// Caption text with markup removed and entities decoded
    pub text: String,
}

impl CaptionSegment {
    /// Create a new segment
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }

    /// End offset in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// The normalized transcript of one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub video_id: VideoId,
    pub language_code: String,
    pub auto_generated: bool,
    pub segments: Vec<CaptionSegment>,
}

impl Transcript {
    /// Create a transcript for the given track
    pub fn new(video_id: VideoId, track: &CaptionTrack, segments: Vec<CaptionSegment>) -> Self {
        Self {
            video_id,
            language_code: track.language_code.clone(),
            auto_generated: track.auto_generated,
            segments,
        }
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the transcript has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Offset of the end of the last segment, in seconds
    pub fn duration(&self) -> f64 {
        self.segments
            .iter()
            .map(CaptionSegment::end)
            .fold(0.0, f64::max)
    }

    /// Segment texts joined by single spaces, skipping blank segments
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the transcript as SubRip
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                format_timestamp(seconds_to_ms(segment.start), ','),
                format_timestamp(seconds_to_ms(segment.end()), ','),
                segment.text
            ));
        }
        out
    }

    /// Render the transcript as WebVTT
    pub fn to_vtt(&self) -> String {
        let mut out = String::from("WEBVTT\n\n");
        for segment in &self.segments {
            out.push_str(&format!(
                "{} --> {}\n{}\n\n",
                format_timestamp(seconds_to_ms(segment.start), '.'),
                format_timestamp(seconds_to_ms(segment.end()), '.'),
                segment.text
            ));
        }
        out
    }
}

/// Convert seconds to whole milliseconds, rounding to the nearest
pub fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Format a timestamp in milliseconds as `HH:MM:SS<sep>mmm`
pub fn format_timestamp(ms: u64, separator: char) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, separator, millis)
}
