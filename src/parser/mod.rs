/*!
 * Timed-text payload parsing.
 *
 * Turns a raw caption payload into an ordered list of `CaptionSegment`s.
 * The strategy is picked by the track's format tag:
 * - `xml`: timed-text XML (`<text start dur>` seconds or `<p t d>` milliseconds)
 * - `vtt`: WebVTT blocks
 *
 * A payload either parses completely or the whole parse fails with
 * `MalformedPayload`; partial transcripts are never returned.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::errors::TranscriptError;
use crate::transcript::{CaptionSegment, TrackFormat};

pub mod vtt;
pub mod xml;

static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]{2,8});").unwrap()
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Parse a payload of the given format
pub fn parse_payload(payload: &str, format: TrackFormat) -> Result<Vec<CaptionSegment>, TranscriptError> {
    let segments = match format {
        TrackFormat::Xml => xml::parse(payload)?,
        TrackFormat::Vtt => vtt::parse(payload)?,
    };

    finish(segments)
}

/// Reject empty results and order segments by start
fn finish(mut segments: Vec<CaptionSegment>) -> Result<Vec<CaptionSegment>, TranscriptError> {
    if segments.is_empty() {
        return Err(TranscriptError::malformed("payload contains no cues"));
    }

    // stable: cues sharing a start keep payload order
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(segments)
}

/// Check that a parsed offset or duration is usable
pub(crate) fn checked_time(value: f64, what: &str) -> Result<f64, TranscriptError> {
    if !value.is_finite() {
        return Err(TranscriptError::malformed(format!("{} is not a finite number", what)));
    }
    if value < 0.0 {
        return Err(TranscriptError::malformed(format!("{} is negative ({})", what, value)));
    }
    Ok(value)
}

/// Decode XML/HTML character references
///
/// Unknown named entities are left untouched.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY_REGEX.replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse::<u32>().ok().and_then(char::from_u32)
        } else {
            named_entity(entity)
        };

        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => return None,
    };
    Some(c)
}

/// Remove inline markup such as `<i>`, `<c.colorE5E5E5>` or `<00:00:01.000>`
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }
    TAG_REGEX.replace_all(text, "")
}
