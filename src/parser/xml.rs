use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{checked_time, decode_entities, strip_tags};
use crate::errors::TranscriptError;
use crate::transcript::CaptionSegment;

// Classic timed text: <text start="1.23" dur="4.5">...</text>, times in seconds
static TEXT_CUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text\s*>)").unwrap()
});

static TEXT_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<text\b").unwrap());

// Format 3 timed text: <p t="1230" d="4500">...</p>, times in milliseconds
static P_CUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<p\b([^>]*?)(?:/>|>(.*?)</p\s*>)").unwrap()
});

static P_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<p\b").unwrap());

static ATTR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Time unit of the cue attributes
#[derive(Debug, Clone, Copy)]
enum Variant {
    /// `start`/`dur` in seconds
    Seconds,
    /// `t`/`d` in milliseconds
    Millis,
}

/// Parse a timed-text XML payload
pub fn parse(payload: &str) -> Result<Vec<CaptionSegment>, TranscriptError> {
    let (cue_regex, open_regex, variant) = if TEXT_OPEN_REGEX.is_match(payload) {
        (&*TEXT_CUE_REGEX, &*TEXT_OPEN_REGEX, Variant::Seconds)
    } else if P_OPEN_REGEX.is_match(payload) {
        (&*P_CUE_REGEX, &*P_OPEN_REGEX, Variant::Millis)
    } else {
        return Err(TranscriptError::malformed("no timed-text cues found in XML payload"));
    };

    let mut segments = Vec::new();
    for caps in cue_regex.captures_iter(payload) {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        segments.push(parse_cue(attrs, body, variant)?);
    }

    let opened = open_regex.find_iter(payload).count();
    if opened != segments.len() {
        return Err(TranscriptError::malformed(format!(
            "{} cue element(s) opened but only {} closed",
            opened,
            segments.len()
        )));
    }

    debug!("Parsed {} XML cue(s)", segments.len());
    Ok(segments)
}

fn parse_cue(attrs: &str, body: &str, variant: Variant) -> Result<CaptionSegment, TranscriptError> {
    let (start_name, dur_name) = match variant {
        Variant::Seconds => ("start", "dur"),
        Variant::Millis => ("t", "d"),
    };

    let start = attribute(attrs, start_name)
        .ok_or_else(|| TranscriptError::malformed(format!("cue is missing the '{}' attribute", start_name)))?;
    let start = parse_time(&start, start_name, variant)?;

    let duration = match attribute(attrs, dur_name) {
        Some(raw) => parse_time(&raw, dur_name, variant)?,
        None => 0.0,
    };

    Ok(CaptionSegment::new(start, duration, cue_text(body)))
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR_REGEX
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str()).trim().to_string())
}

fn parse_time(raw: &str, name: &str, variant: Variant) -> Result<f64, TranscriptError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| TranscriptError::malformed(format!("'{}' attribute is not a number: '{}'", name, raw)))?;
    let value = checked_time(value, name)?;

    Ok(match variant {
        Variant::Seconds => value,
        Variant::Millis => value / 1000.0,
    })
}

/// Cue body to plain text
///
/// The body is XML-escaped text whose content may itself carry HTML
/// character references (`&amp;#39;`), so references are decoded on both
/// sides of tag stripping.
fn cue_text(body: &str) -> String {
    let unescaped = decode_entities(body);
    let stripped = strip_tags(&unescaped);
    decode_entities(&stripped).trim().to_string()
}
