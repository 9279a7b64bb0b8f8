use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{checked_time, decode_entities, strip_tags};
use crate::errors::TranscriptError;
use crate::transcript::CaptionSegment;

// start --> end [cue settings]
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)[ \t]+-->[ \t]+(\S+)(?:[ \t].*)?$").unwrap()
});

// [HH:]MM:SS.mmm
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{1,}):)?(\d{2}):(\d{2})\.(\d{3})$").unwrap()
});

/// Parse a WebVTT payload
pub fn parse(payload: &str) -> Result<Vec<CaptionSegment>, TranscriptError> {
    let content = payload.trim_start_matches('\u{feff}').replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = content.split("\n\n").filter(|b| !b.trim().is_empty());

    let header = blocks.next().unwrap_or_default();
    if !is_header(header.trim_start()) {
        return Err(TranscriptError::malformed("missing WEBVTT header"));
    }
    // a cue with no blank line after the header would otherwise be swallowed
    if header.lines().any(|line| line.contains("-->")) {
        return Err(TranscriptError::malformed("cue timing inside the WEBVTT header block"));
    }

    let mut segments = Vec::new();
    for block in blocks {
        let block = block.trim_matches('\n');
        if is_metadata_block(block) {
            continue;
        }
        segments.push(parse_cue(block)?);
    }

    debug!("Parsed {} VTT cue(s)", segments.len());
    Ok(segments)
}

fn is_header(block: &str) -> bool {
    match block.strip_prefix("WEBVTT") {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t', '\n']),
        None => false,
    }
}

fn is_metadata_block(block: &str) -> bool {
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        block
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '\n']))
    })
}

fn parse_cue(block: &str) -> Result<CaptionSegment, TranscriptError> {
    let mut lines = block.lines();
    let first = lines.next().unwrap_or_default();

    // An optional identifier line may precede the timing line
    let timing = if first.contains("-->") {
        first
    } else {
        match lines.next() {
            Some(line) if line.contains("-->") => line,
            _ => {
                return Err(TranscriptError::malformed(format!(
                    "cue block without timing line: '{}'",
                    first.trim()
                )));
            }
        }
    };

    let (start, end) = parse_timing(timing.trim())?;
    if end < start {
        return Err(TranscriptError::malformed(format!(
            "cue ends before it starts: '{}'",
            timing.trim()
        )));
    }

    let mut text_lines = Vec::new();
    for line in lines {
        if line.contains("-->") {
            return Err(TranscriptError::malformed(format!(
                "cue timing line inside cue text: '{}'",
                line.trim()
            )));
        }
        let stripped = strip_tags(line);
        text_lines.push(decode_entities(stripped.trim()).into_owned());
    }
    let text = text_lines.join("\n");

    Ok(CaptionSegment::new(start, end - start, text.trim()))
}

fn parse_timing(line: &str) -> Result<(f64, f64), TranscriptError> {
    let caps = TIMING_REGEX
        .captures(line)
        .ok_or_else(|| TranscriptError::malformed(format!("unparsable timing line: '{}'", line)))?;

    let start = parse_timestamp(&caps[1])?;
    let end = parse_timestamp(&caps[2])?;
    Ok((start, end))
}

/// Parse `HH:MM:SS.mmm` or `MM:SS.mmm` into seconds
pub(crate) fn parse_timestamp(raw: &str) -> Result<f64, TranscriptError> {
    let caps = TIMESTAMP_REGEX
        .captures(raw)
        .ok_or_else(|| TranscriptError::malformed(format!("invalid timestamp: '{}'", raw)))?;

    let field = |i: usize| -> Result<u64, TranscriptError> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map_err(|_| TranscriptError::malformed(format!("invalid timestamp: '{}'", raw))),
            None => Ok(0),
        }
    };

    let (hours, minutes, seconds, millis) = (field(1)?, field(2)?, field(3)?, field(4)?);
    if minutes > 59 || seconds > 59 {
        return Err(TranscriptError::malformed(format!("timestamp out of range: '{}'", raw)));
    }

    let total_ms = hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(|| TranscriptError::malformed(format!("timestamp out of range: '{}'", raw)))?;
    checked_time(total_ms as f64 / 1000.0, "timestamp")
}
