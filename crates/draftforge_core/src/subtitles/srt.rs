//! SRT caption parser.
//!
//! Parses SubRip (.srt) files into [`SrtEntry`] values.
//!
//! # Format Overview
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello, world!
//!
//! 2
//! 00:00:05,000 --> 00:00:08,000
//! This is a test.
//! ```
//!
//! Each entry has:
//! - Index number
//! - Timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm`
//! - One or more lines of text
//! - Blank line separator
//!
//! A block that breaks any of these rules is skipped and recorded in the
//! report; the rest of the file still parses.

use super::error::ParseError;
use super::types::{ParseReport, SrtEntry, LINE_BREAK};
use crate::timing::MICROS_PER_MILLI;

/// Parse SRT content.
pub fn parse_srt(content: &str) -> ParseReport {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut report = ParseReport::default();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            flush_block(&mut block, &mut report);
        } else {
            block.push((i + 1, line));
        }
    }
    flush_block(&mut block, &mut report);

    if !report.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} malformed caption block(s), kept {}",
            report.skipped.len(),
            report.entries.len()
        );
    }

    report
}

fn flush_block(block: &mut Vec<(usize, &str)>, report: &mut ParseReport) {
    if block.is_empty() {
        return;
    }
    match parse_block(block) {
        Ok(entry) => report.entries.push(entry),
        Err(e) => {
            tracing::debug!("Skipping caption block: {}", e);
            report.skipped.push(e);
        }
    }
    block.clear();
}

/// Parse one non-empty block of `(line_number, text)` pairs.
fn parse_block(block: &[(usize, &str)]) -> Result<SrtEntry, ParseError> {
    let (index_line_no, index_line) = block[0];
    let sequence_number: u32 = index_line
        .trim()
        .parse()
        .map_err(|_| ParseError::invalid_index(index_line_no, index_line.trim()))?;

    let Some(&(timing_line_no, timing_line)) = block.get(1) else {
        return Err(ParseError::invalid_time(index_line_no + 1, ""));
    };
    let (start, end) = parse_srt_timing(timing_line)
        .ok_or_else(|| ParseError::invalid_time(timing_line_no, timing_line.trim()))?;

    if end < start {
        return Err(ParseError::EndBeforeStart {
            line: timing_line_no,
        });
    }

    let text_lines: Vec<&str> = block[2..].iter().map(|(_, l)| l.trim_end()).collect();
    if text_lines.is_empty() {
        return Err(ParseError::MissingText {
            line: timing_line_no,
        });
    }

    Ok(SrtEntry {
        sequence_number,
        start,
        end,
        text: text_lines.join(LINE_BREAK),
    })
}

/// Parse SRT timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm`
///
/// Anything after the end timestamp (position hints) is ignored.
/// Returns `(start, end)` in microseconds.
fn parse_srt_timing(line: &str) -> Option<(i64, i64)> {
    let (left, right) = line.split_once("-->")?;
    let start = parse_srt_time(left.trim())?;
    let end = parse_srt_time(right.split_whitespace().next()?)?;
    Some((start, end))
}

/// Parse SRT timestamp: `HH:MM:SS,mmm` or `HH:MM:SS.mmm`
///
/// Returns time in microseconds:
/// `(((H*3600 + M*60 + S) * 1000) + ms) * 1000`.
pub fn parse_srt_time(s: &str) -> Option<i64> {
    let s = s.trim();
    let (clock, fraction) = match s.find([',', '.']) {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    };

    let mut parts = clock.split(':');
    let hours = parse_component(parts.next()?)?;
    let minutes = parse_component(parts.next()?)?;
    let seconds = parse_component(parts.next()?)?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let millis = parse_millis(fraction)?;

    // Oversized hour fields overflow i64; treat them as unparseable.
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?
        .checked_mul(1000)?
        .checked_add(millis)?
        .checked_mul(MICROS_PER_MILLI)
}

fn parse_component(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Millisecond field, normalised by digit count ("5" = 500ms, "05" = 50ms).
fn parse_millis(s: &str) -> Option<i64> {
    if s.is_empty() {
        return Some(0);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = &s[..s.len().min(3)];
    let value: i64 = digits.parse().ok()?;
    Some(match digits.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    })
}
