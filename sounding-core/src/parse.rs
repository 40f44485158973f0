//! Turns an archive `TEXT:LIST` page into a [`SoundingProfile`].
//!
//! The listing layout is positional: three preamble lines, one line carrying
//! the station tag, six header lines, then one data row per level until the
//! trailing `Station information ...` block.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::{
    error::SoundingError,
    model::{ScanEnd, SoundingLevel, SoundingProfile, StationTag},
};

const PREAMBLE_LINES: usize = 3;
const HEADER_BLOCK_LINES: usize = 6;
/// 1-based number of the line holding the station tag.
const TAG_LINE: usize = PREAMBLE_LINES + 1;
/// Char offset of the tag within that line.
const TAG_OFFSET: usize = 6;
const TAG_LEN: usize = 3;
/// PRES HGHT TEMP DWPT RELH MIXR DRCT SKNT THTA THTE THTV
const DATA_COLUMNS: usize = 11;
const END_OF_DATA: &str = "Station";

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").unwrap()
});
/// A tag must open with a name, so a bare `<` in text is left alone.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[!/]?[A-Za-z][^<>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Reduce an HTML page to its text content, keeping line breaks where they were.
pub fn strip_markup(html: &str) -> String {
    let text = COMMENT_RE.replace_all(html, "");
    let text = SCRIPT_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");

    ENTITY_RE.replace_all(&text, |caps: &Captures| decode_entity(&caps[0], &caps[1])).into_owned()
}

fn decode_entity(whole: &str, name: &str) -> String {
    let decoded = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => name
            .strip_prefix("#x")
            .or_else(|| name.strip_prefix("#X"))
            .map(|hex| u32::from_str_radix(hex, 16))
            .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
            .and_then(Result::ok)
            .and_then(char::from_u32),
    };

    decoded.map(String::from).unwrap_or_else(|| whole.to_string())
}

/// Where the scanner is within the listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Preamble { seen: usize },
    HeaderTagLine,
    HeaderBlock { seen: usize },
    DataRows,
    Done(ScanEnd),
}

/// One classified data row.
#[derive(Debug, Clone, PartialEq)]
pub enum DataRow {
    Level(SoundingLevel),
    EndOfData,
    Short { pressure: String },
}

/// Classify a single data row. `line` is only used for error messages.
pub fn parse_row(row: &str, line: usize) -> Result<DataRow, SoundingError> {
    let tokens: Vec<&str> = row.split_whitespace().collect();

    if tokens.first() == Some(&END_OF_DATA) {
        return Ok(DataRow::EndOfData);
    }

    if tokens.len() < DATA_COLUMNS {
        let pressure = tokens.first().copied().unwrap_or_default().to_string();
        return Ok(DataRow::Short { pressure });
    }

    let value = |idx: usize| {
        tokens[idx]
            .parse::<f64>()
            .map_err(|_| SoundingError::BadValue { line, token: tokens[idx].to_string() })
    };

    // RELH, MIXR, THTA, THTE and THTV (columns 4, 5, 8, 9, 10) are not kept.
    Ok(DataRow::Level(SoundingLevel {
        pressure: value(0)?,
        height: value(1)?,
        temperature: value(2)?,
        dewpoint: value(3)?,
        wind_direction: value(6)?,
        wind_speed: value(7)?,
    }))
}

fn extract_tag(line: &str) -> Option<StationTag> {
    let tag: String = line.chars().skip(TAG_OFFSET).take(TAG_LEN).collect();

    if tag.chars().count() < TAG_LEN || tag.trim().is_empty() {
        return None;
    }

    Some(StationTag::from(tag.as_str()))
}

/// Result of scanning a whole listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSounding {
    pub tag: StationTag,
    pub profile: SoundingProfile,
    pub end: ScanEnd,
}

/// Line-at-a-time scanner over the stripped listing text.
#[derive(Debug, Clone)]
pub struct SoundingParser {
    state: ScanState,
    line: usize,
    tag: Option<StationTag>,
    profile: SoundingProfile,
}

impl Default for SoundingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundingParser {
    pub fn new() -> Self {
        Self {
            state: ScanState::Preamble { seen: 0 },
            line: 0,
            tag: None,
            profile: SoundingProfile::new(),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn tag(&self) -> Option<&StationTag> {
        self.tag.as_ref()
    }

    pub fn feed_line(&mut self, row: &str) -> Result<(), SoundingError> {
        self.line += 1;

        match &self.state {
            ScanState::Preamble { seen } => {
                let seen = *seen + 1;
                self.state = if seen < PREAMBLE_LINES {
                    ScanState::Preamble { seen }
                } else {
                    ScanState::HeaderTagLine
                };
            }
            ScanState::HeaderTagLine => {
                let tag =
                    extract_tag(row).ok_or(SoundingError::MissingStationTag { line: self.line })?;
                info!("The station is: {tag}");
                self.tag = Some(tag);
                self.state = ScanState::HeaderBlock { seen: 0 };
            }
            ScanState::HeaderBlock { seen } => {
                let seen = *seen + 1;
                self.state = if seen < HEADER_BLOCK_LINES {
                    ScanState::HeaderBlock { seen }
                } else {
                    ScanState::DataRows
                };
            }
            ScanState::DataRows => match parse_row(row, self.line)? {
                DataRow::Level(level) => self.profile.push(level),
                DataRow::EndOfData => {
                    info!("Reached end of file with no errors.");
                    self.state = ScanState::Done(ScanEnd::Sentinel);
                }
                DataRow::Short { pressure } => {
                    warn!(line = self.line, "Missing data at pressure level: {pressure}");
                    self.state = ScanState::Done(ScanEnd::MissingData { pressure });
                }
            },
            ScanState::Done(_) => {}
        }

        Ok(())
    }

    pub fn finish(self) -> Result<ParsedSounding, SoundingError> {
        let tag = self.tag.ok_or(SoundingError::MissingStationTag { line: TAG_LINE })?;

        let end = match self.state {
            ScanState::Done(end) => end,
            _ => {
                debug!(lines = self.line, "listing ended before the station block");
                ScanEnd::EndOfInput
            }
        };

        Ok(ParsedSounding { tag, profile: self.profile, end })
    }
}

/// Scan already-stripped listing text.
pub fn parse_listing(text: &str) -> Result<ParsedSounding, SoundingError> {
    let mut parser = SoundingParser::new();

    for row in text.lines() {
        parser.feed_line(row)?;
        if matches!(parser.state(), ScanState::Done(_)) {
            break;
        }
    }

    parser.finish()
}
