//! SHARPpy text sounding output.
//!
//! The layout below is read byte-for-byte by SHARPpy, so section markers,
//! spacing and the two-decimal precision must not drift.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;

use crate::{
    error::SoundingError,
    model::{SoundingLevel, SoundingProfile, StationTag},
};

const COLUMN_HEADER: &str = "   LEVEL       HGHT       TEMP       DWPT       WDIR       WSPD";
const SEPARATOR: &str = "-------------------------------------------------------------------";
const FIELD_SEPARATOR: &str = ",    ";

/// `YYMMDDHH.TAG`
pub fn output_file_name(valid_time: &NaiveDateTime, tag: &StationTag) -> String {
    format!("{}.{}", valid_time.format("%y%m%d%H"), tag)
}

/// Render a full SHARPpy file. The text ends with `%END%` and no newline.
pub fn render(tag: &StationTag, valid_time: &NaiveDateTime, profile: &SoundingProfile) -> String {
    let mut out = String::new();

    out.push_str("%TITLE%\n");
    out.push_str(&format!(" {}   {}\n", tag, valid_time.format("%y%m%d/%H%M")));
    out.push('\n');
    out.push_str(COLUMN_HEADER);
    out.push('\n');
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str("%RAW%\n");

    for level in profile.levels() {
        out.push_str(&render_level(level));
        out.push('\n');
    }

    out.push_str("%END%");
    out
}

fn render_level(level: &SoundingLevel) -> String {
    let fields = [
        level.pressure,
        level.height,
        level.temperature,
        level.dewpoint,
        level.wind_direction,
        level.wind_speed,
    ];

    let values: Vec<String> = fields.iter().map(|v| format!("{v:.2}")).collect();
    format!(" {}", values.join(FIELD_SEPARATOR))
}

/// Write the sounding into `dir`, replacing any file already there.
pub fn write_sounding(
    dir: &Path,
    tag: &StationTag,
    valid_time: &NaiveDateTime,
    profile: &SoundingProfile,
) -> Result<PathBuf, SoundingError> {
    let path = dir.join(output_file_name(valid_time, tag));

    fs::write(&path, render(tag, valid_time, profile))
        .map_err(|source| SoundingError::Io { path: path.clone(), source })?;

    Ok(path)
}
