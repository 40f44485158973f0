use std::{fmt, path::PathBuf};

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::SoundingError;

/// Layout of the timestamp argument, e.g. `202405011200`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// One sounding to fetch: which station, which time, where the file goes.
#[derive(Debug, Clone)]
pub struct SoundingRequest {
    pub valid_time: NaiveDateTime,
    pub station: String,
    pub output_dir: PathBuf,
}

impl SoundingRequest {
    /// Validate the raw arguments and build a request.
    ///
    /// The timestamp must be exactly twelve digits forming a real date and
    /// time. Minutes are kept for the output title even though the archive
    /// only resolves whole hours.
    pub fn parse(
        timestamp: &str,
        station: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, SoundingError> {
        let invalid = || SoundingError::InvalidTimestamp { value: timestamp.to_string() };

        if timestamp.len() != 12 || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let valid_time =
            NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map_err(|_| invalid())?;

        Ok(Self { valid_time, station: station.into(), output_dir: output_dir.into() })
    }

    pub fn archive_query(&self) -> ArchiveQuery {
        ArchiveQuery::from_time(&self.valid_time)
    }
}

/// Calendar fields in the shape the archive's query string wants them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveQuery {
    /// `YYYY`
    pub year: String,
    /// `MM`
    pub month: String,
    /// `DDHH`, sent as both the `FROM` and `TO` parameter.
    pub day_hour: String,
}

impl ArchiveQuery {
    pub fn from_time(time: &NaiveDateTime) -> Self {
        Self {
            year: format!("{:04}", time.year()),
            month: format!("{:02}", time.month()),
            day_hour: format!("{:02}{:02}", time.day(), time.hour()),
        }
    }
}

/// A single level of the profile, in archive units (hPa, m, C, C, deg, knot).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundingLevel {
    pub pressure: f64,
    pub height: f64,
    pub temperature: f64,
    pub dewpoint: f64,
    pub wind_direction: f64,
    pub wind_speed: f64,
}

/// Levels in archive row order, bottom of the atmosphere first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundingProfile {
    levels: Vec<SoundingLevel>,
}

impl SoundingProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: SoundingLevel) {
        self.levels.push(level);
    }

    pub fn levels(&self) -> &[SoundingLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Three-letter station tag read from the listing header, e.g. `OUN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationTag(String);

impl StationTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StationTag {
    fn from(value: &str) -> Self {
        StationTag(value.to_string())
    }
}

impl fmt::Display for StationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why the data row scan stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEnd {
    /// Reached the trailing `Station ...` metadata block.
    Sentinel,
    /// A row had too few columns; `pressure` is its first token.
    MissingData { pressure: String },
    /// Lines ran out before any sentinel.
    EndOfInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_full_timestamp() {
        let req = SoundingRequest::parse("202405011230", "KOUN", "/tmp/out").unwrap();

        assert_eq!(req.valid_time.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 12:30");
        assert_eq!(req.station, "KOUN");
        assert_eq!(req.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn parse_rejects_wrong_length_and_garbage() {
        for bad in ["2024050112", "2024050112000", "2024-05-0112", "abcdefghijkl", ""] {
            let err = SoundingRequest::parse(bad, "KOUN", ".").unwrap_err();
            assert!(
                matches!(err, SoundingError::InvalidTimestamp { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        let err = SoundingRequest::parse("202402301200", "KOUN", ".").unwrap_err();
        assert!(err.to_string().contains("Incorrect date/time format"));

        assert!(SoundingRequest::parse("202405012500", "KOUN", ".").is_err());
    }

    #[test]
    fn archive_query_drops_minutes_and_pads() {
        let req = SoundingRequest::parse("202403050045", "KOUN", ".").unwrap();
        let query = req.archive_query();

        assert_eq!(
            query,
            ArchiveQuery { year: "2024".into(), month: "03".into(), day_hour: "0500".into() }
        );
    }

    #[test]
    fn profile_keeps_push_order() {
        let level = |p| SoundingLevel {
            pressure: p,
            height: 0.0,
            temperature: 0.0,
            dewpoint: 0.0,
            wind_direction: 0.0,
            wind_speed: 0.0,
        };

        let mut profile = SoundingProfile::new();
        assert!(profile.is_empty());

        profile.push(level(1000.0));
        profile.push(level(925.0));

        let pressures: Vec<f64> = profile.levels().iter().map(|l| l.pressure).collect();
        assert_eq!(pressures, vec![1000.0, 925.0]);
        assert_eq!(profile.len(), 2);
    }
}
