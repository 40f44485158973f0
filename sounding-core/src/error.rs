use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a sounding conversion.
///
/// A short data row is deliberately absent here: it ends the scan but the
/// levels collected before it are still written (see [`crate::ScanEnd`]).
#[derive(Debug, Error)]
pub enum SoundingError {
    #[error("Incorrect date/time format '{value}': expected YYYYMMDDHHMM")]
    InvalidTimestamp { value: String },

    #[error(
        "Unknown station code '{code}'. Known codes: {known}.\n\
         Hint: look up the station number at https://weather.uwyo.edu/upperair/sounding.html \
         and add it to the [stations] table of the config file, e.g. {code} = 72357"
    )]
    UnknownStation { code: String, known: String },

    #[error("Archive base URL '{url}' is not a valid URL")]
    InvalidBaseUrl { url: String },

    #[error("Download or parse failed, the archive has no data. URL: {url}")]
    NoData { url: String },

    #[error("Archive request failed with status {status}. URL: {url}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("Failed to talk to the sounding archive")]
    Http(#[from] reqwest::Error),

    #[error("Listing has no station tag on header line {line}")]
    MissingStationTag { line: usize },

    #[error("Listing line {line}: '{token}' is not a number")]
    BadValue { line: usize, token: String },

    #[error("Failed to write sounding file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
