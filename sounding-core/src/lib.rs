//! Core library for the `sounding` CLI.
//!
//! This crate defines:
//! - The station code to archive number table
//! - Fetching text listings from the University of Wyoming sounding archive
//! - Parsing those listings into sounding levels
//! - Writing SHARPpy text soundings
//!
//! It is used by `sounding-cli`, but the pipeline in [`convert_sounding`] can
//! be driven by any [`SoundingSource`].

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod parse;
pub mod provider;
pub mod sharppy;
pub mod station;

pub use config::Config;
pub use convert::{ConversionReport, convert_sounding};
pub use error::SoundingError;
pub use model::{ScanEnd, SoundingLevel, SoundingProfile, SoundingRequest, StationTag};
pub use provider::{SoundingSource, source_from_config};
pub use station::{StationNumber, StationTable};
