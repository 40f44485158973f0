use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    error::SoundingError,
    model::{ScanEnd, SoundingRequest, StationTag},
    parse::{parse_listing, strip_markup},
    provider::SoundingSource,
    sharppy::write_sounding,
    station::StationTable,
};

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub path: PathBuf,
    pub tag: StationTag,
    pub levels: usize,
    pub end: ScanEnd,
}

/// Fetch one sounding, parse it and write the SHARPpy file.
///
/// A short data row ends parsing early but is not an error: whatever levels
/// were read before it are written and `end` says where the scan stopped.
pub async fn convert_sounding(
    source: &dyn SoundingSource,
    stations: &StationTable,
    request: &SoundingRequest,
) -> Result<ConversionReport, SoundingError> {
    let station = stations.resolve(&request.station)?;
    let query = request.archive_query();

    info!(
        site = %request.station,
        %station,
        time = %request.valid_time.format("%Y%m%d%H%M"),
        "Requesting raw sounding data"
    );

    let raw = source.fetch_listing(station, &query).await?;
    let text = strip_markup(&raw);
    debug!("The raw sounding data is:\n{text}");

    let parsed = parse_listing(&text)?;

    info!("Writing sounding data in SHARPpy format.");
    let path =
        write_sounding(&request.output_dir, &parsed.tag, &request.valid_time, &parsed.profile)?;

    Ok(ConversionReport {
        path,
        tag: parsed.tag,
        levels: parsed.profile.len(),
        end: parsed.end,
    })
}
