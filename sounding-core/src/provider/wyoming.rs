use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::info;

use crate::{error::SoundingError, model::ArchiveQuery, station::StationNumber};

use super::SoundingSource;

pub const DEFAULT_BASE_URL: &str = "http://weather.uwyo.edu/cgi-bin/sounding";
pub const DEFAULT_REGION: &str = "naconf";

/// Text the archive puts in the page when it has nothing for the request.
const NO_DATA_MARKER: &str = "Sorry";

/// University of Wyoming upper-air archive, `TEXT:LIST` output.
#[derive(Debug, Clone)]
pub struct WyomingArchive {
    base_url: String,
    region: String,
    http: Client,
}

impl Default for WyomingArchive {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_REGION)
    }
}

impl WyomingArchive {
    pub fn new(base_url: impl Into<String>, region: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), region: region.into(), http: Client::new() }
    }

    /// Query URL for one station and hour; `FROM` and `TO` are the same `DDHH`.
    pub fn listing_url(
        &self,
        station: StationNumber,
        query: &ArchiveQuery,
    ) -> Result<Url, SoundingError> {
        let station = station.to_string();
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("region", self.region.as_str()),
                ("TYPE", "TEXT:LIST"),
                ("YEAR", query.year.as_str()),
                ("MONTH", query.month.as_str()),
                ("FROM", query.day_hour.as_str()),
                ("TO", query.day_hour.as_str()),
                ("STNM", station.as_str()),
            ],
        )
        .map_err(|_| SoundingError::InvalidBaseUrl { url: self.base_url.clone() })?;

        Ok(url)
    }
}

/// Reject pages that carry the archive's no-data marker or an error status.
pub fn check_listing(
    url: &Url,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<(), SoundingError> {
    if body.contains(NO_DATA_MARKER) {
        return Err(SoundingError::NoData { url: url.to_string() });
    }

    if !status.is_success() {
        return Err(SoundingError::HttpStatus {
            status,
            url: url.to_string(),
            body: truncate_body(body),
        });
    }

    Ok(())
}

#[async_trait]
impl SoundingSource for WyomingArchive {
    async fn fetch_listing(
        &self,
        station: StationNumber,
        query: &ArchiveQuery,
    ) -> Result<String, SoundingError> {
        let url = self.listing_url(station, query)?;
        info!(%url, "Requesting raw sounding data from the University of Wyoming archive");

        let res = self.http.get(url.clone()).send().await?;
        let status = res.status();
        let body = res.text().await?;

        check_listing(&url, status, &body)?;

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
