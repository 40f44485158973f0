use crate::{
    Config, error::SoundingError, model::ArchiveQuery, provider::wyoming::WyomingArchive,
    station::StationNumber,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod wyoming;

/// Somewhere a raw sounding listing can be fetched from.
#[async_trait]
pub trait SoundingSource: Send + Sync + Debug {
    /// Fetch the raw listing page for one station and hour.
    async fn fetch_listing(
        &self,
        station: StationNumber,
        query: &ArchiveQuery,
    ) -> Result<String, SoundingError>;
}

/// Construct the archive source from config.
pub fn source_from_config(config: &Config) -> Box<dyn SoundingSource> {
    Box::new(WyomingArchive::new(config.base_url.clone(), config.region.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_config_uses_configured_endpoint() {
        let cfg = Config { region: "europe".into(), ..Config::default() };
        let source = source_from_config(&cfg);

        let debug = format!("{source:?}");
        assert!(debug.contains("WyomingArchive"));
        assert!(debug.contains("europe"));
    }
}
