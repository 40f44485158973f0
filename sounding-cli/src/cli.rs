use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sounding_core::{Config, SoundingRequest, convert_sounding, source_from_config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "sounding",
    version,
    about = "Download a University of Wyoming sounding and save it in SHARPpy format"
)]
pub struct Cli {
    /// Observation time as YYYYMMDDHHMM, e.g. 202405011200.
    pub timestamp: String,

    /// Station code, e.g. KOUN.
    pub station: String,

    /// Directory the SHARPpy file is written into.
    pub output_dir: PathBuf,

    /// Config file to use instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug detail, including the raw listing text.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing(self.verbose);

        let request = SoundingRequest::parse(&self.timestamp, &self.station, &self.output_dir)?;

        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let stations = config.station_table();
        let source = source_from_config(&config);

        let report = convert_sounding(source.as_ref(), &stations, &request)
            .await
            .with_context(|| {
                format!("Failed to convert sounding for {} at {}", self.station, self.timestamp)
            })?;

        info!(levels = report.levels, "Sounding saved to `{}`", report.path.display());

        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn takes_three_positionals() {
        let cli = Cli::try_parse_from(["sounding", "202405011200", "KOUN", "/tmp/out"]).unwrap();

        assert_eq!(cli.timestamp, "202405011200");
        assert_eq!(cli.station, "KOUN");
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(Cli::try_parse_from(["sounding", "202405011200", "KOUN"]).is_err());
        assert!(Cli::try_parse_from(["sounding", "202405011200", "KOUN", "/tmp", "extra"]).is_err());
    }

    #[test]
    fn accepts_config_and_verbose() {
        let cli = Cli::try_parse_from([
            "sounding",
            "-v",
            "--config",
            "/etc/sounding.toml",
            "202405011200",
            "KOUN",
            ".",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/sounding.toml")));
    }

    #[tokio::test]
    async fn bad_timestamp_fails_before_any_work() {
        let cli = Cli::try_parse_from(["sounding", "2024-05-01", "KOUN", "."]).unwrap();
        let err = cli.run().await.unwrap_err();

        assert!(err.to_string().contains("Incorrect date/time format"));
    }
}
