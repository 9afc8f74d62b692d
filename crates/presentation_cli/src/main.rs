//! catch-weather CLI
//!
//! Enriches fishing-catch tables with coordinates and historical noon
//! weather, inspects the lookup caches and downloads raw ASOS observations.

#![allow(clippy::print_stdout)]

mod asos;
mod cli;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use infrastructure::{
    AppConfig, RunPaths, inspect_geocode_cache, inspect_weather_cache, run_enrichment,
};
use integration_weather::{AsosClient, AsosRequest};

use crate::cli::{CacheCommand, Cli, Commands};

/// Determine log filter override from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// `<dir>/<stem>_with_weather.csv` for an input at `<dir>/<stem>.<ext>`
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "catches".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_with_weather.csv"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    infrastructure::init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))?;
    config.log_adjustments();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli.command, config))
}

async fn run(command: Commands, mut config: AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Enrich {
            input,
            output,
            geocode_cache,
            weather_cache,
            flush_interval,
        } => {
            if geocode_cache.is_some() {
                config.cache.geocode_path = geocode_cache;
            }
            if weather_cache.is_some() {
                config.cache.weather_path = weather_cache;
            }
            if let Some(interval) = flush_interval {
                config.cache.flush_interval = interval;
            }

            let output = output.unwrap_or_else(|| default_output(&input));
            let paths = RunPaths::resolve(&config, input, output);
            let report = run_enrichment(&config, &paths).await?;

            println!("{report}");
            for name in report.failed_locations() {
                println!("  lookup failed, retry later: {name}");
            }
            println!("Wrote {}", paths.output.display());
        },

        Commands::Cache {
            action:
                CacheCommand::Inspect {
                    input,
                    geocode_cache,
                    weather_cache,
                },
        } => {
            let input = input.unwrap_or_default();
            let geocode_path =
                geocode_cache.unwrap_or_else(|| config.cache.geocode_path_for(&input));
            let weather_path =
                weather_cache.unwrap_or_else(|| config.cache.weather_path_for(&input));

            println!("{}", inspect_geocode_cache(&geocode_path).await?);
            println!("{}", inspect_weather_cache(&weather_path).await?);
        },

        Commands::Asos {
            stations,
            variables,
            start,
            end,
            tz,
            output,
        } => {
            let request = AsosRequest {
                stations,
                variables,
                start: asos::parse_timestamp(&start)?,
                end: asos::parse_timestamp(&end)?,
                timezone: tz,
            };
            let path = asos::output_path(&request, output);
            let client = AsosClient::new(config.asos.clone())?;

            let bytes = asos::download_to_file(&client, &request, &path).await?;
            println!("Saved {bytes} bytes to {}", path.display());
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero_defers_to_config() {
        assert_eq!(log_filter_from_verbosity(0), None);
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn default_output_next_to_input() {
        assert_eq!(
            default_output(Path::new("data/catches.csv")),
            PathBuf::from("data/catches_with_weather.csv")
        );
        assert_eq!(
            default_output(Path::new("catches")),
            PathBuf::from("catches_with_weather.csv")
        );
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
