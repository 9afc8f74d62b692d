//! Command-line definitions shared by the binary and its parsing tests

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// catch-weather CLI
#[derive(Debug, Parser)]
#[command(name = "catch-weather")]
#[command(author, version, about = "Enrich fishing catch records with historical weather", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./catch-weather.toml when present)
    #[arg(short, long, global = true, env = "CATCH_WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add coordinates and noon weather to a catch table
    ///
    /// Example: catch-weather enrich catches.csv -o catches_with_weather.csv
    Enrich {
        /// Catch table (CSV)
        input: PathBuf,

        /// Output table (default: <input>_with_weather.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Geocode cache file (`.json` for JSON, anything else for binary)
        #[arg(long)]
        geocode_cache: Option<PathBuf>,

        /// Weather cache file (`.json` for JSON, anything else for binary)
        #[arg(long)]
        weather_cache: Option<PathBuf>,

        /// New entries between cache flushes
        #[arg(long)]
        flush_interval: Option<usize>,
    },

    /// Work with the lookup caches
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },

    /// Download raw ASOS observations from the Iowa Environmental Mesonet
    ///
    /// Example: catch-weather asos -s AUS -s DFW -d tmpf,mslp --start 2024-01-01 --end 2024-01-31
    Asos {
        /// Station identifier (repeatable)
        #[arg(short, long = "station", required = true)]
        stations: Vec<String>,

        /// Data variables (comma-separated)
        #[arg(short, long = "data", value_delimiter = ',', required = true)]
        variables: Vec<String>,

        /// Window start (YYYY-MM-DD or "YYYY-MM-DD HH:MM")
        #[arg(long)]
        start: String,

        /// Window end (YYYY-MM-DD or "YYYY-MM-DD HH:MM")
        #[arg(long)]
        end: String,

        /// Timezone of the window
        #[arg(long, default_value = "Etc/UTC")]
        tz: String,

        /// Output file (default: asos/<variables>_<start>_to_<end>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show entry and sentinel counts of both caches
    Inspect {
        /// Catch table whose default cache files to inspect
        input: Option<PathBuf>,

        /// Geocode cache file
        #[arg(long)]
        geocode_cache: Option<PathBuf>,

        /// Weather cache file
        #[arg(long)]
        weather_cache: Option<PathBuf>,
    },
}
