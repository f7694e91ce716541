//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// funnelboard - marketing analytics dashboard backend
#[derive(Parser, Debug)]
#[command(name = "funnelboard")]
#[command(version)]
#[command(about = "Ad-spend and call-inquiry dashboard with spend forecasting", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print overview stats as JSON
    Overview {
        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Print the forecast state, plus a spend projection when --target is given
    Forecast {
        /// Target number of new clients
        #[arg(long)]
        target: Option<u64>,
    },

    /// Write a sample configuration file
    GenerateConfig {
        /// Output path (prints to stdout when omitted)
        path: Option<String>,
    },
}
