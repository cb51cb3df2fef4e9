//! [`Args`] definitions.

use clap::Parser;

/// Browse one page of the property listing from the terminal.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Listing query string or full listing URL.
    #[arg(default_value = "")]
    pub query: String,

    /// Your position as `lat,lng`, used by `sort=nearest`.
    #[arg(short, long)]
    pub location: Option<String>,
}
