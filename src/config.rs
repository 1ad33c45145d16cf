//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "drill-pacer")]
#[command(about = "Paired interval pacing timers with audible phase cues")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Starting rep duration in seconds (minimum 1)
    #[arg(short = 'd', long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub starting_duration: u64,

    /// Seconds added to the rep duration after each completed rest
    #[arg(short, long, default_value = "1")]
    pub increment: u64,

    /// Disable tone playback
    #[arg(short, long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
