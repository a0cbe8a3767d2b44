use clap::{Parser, Subcommand, ValueEnum};
use speed_report::config::ServerConfig;
use speed_report::extract::ExtractorOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "speed-report")]
#[command(about = "Simplified PageSpeed performance reports for mobile and desktop")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP report server
    Serve {
        /// Address to listen on (overrides config and LISTEN_ADDR)
        #[arg(short, long)]
        listen: Option<String>,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// PageSpeed endpoint (overrides config and PAGESPEED_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Analyze a single URL and print the report
    Analyze {
        /// Site to analyze (http:// or https://)
        url: String,

        /// Which recommendation details to request
        #[arg(short, long, value_enum, default_value_t = ReportMode::Full)]
        mode: ReportMode,

        /// Print the raw report as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    /// Recommendations with savings, performance category only
    Full,
    /// Titles and descriptions only
    Basic,
}

impl ReportMode {
    pub fn extractor_options(self) -> ExtractorOptions {
        match self {
            ReportMode::Full => ExtractorOptions::full(),
            ReportMode::Basic => ExtractorOptions::basic(),
        }
    }
}

/// Load the optional config file, then apply environment overrides
pub fn load_config(path: Option<&PathBuf>) -> speed_report::Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    Ok(config.with_env())
}
