use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Digital signage server: class schedule and media playlist
#[derive(Parser, Debug)]
#[command(name = "videotimeline", author, version, about, long_about = None)]
pub struct Cli {
    /// Custom configuration directory (overrides VIDEOTIMELINE_CONFIG)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// HTTP port (overrides host.http_port)
        #[arg(short = 'p', long = "port", value_name = "PORT")]
        port: Option<u16>,
    },

    /// Regenerate the playlist from the media directory
    Generate {
        /// Print the generated playlist as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how each media file would be classified
    Analyze {
        /// Media directory to analyze (defaults to the configured one)
        #[arg(value_name = "DIR")]
        media_dir: Option<PathBuf>,
    },

    /// Print the classification rules
    Rules,
}
