use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quickcut")]
#[command(author, version, about = "Preview local videos and export lossless segments")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the local web server
    Serve {
        /// Host to bind to (overrides config and QUICKCUT_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and QUICKCUT_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Cut one or more segments out of a file
    Cut {
        /// Source video file
        #[arg(required = true)]
        file: PathBuf,

        /// Segment as START-END, e.g. 0:05-0:15 (repeatable)
        #[arg(short, long = "segment", value_name = "START-END", required = true)]
        segments: Vec<String>,

        /// Move the source to the trash when every segment succeeds
        #[arg(long)]
        trash: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
