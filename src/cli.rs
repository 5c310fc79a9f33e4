use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropadvisor",
    version,
    about = "Crop, fertilizer and plant disease advisory service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind host, overrides server.host
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Rank crops for a JSON request (file or stdin)
    Crop(AdviceArgs),
    /// Build a fertilizer plan for a JSON request (file or stdin)
    Fertilizer(AdviceArgs),
    /// Analyze a soil test given as JSON (file or stdin)
    Soil {
        /// Request file, stdin when omitted
        input: Option<PathBuf>,
    },
    /// Print stored records as JSON
    History {
        #[arg(value_enum)]
        kind: HistoryKind,
        /// Only this user's records
        #[arg(short, long)]
        user: Option<String>,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Browse stored records in the terminal
    Dashboard {
        /// Only this user's records
        #[arg(short, long)]
        user: Option<String>,
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Print the active catalog as YAML
    Catalog,
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

#[derive(clap::Args)]
pub struct AdviceArgs {
    /// Request file, stdin when omitted
    pub input: Option<PathBuf>,
    /// Store the result in the history database
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryKind {
    Crop,
    Fertilizer,
    Disease,
}
