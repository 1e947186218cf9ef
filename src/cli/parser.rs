use crate::export::ExportFormat;
use crate::models::{SessionKind, TelemetryChannel};
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for polegap
#[derive(Parser)]
#[command(
    name = "polegap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rank qualifying laps, compute gaps to pole and chart the telemetry of the front row",
    long_about = None
)]
pub struct Cli {
    /// Override the cache database path
    #[arg(global = true, long = "cache-db")]
    pub cache_db: Option<String>,

    /// Read session data from a local snapshot JSON file instead of OpenF1
    #[arg(global = true, long = "snapshot")]
    pub snapshot: Option<String>,

    /// Serve sessions from the cache only, never touch the network
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which session to load.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Season year, e.g. 2024
    pub year: i32,

    /// Event name, e.g. "Monaco" or "Abu Dhabi Grand Prix"
    pub event: String,

    /// Session type: FP1, FP2, FP3, SQ, S, Q or R (default from config)
    #[arg(long = "session", short = 's')]
    pub session: Option<SessionKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the cache database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check the configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Rank fastest laps, compute gaps to pole and write the charts
    Analyze {
        #[command(flatten)]
        target: SessionArgs,

        /// Directory for the chart files (default from config)
        #[arg(long = "out-dir", short = 'o')]
        out_dir: Option<String>,

        /// Number of drivers shown in the console table
        #[arg(long = "top")]
        top: Option<usize>,

        /// Compare these two drivers instead of the top two, e.g. VER,LEC
        #[arg(long = "drivers")]
        drivers: Option<String>,

        /// Telemetry channel plotted against distance (default: speed)
        #[arg(long = "channel", value_enum)]
        channel: Option<TelemetryChannel>,

        /// Skip telemetry and the comparison chart
        #[arg(long = "no-telemetry")]
        no_telemetry: bool,

        /// Overwrite existing chart files without asking
        #[arg(long = "force")]
        force: bool,
    },

    /// Print the ranking with gaps to pole
    Rank {
        #[command(flatten)]
        target: SessionArgs,

        /// Number of drivers shown (default: all)
        #[arg(long = "top")]
        top: Option<usize>,

        /// Also print the Q1/Q2/Q3 times of every driver
        #[arg(long = "segments")]
        segments: bool,
    },

    /// Export the gap table
    Export {
        #[command(flatten)]
        target: SessionArgs,

        /// Export format
        #[arg(long = "format", value_enum)]
        format: ExportFormat,

        /// Output file
        #[arg(long = "file")]
        file: String,

        /// Overwrite the output file without asking
        #[arg(long = "force")]
        force: bool,
    },

    /// Inspect or purge the session cache
    Cache {
        #[arg(long = "list", help = "List cached sessions")]
        list: bool,

        #[arg(long = "clear", help = "Remove every cached session and telemetry trace")]
        clear: bool,

        #[arg(long = "info", help = "Show cache database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
