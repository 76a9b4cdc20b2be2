//! Command-line interface for strictly_sync.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Sync - authority server and long-poll client for duet boards
#[derive(Parser, Debug)]
#[command(name = "strictly_sync")]
#[command(about = "Event-log authority and sync client for a two-sided word board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host the authoritative event log over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Board file (TOML) describing the game to host
        #[arg(short, long)]
        board: PathBuf,

        /// Seconds an idle long poll is held open
        #[arg(long, default_value = "30")]
        hold_secs: u64,
    },

    /// Follow a game and log every status change
    Watch {
        /// Path to client configuration file
        #[arg(short, long, default_value = "client.toml")]
        config: PathBuf,

        /// Override the server URL
        #[arg(long)]
        server_url: Option<String>,

        /// Override the game to follow
        #[arg(long)]
        game_id: Option<String>,

        /// Override the display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Submit one guess and print the resulting status
    Guess {
        /// Path to client configuration file
        #[arg(short, long, default_value = "client.toml")]
        config: PathBuf,

        /// Cell index (0-24)
        #[arg(short, long, allow_negative_numbers = true)]
        index: i64,
    },

    /// Take a side
    Join {
        /// Path to client configuration file
        #[arg(short, long, default_value = "client.toml")]
        config: PathBuf,

        /// Side to take (a or b)
        #[arg(short, long, value_parser = parse_side)]
        side: strictly_duet::Side,
    },

    /// Give up the held side
    Leave {
        /// Path to client configuration file
        #[arg(short, long, default_value = "client.toml")]
        config: PathBuf,
    },

    /// Post a chat message
    Chat {
        /// Path to client configuration file
        #[arg(short, long, default_value = "client.toml")]
        config: PathBuf,

        /// Message text
        message: String,
    },
}

fn parse_side(s: &str) -> Result<strictly_duet::Side, String> {
    strictly_duet::Side::from_label(s).ok_or_else(|| format!("expected a or b, got {:?}", s))
}
