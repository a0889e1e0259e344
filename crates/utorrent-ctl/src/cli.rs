use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use utorrent_types::Priority;

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Overrides UTORRENT_HOST.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Overrides UTORRENT_PORT.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations against the WebUI.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List all torrents.
    List,
    /// Show one torrent.
    Get {
        /// Torrent hash.
        hash: String,
    },
    /// Add a torrent from a URL or magnet link.
    AddUrl {
        /// URL or magnet link.
        url: String,
    },
    /// Upload a .torrent file.
    AddFile {
        /// Path to the .torrent file.
        path: PathBuf,
    },
    /// Start torrents.
    Start(Hashes),
    /// Stop torrents.
    Stop(Hashes),
    /// Pause torrents.
    Pause(Hashes),
    /// Force start torrents.
    ForceStart(Hashes),
    /// Unpause torrents.
    Unpause(Hashes),
    /// Recheck torrents.
    Recheck(Hashes),
    /// Remove torrents, keeping their data.
    Remove(Hashes),
    /// Remove torrents and delete their data.
    RemoveData(Hashes),
    /// List the files of torrents.
    Files(Hashes),
    /// Show the properties of torrents.
    Props(Hashes),
    /// Set the priority of files within a torrent.
    Priority {
        /// Torrent hash.
        hash: String,
        /// New priority.
        #[arg(value_enum)]
        priority: CliPriority,
        /// File indices, as listed by `files`.
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Show all client settings.
    Settings,
    /// Change a client setting.
    SetSetting {
        /// Setting name, e.g. max_ul_rate.
        name: String,
        /// New value.
        value: String,
    },
}

/// One or more torrent hashes.
#[derive(Debug, Clone, Args)]
pub(crate) struct Hashes {
    /// Torrent hashes.
    #[arg(required = true)]
    pub hashes: Vec<String>,
}

/// CLI representation of a file priority.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CliPriority {
    Skip,
    Low,
    Normal,
    High,
}

impl From<CliPriority> for Priority {
    fn from(cli: CliPriority) -> Self {
        match cli {
            CliPriority::Skip => Priority::Skip,
            CliPriority::Low => Priority::Low,
            CliPriority::Normal => Priority::Normal,
            CliPriority::High => Priority::High,
        }
    }
}
