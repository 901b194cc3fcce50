use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::LogDestination;

/// Command-line arguments for the curator client.
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(about = "Browse curator profiles and playlists from the terminal")]
#[command(version)]
pub struct Cli {
    /// RON config file; `./curator.ron` is used when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "CURATOR_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "CURATOR_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value = "terminal", global = true)]
    pub log: LogDestination,

    /// Session file, overriding the config
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show a member's profile and curations
    Profile {
        username: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show the signed-in member, caching it as the session
    Me {
        /// Ignore the cached session and ask the backend
        #[arg(long)]
        refresh: bool,
    },
    /// Show one curation with its link previews
    Curation { id: i64 },
    /// Edit the signed-in member's profile; omitted fields keep their value
    UpdateProfile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        introduce: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        profile_image: Option<String>,
    },
    /// Delete the signed-in member's account
    DeleteAccount {
        /// Required; the deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
    /// Forget the cached session
    Logout,
    /// List playlists, or show one
    Playlists {
        #[arg(long)]
        id: Option<i64>,
        /// Show recommendations for the playlist given by --id
        #[arg(long, requires = "id")]
        recommend: bool,
        /// List liked playlists instead of your own
        #[arg(long, conflicts_with = "id")]
        liked: bool,
    },
}
