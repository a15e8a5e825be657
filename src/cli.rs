//! CLI definitions for PagePilot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PagePilot CLI.
#[derive(Parser)]
#[command(name = "pagepilot")]
#[command(about = "Chat about a web page and let the model act on it")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.pagepilot/config.toml)
    #[arg(short, long, global = true, env = "PAGEPILOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the page context sent with chat requests, and the inferred topic
    Context {
        /// Page path or http(s) URL
        page: String,
    },

    /// Show the commands and rendered triggers in a model response
    Parse {
        /// File holding the model response
        file: PathBuf,
    },

    /// Run a model response against a page
    Apply {
        /// Page path or http(s) URL
        page: String,

        /// File holding the model response
        #[arg(short, long)]
        response: PathBuf,

        /// JSON array of canned completions for translate/summarize
        #[arg(long)]
        completions: Option<PathBuf>,

        /// Where to write the resulting page HTML
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Chat about a page, one message per stdin line
    Chat {
        /// Page path or http(s) URL
        page: String,

        /// JSON array of canned completions, consumed in order
        #[arg(long)]
        completions: PathBuf,

        /// Where to write the resulting page HTML
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
