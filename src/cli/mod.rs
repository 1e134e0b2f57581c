//! CLI module for Kotae.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kotae - bilingual retrieval-augmented chatbot
///
/// Answers questions about Kenichi Ohmae's thinking in Japanese or English,
/// tracking the conversation so follow-ups and reactions are understood.
#[derive(Parser, Debug)]
#[command(name = "kotae")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "KOTAE_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question
    Ask {
        /// The message to send
        message: String,
    },

    /// Show how a message is classified
    Classify {
        /// The message to classify
        message: String,
    },

    /// Search the passage corpus
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::parse_from(["kotae", "-vv", "classify", "怖い"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Classify { ref message } if message == "怖い"));

        let cli = Cli::parse_from(["kotae", "serve", "--port", "8080"]);
        assert!(matches!(cli.command, Commands::Serve { host: None, port: Some(8080) }));

        let cli = Cli::parse_from(["kotae", "search", "経営", "-l", "2"]);
        assert!(matches!(cli.command, Commands::Search { limit: 2, .. }));
    }
}
