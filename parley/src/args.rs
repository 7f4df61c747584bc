use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parley LLM client
#[derive(Debug, Parser)]
#[command(name = "parley", about = "Talk to any supported LLM backend through one interface")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered providers
    Providers,

    /// Send one message and print the reply
    Ask {
        /// Provider to use (defaults to `ai.default_provider`)
        #[arg(short, long)]
        provider: Option<String>,

        /// System prompt sent ahead of the message
        #[arg(short, long, default_value = "")]
        system: String,

        /// Message text
        prompt: String,
    },
}
