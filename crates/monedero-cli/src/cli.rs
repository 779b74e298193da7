//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Monedero - Personal finance assistant
#[derive(Parser)]
#[command(name = "monedero")]
#[command(about = "Ledger balance and AI-assisted categorization of personal finances", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file path (default: $MONEDERO_LEDGER or finanzas.json)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show income, expenses and balance of the ledger
    Balance {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Categorize movements with the generation service
    Categorize {
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Extra instructions for the model
        #[arg(long)]
        notes: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a free-text question about the ledger
    Analyze {
        /// The question or instruction
        prompt: String,
    },

    /// Test the generation backend connection
    AiTest {
        /// Override the configured model
        #[arg(long)]
        model: Option<String>,

        /// Prompt to send (default: a short greeting)
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Manage prompt templates
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., categorize_movements)
        id: String,
    },

    /// Show the override directory path
    Path,
}
