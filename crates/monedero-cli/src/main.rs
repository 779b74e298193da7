//! Monedero CLI - Personal finance assistant
//!
//! Usage:
//!   monedero balance                          Show income, expenses and balance
//!   monedero categorize --from 2024-01-01     Per-category totals via the generation service
//!   monedero analyze "¿En qué gasto más?"     Free-text question about the ledger
//!   monedero serve --port 8000                Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use monedero_core::PromptLibrary;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let store = commands::ledger_store(cli.ledger.as_deref());

    match cli.command {
        Commands::Serve { port, host } => commands::cmd_serve(store, &host, port).await,
        Commands::Balance { json } => commands::cmd_balance(&store, json),
        Commands::Categorize {
            from,
            to,
            notes,
            json,
        } => {
            let client = commands::ai_client(None)?;
            commands::cmd_categorize(
                &store,
                client,
                from.as_deref(),
                to.as_deref(),
                notes.as_deref(),
                json,
            )
            .await
        }
        Commands::Analyze { prompt } => {
            let client = commands::ai_client(None)?;
            commands::cmd_analyze(&store, client, &prompt).await
        }
        Commands::AiTest { model, prompt } => {
            let client = commands::ai_client(model.as_deref())?;
            commands::cmd_ai_test(client, prompt.as_deref()).await
        }
        Commands::Prompts { action } => {
            let library = PromptLibrary::new();
            match action {
                None | Some(PromptsAction::List) => commands::cmd_prompts_list(&library),
                Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&library, &id),
                Some(PromptsAction::Path) => commands::cmd_prompts_path(),
            }
        }
    }
}
