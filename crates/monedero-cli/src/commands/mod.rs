//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ai` - Generation backend connection test
//! - `analyze` - Free-text questions about the ledger
//! - `balance` - Ledger balance
//! - `categorize` - Per-category totals via the generation service
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod ai;
pub mod analyze;
pub mod balance;
pub mod categorize;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use ai::*;
pub use analyze::*;
pub use balance::*;
pub use categorize::*;
pub use prompts::*;
pub use serve::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use monedero_core::{AIClient, AIConfig, LedgerStore, DEFAULT_LEDGER_FILE};
use tracing::debug;

/// Ledger path from the `--ledger` flag, then `MONEDERO_LEDGER`, then the default file
pub fn resolve_ledger_path(flag: Option<&Path>, env: Option<String>) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => env
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_FILE)),
    }
}

/// Open the ledger store for this invocation
pub fn ledger_store(flag: Option<&Path>) -> LedgerStore {
    let path = resolve_ledger_path(flag, std::env::var("MONEDERO_LEDGER").ok());
    debug!("Using ledger {}", path.display());
    LedgerStore::new(path)
}

/// Build the generation client from the environment
pub fn ai_client(model: Option<&str>) -> Result<AIClient> {
    let config = AIConfig::from_env();
    let client = AIClient::from_config(&config).context("Generation backend not available")?;
    Ok(match model {
        Some(model) => client.with_model(model),
        None => client,
    })
}
