//! Free-text analysis command implementation

use anyhow::{Context, Result};
use monedero_core::{AIClient, Analyst, LedgerStore, PromptLibrary};

/// Ask the generation service a question about the whole ledger
pub async fn cmd_analyze(store: &LedgerStore, client: AIClient, prompt: &str) -> Result<()> {
    let ledger = store
        .load()
        .with_context(|| format!("Failed to read ledger {}", store.path().display()))?;

    let analyst = Analyst::new(client, PromptLibrary::new());
    let answer = analyst
        .analyze(&ledger, prompt)
        .await
        .context("Analysis failed")?;

    println!("{}", answer);
    Ok(())
}
