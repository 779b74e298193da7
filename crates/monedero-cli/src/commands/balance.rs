//! Balance command implementation

use anyhow::{Context, Result};
use monedero_core::{get_balance, BalanceSummary, LedgerStore};

/// Show income, expenses and balance of the whole ledger
pub fn cmd_balance(store: &LedgerStore, json: bool) -> Result<()> {
    let summary = get_balance(store)
        .with_context(|| format!("Failed to read ledger {}", store.path().display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_balance(&summary));
    }

    Ok(())
}

pub fn format_balance(summary: &BalanceSummary) -> String {
    format!(
        "Ingresos: {:>14.2}\nGastos:   {:>14.2}\nBalance:  {:>14.2}\n",
        summary.income, summary.expenses, summary.balance
    )
}
