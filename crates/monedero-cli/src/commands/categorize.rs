//! Categorization command implementation

use anyhow::{Context, Result};
use monedero_core::{
    AIClient, CategorizationPipeline, CategorizedTotals, CategoryTaxonomy, DateRange,
    LedgerStore, PromptLibrary,
};

/// Categorize the ledger (optionally within a date range) and print the totals
pub async fn cmd_categorize(
    store: &LedgerStore,
    client: AIClient,
    from: Option<&str>,
    to: Option<&str>,
    notes: Option<&str>,
    json: bool,
) -> Result<()> {
    let range = DateRange::parse(from, to)?;
    let ledger = store
        .load()
        .with_context(|| format!("Failed to read ledger {}", store.path().display()))?;

    let pipeline = CategorizationPipeline::new(client, PromptLibrary::new());
    let totals = pipeline
        .categorize(&ledger, range.as_ref(), notes)
        .await
        .context("Categorization failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print!("{}", format_categorized(&totals, pipeline.taxonomy()));
    }

    Ok(())
}

/// Render totals as a table, in taxonomy order
pub fn format_categorized(totals: &CategorizedTotals, taxonomy: &CategoryTaxonomy) -> String {
    let mut out = String::new();

    out.push_str("Ingresos\n");
    for label in taxonomy.income() {
        if let Some(amount) = totals.income.get(*label) {
            out.push_str(&format!("  {:<22} {:>12.2}\n", label, amount));
        }
    }

    out.push_str("Gastos\n");
    for label in taxonomy.expenses() {
        if let Some(amount) = totals.expenses.get(*label) {
            out.push_str(&format!("  {:<22} {:>12.2}\n", label, amount));
        }
    }

    out.push_str(&format!("{}\n", "-".repeat(37)));
    out.push_str(&format!(
        "  {:<22} {:>12.2}\n",
        "Total ingresos", totals.totals.total_income
    ));
    out.push_str(&format!(
        "  {:<22} {:>12.2}\n",
        "Total gastos", totals.totals.total_expenses
    ));
    out.push_str(&format!(
        "  {:<22} {:>12.2}\n",
        "Balance", totals.totals.balance
    ));
    out
}
