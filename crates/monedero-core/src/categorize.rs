//! Categorization pipeline
//!
//! Turns a ledger snapshot into per-category totals:
//! 1. Optionally filter movements by an inclusive date range
//! 2. Render the `categorize_movements` prompt with the target schema and the ledger
//! 3. Send it to the generation backend
//! 4. Recover a JSON object from the reply and validate it against the taxonomy

use std::collections::HashMap;

use tracing::{debug, info};

use crate::aggregate::filter_by_date;
use crate::ai::parsing::parse_categorized_totals;
use crate::ai::{AIClient, GenerationBackend, GenerationRequest};
use crate::error::Result;
use crate::models::{CategorizedTotals, DateRange, Ledger};
use crate::prompts::{PromptId, PromptLibrary};
use crate::taxonomy::CategoryTaxonomy;

#[derive(Clone)]
pub struct CategorizationPipeline {
    client: AIClient,
    taxonomy: CategoryTaxonomy,
    prompts: PromptLibrary,
}

impl CategorizationPipeline {
    pub fn new(client: AIClient, prompts: PromptLibrary) -> Self {
        Self {
            client,
            taxonomy: CategoryTaxonomy::standard(),
            prompts,
        }
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    /// Build the generation request for a ledger, without sending it
    pub fn build_request(
        &self,
        ledger: &Ledger,
        range: Option<&DateRange>,
        notes: Option<&str>,
    ) -> Result<GenerationRequest> {
        let scoped = match range {
            Some(range) => ledger.with_movements(filter_by_date(&ledger.movements, range)?),
            None => ledger.clone(),
        };

        let schema = self.taxonomy.schema_json();
        let ledger_json = serde_json::to_string_pretty(&scoped)?;
        let notes = notes.map(str::trim).unwrap_or("");

        let mut vars = HashMap::new();
        vars.insert("schema", schema.as_str());
        vars.insert("ledger", ledger_json.as_str());
        vars.insert("notes", notes);

        let prompt = self.prompts.get(PromptId::CategorizeMovements)?;
        let mut request = GenerationRequest::new(prompt.render_user(&vars));
        if let Some(system) = prompt.system_section() {
            request = request.with_system(system);
        }

        debug!(
            movements = scoped.movements.len(),
            filtered = range.is_some(),
            "Built categorization prompt"
        );
        Ok(request)
    }

    /// Categorize the (optionally date-filtered) ledger
    pub async fn categorize(
        &self,
        ledger: &Ledger,
        range: Option<&DateRange>,
        notes: Option<&str>,
    ) -> Result<CategorizedTotals> {
        let request = self.build_request(ledger, range, notes)?;

        let text = self.client.generate(&request).await?;
        debug!("Categorization response: {}", text);

        let totals = parse_categorized_totals(&text, &self.taxonomy)?;
        info!(
            model = %self.client.model(),
            balance = %totals.totals.balance,
            "Categorized movements"
        );
        Ok(totals)
    }
}
