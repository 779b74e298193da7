//! Free-text ledger analysis
//!
//! Sends the whole ledger and a user instruction to the generation backend and
//! returns the model's answer as plain text.

use std::collections::HashMap;

use tracing::debug;

use crate::ai::{AIClient, GenerationBackend, GenerationRequest};
use crate::error::{Error, Result};
use crate::models::Ledger;
use crate::prompts::{PromptId, PromptLibrary};

#[derive(Clone)]
pub struct Analyst {
    client: AIClient,
    prompts: PromptLibrary,
}

impl Analyst {
    pub fn new(client: AIClient, prompts: PromptLibrary) -> Self {
        Self { client, prompts }
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    /// Answer `instruction` about the ledger
    ///
    /// A blank instruction fails with `Validation` before anything is sent.
    pub async fn analyze(&self, ledger: &Ledger, instruction: &str) -> Result<String> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(Error::Validation("Analysis instruction is empty".into()));
        }

        let ledger_json = serde_json::to_string(ledger)?;
        let mut vars = HashMap::new();
        vars.insert("instruction", instruction);
        vars.insert("ledger", ledger_json.as_str());

        let prompt = self.prompts.get(PromptId::AnalyzeLedger)?;
        let mut request = GenerationRequest::new(prompt.render_user(&vars));
        if let Some(system) = prompt.system_section() {
            request = request.with_system(system);
        }

        let text = self.client.generate(&request).await?;
        let answer = text.trim();
        if answer.is_empty() {
            return Err(Error::Upstream("Model returned an empty answer".into()));
        }

        debug!(chars = answer.len(), "Analysis answer received");
        Ok(answer.to_string())
    }
}
