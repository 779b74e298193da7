//! Monedero Core Library
//!
//! Shared functionality for the Monedero personal finance assistant:
//! - Ledger store over a local JSON file of movements
//! - Balance and date-range aggregation
//! - Fixed category taxonomy
//! - Pluggable text generation backends (Gemini, OpenAI-compatible, mock)
//! - Prompt library for customizable prompts
//! - Categorization pipeline with response recovery and validation
//! - Free-text ledger analysis

pub mod aggregate;
pub mod ai;
pub mod analyze;
pub mod categorize;
pub mod error;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod taxonomy;

/// Test utilities including a mock generation server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{balance, filter_by_date, get_balance};
pub use ai::{
    AIClient, AIConfig, BackendInfo, BackendKind, GeminiBackend, GenerationBackend,
    GenerationRequest, MockBackend, MockReply, OpenAICompatibleBackend,
};
pub use analyze::Analyst;
pub use categorize::CategorizationPipeline;
pub use error::{Error, Result};
pub use ledger::{LedgerStore, DEFAULT_LEDGER_FILE};
pub use models::{BalanceSummary, CategorizedTotals, DateRange, Ledger, Movement, MovementKind, Totals};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary, PromptSource};
pub use taxonomy::CategoryTaxonomy;
