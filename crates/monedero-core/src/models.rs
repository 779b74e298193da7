//! Data models for Monedero
//!
//! Wire names follow the ledger file and the dashboard contract (`fecha`, `monto`,
//! `ingresos`, ...). Rust field names are English.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used by the ledger file and the HTTP API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKind {
    Income,
    Expense,
}

impl MovementKind {
    /// Parse a kind label, case-insensitively
    ///
    /// Accepts the ledger's Spanish labels (`ingreso`, `gasto`) and their English
    /// equivalents. Anything else is not a kind.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "ingreso" | "income" => Some(Self::Income),
            "gasto" | "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Label as written in the ledger file
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Income => "ingreso",
            Self::Expense => "gasto",
        }
    }
}

/// A single recorded income or expense entry
///
/// The date keeps its textual form; it is parsed only by operations that need it
/// (date filtering), so a bad date does not prevent summing the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(
        rename = "descripcion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Movement {
    pub fn new(date: &str, amount: Decimal, kind: MovementKind) -> Self {
        Self {
            date: date.to_string(),
            amount,
            kind: kind.as_label().to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Kind of this movement, if the label is recognized
    pub fn kind(&self) -> Option<MovementKind> {
        MovementKind::from_label(&self.kind)
    }

    /// Parsed calendar date
    pub fn parsed_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            Error::Validation(format!(
                "Invalid movement date '{}' (use YYYY-MM-DD)",
                self.date
            ))
        })
    }
}

/// The ledger document
///
/// Top-level keys other than `movimientos` are kept as-is so they can be forwarded
/// to the generation service together with the movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "movimientos")]
    pub movements: Vec<Movement>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Ledger {
    pub fn new(movements: Vec<Movement>) -> Self {
        Self {
            movements,
            extra: serde_json::Map::new(),
        }
    }

    /// Parse a ledger document from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Parse(format!("Invalid ledger JSON: {}", e)))
    }

    /// Copy of this ledger holding a different set of movements
    pub fn with_movements(&self, movements: Vec<Movement>) -> Self {
        Self {
            movements,
            extra: self.extra.clone(),
        }
    }
}

/// Inclusive date range; a missing bound is unbounded on that side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Parse optional `YYYY-MM-DD` bounds
    ///
    /// Empty strings count as absent. Returns `None` when both bounds are absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>> {
        let start = parse_bound(start, "start")?;
        let end = parse_bound(end, "end")?;

        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        Ok(Some(Self { start, end }))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }

    /// True when `start > end` (no date can match)
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }
}

fn parse_bound(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                Error::Validation(format!(
                    "Invalid {} date '{}' (use YYYY-MM-DD)",
                    name, s
                ))
            }),
        None => Ok(None),
    }
}

/// Income, expense and balance over a set of movements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    #[serde(rename = "ingresos")]
    pub income: Decimal,
    #[serde(rename = "gastos")]
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Summary block of a categorization result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "total_ingresos")]
    pub total_income: Decimal,
    #[serde(rename = "total_gastos")]
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

/// Per-category totals produced by the categorization pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTotals {
    #[serde(rename = "ingresos")]
    pub income: BTreeMap<String, Decimal>,
    #[serde(rename = "gastos")]
    pub expenses: BTreeMap<String, Decimal>,
    #[serde(rename = "totales")]
    pub totals: Totals,
}
