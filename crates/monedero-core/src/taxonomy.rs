//! Fixed category taxonomy
//!
//! Labels are defined at compile time and are not editable at runtime. The order is
//! the order shown to the model in the target schema.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{CategorizedTotals, Totals};

/// Income categories, in schema order
pub const INCOME_CATEGORIES: &[&str] = &[
    "Sueldo",
    "Monto inicial",
    "Regalos",
    "Prestamos recibidos",
    "Otros",
];

/// Expense categories, in schema order
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Comida",
    "Transporte",
    "Telefonía",
    "Entretenimiento",
    "Gimnasio",
    "Hogar",
    "Otros",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTaxonomy {
    income: &'static [&'static str],
    expenses: &'static [&'static str],
}

impl CategoryTaxonomy {
    pub fn standard() -> Self {
        Self {
            income: INCOME_CATEGORIES,
            expenses: EXPENSE_CATEGORIES,
        }
    }

    pub fn income(&self) -> &'static [&'static str] {
        self.income
    }

    pub fn expenses(&self) -> &'static [&'static str] {
        self.expenses
    }

    /// Result with every bucket present and all amounts zero
    pub fn zeroed(&self) -> CategorizedTotals {
        CategorizedTotals {
            income: zero_buckets(self.income),
            expenses: zero_buckets(self.expenses),
            totals: Totals {
                total_income: Decimal::ZERO,
                total_expenses: Decimal::ZERO,
                balance: Decimal::ZERO,
            },
        }
    }

    /// Target JSON schema as shown to the model, in taxonomy order
    pub fn schema_json(&self) -> String {
        let mut out = String::from("{\n");
        out.push_str(&schema_block("ingresos", self.income));
        out.push_str(",\n");
        out.push_str(&schema_block("gastos", self.expenses));
        out.push_str(",\n");
        out.push_str(&schema_block(
            "totales",
            &["total_ingresos", "total_gastos", "balance"],
        ));
        out.push_str("\n}");
        out
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

fn zero_buckets(labels: &[&str]) -> BTreeMap<String, Decimal> {
    labels
        .iter()
        .map(|label| (label.to_string(), Decimal::ZERO))
        .collect()
}

fn schema_block(name: &str, keys: &[&str]) -> String {
    let lines = keys
        .iter()
        .map(|key| format!("    {}: 0", quote(key)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("  {}: {{\n{}\n  }}", quote(name), lines)
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
