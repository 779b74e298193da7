//! JSON parsing helpers for generation responses
//!
//! Models often wrap the JSON payload in prose. Extraction first tries the whole
//! text, then falls back to the substring from the first `{` to the last `}`.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{CategorizedTotals, Totals};
use crate::taxonomy::CategoryTaxonomy;

const EXCERPT_CHARS: usize = 200;

/// Recover a JSON object from free model text
///
/// Fails with `MalformedResponse` when neither the full text nor the bracket-scanned
/// substring decodes, or when the decoded value is not an object.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    let text = text.trim();

    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => {
            let start = text.find('{');
            let end = text.rfind('}');
            match (start, end) {
                (Some(s), Some(e)) if s < e => serde_json::from_str::<Value>(&text[s..=e])
                    .map_err(|e| {
                        Error::MalformedResponse(format!(
                            "Invalid JSON from model: {} | Raw: {}",
                            e,
                            excerpt(text)
                        ))
                    })?,
                _ => {
                    return Err(Error::MalformedResponse(format!(
                        "No JSON found in model response | Raw: {}",
                        excerpt(text)
                    )))
                }
            }
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::MalformedResponse(format!(
            "Expected a JSON object from model, got: {}",
            excerpt(&other.to_string())
        ))),
    }
}

/// Parse and validate a categorization response against the taxonomy
///
/// Buckets the model left out are filled with zero.
pub fn parse_categorized_totals(
    text: &str,
    taxonomy: &CategoryTaxonomy,
) -> Result<CategorizedTotals> {
    let object = extract_json_object(text)?;

    let income = parse_buckets(&object, "ingresos", taxonomy.income())?;
    let expenses = parse_buckets(&object, "gastos", taxonomy.expenses())?;

    let totals_obj = section(&object, "totales")?;
    let total_income = required_amount(totals_obj, "totales", "total_ingresos")?;
    let total_expenses = required_amount(totals_obj, "totales", "total_gastos")?;
    let balance = required_amount(totals_obj, "totales", "balance")?;

    for (name, value) in [
        ("total_ingresos", total_income),
        ("total_gastos", total_expenses),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::Validation(format!(
                "totales.{} must not be negative (got {})",
                name, value
            )));
        }
    }

    let expected = (total_income - total_expenses).round_dp(2);
    if balance.round_dp(2) != expected {
        return Err(Error::Validation(format!(
            "totales.balance {} does not equal total_ingresos - total_gastos ({})",
            balance, expected
        )));
    }

    Ok(CategorizedTotals {
        income,
        expenses,
        totals: Totals {
            total_income,
            total_expenses,
            balance,
        },
    })
}

fn section<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Map<String, Value>> {
    match object.get(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(Error::Validation(format!("'{}' must be an object", key))),
        None => Err(Error::Validation(format!(
            "Model response is missing '{}'",
            key
        ))),
    }
}

fn parse_buckets(
    object: &Map<String, Value>,
    key: &str,
    labels: &[&str],
) -> Result<BTreeMap<String, Decimal>> {
    let map = section(object, key)?;

    let mut buckets: BTreeMap<String, Decimal> = labels
        .iter()
        .map(|label| (label.to_string(), Decimal::ZERO))
        .collect();

    for (label, value) in map {
        if !labels.contains(&label.as_str()) {
            return Err(Error::Validation(format!(
                "Unknown category '{}' in '{}'",
                label, key
            )));
        }
        let amount = amount(value, key, label)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::Validation(format!(
                "{}.{} must not be negative (got {})",
                key, label, amount
            )));
        }
        buckets.insert(label.clone(), amount);
    }

    Ok(buckets)
}

fn required_amount(map: &Map<String, Value>, section: &str, key: &str) -> Result<Decimal> {
    let value = map.get(key).ok_or_else(|| {
        Error::Validation(format!("'{}' is missing '{}'", section, key))
    })?;
    amount(value, section, key)
}

/// Decimal from a JSON number or numeric string
fn amount(value: &Value, section: &str, key: &str) -> Result<Decimal> {
    let parsed = match value {
        Value::Number(n) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        Value::String(s) => {
            let raw = s.trim();
            Decimal::from_str(raw)
                .or_else(|_| Decimal::from_scientific(raw))
                .ok()
        }
        _ => None,
    };

    parsed.ok_or_else(|| {
        Error::Validation(format!(
            "{}.{} is not a number (got {})",
            section, key, value
        ))
    })
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        format!("{}...", text.chars().take(EXCERPT_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}
