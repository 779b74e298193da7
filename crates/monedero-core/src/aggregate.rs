//! Aggregations over ledger movements

use rust_decimal::Decimal;

use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::{BalanceSummary, DateRange, Movement, MovementKind};

/// Sum income and expense movements
///
/// Movements whose kind label is not recognized count toward neither side.
pub fn balance(movements: &[Movement]) -> BalanceSummary {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;

    for movement in movements {
        match movement.kind() {
            Some(MovementKind::Income) => income += movement.amount,
            Some(MovementKind::Expense) => expenses += movement.amount,
            None => {}
        }
    }

    BalanceSummary {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Keep movements dated within `range` (inclusive on both ends)
///
/// Every movement date is parsed; a single unparsable date fails the whole call.
pub fn filter_by_date(movements: &[Movement], range: &DateRange) -> Result<Vec<Movement>> {
    let mut kept = Vec::new();
    for movement in movements {
        let date = movement.parsed_date()?;
        if range.contains(date) {
            kept.push(movement.clone());
        }
    }
    Ok(kept)
}

/// Balance over the whole ledger, loaded fresh from the store
pub fn get_balance(store: &LedgerStore) -> Result<BalanceSummary> {
    let ledger = store.load()?;
    Ok(balance(&ledger.movements))
}
