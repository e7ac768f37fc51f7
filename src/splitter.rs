use rusqlite::Connection;

use crate::db;
use crate::editor::{edit, EditAudit};
use crate::error::{Result, TallyError};
use crate::models::{round2, Transaction};
use crate::query::{Filter, InsertRequest, SelectRequest, UpdateRequest};

/// How much of the original moves into the split-off row.
#[derive(Debug, Clone, Copy)]
pub enum SplitSpec {
    /// Explicit amount; magnitude must not exceed the original's.
    Amount(f64),
    /// Non-negative fraction of the original; values >= 1 are whole percent.
    Percentage(f64),
}

impl Default for SplitSpec {
    fn default() -> Self {
        Self::Percentage(50.0)
    }
}

pub struct SplitOutcome {
    /// Pre-split snapshot, exactly as archived.
    pub original: Transaction,
    /// The original row after its amount was reduced.
    pub remaining: Transaction,
    /// The newly inserted split-off row.
    pub new_row: Transaction,
    pub audit: EditAudit,
}

/// Divide one transaction into two whose amounts sum to the original and
/// whose running totals reconstruct the original post-transaction balance:
/// applied in either order, the ledger ends where it started.
pub fn split_transaction(
    conn: &mut Connection,
    selector: &SelectRequest,
    spec: SplitSpec,
) -> Result<SplitOutcome> {
    if !db::table_exists(conn, "splits")? {
        db::create_table(conn, "splits")?;
    }

    let rows = db::select(conn, &selector.all_columns())?;
    if rows.len() != 1 {
        return Err(TallyError::AmbiguousSelection(format!(
            "{} rows matched, expected 1",
            rows.len()
        )));
    }
    let original = Transaction::from_row(&rows[0])?;
    let trans_id = original
        .trans_id
        .ok_or_else(|| TallyError::Integrity("transaction row without id".to_string()))?;

    let new_amount = match spec {
        SplitSpec::Amount(amount) => {
            if amount.abs() > original.amount.abs() {
                return Err(TallyError::Validation(format!(
                    "split amount {} exceeds original {}",
                    amount, original.amount
                )));
            }
            amount
        }
        SplitSpec::Percentage(pct) => {
            // a negative fraction would flip the split's sign and grow the
            // remaining amount past the original
            if pct < 0.0 {
                return Err(TallyError::Validation(format!(
                    "percentage must be non-negative, got {pct}"
                )));
            }
            let fraction = if pct >= 1.0 { pct / 100.0 } else { pct };
            original.amount * fraction
        }
    };
    let new_amount = round2(new_amount);

    // Running total immediately before the original was applied.
    let prior_total = round2(original.total_id + original.amount);

    let remaining = Transaction {
        amount: round2(original.amount - new_amount),
        total_id: round2(prior_total + original.amount - new_amount),
        ..original.clone()
    };
    let new_row = Transaction {
        trans_id: None,
        amount: new_amount,
        total_id: prior_total,
        ..original.clone()
    };

    let tx = conn.transaction()?;

    // Archive the pre-split snapshot verbatim; it is never touched again.
    db::insert(
        &tx,
        &InsertRequest::new("splits")
            .value("trans_id", trans_id)
            .value("date", original.date.clone())
            .value("desc", original.desc.clone())
            .value("amount", original.amount)
            .value("total_id", original.total_id),
    )?;

    let audit = edit(
        &tx,
        &UpdateRequest::new("transactions")
            .set("amount", remaining.amount)
            .set("total_id", remaining.total_id)
            .filter(Filter::eq("trans_id", trans_id)),
    )?;

    // Fresh auto-generated id: the id column is omitted from the insert.
    db::insert(
        &tx,
        &InsertRequest::new("transactions")
            .value("date", new_row.date.clone())
            .value("desc", new_row.desc.clone())
            .value("amount", new_row.amount)
            .value("total_id", new_row.total_id)
            .value("acc_id", new_row.acc_id),
    )?;

    tx.commit()?;

    Ok(SplitOutcome {
        original,
        remaining,
        new_row,
        audit,
    })
}
