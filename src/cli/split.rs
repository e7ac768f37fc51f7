use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::value_table;
use crate::query::SelectRequest;
use crate::settings::db_path;
use crate::splitter::{split_transaction, SplitSpec};

pub fn run(filters: &[String], percentage: Option<f64>, amount: Option<f64>) -> Result<()> {
    let mut conn = get_connection(&db_path())?;

    let mut selector = SelectRequest::new("transactions");
    selector.filters = super::parse_filters(filters)?;

    let spec = if let Some(amount) = amount {
        SplitSpec::Amount(amount)
    } else if let Some(pct) = percentage {
        SplitSpec::Percentage(pct)
    } else {
        SplitSpec::default()
    };

    let outcome = split_transaction(&mut conn, &selector, spec)?;

    println!("Pre-Update:");
    println!("{}", value_table(outcome.audit.header, &outcome.audit.before));
    println!("Post-Update:");
    println!("{}", value_table(outcome.audit.header, &outcome.audit.after));
    println!(
        "Split {:.2} into {:.2} and {:.2} (running total {:.2}); original archived.",
        outcome.original.amount,
        outcome.remaining.amount,
        outcome.new_row.amount,
        outcome.new_row.total_id
    );
    Ok(())
}
