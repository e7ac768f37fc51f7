pub mod accounts;
pub mod edit;
pub mod import;
pub mod init;
pub mod split;
pub mod tag;
pub mod view;

use clap::{Parser, Subcommand};
use rusqlite::types::Value;

use crate::error::{Result, TallyError};
use crate::query::{Filter, Op};

/// Type a raw value as integer, then float, then text.
fn typed_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Real(f)
    } else {
        Value::Text(raw.to_string())
    }
}

/// Parse a `column=value` assignment pair.
pub(crate) fn parse_kv(raw: &str) -> Result<(String, Value)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| TallyError::Validation(format!("expected column=value, got '{raw}'")))?;
    Ok((column.to_string(), typed_value(value)))
}

// two-character operators must come before their one-character prefixes
const FILTER_OPS: [(&str, Op); 7] = [
    ("!=", Op::Ne),
    (">=", Op::Ge),
    ("<=", Op::Le),
    (">", Op::Gt),
    ("<", Op::Lt),
    ("~", Op::Like),
    ("=", Op::Eq),
];

/// Parse a `column<op>value` filter; `~` is LIKE, with the caller supplying
/// any `%` wildcards.
pub(crate) fn parse_filter(raw: &str) -> Result<Filter> {
    for (token, op) in FILTER_OPS {
        if let Some((column, value)) = raw.split_once(token) {
            return Ok(Filter::new(column.trim(), op, typed_value(value)));
        }
    }
    Err(TallyError::Validation(format!(
        "expected column<op>value with one of = != < <= > >= ~, got '{raw}'"
    )))
}

pub(crate) fn parse_filters(raw: &[String]) -> Result<Vec<Filter>> {
    raw.iter().map(|pair| parse_filter(pair)).collect()
}

#[derive(Parser)]
#[command(name = "tally", about = "Personal finance ledger: import, split, tag, audit.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and create the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Import statement data for an account (by id, number, or description).
    Import {
        /// Account identifier
        account: String,
    },
    /// View table rows, with an amount total when applicable.
    View {
        /// Table name
        table: String,
        /// Comma-separated column list (default: all)
        #[arg(long)]
        columns: Option<String>,
        /// Row filter, e.g. amount<0 or desc~%COFFEE% (repeatable)
        #[arg(long = "where")]
        filters: Vec<String>,
    },
    /// Split one transaction into two, archiving the original.
    Split {
        /// Selector, e.g. trans_id=7 (repeatable); must match exactly one row
        #[arg(long = "where", required = true)]
        filters: Vec<String>,
        /// Percentage of the amount to split off (default 50)
        #[arg(long, conflicts_with = "amount")]
        percentage: Option<f64>,
        /// Exact amount to split off
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Edit rows, showing before/after state.
    Edit {
        /// Table name
        table: String,
        /// Column assignment, column=value (repeatable)
        #[arg(long = "set", required = true)]
        sets: Vec<String>,
        /// Row filter, e.g. desc=COFFEE or amount<0 (repeatable)
        #[arg(long = "where")]
        filters: Vec<String>,
    },
    /// Tag rows with a label, creating the tag on first use.
    Tag {
        /// Table whose rows are being tagged
        table: String,
        /// Tag id or description
        tag: String,
        /// Row filter, e.g. desc=COFFEE or amount<0 (repeatable)
        #[arg(long = "where")]
        filters: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account number, e.g. '1001'
        num: String,
        /// Institution tag: TD, QT, crypto
        #[arg(long)]
        institution: String,
        /// Free-text description
        #[arg(long)]
        desc: String,
        /// Data source: file or api
        #[arg(long, default_value = "file")]
        source: String,
    },
    /// List all accounts.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kv_types_values() {
        assert_eq!(parse_kv("trans_id=5").unwrap().1, Value::Integer(5));
        assert_eq!(parse_kv("amount=-4.5").unwrap().1, Value::Real(-4.5));
        assert_eq!(
            parse_kv("desc=COFFEE").unwrap().1,
            Value::Text("COFFEE".to_string())
        );
    }

    #[test]
    fn test_parse_kv_rejects_bare_word() {
        assert!(parse_kv("nonsense").is_err());
    }

    #[test]
    fn test_parse_kv_keeps_equals_in_value() {
        let (col, val) = parse_kv("desc=a=b").unwrap();
        assert_eq!(col, "desc");
        assert_eq!(val, Value::Text("a=b".to_string()));
    }

    #[test]
    fn test_parse_filter_comparison_operators() {
        let f = parse_filter("amount<0").unwrap();
        assert_eq!(f.op, Op::Lt);
        assert_eq!(f.value, Value::Integer(0));

        let f = parse_filter("date>=2025-01-01").unwrap();
        assert_eq!(f.op, Op::Ge);
        assert_eq!(f.value, Value::Text("2025-01-01".to_string()));

        let f = parse_filter("trans_id!=5").unwrap();
        assert_eq!(f.op, Op::Ne);
        assert_eq!(f.value, Value::Integer(5));
    }

    #[test]
    fn test_parse_filter_like_keeps_wildcards() {
        let f = parse_filter("desc~%COFFEE%").unwrap();
        assert_eq!(f.op, Op::Like);
        assert_eq!(f.value, Value::Text("%COFFEE%".to_string()));
    }

    #[test]
    fn test_parse_filter_rejects_bare_word() {
        assert!(parse_filter("nonsense").is_err());
    }
}
