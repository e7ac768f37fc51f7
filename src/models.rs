use rusqlite::types::Value;

use crate::error::{Result, TallyError};

/// Ledger amounts are recorded to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Integer cents, used for exact row equality during import dedup.
pub fn cents(v: f64) -> i64 {
    (v * 100.0).round() as i64
}

// ---------------------------------------------------------------------------
// Value decoding — positional, per the table's declared column order
// ---------------------------------------------------------------------------

fn decode_i64(row: &[Value], idx: usize, table: &str) -> Result<i64> {
    match row.get(idx) {
        Some(Value::Integer(i)) => Ok(*i),
        other => Err(TallyError::Integrity(format!(
            "{table}: expected integer at column {idx}, got {other:?}"
        ))),
    }
}

fn decode_f64(row: &[Value], idx: usize, table: &str) -> Result<f64> {
    match row.get(idx) {
        Some(Value::Real(r)) => Ok(*r),
        Some(Value::Integer(i)) => Ok(*i as f64),
        other => Err(TallyError::Integrity(format!(
            "{table}: expected number at column {idx}, got {other:?}"
        ))),
    }
}

fn decode_text(row: &[Value], idx: usize, table: &str) -> Result<String> {
    match row.get(idx) {
        Some(Value::Text(s)) => Ok(s.clone()),
        Some(Value::Null) => Ok(String::new()),
        other => Err(TallyError::Integrity(format!(
            "{table}: expected text at column {idx}, got {other:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    File,
    Api,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Api => "api",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "file" => Ok(Self::File),
            "api" => Ok(Self::Api),
            other => Err(TallyError::Validation(format!(
                "account source must be 'file' or 'api', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub acc_id: i64,
    pub num: String,
    pub institution: String,
    pub desc: String,
    pub filepath: String,
    pub source: Source,
}

impl Account {
    /// Decode a full `accounts` row in declared column order.
    pub fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            acc_id: decode_i64(row, 0, "accounts")?,
            num: decode_text(row, 1, "accounts")?,
            institution: decode_text(row, 2, "accounts")?,
            desc: decode_text(row, 3, "accounts")?,
            filepath: decode_text(row, 4, "accounts")?,
            source: Source::parse(&decode_text(row, 5, "accounts")?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// None until the store assigns an id on insert.
    pub trans_id: Option<i64>,
    pub date: String,
    pub desc: String,
    pub amount: f64,
    /// Running balance immediately after this transaction is applied.
    pub total_id: f64,
    pub acc_id: i64,
}

impl Transaction {
    pub fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            trans_id: Some(decode_i64(row, 0, "transactions")?),
            date: decode_text(row, 1, "transactions")?,
            desc: decode_text(row, 2, "transactions")?,
            amount: decode_f64(row, 3, "transactions")?,
            total_id: decode_f64(row, 4, "transactions")?,
            acc_id: decode_i64(row, 5, "transactions")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub tag_id: i64,
    pub desc: String,
}

impl Tag {
    pub fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            tag_id: decode_i64(row, 0, "tags")?,
            desc: decode_text(row, 1, "tags")?,
        })
    }
}
