use std::collections::{HashMap, HashSet};
use std::path::Path;

use rusqlite::Connection;
use walkdir::WalkDir;

use crate::db;
use crate::error::{Result, TallyError};
use crate::models::{cents, Account, Source};
use crate::query::{Filter, SelectRequest};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an amount cell; an empty cell is absent, not zero.
pub fn parse_amount_opt(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

/// Canonicalize MM/DD/YYYY or YYYY-MM-DD to YYYY-MM-DD.
pub fn parse_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Normalized statement row: the common transaction shape minus the account
/// id, which the importer supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub date: String,
    pub desc: String,
    pub amount: f64,
    pub total_id: f64,
}

// ---------------------------------------------------------------------------
// Institution formats — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementFormat {
    Td,
}

impl StatementFormat {
    pub fn for_institution(institution: &str) -> Option<Self> {
        match institution {
            "TD" => Some(Self::Td),
            _ => None,
        }
    }

    pub fn parse(&self, file_path: &Path) -> Result<Vec<StatementRow>> {
        match self {
            Self::Td => parse_td(file_path),
        }
    }
}

/// Headerless TD csv: date, description, withdrawal, deposit, running balance.
/// A missing deposit means the row is a withdrawal; its sign flips into the
/// single signed amount column.
fn parse_td(file_path: &Path) -> Result<Vec<StatementRow>> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut rows = Vec::new();

    for result in rdr.records() {
        // reader errors (bad UTF-8, truncated reads) fail the whole import;
        // only rows that read fine but don't decode are skipped below
        let record = result?;
        if record.len() < 5 {
            continue;
        }
        let Some(date) = parse_date(&record[0]) else {
            continue;
        };
        let desc = record[1].trim().to_string();
        let withdrawal = parse_amount_opt(&record[2]);
        let deposit = parse_amount_opt(&record[3]);
        let amount = match (deposit, withdrawal) {
            (Some(d), _) => d,
            (None, Some(w)) => -w,
            (None, None) => continue,
        };
        let Some(total_id) = parse_amount_opt(&record[4]) else {
            continue;
        };
        rows.push(StatementRow {
            date,
            desc,
            amount,
            total_id,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Account-sync collaborators (api-sourced accounts)
// ---------------------------------------------------------------------------

/// External upsert service for api-sourced accounts, selected by institution
/// tag (e.g. a brokerage positions sync, a crypto holdings sync). The sync
/// logic lives outside this crate; it only gets the store handle and the
/// account number.
pub trait AccountSync {
    fn sync(&self, conn: &Connection, account_num: &str) -> Result<()>;
}

#[derive(Default)]
pub struct SyncRegistry {
    syncs: HashMap<String, Box<dyn AccountSync>>,
}

impl SyncRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, institution: &str, sync: Box<dyn AccountSync>) {
        self.syncs.insert(institution.to_string(), sync);
    }

    fn get(&self, institution: &str) -> Option<&dyn AccountSync> {
        self.syncs.get(institution).map(|s| s.as_ref())
    }
}

// ---------------------------------------------------------------------------
// import_account
// ---------------------------------------------------------------------------

pub struct ImportOutcome {
    pub imported: usize,
    pub deduped: usize,
    pub archived: usize,
    pub synced: bool,
}

/// Resolve an account by internal id, account number, or description;
/// first match wins.
pub fn find_account(conn: &Connection, ident: &str) -> Result<Account> {
    let req = SelectRequest::new("accounts")
        .filter(Filter::eq("acc_id", ident.to_string()).or())
        .filter(Filter::eq("num", ident.to_string()).or())
        .filter(Filter::eq("desc", ident.to_string()));
    let rows = db::select(conn, &req)?;
    let row = rows
        .first()
        .ok_or_else(|| TallyError::NotFound(format!("account '{ident}'")))?;
    Account::from_row(row)
}

pub fn import_account(
    conn: &mut Connection,
    ident: &str,
    registry: &SyncRegistry,
) -> Result<ImportOutcome> {
    for table in ["transactions", "splits"] {
        if !db::table_exists(conn, table)? {
            db::create_table(conn, table)?;
        }
    }
    let account = find_account(conn, ident)?;

    match account.source {
        Source::File => import_statement_files(conn, &account),
        Source::Api => {
            let sync = registry.get(&account.institution).ok_or_else(|| {
                TallyError::NotFound(format!(
                    "no sync collaborator for institution '{}'",
                    account.institution
                ))
            })?;
            sync.sync(conn, &account.num)?;
            Ok(ImportOutcome {
                imported: 0,
                deduped: 0,
                archived: 0,
                synced: true,
            })
        }
    }
}

fn import_statement_files(conn: &mut Connection, account: &Account) -> Result<ImportOutcome> {
    let format = StatementFormat::for_institution(&account.institution).ok_or_else(|| {
        TallyError::Unsupported(format!(
            "no statement format for institution '{}' (account '{}')",
            account.institution, account.desc
        ))
    })?;

    // Gather every statement under the account's directory, dropping exact
    // repeats before they ever reach the store.
    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for entry in WalkDir::new(&account.filepath)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("csv"))
        {
            continue;
        }
        for row in format.parse(path)? {
            let key = (
                row.date.clone(),
                row.desc.clone(),
                cents(row.amount),
                cents(row.total_id),
            );
            if seen.insert(key) {
                rows.push(row);
            }
        }
    }

    let tx = conn.transaction()?;
    let imported = rows.len();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions (date, desc, amount, total_id, acc_id) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for row in &rows {
            stmt.execute(rusqlite::params![
                row.date,
                row.desc,
                row.amount,
                row.total_id,
                account.acc_id
            ])?;
        }
    }
    let deduped = db::drop_duplicates(&tx, "transactions", &["date", "desc", "amount", "total_id"])?;

    // A transaction that was already split and archived must not come back
    // on re-import.
    let archived = tx.execute(
        "DELETE FROM transactions WHERE trans_id IN \
         (SELECT t.trans_id FROM transactions t \
          JOIN splits s ON s.date = t.date AND s.desc = t.desc \
          AND s.amount = t.amount AND s.total_id = t.total_id)",
        [],
    )?;
    tx.commit()?;

    Ok(ImportOutcome {
        imported,
        deduped,
        archived,
        synced: false,
    })
}
