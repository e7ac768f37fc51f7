use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;

use crate::error::{Result, TallyError};
use crate::query::{InsertRequest, SelectRequest, UpdateRequest};

// ---------------------------------------------------------------------------
// Built-in schema registry
// ---------------------------------------------------------------------------

/// Column order is the positional-decoding contract used everywhere else in
/// the crate; position 0 is always the primary identifier.
struct TableDef {
    name: &'static str,
    columns: &'static [&'static str],
    ddl: &'static str,
}

const TABLES: &[TableDef] = &[
    TableDef {
        name: "accounts",
        columns: &["acc_id", "num", "institution", "desc", "filepath", "source"],
        ddl: "CREATE TABLE IF NOT EXISTS accounts (
            acc_id INTEGER PRIMARY KEY,
            num TEXT NOT NULL,
            institution TEXT NOT NULL,
            desc TEXT NOT NULL,
            filepath TEXT NOT NULL,
            source TEXT NOT NULL
        )",
    },
    TableDef {
        name: "transactions",
        columns: &["trans_id", "date", "desc", "amount", "total_id", "acc_id"],
        ddl: "CREATE TABLE IF NOT EXISTS transactions (
            trans_id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            desc TEXT NOT NULL,
            amount REAL NOT NULL,
            total_id REAL NOT NULL,
            acc_id INTEGER NOT NULL,
            FOREIGN KEY (acc_id) REFERENCES accounts(acc_id)
        )",
    },
    TableDef {
        name: "splits",
        columns: &["trans_id", "date", "desc", "amount", "total_id"],
        ddl: "CREATE TABLE IF NOT EXISTS splits (
            trans_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            desc TEXT NOT NULL,
            amount REAL NOT NULL,
            total_id REAL NOT NULL
        )",
    },
    TableDef {
        name: "tags",
        columns: &["tag_id", "desc"],
        ddl: "CREATE TABLE IF NOT EXISTS tags (
            tag_id INTEGER PRIMARY KEY,
            desc TEXT NOT NULL
        )",
    },
    TableDef {
        name: "tags_links",
        columns: &["trans_id", "tag_id"],
        ddl: "CREATE TABLE IF NOT EXISTS tags_links (
            trans_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL
        )",
    },
];

fn table_def(name: &str) -> Result<&'static TableDef> {
    TABLES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| TallyError::Schema(name.to_string()))
}

/// Ordered column names for a known table.
pub fn schema(table: &str) -> Result<&'static [&'static str]> {
    Ok(table_def(table)?.columns)
}

// ---------------------------------------------------------------------------
// Connection + DDL
// ---------------------------------------------------------------------------

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    Ok(stmt.exists([name])?)
}

pub fn create_table(conn: &Connection, name: &str) -> Result<()> {
    conn.execute(table_def(name)?.ddl, [])?;
    Ok(())
}

pub fn init_db(conn: &Connection) -> Result<()> {
    for table in TABLES {
        conn.execute(table.ddl, [])?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Row operations
// ---------------------------------------------------------------------------

fn map_write_err(e: rusqlite::Error) -> TallyError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            TallyError::Integrity(e.to_string())
        }
        _ => TallyError::Db(e),
    }
}

pub fn select(conn: &Connection, req: &SelectRequest) -> Result<Vec<Vec<Value>>> {
    let (sql, params) = req.build();
    let mut stmt = conn.prepare(&sql)?;
    let column_count = stmt.column_count();
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(row.get::<_, Value>(i)?);
            }
            Ok(values)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Mutations run against the caller's transaction; the caller commits.
pub fn insert(conn: &Connection, req: &InsertRequest) -> Result<usize> {
    let (sql, params) = req.build();
    conn.execute(&sql, rusqlite::params_from_iter(params))
        .map_err(map_write_err)
}

pub fn update(conn: &Connection, req: &UpdateRequest) -> Result<usize> {
    let (sql, params) = req.build();
    conn.execute(&sql, rusqlite::params_from_iter(params))
        .map_err(map_write_err)
}

/// Keep exactly one row per distinct value tuple over `filter_columns`,
/// preferring the smallest primary identifier (the earliest-inserted entry).
/// Scans only rows already in `table`.
pub fn drop_duplicates(
    conn: &Connection,
    table: &str,
    filter_columns: &[&str],
) -> Result<usize> {
    let def = table_def(table)?;
    for col in filter_columns {
        if !def.columns.contains(col) {
            return Err(TallyError::Schema(format!("{table}.{col}")));
        }
    }
    let id_col = def.columns[0];
    let group_by = filter_columns.join(", ");
    let sql = format!(
        "DELETE FROM {table} WHERE {id_col} NOT IN \
         (SELECT MIN({id_col}) FROM {table} GROUP BY {group_by})"
    );
    Ok(conn.execute(&sql, [])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Filter;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        seed_account(&conn);
        (dir, conn)
    }

    fn seed_account(conn: &Connection) {
        conn.execute(
            "INSERT INTO accounts (num, institution, desc, filepath, source) \
             VALUES ('0001', 'TD', 'Everyday Chequing', '/tmp/acct.csv', 'file')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        for expected in &["accounts", "transactions", "splits", "tags", "tags_links"] {
            assert!(table_exists(&conn, expected).unwrap(), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_create_table_unknown_name_fails() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            create_table(&conn, "holdings"),
            Err(TallyError::Schema(_))
        ));
    }

    #[test]
    fn test_schema_order_has_id_first() {
        assert_eq!(schema("transactions").unwrap()[0], "trans_id");
        assert_eq!(schema("accounts").unwrap()[0], "acc_id");
        assert_eq!(schema("tags").unwrap()[0], "tag_id");
        assert!(schema("nope").is_err());
    }

    #[test]
    fn test_insert_select_update_roundtrip() {
        let (_dir, conn) = test_db();
        let inserted = insert(
            &conn,
            &InsertRequest::new("tags").value("desc", "travel".to_string()),
        )
        .unwrap();
        assert_eq!(inserted, 1);

        let rows = select(
            &conn,
            &SelectRequest::new("tags").filter(Filter::eq("desc", "travel".to_string())),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);

        let updated = update(
            &conn,
            &UpdateRequest::new("tags")
                .set("desc", "trips".to_string())
                .filter(Filter::eq("desc", "travel".to_string())),
        )
        .unwrap();
        assert_eq!(updated, 1);
    }

    #[test]
    fn test_insert_schema_mismatch_is_integrity_error() {
        let (_dir, conn) = test_db();
        let result = insert(
            &conn,
            &InsertRequest::new("tags").value("desc", Value::Null),
        );
        assert!(matches!(result, Err(TallyError::Integrity(_))));
    }

    fn add_txn(conn: &Connection, date: &str, desc: &str, amount: f64, total: f64) {
        conn.execute(
            "INSERT INTO transactions (date, desc, amount, total_id, acc_id) VALUES (?1, ?2, ?3, ?4, 1)",
            rusqlite::params![date, desc, amount, total],
        )
        .unwrap();
    }

    #[test]
    fn test_drop_duplicates_keeps_min_id() {
        let (_dir, conn) = test_db();
        add_txn(&conn, "2025-01-15", "COFFEE", -4.50, 995.50);
        add_txn(&conn, "2025-01-15", "COFFEE", -4.50, 995.50);
        add_txn(&conn, "2025-01-16", "LUNCH", -12.00, 983.50);

        let removed = drop_duplicates(
            &conn,
            "transactions",
            &["date", "desc", "amount", "total_id"],
        )
        .unwrap();
        assert_eq!(removed, 1);

        let ids: Vec<i64> = conn
            .prepare("SELECT trans_id FROM transactions ORDER BY trans_id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        // the surviving duplicate is the lowest id
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_drop_duplicates_rejects_unknown_column() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            drop_duplicates(&conn, "transactions", &["payee"]),
            Err(TallyError::Schema(_))
        ));
    }
}
