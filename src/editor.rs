use rusqlite::types::Value;
use rusqlite::Connection;

use crate::db;
use crate::error::Result;
use crate::query::{Filter, SelectRequest, UpdateRequest};

/// Before/after images of every row touched by an update, always selected
/// with all columns regardless of what the caller's selector asked for.
pub struct EditAudit {
    pub table: String,
    pub header: &'static [&'static str],
    pub before: Vec<Vec<Value>>,
    pub after: Vec<Vec<Value>>,
    pub rows_affected: usize,
}

/// Apply `req` and report the pre- and post-image of every affected row.
/// The pre-image is fetched strictly before the update; the post-image is
/// re-fetched by primary id so rows stay visible even when the update
/// changes a column the original selector matched on.
pub fn edit(conn: &Connection, req: &UpdateRequest) -> Result<EditAudit> {
    let header = db::schema(&req.table)?;
    let id_col = header[0];

    let pre_select = SelectRequest {
        table: req.table.clone(),
        columns: Vec::new(),
        filters: req.filters.clone(),
    };
    let before = db::select(conn, &pre_select)?;

    let rows_affected = db::update(conn, req)?;

    let mut post_select = SelectRequest::new(&req.table);
    for (i, row) in before.iter().enumerate() {
        let mut filter = Filter::eq(id_col, row[0].clone());
        if i + 1 < before.len() {
            filter = filter.or();
        }
        post_select = post_select.filter(filter);
    }
    let after = if before.is_empty() {
        Vec::new()
    } else {
        db::select(conn, &post_select)?
    };

    Ok(EditAudit {
        table: req.table.clone(),
        header,
        before,
        after,
        rows_affected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::error::TallyError;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO accounts (num, institution, desc, filepath, source) \
             VALUES ('0001', 'TD', 'Everyday Chequing', '/tmp/acct.csv', 'file')",
            [],
        )
        .unwrap();
        (dir, conn)
    }

    fn add_txn(conn: &Connection, desc: &str, amount: f64) -> i64 {
        conn.execute(
            "INSERT INTO transactions (date, desc, amount, total_id, acc_id) \
             VALUES ('2025-01-15', ?1, ?2, 500.0, 1)",
            rusqlite::params![desc, amount],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_edit_reports_before_and_after() {
        let (_dir, conn) = test_db();
        let id = add_txn(&conn, "COFFEE", -4.50);

        let req = UpdateRequest::new("transactions")
            .set("amount", -9.0f64)
            .filter(Filter::eq("trans_id", id));
        let audit = edit(&conn, &req).unwrap();

        assert_eq!(audit.rows_affected, 1);
        assert_eq!(audit.before.len(), 1);
        assert_eq!(audit.after.len(), 1);
        assert_eq!(audit.before[0][3], Value::Real(-4.5));
        assert_eq!(audit.after[0][3], Value::Real(-9.0));
    }

    #[test]
    fn test_edit_tracks_rows_when_selector_column_changes() {
        let (_dir, conn) = test_db();
        add_txn(&conn, "OLD NAME", -4.50);

        let req = UpdateRequest::new("transactions")
            .set("desc", "NEW NAME".to_string())
            .filter(Filter::eq("desc", "OLD NAME".to_string()));
        let audit = edit(&conn, &req).unwrap();

        // selector no longer matches, but the post-image still has the row
        assert_eq!(audit.after.len(), 1);
        assert_eq!(audit.after[0][2], Value::Text("NEW NAME".to_string()));
    }

    #[test]
    fn test_edit_multiple_rows() {
        let (_dir, conn) = test_db();
        add_txn(&conn, "A", -1.0);
        add_txn(&conn, "B", -1.0);

        let req = UpdateRequest::new("transactions")
            .set("amount", -2.0f64)
            .filter(Filter::eq("amount", -1.0f64));
        let audit = edit(&conn, &req).unwrap();
        assert_eq!(audit.rows_affected, 2);
        assert_eq!(audit.before.len(), 2);
        assert_eq!(audit.after.len(), 2);
    }

    #[test]
    fn test_edit_unknown_table_fails() {
        let (_dir, conn) = test_db();
        let req = UpdateRequest::new("holdings").set("x", 1i64);
        assert!(matches!(edit(&conn, &req), Err(TallyError::Schema(_))));
    }

    #[test]
    fn test_edit_no_matches_yields_empty_audit() {
        let (_dir, conn) = test_db();
        let req = UpdateRequest::new("transactions")
            .set("amount", 0.0f64)
            .filter(Filter::eq("trans_id", 404i64));
        let audit = edit(&conn, &req).unwrap();
        assert_eq!(audit.rows_affected, 0);
        assert!(audit.before.is_empty());
        assert!(audit.after.is_empty());
    }
}
