use crate::db::get_connection;
use crate::editor::edit;
use crate::error::Result;
use crate::fmt::value_table;
use crate::query::UpdateRequest;
use crate::settings::db_path;

pub fn run(table: &str, sets: &[String], filters: &[String]) -> Result<()> {
    let mut conn = get_connection(&db_path())?;

    let mut req = UpdateRequest::new(table);
    for pair in sets {
        let (column, value) = super::parse_kv(pair)?;
        req = req.set(column, value);
    }
    req.filters = super::parse_filters(filters)?;

    let tx = conn.transaction()?;
    let audit = edit(&tx, &req)?;
    tx.commit()?;

    println!("Pre-Update:");
    println!("{}", value_table(audit.header, &audit.before));
    println!("Post-Update:");
    println!("{}", value_table(audit.header, &audit.after));
    println!("{} row(s) updated in {}", audit.rows_affected, audit.table);
    Ok(())
}
