use crate::db::{self, get_connection};
use crate::error::Result;
use crate::fmt::value_table;
use crate::models::Source;
use crate::query::InsertRequest;
use crate::settings::{db_path, get_accounts_dir};

/// Create an account row. A file-sourced account also gets a statement
/// directory under the configured accounts root, recorded in `filepath`.
pub fn add(num: &str, institution: &str, desc: &str, source: &str) -> Result<()> {
    let source = Source::parse(source)?;
    let conn = get_connection(&db_path())?;
    if !db::table_exists(&conn, "accounts")? {
        db::create_table(&conn, "accounts")?;
    }

    let statement_dir = get_accounts_dir().join(num);
    if source == Source::File {
        std::fs::create_dir_all(&statement_dir)?;
    }

    db::insert(
        &conn,
        &InsertRequest::new("accounts")
            .value("num", num.to_string())
            .value("institution", institution.to_string())
            .value("desc", desc.to_string())
            .value("filepath", statement_dir.to_string_lossy().to_string())
            .value("source", source.as_str().to_string()),
    )?;

    println!("Added account: {num} ({institution})");
    if source == Source::File {
        println!("Drop statement files into {}", statement_dir.display());
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    if !db::table_exists(&conn, "accounts")? {
        println!("No accounts yet.");
        return Ok(());
    }
    let rows = db::select(&conn, &crate::query::SelectRequest::new("accounts"))?;
    let header = db::schema("accounts")?;
    println!("Accounts\n{}", value_table(header, &rows));
    Ok(())
}
