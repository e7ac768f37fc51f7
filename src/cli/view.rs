use rusqlite::types::Value;

use crate::db::{self, get_connection};
use crate::error::Result;
use crate::fmt::{money, value_table};
use crate::query::SelectRequest;
use crate::settings::db_path;

pub fn run(table: &str, columns: Option<&str>, filters: &[String]) -> Result<()> {
    let conn = get_connection(&db_path())?;

    let schema = db::schema(table)?;
    let mut req = SelectRequest::new(table);
    if let Some(cols) = columns {
        let cols: Vec<&str> = cols.split(',').map(str::trim).collect();
        req = req.columns(&cols);
    }
    req.filters = super::parse_filters(filters)?;

    let rows = db::select(&conn, &req)?;

    // header mirrors the selected column order; selected names must be real
    let header: Vec<&str> = if req.columns.is_empty() {
        schema.to_vec()
    } else {
        req.columns
            .iter()
            .filter(|c| schema.contains(&c.as_str()))
            .map(String::as_str)
            .collect()
    };
    println!("{}", value_table(&header, &rows));

    if let Some(idx) = header.iter().position(|c| *c == "amount") {
        let total: f64 = rows
            .iter()
            .filter_map(|row| match row.get(idx) {
                Some(Value::Real(r)) => Some(*r),
                Some(Value::Integer(i)) => Some(*i as f64),
                _ => None,
            })
            .sum();
        println!("Total: {}", money(total));
    }
    Ok(())
}
