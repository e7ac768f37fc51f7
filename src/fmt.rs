use comfy_table::{Cell, Table};
use rusqlite::types::Value;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

pub fn value_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => format!("{:.2}", r),
        Value::Text(s) => s.clone(),
        Value::Blob(_) => "<blob>".to_string(),
    }
}

/// Render a store row set with its header the way every operation displays
/// data to the user.
pub fn value_table(header: &[&str], rows: &[Vec<Value>]) -> Table {
    let mut table = Table::new();
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row.iter().map(|v| Cell::new(value_cell(v))));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
    }

    #[test]
    fn test_value_cell() {
        assert_eq!(value_cell(&Value::Null), "");
        assert_eq!(value_cell(&Value::Integer(7)), "7");
        assert_eq!(value_cell(&Value::Real(-50.0)), "-50.00");
        assert_eq!(value_cell(&Value::Text("COFFEE".into())), "COFFEE");
    }

    #[test]
    fn test_value_table_contains_header_and_rows() {
        let rows = vec![vec![Value::Integer(1), Value::Text("a".into())]];
        let table = value_table(&["id", "desc"], &rows);
        let rendered = table.to_string();
        assert!(rendered.contains("id"));
        assert!(rendered.contains('a'));
    }
}
