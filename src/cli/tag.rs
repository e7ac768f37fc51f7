use crate::db::{self, get_connection};
use crate::error::Result;
use crate::fmt::value_table;
use crate::query::SelectRequest;
use crate::settings::db_path;
use crate::tagger::tag_rows;

pub fn run(table: &str, tag: &str, filters: &[String]) -> Result<()> {
    let mut conn = get_connection(&db_path())?;

    let mut selector = SelectRequest::new(table);
    selector.filters = super::parse_filters(filters)?;

    let outcome = tag_rows(&mut conn, &selector, tag)?;

    println!("{}", value_table(db::schema(table)?, &outcome.tagged_rows));
    if outcome.created_tag {
        println!(
            "Created tag '{}' (id {}) and linked {} row(s).",
            outcome.tag.desc, outcome.tag.tag_id, outcome.linked
        );
    } else {
        println!(
            "Linked {} row(s) to tag '{}' (id {}).",
            outcome.linked, outcome.tag.desc, outcome.tag.tag_id
        );
    }
    Ok(())
}
