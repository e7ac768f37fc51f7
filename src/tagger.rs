use rusqlite::types::Value;
use rusqlite::Connection;

use crate::db;
use crate::error::{Result, TallyError};
use crate::models::Tag;
use crate::query::{Filter, InsertRequest, SelectRequest};

pub struct TagOutcome {
    pub tag: Tag,
    pub created_tag: bool,
    /// One link row per selected entity; duplicates are not suppressed.
    pub linked: usize,
    pub tagged_rows: Vec<Vec<Value>>,
}

/// Resolve `tag_param` against id or description, OR semantics.
fn tag_selector(tag_param: &str) -> SelectRequest {
    SelectRequest::new("tags")
        .filter(Filter::eq("tag_id", tag_param.to_string()).or())
        .filter(Filter::eq("desc", tag_param.to_string()))
}

/// Link every row matched by `selector` to the tag named by `tag_param`,
/// creating the tag on first use.
pub fn tag_rows(
    conn: &mut Connection,
    selector: &SelectRequest,
    tag_param: &str,
) -> Result<TagOutcome> {
    for table in ["tags", "tags_links"] {
        if !db::table_exists(conn, table)? {
            db::create_table(conn, table)?;
        }
    }

    // An entity type is taggable only if its identifier column appears in
    // the link table.
    let id_col = db::schema(&selector.table)?[0];
    if !db::schema("tags_links")?.contains(&id_col) {
        return Err(TallyError::Unsupported(format!(
            "table '{}' does not support tagging",
            selector.table
        )));
    }

    let tagged_rows = db::select(conn, &selector.all_columns())?;

    let tx = conn.transaction()?;

    let existing = db::select(&tx, &tag_selector(tag_param))?;
    let (tag, created_tag) = match existing.first() {
        Some(row) => (Tag::from_row(row)?, false),
        None => {
            db::insert(
                &tx,
                &InsertRequest::new("tags").value("desc", tag_param.to_string()),
            )?;
            let rows = db::select(&tx, &tag_selector(tag_param))?;
            let row = rows.first().ok_or_else(|| {
                TallyError::NotFound(format!("tag '{tag_param}' after creation"))
            })?;
            (Tag::from_row(row)?, true)
        }
    };

    let mut linked = 0;
    for row in &tagged_rows {
        linked += db::insert(
            &tx,
            &InsertRequest::new("tags_links")
                .value(id_col, row[0].clone())
                .value("tag_id", tag.tag_id),
        )?;
    }
    tx.commit()?;

    Ok(TagOutcome {
        tag,
        created_tag,
        linked,
        tagged_rows,
    })
}
