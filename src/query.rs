use rusqlite::types::Value;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Op {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Join {
    And,
    Or,
}

/// One where-clause triple. `join` is the connective to the *next* filter.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub op: Op,
    pub value: Value,
    pub join: Join,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
            join: Join::And,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Eq, value)
    }

    pub fn or(mut self) -> Self {
        self.join = Join::Or;
        self
    }
}

fn build_where(filters: &[Filter], sql: &mut String, params: &mut Vec<Value>) {
    if filters.is_empty() {
        return;
    }
    sql.push_str(" WHERE ");
    for (i, f) in filters.iter().enumerate() {
        if i > 0 {
            match filters[i - 1].join {
                Join::Or => sql.push_str(" OR "),
                Join::And => sql.push_str(" AND "),
            }
        }
        sql.push_str(&f.column);
        sql.push(' ');
        sql.push_str(f.op.as_sql());
        sql.push_str(" ?");
        params.push(f.value.clone());
    }
}

// ---------------------------------------------------------------------------
// Requests — one immutable struct per operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub table: String,
    /// Empty means all columns.
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
}

impl SelectRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Same selection with the column filter dropped — the audit wrapper
    /// needs every column regardless of what the caller asked to see.
    pub fn all_columns(&self) -> Self {
        Self {
            table: self.table.clone(),
            columns: Vec::new(),
            filters: self.filters.clone(),
        }
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let cols = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", cols, self.table);
        let mut params = Vec::new();
        build_where(&self.filters, &mut sql, &mut params);
        (sql, params)
    }
}

#[derive(Debug, Clone)]
pub struct InsertRequest {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl InsertRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders
        );
        (sql, self.values.clone())
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub table: String,
    pub sets: Vec<(String, Value)>,
    pub filters: Vec<Filter>,
}

impl UpdateRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sets: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("UPDATE {} SET ", self.table);
        let mut params = Vec::new();
        for (i, (column, value)) in self.sets.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push_str(" = ?");
            params.push(value.clone());
        }
        build_where(&self.filters, &mut sql, &mut params);
        (sql, params)
    }
}
