//! Query templates of the generic table API.
//!
//! Every statement the generic router sends is built here from a small fixed
//! set of templates. Table and column names are checked against the registry
//! first and bound as `??` identifiers; values are bound as typed `?`
//! parameters.

use crate::backend::db::gateway::{Param, SqlValue};
use crate::backend::db::registry::TableSchema;
use crate::backend::error::{BackendError, BackendResult};
use serde_json::{Map, Value};

/// A template plus its parameters, ready for the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub template: String,
    pub params: Vec<Param>,
}

impl Statement {
    fn new(template: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }
}

/// `SELECT * FROM <table> ORDER BY id`
pub fn select_all(table: &TableSchema) -> Statement {
    Statement::new(
        "SELECT * FROM ?? ORDER BY ??",
        vec![Param::ident(table.name), Param::ident("id")],
    )
}

/// `SELECT * FROM <table> WHERE id = <id>`
pub fn select_by_id(table: &TableSchema, id: &str) -> BackendResult<Statement> {
    select_where(table, "id", id)
}

/// `SELECT * FROM <table> WHERE <column> = <value> ORDER BY id`
pub fn select_where(table: &TableSchema, column: &str, value: &str) -> BackendResult<Statement> {
    let column = table.column(column)?;
    Ok(Statement::new(
        "SELECT * FROM ?? WHERE ?? = ? ORDER BY ??",
        vec![
            Param::ident(table.name),
            Param::ident(column.name),
            Param::value(column.bind_str(value)),
            Param::ident("id"),
        ],
    ))
}

/// `INSERT INTO <table> (<body keys>) VALUES (...) RETURNING id`
///
/// Columns follow the order of the body's keys.
pub fn insert(table: &TableSchema, body: &Map<String, Value>) -> BackendResult<Statement> {
    let mut params = vec![Param::ident(table.name)];

    if body.is_empty() {
        params.push(Param::ident("id"));
        return Ok(Statement::new("INSERT INTO ?? DEFAULT VALUES RETURNING ??", params));
    }

    let mut values = Vec::with_capacity(body.len());
    for (key, value) in body {
        let column = table.column(key)?;
        params.push(Param::ident(column.name));
        values.push(Param::value(column.bind(value)?));
    }

    let columns = vec!["??"; body.len()].join(", ");
    let placeholders = vec!["?"; body.len()].join(", ");
    params.extend(values);
    params.push(Param::ident("id"));

    Ok(Statement::new(
        format!("INSERT INTO ?? ({}) VALUES ({}) RETURNING ??", columns, placeholders),
        params,
    ))
}

/// `UPDATE <table> SET <key> = ?, ... WHERE id = <body.id>`
///
/// Every body key is assigned, `id` included.
pub fn update(table: &TableSchema, body: &Map<String, Value>) -> BackendResult<Statement> {
    let id = body
        .get("id")
        .ok_or_else(|| BackendError::InvalidBody("falta el campo id".to_string()))?;
    let id_column = table.id_column()?;

    let mut params = vec![Param::ident(table.name)];
    let mut assignments = Vec::with_capacity(body.len());
    for (key, value) in body {
        let column = table.column(key)?;
        params.push(Param::ident(column.name));
        params.push(Param::value(column.bind(value)?));
        assignments.push("?? = ?");
    }
    params.push(Param::ident(id_column.name));
    params.push(Param::value(id_column.bind(id)?));

    Ok(Statement::new(
        format!("UPDATE ?? SET {} WHERE ?? = ?", assignments.join(", ")),
        params,
    ))
}

/// `DELETE FROM <table> WHERE id = <id> RETURNING id`
pub fn delete_by_id(table: &TableSchema, id: &str) -> BackendResult<Statement> {
    delete_where(table, "id", table.id_column()?.bind_str(id))
}

/// `DELETE FROM <table> WHERE <column> = <value> RETURNING id`
pub fn delete_where(table: &TableSchema, column: &str, value: SqlValue) -> BackendResult<Statement> {
    let column = table.column(column)?;
    Ok(Statement::new(
        "DELETE FROM ?? WHERE ?? = ? RETURNING ??",
        vec![
            Param::ident(table.name),
            Param::ident(column.name),
            Param::value(value),
            Param::ident("id"),
        ],
    ))
}

/// Turn a path id into the JSON value echoed back to clients
pub fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}
