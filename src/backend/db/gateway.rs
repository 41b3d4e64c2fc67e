/**
 * Database Access Gateway
 *
 * Single entry point for every query the generic table API sends to
 * PostgreSQL. Callers pass a query template, an ordered parameter list and a
 * human-readable label; the gateway formats the final SQL, logs it, runs it
 * on the pool (or on an open transaction) and wraps any driver failure in a
 * `DatabaseError` carrying the label.
 *
 * # Template placeholders
 *
 * - `??` is replaced by the next parameter, which must be an identifier, in
 *   its quoted form (`"Socios"`). Table and column names come from the URL
 *   and the request body, so they can never be bind parameters.
 * - `?` is replaced by the next parameter, which must be a value, as a typed
 *   positional bind (`$1::integer`). Values travel as text and PostgreSQL
 *   performs the cast, so a malformed value surfaces as a database error.
 *
 * Question marks inside single-quoted SQL literals are left alone.
 */

use serde_json::{Map, Value};
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use sqlx::{PgExecutor, Postgres, Transaction};
use std::fmt;
use thiserror::Error;

/// A row returned by the gateway: column name → JSON value
pub type Row = Map<String, Value>;

/// Errors raised by the gateway
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The driver rejected the query or the connection failed
    #[error("{label}: {source}")]
    Query {
        /// Caller-supplied label
        label: String,
        #[source]
        source: sqlx::Error,
    },

    /// Placeholders and parameters do not line up
    #[error("{label}: plantilla de consulta inválida ({reason})")]
    Template {
        /// Caller-supplied label
        label: String,
        reason: String,
    },
}

impl DatabaseError {
    pub fn label(&self) -> &str {
        match self {
            DatabaseError::Query { label, .. } | DatabaseError::Template { label, .. } => label,
        }
    }

    /// Wrap a driver error with a label
    pub fn query(label: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        let label = label.into();
        move |source| DatabaseError::Query { label, source }
    }

    /// Whether the driver reported a unique-constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Query {
                source: sqlx::Error::Database(db),
                ..
            } => db.is_unique_violation(),
            _ => false,
        }
    }
}

/// Target SQL type of a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Numeric,
    Text,
    Boolean,
    Date,
    Timestamp,
    IntegerArray,
}

impl SqlType {
    /// Cast appended to the positional placeholder
    pub fn cast(&self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::Numeric => "numeric",
            SqlType::Text => "text",
            SqlType::Boolean => "boolean",
            SqlType::Date => "date",
            SqlType::Timestamp => "timestamptz",
            SqlType::IntegerArray => "integer[]",
        }
    }
}

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlValue {
    /// Text form of the value; `None` binds SQL NULL
    pub text: Option<String>,
    pub ty: SqlType,
}

impl SqlValue {
    pub fn new(text: impl Into<String>, ty: SqlType) -> Self {
        Self {
            text: Some(text.into()),
            ty,
        }
    }

    pub fn null(ty: SqlType) -> Self {
        Self { text: None, ty }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, SqlType::Text)
    }

    pub fn integer(value: i64) -> Self {
        Self::new(value.to_string(), SqlType::Integer)
    }

    /// Array literal for `= ANY(?)` lookups
    pub fn integer_array(values: &[i64]) -> Self {
        let items: Vec<String> = values.iter().map(i64::to_string).collect();
        Self::new(format!("{{{}}}", items.join(",")), SqlType::IntegerArray)
    }
}

/// One substitution for a template placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Substituted for `??`
    Ident(String),
    /// Substituted for `?`
    Value(SqlValue),
}

impl Param {
    pub fn ident(name: impl Into<String>) -> Self {
        Param::Ident(name.into())
    }

    pub fn value(value: SqlValue) -> Self {
        Param::Value(value)
    }
}

/// Final SQL text plus the values to bind, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedQuery {
    pub sql: String,
    pub binds: Vec<Option<String>>,
}

impl fmt::Display for FormattedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Quote an identifier, escaping embedded quotes; dotted names are quoted per part
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Substitute `??` and `?` placeholders in `template`
pub fn format_query(
    template: &str,
    params: &[Param],
    label: &str,
) -> Result<FormattedQuery, DatabaseError> {
    let template_err = |reason: String| DatabaseError::Template {
        label: label.to_string(),
        reason,
    };

    let mut sql = String::with_capacity(template.len() + params.len() * 8);
    let mut binds = Vec::new();
    let mut params = params.iter();
    let mut chars = template.chars().peekable();
    let mut in_literal = false;

    while let Some(c) = chars.next() {
        if in_literal {
            sql.push(c);
            if c == '\'' {
                in_literal = false;
            }
            continue;
        }
        match c {
            '\'' => {
                in_literal = true;
                sql.push(c);
            }
            '?' if chars.peek() == Some(&'?') => {
                chars.next();
                match params.next() {
                    Some(Param::Ident(name)) => sql.push_str(&quote_identifier(name)),
                    Some(Param::Value(_)) => {
                        return Err(template_err("se esperaba un identificador para `??`".into()))
                    }
                    None => return Err(template_err("faltan parámetros".into())),
                }
            }
            '?' => match params.next() {
                Some(Param::Value(value)) => {
                    binds.push(value.text.clone());
                    sql.push_str(&format!("${}::{}", binds.len(), value.ty.cast()));
                }
                Some(Param::Ident(_)) => {
                    return Err(template_err("se esperaba un valor para `?`".into()))
                }
                None => return Err(template_err("faltan parámetros".into())),
            },
            _ => sql.push(c),
        }
    }

    let surplus = params.count();
    if surplus > 0 {
        return Err(template_err(format!("sobran {} parámetros", surplus)));
    }

    Ok(FormattedQuery { sql, binds })
}

/// Run a statement and return its rows as JSON objects
///
/// Works for `SELECT` as well as `INSERT/UPDATE/DELETE ... RETURNING`.
pub async fn fetch_rows<'e, E>(
    executor: E,
    template: &str,
    params: &[Param],
    label: &str,
) -> Result<Vec<Row>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let formatted = format_query(template, params, label)?;
    tracing::debug!(sql = %formatted.sql, binds = ?formatted.binds, label, "executing query");

    let wrapped = format!(
        "WITH q AS ({}) SELECT COALESCE(json_agg(q), '[]'::json) FROM q",
        formatted.sql
    );
    let mut query = sqlx::query_scalar::<_, Json<Vec<Row>>>(&wrapped);
    for bind in &formatted.binds {
        query = query.bind(bind.clone());
    }

    let Json(rows) = query
        .fetch_one(executor)
        .await
        .map_err(|source| DatabaseError::Query {
            label: label.to_string(),
            source,
        })?;
    Ok(rows)
}

/// Run a statement and return the number of affected rows
pub async fn execute<'e, E>(
    executor: E,
    template: &str,
    params: &[Param],
    label: &str,
) -> Result<u64, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let formatted = format_query(template, params, label)?;
    tracing::debug!(sql = %formatted.sql, binds = ?formatted.binds, label, "executing statement");

    let mut query = sqlx::query(&formatted.sql);
    for bind in &formatted.binds {
        query = query.bind(bind.clone());
    }

    let result = query
        .execute(executor)
        .await
        .map_err(|source| DatabaseError::Query {
            label: label.to_string(),
            source,
        })?;
    Ok(result.rows_affected())
}

/// Pooled handle used by the table API
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn fetch_rows(
        &self,
        template: &str,
        params: &[Param],
        label: &str,
    ) -> Result<Vec<Row>, DatabaseError> {
        fetch_rows(&self.pool, template, params, label).await
    }

    pub async fn execute(
        &self,
        template: &str,
        params: &[Param],
        label: &str,
    ) -> Result<u64, DatabaseError> {
        execute(&self.pool, template, params, label).await
    }

    /// Open a transaction on a pooled connection
    pub async fn begin(&self, label: &str) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        self.pool.begin().await.map_err(|source| DatabaseError::Query {
            label: label.to_string(),
            source,
        })
    }
}

/// Extract the integer `id` column of each row
pub fn row_ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get("id").and_then(Value::as_i64))
        .collect()
}
