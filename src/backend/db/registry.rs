//! Registry of the tables exposed through the generic table API.
//!
//! The URL carries the table name and the request body carries the column
//! names. Both are resolved here before any SQL is built, and every body
//! value is converted to the SQL type of its column.

use crate::backend::db::gateway::{SqlType, SqlValue};
use crate::backend::error::BackendError;
use serde_json::Value;

/// A column of a registered table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: SqlType,
}

/// A registered table
#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

const fn col(name: &'static str, ty: SqlType) -> Column {
    Column { name, ty }
}

pub const SOCIOS: &str = "Socios";
pub const PARIENTES: &str = "Parientes";
pub const CORTEJOS: &str = "Cortejos";
pub const CARROZAS: &str = "Carrozas";
pub const SOCIOS_CARROZAS: &str = "Socios_Carrozas";
pub const RECIBOS: &str = "Recibos";
pub const PAGOS: &str = "Pagos";

static TABLES: &[TableSchema] = &[
    TableSchema {
        name: SOCIOS,
        columns: &[
            col("id", SqlType::Integer),
            col("nombre", SqlType::Text),
            col("apellidos", SqlType::Text),
            col("dni", SqlType::Text),
            col("direccion", SqlType::Text),
            col("codigo_postal", SqlType::Text),
            col("poblacion", SqlType::Text),
            col("provincia", SqlType::Text),
            col("telefono", SqlType::Text),
            col("movil", SqlType::Text),
            col("email", SqlType::Text),
            col("zona", SqlType::Text),
            col("fecha_alta", SqlType::Date),
        ],
    },
    TableSchema {
        name: PARIENTES,
        columns: &[
            col("id", SqlType::Integer),
            col("socio_id", SqlType::Integer),
            col("nombre", SqlType::Text),
            col("apellidos", SqlType::Text),
            col("tipo", SqlType::Text),
            col("fecha_nacimiento", SqlType::Date),
        ],
    },
    TableSchema {
        name: CORTEJOS,
        columns: &[
            col("id", SqlType::Integer),
            col("nombre", SqlType::Text),
            col("anio", SqlType::Integer),
        ],
    },
    TableSchema {
        name: CARROZAS,
        columns: &[
            col("id", SqlType::Integer),
            col("cortejo_id", SqlType::Integer),
            col("nombre", SqlType::Text),
            col("max_carroza", SqlType::Integer),
            col("max_beduino", SqlType::Integer),
        ],
    },
    TableSchema {
        name: SOCIOS_CARROZAS,
        columns: &[
            col("id", SqlType::Integer),
            col("socio_id", SqlType::Integer),
            col("carroza_id", SqlType::Integer),
            col("tipo_usuario", SqlType::Text),
            col("sitio", SqlType::Text),
        ],
    },
    TableSchema {
        name: RECIBOS,
        columns: &[
            col("id", SqlType::Integer),
            col("socio_id", SqlType::Integer),
            col("tipo", SqlType::Text),
            col("concepto", SqlType::Text),
            col("importe", SqlType::Numeric),
            col("fecha", SqlType::Date),
        ],
    },
    TableSchema {
        name: PAGOS,
        columns: &[
            col("id", SqlType::Integer),
            col("recibo_id", SqlType::Integer),
            col("importe", SqlType::Numeric),
            col("fecha", SqlType::Date),
            col("metodo", SqlType::Text),
        ],
    },
];

/// Resolve a table name from the URL
pub fn lookup(name: &str) -> Result<&'static TableSchema, BackendError> {
    TABLES
        .iter()
        .find(|table| table.name == name)
        .ok_or_else(|| BackendError::UnknownTable(name.to_string()))
}

/// Names of every registered table
pub fn table_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|table| table.name)
}

impl TableSchema {
    /// Resolve a column name from the request body
    pub fn column(&self, name: &str) -> Result<&'static Column, BackendError> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| BackendError::UnknownColumn {
                table: self.name.to_string(),
                column: name.to_string(),
            })
    }

    /// The `id` primary key column
    pub fn id_column(&self) -> Result<&'static Column, BackendError> {
        self.column("id")
    }
}

impl Column {
    /// Convert a JSON body value into a bind value for this column
    pub fn bind(&self, value: &Value) -> Result<SqlValue, BackendError> {
        let text = match value {
            Value::Null => return Ok(SqlValue::null(self.ty)),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(BackendError::InvalidValue {
                    column: self.name.to_string(),
                })
            }
        };
        Ok(SqlValue::new(text, self.ty))
    }

    /// Convert a path parameter into a bind value for this column
    pub fn bind_str(&self, value: &str) -> SqlValue {
        SqlValue::new(value, self.ty)
    }
}
