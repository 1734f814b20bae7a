//! Typed bind values for PostgreSQL statements.

use crate::error::AppError;
use chrono::NaiveDateTime;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;
use uuid::Uuid;

/// A value that can be bound to a PostgreSQL query. Nullable variants bind a typed NULL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PgBindValue {
    Uuid(Uuid),
    Text(String),
    Int(Option<i32>),
    Timestamp(Option<NaiveDateTime>),
}

impl From<Uuid> for PgBindValue {
    fn from(v: Uuid) -> Self {
        PgBindValue::Uuid(v)
    }
}

impl From<String> for PgBindValue {
    fn from(v: String) -> Self {
        PgBindValue::Text(v)
    }
}

impl From<Option<i32>> for PgBindValue {
    fn from(v: Option<i32>) -> Self {
        PgBindValue::Int(v)
    }
}

impl From<NaiveDateTime> for PgBindValue {
    fn from(v: NaiveDateTime) -> Self {
        PgBindValue::Timestamp(Some(v))
    }
}

impl From<Option<NaiveDateTime>> for PgBindValue {
    fn from(v: Option<NaiveDateTime>) -> Self {
        PgBindValue::Timestamp(v)
    }
}

/// Encode params in order ($1, $2, ...) into sqlx arguments.
pub fn to_arguments(params: &[PgBindValue]) -> Result<PgArguments, AppError> {
    let mut args = PgArguments::default();
    for p in params {
        let res = match p {
            PgBindValue::Uuid(u) => args.add(*u),
            PgBindValue::Text(s) => args.add(s.clone()),
            PgBindValue::Int(n) => args.add(*n),
            PgBindValue::Timestamp(t) => args.add(*t),
        };
        res.map_err(|e| AppError::Query(format!("bind parameter: {}", e)))?;
    }
    Ok(args)
}
