//! Builds parameterized INSERT, SELECT, UPDATE, DELETE and SUM statements for the subscriptions table.

use crate::error::AppError;
use crate::model::{FieldUpdate, FieldUpdates, Subscription};
use crate::repository::SumFilter;
use crate::sql::PgBindValue;
use uuid::Uuid;

pub const TABLE: &str = "subscriptions";

pub const COLUMNS: [&str; 6] = ["id", "service_name", "price", "user_id", "start_date", "end_date"];

/// Quote identifier for PostgreSQL (identifiers are compile-time constants).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list() -> String {
    COLUMNS.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> u32 {
        self.params.push(v.into());
        self.params.len() as u32
    }
}

/// INSERT all columns, RETURNING the stored row. Dates are stored as month boundaries.
pub fn insert(sub: &Subscription) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders = [
        q.push_param(sub.id),
        q.push_param(sub.service_name.clone()),
        q.push_param(sub.price),
        q.push_param(sub.user_id),
        q.push_param(sub.start_date.start_of_month()),
        q.push_param(sub.end_date.map(|m| m.end_of_month())),
    ]
    .iter()
    .map(|n| format!("${}", n))
    .collect::<Vec<_>>()
    .join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(TABLE),
        column_list(),
        placeholders,
        column_list()
    );
    q
}

/// UPDATE by id: one SET clause per update, in the order given.
pub fn update(id: Uuid, updates: &FieldUpdates) -> Result<QueryBuf, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("no fields to update".into()));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(updates.len());
    for u in updates.iter() {
        let n = match u {
            FieldUpdate::ServiceName(v) => q.push_param(v.clone()),
            FieldUpdate::Price(v) => q.push_param(*v),
            FieldUpdate::UserId(v) => q.push_param(*v),
            FieldUpdate::StartDate(v) => q.push_param(v.start_of_month()),
            FieldUpdate::EndDate(v) => q.push_param(v.map(|m| m.end_of_month())),
        };
        sets.push(format!("{} = ${}", quoted(u.column()), n));
    }
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(TABLE),
        sets.join(", "),
        quoted("id"),
        id_param,
        column_list()
    );
    Ok(q)
}

/// SELECT by primary key.
pub fn select_by_id(id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(),
        quoted(TABLE),
        quoted("id"),
        n
    );
    q
}

/// SELECT every row, unordered.
pub fn select_all() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", column_list(), quoted(TABLE));
    q
}

/// DELETE by id.
pub fn delete(id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("DELETE FROM {} WHERE {} = ${}", quoted(TABLE), quoted("id"), n);
    q
}

/// SUM(price) with one AND-ed predicate per filter that is set. NULL sum becomes 0.
pub fn sum_prices(filter: &SumFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(from) = filter.start_from {
        let n = q.push_param(from);
        where_parts.push(format!("{} >= ${}", quoted("start_date"), n));
    }
    if let Some(until) = filter.end_until {
        let n = q.push_param(until);
        where_parts.push(format!("{} <= ${}", quoted("end_date"), n));
    }
    if let Some(name) = &filter.service_name {
        let n = q.push_param(name.clone());
        where_parts.push(format!("{} = ${}", quoted("service_name"), n));
    }
    if !filter.user_ids.is_empty() {
        let placeholders: Vec<String> = filter
            .user_ids
            .iter()
            .map(|u| format!("${}", q.push_param(*u)))
            .collect();
        where_parts.push(format!("{} IN ({})", quoted("user_id"), placeholders.join(", ")));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT COALESCE(SUM({}), 0)::BIGINT FROM {}{}",
        quoted("price"),
        quoted(TABLE),
        where_clause
    );
    q
}
