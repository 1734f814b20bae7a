//! PostgreSQL-backed repository over a shared `PgPool`.

use crate::error::AppError;
use crate::model::{FieldUpdates, MonthYear, Subscription};
use crate::repository::{not_found, SubscriptionRepository, SumFilter};
use crate::sql::{self, to_arguments, QueryBuf};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    service_name: String,
    price: Option<i32>,
    user_id: Uuid,
    start_date: NaiveDateTime,
    end_date: Option<NaiveDateTime>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: MonthYear::from_timestamp(row.start_date),
            end_date: row.end_date.map(MonthYear::from_timestamp),
        }
    }
}

#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        PgSubscriptionRepository { pool }
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Subscription>, AppError> {
        tracing::debug!(sql = %q.sql, params = q.params.len(), "query");
        let row = sqlx::query_as_with::<_, SubscriptionRow, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, sub: &Subscription) -> Result<Subscription, AppError> {
        let q = sql::insert(sub);
        tracing::debug!(sql = %q.sql, params = q.params.len(), "query");
        let row = sqlx::query_as_with::<_, SubscriptionRow, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    tracing::warn!(id = %sub.id, "subscription with this id already exists");
                    AppError::Conflict(format!("subscription {} already exists", sub.id))
                }
                other => {
                    tracing::error!(error = %other, "failed to create subscription");
                    AppError::Db(other)
                }
            })?;
        Ok(row.into())
    }

    async fn update_fields(&self, id: Uuid, updates: &FieldUpdates) -> Result<Subscription, AppError> {
        let q = sql::update(id, updates)?;
        match self.fetch_optional(&q).await? {
            Some(sub) => Ok(sub),
            None => {
                tracing::warn!(%id, "subscription not found for update");
                Err(not_found(id))
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, AppError> {
        self.fetch_optional(&sql::select_by_id(id))
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<Subscription>, AppError> {
        let q = sql::select_all();
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query_as_with::<_, SubscriptionRow, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let q = sql::delete(id);
        tracing::debug!(sql = %q.sql, params = q.params.len(), "query");
        let done = sqlx::query_with(&q.sql, to_arguments(&q.params)?)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn sum_prices(
        &self,
        start_date: &str,
        end_date: &str,
        name: &str,
        users_ids: &str,
    ) -> Result<i64, AppError> {
        let filter = SumFilter::parse(start_date, end_date, name, users_ids);
        let q = sql::sum_prices(&filter);
        tracing::debug!(sql = %q.sql, params = q.params.len(), "query");
        let sum = sqlx::query_scalar_with::<_, i64, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to fetch subscription price sum");
                AppError::Db(e)
            })?;
        Ok(sum)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
