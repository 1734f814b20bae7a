//! Schema bootstrap for the `subscriptions` table. Idempotent.

use crate::error::AppError;
use crate::sql::TABLE;
use sqlx::PgPool;

fn ddl() -> [String; 2] {
    [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{}" (
                id UUID PRIMARY KEY,
                service_name TEXT NOT NULL,
                price INTEGER,
                user_id UUID NOT NULL,
                start_date TIMESTAMP NOT NULL,
                end_date TIMESTAMP
            )
            "#,
            TABLE
        ),
        format!(
            r#"CREATE INDEX IF NOT EXISTS "{0}_user_id_idx" ON "{0}" (user_id)"#,
            TABLE
        ),
    ]
}

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for stmt in ddl() {
        sqlx::query(&stmt).execute(pool).await.map_err(|e| {
            tracing::error!(error = %e, "migration failed");
            AppError::Db(e)
        })?;
    }
    tracing::info!(table = TABLE, "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_idempotent() {
        for stmt in ddl() {
            assert!(stmt.contains("IF NOT EXISTS"), "{stmt}");
        }
    }
}
