//! Data access for subscriptions.

mod filter;
pub mod memory;
pub mod postgres;

pub use filter::SumFilter;
pub use memory::InMemorySubscriptionRepository;
pub use postgres::PgSubscriptionRepository;

use crate::error::AppError;
use crate::model::{FieldUpdates, Subscription};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence seam for subscriptions. Each call is one statement against the store.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert the record as given. Duplicate id -> `Conflict`.
    async fn create(&self, sub: &Subscription) -> Result<Subscription, AppError>;
    /// Overwrite the given columns. Empty set -> `Validation`; unknown id -> `NotFound`.
    async fn update_fields(&self, id: Uuid, updates: &FieldUpdates) -> Result<Subscription, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, AppError>;
    async fn get_all(&self) -> Result<Vec<Subscription>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    /// Raw filter strings; see [`SumFilter::parse`].
    async fn sum_prices(
        &self,
        start_date: &str,
        end_date: &str,
        name: &str,
        users_ids: &str,
    ) -> Result<i64, AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("subscription {}", id))
}
