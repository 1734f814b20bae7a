//! In-memory repository used as the test double for the service and HTTP tests.

use crate::error::AppError;
use crate::model::{FieldUpdates, Subscription};
use crate::repository::{not_found, SubscriptionRepository, SumFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    rows: Mutex<HashMap<Uuid, Subscription>>,
    calls: AtomicUsize,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls that reached this store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, sub: &Subscription) -> Result<Subscription, AppError> {
        self.hit();
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&sub.id) {
            return Err(AppError::Conflict(format!("subscription {} already exists", sub.id)));
        }
        rows.insert(sub.id, sub.clone());
        Ok(sub.clone())
    }

    async fn update_fields(&self, id: Uuid, updates: &FieldUpdates) -> Result<Subscription, AppError> {
        self.hit();
        if updates.is_empty() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let mut rows = self.rows.lock().await;
        let sub = rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        updates.apply(sub);
        Ok(sub.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, AppError> {
        self.hit();
        self.rows.lock().await.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<Subscription>, AppError> {
        self.hit();
        Ok(self.rows.lock().await.values().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.hit();
        self.rows
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn sum_prices(
        &self,
        start_date: &str,
        end_date: &str,
        name: &str,
        users_ids: &str,
    ) -> Result<i64, AppError> {
        self.hit();
        let filter = SumFilter::parse(start_date, end_date, name, users_ids);
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .filter(|s| filter.matches(s))
            .filter_map(|s| s.price)
            .map(i64::from)
            .sum())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
