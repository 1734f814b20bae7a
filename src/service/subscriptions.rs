//! Subscription business rules on top of a repository.

use crate::error::AppError;
use crate::model::{FieldUpdates, NewSubscription, Subscription};
use crate::repository::SubscriptionRepository;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Validates inputs, fills in derived values and delegates to the repository.
#[derive(Clone)]
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// Assigns a fresh id when none (or the nil id) was supplied.
    #[instrument(skip(self, input), fields(service_name = %input.service_name, user_id = %input.user_id))]
    pub async fn create(&self, input: NewSubscription) -> Result<Subscription, AppError> {
        let id = match input.id {
            Some(id) if !id.is_nil() => id,
            _ => {
                tracing::debug!("create subscription: id not supplied, generating");
                Uuid::new_v4()
            }
        };
        if input.start_date.is_zero() {
            warn!("create subscription: start date is unset");
            return Err(AppError::Validation("start_date is required".into()));
        }
        let sub = Subscription {
            id,
            service_name: input.service_name,
            price: input.price,
            user_id: input.user_id,
            start_date: input.start_date,
            end_date: input.end_date,
        };
        self.repo.create(&sub).await
    }

    #[instrument(skip(self, updates), fields(fields = updates.len()))]
    pub async fn update_fields(&self, id: Uuid, updates: FieldUpdates) -> Result<Subscription, AppError> {
        require_id(id)?;
        if updates.is_empty() {
            warn!("update subscription: no fields to update");
            return Err(AppError::Validation("no fields to update".into()));
        }
        if updates.start_date().is_some_and(|m| m.is_zero()) {
            warn!("update subscription: start date is unset");
            return Err(AppError::Validation("start_date is required".into()));
        }
        self.repo.update_fields(id, &updates).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Subscription, AppError> {
        require_id(id)?;
        self.repo.get_by_id(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<Subscription>, AppError> {
        self.repo.get_all().await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        require_id(id)?;
        self.repo.delete(id).await
    }

    #[instrument(skip(self))]
    pub async fn sum_prices(
        &self,
        start_date: &str,
        end_date: &str,
        name: &str,
        users_ids: &str,
    ) -> Result<i64, AppError> {
        self.repo.sum_prices(start_date, end_date, name, users_ids).await
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.repo.ping().await
    }
}

fn require_id(id: Uuid) -> Result<(), AppError> {
    if id.is_nil() {
        warn!("subscription id is nil");
        return Err(AppError::Validation("id is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldUpdate, MonthYear};
    use crate::repository::InMemorySubscriptionRepository;

    fn setup() -> (Arc<InMemorySubscriptionRepository>, SubscriptionService) {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let svc = SubscriptionService::new(repo.clone());
        (repo, svc)
    }

    fn input(id: Option<Uuid>) -> NewSubscription {
        NewSubscription {
            id,
            service_name: "Yandex Plus".into(),
            price: Some(400),
            user_id: Uuid::new_v4(),
            start_date: MonthYear::new(2025, 7).unwrap(),
            end_date: None,
        }
    }

    #[tokio::test]
    async fn create_generates_id_for_missing_or_nil() {
        let (_, svc) = setup();
        let a = svc.create(input(None)).await.unwrap();
        let b = svc.create(input(Some(Uuid::nil()))).await.unwrap();
        assert!(!a.id.is_nil());
        assert!(!b.id.is_nil());
        assert_ne!(a.id, b.id);
        assert_eq!(svc.get_by_id(a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn create_keeps_explicit_id_and_reports_duplicates() {
        let (_, svc) = setup();
        let id = Uuid::new_v4();
        let first = svc.create(input(Some(id))).await.unwrap();
        assert_eq!(first.id, id);

        let mut dup = input(Some(id));
        dup.service_name = "Other".into();
        let err = svc.create(dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(svc.get_by_id(id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn create_rejects_zero_start_date() {
        let (repo, svc) = setup();
        let mut bad = input(None);
        bad.start_date = MonthYear::new(1, 1).unwrap();
        let err = svc.create(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn empty_update_never_touches_store() {
        let (repo, svc) = setup();
        let err = svc.update_fields(Uuid::new_v4(), FieldUpdates::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn update_rejects_nil_id_and_zero_start_date() {
        let (repo, svc) = setup();
        let updates: FieldUpdates = [FieldUpdate::Price(Some(1))].into_iter().collect();
        assert!(matches!(
            svc.update_fields(Uuid::nil(), updates).await,
            Err(AppError::Validation(_))
        ));

        let zero: FieldUpdates = [FieldUpdate::StartDate(MonthYear::new(1, 1).unwrap())]
            .into_iter()
            .collect();
        assert!(matches!(
            svc.update_fields(Uuid::new_v4(), zero).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_, svc) = setup();
        let existing = svc.create(input(None)).await.unwrap();
        let updates: FieldUpdates = [FieldUpdate::Price(Some(1))].into_iter().collect();
        let err = svc.update_fields(Uuid::new_v4(), updates).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(svc.get_all().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn get_and_delete_reject_nil_id() {
        let (repo, svc) = setup();
        assert!(matches!(svc.get_by_id(Uuid::nil()).await, Err(AppError::Validation(_))));
        assert!(matches!(svc.delete(Uuid::nil()).await, Err(AppError::Validation(_))));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (_, svc) = setup();
        assert!(matches!(svc.delete(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn sum_without_filters_covers_all_rows() {
        let (_, svc) = setup();
        let mut priced = input(None);
        priced.price = Some(600);
        let mut unpriced = input(None);
        unpriced.price = None;
        svc.create(input(None)).await.unwrap();
        svc.create(priced).await.unwrap();
        svc.create(unpriced).await.unwrap();
        assert_eq!(svc.sum_prices("", "", "", "").await.unwrap(), 1000);
        assert_eq!(svc.sum_prices("", "", "nobody", "").await.unwrap(), 0);
    }
}
