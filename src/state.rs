//! Shared application state for all routes.

use crate::service::SubscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub subscriptions: SubscriptionService,
}

impl AppState {
    pub fn new(subscriptions: SubscriptionService) -> Self {
        AppState { subscriptions }
    }
}
