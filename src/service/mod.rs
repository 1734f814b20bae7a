//! Business logic layer.

mod subscriptions;
pub use subscriptions::SubscriptionService;
