//! HTTP handlers for subscriptions and their request types.

pub mod dto;
pub mod subscriptions;

pub use dto::{CreateSubscriptionRequest, SumQuery, UpdateSubscriptionRequest};
