//! Subscriptions: REST service for user subscription records backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod repository;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{FieldUpdate, FieldUpdates, MonthYear, NewSubscription, Subscription};
pub use repository::{InMemorySubscriptionRepository, PgSubscriptionRepository, SubscriptionRepository};
pub use routes::build_router;
pub use service::SubscriptionService;
pub use state::AppState;
pub use store::{connect_pool, ensure_database_exists};
