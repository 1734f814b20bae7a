//! OpenAPI document for the `/api/v1` surface.

use crate::error::ErrorBody;
use crate::handlers::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use crate::model::Subscription;
use crate::response::{StatusMessage, SumResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Subscriptions API", description = "CRUD and price aggregation over user subscriptions"),
    servers((url = "/api/v1")),
    paths(
        crate::handlers::subscriptions::create,
        crate::handlers::subscriptions::list,
        crate::handlers::subscriptions::read,
        crate::handlers::subscriptions::update,
        crate::handlers::subscriptions::delete,
        crate::handlers::subscriptions::sum,
    ),
    components(
        schemas(
            Subscription,
            CreateSubscriptionRequest,
            UpdateSubscriptionRequest,
            StatusMessage,
            SumResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
