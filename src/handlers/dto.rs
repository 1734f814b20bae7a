//! Request bodies and query strings, and their conversion into domain inputs.

use crate::error::AppError;
use crate::model::{FieldUpdate, FieldUpdates, MonthYear, NewSubscription};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// POST body. Dates use `MM-YYYY`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub service_name: String,
    pub price: Option<i32>,
    pub user_id: Option<Uuid>,
    #[schema(value_type = String, example = "03-2024")]
    pub start_date: Option<MonthYear>,
    #[schema(value_type = Option<String>, example = "12-2024")]
    pub end_date: Option<MonthYear>,
}

impl CreateSubscriptionRequest {
    pub fn into_new_subscription(self) -> Result<NewSubscription, AppError> {
        if self.service_name.is_empty() {
            return Err(AppError::Validation("service_name is required".into()));
        }
        let start_date = self
            .start_date
            .filter(|m| !m.is_zero())
            .ok_or_else(|| AppError::Validation("start_date is required".into()))?;
        let price = self
            .price
            .ok_or_else(|| AppError::Validation("price is required".into()))?;
        let user_id = self
            .user_id
            .filter(|u| !u.is_nil())
            .ok_or_else(|| AppError::Validation("user_id is required".into()))?;
        Ok(NewSubscription {
            id: self.id,
            service_name: self.service_name,
            price: Some(price),
            user_id,
            start_date,
            end_date: self.end_date,
        })
    }
}

/// PUT body. Only the listed keys are accepted; dates use `YYYY-MM`.
/// `price` and `end_date` may be `null` to clear the column.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSubscriptionRequest {
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub price: Option<Option<i32>>,
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, example = "2024-05")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, example = "2024-12")]
    pub end_date: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateSubscriptionRequest {
    pub fn into_updates(self) -> Result<FieldUpdates, AppError> {
        let mut updates = FieldUpdates::new();
        if let Some(name) = self.service_name {
            if name.is_empty() {
                return Err(AppError::Validation("service_name must not be empty".into()));
            }
            updates.push(FieldUpdate::ServiceName(name));
        }
        if let Some(price) = self.price {
            updates.push(FieldUpdate::Price(price));
        }
        if let Some(user_id) = self.user_id {
            if user_id.is_nil() {
                return Err(AppError::Validation("user_id must not be nil".into()));
            }
            updates.push(FieldUpdate::UserId(user_id));
        }
        if let Some(start) = self.start_date {
            let start = start
                .as_deref()
                .and_then(|s| MonthYear::parse_update(s).ok())
                .filter(|m| !m.is_zero())
                .ok_or_else(|| AppError::Validation("invalid start_date".into()))?;
            updates.push(FieldUpdate::StartDate(start));
        }
        if let Some(end) = self.end_date {
            let end = end
                .as_deref()
                .map(MonthYear::parse_update)
                .transpose()
                .map_err(|_| AppError::Validation("invalid end_date".into()))?;
            updates.push(FieldUpdate::EndDate(end));
        }
        if updates.is_empty() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        Ok(updates)
    }
}

/// Sum filters, passed through verbatim to the data layer.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SumQuery {
    /// Lower bound on start month, `MM-YYYY`.
    pub start_date: Option<String>,
    /// Upper bound on end month, `MM-YYYY`.
    pub end_date: Option<String>,
    /// Exact service name.
    pub name: Option<String>,
    /// Comma-separated user ids.
    pub users_ids: Option<String>,
}

impl SumQuery {
    /// First value wins for repeated keys; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = SumQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "start_date" => &mut q.start_date,
                "end_date" => &mut q.end_date,
                "name" => &mut q.name,
                "users_ids" => &mut q.users_ids,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_body() -> serde_json::Value {
        json!({
            "service_name": "Netflix",
            "price": 999,
            "user_id": Uuid::new_v4(),
            "start_date": "03-2024"
        })
    }

    #[test]
    fn create_accepts_full_record() {
        let req: CreateSubscriptionRequest = serde_json::from_value(create_body()).unwrap();
        let input = req.into_new_subscription().unwrap();
        assert_eq!(input.id, None);
        assert_eq!(input.start_date, MonthYear::new(2024, 3).unwrap());
        assert_eq!(input.price, Some(999));
    }

    #[test]
    fn create_requires_each_field() {
        for key in ["service_name", "price", "user_id", "start_date"] {
            let mut body = create_body();
            body.as_object_mut().unwrap().remove(key);
            let req: CreateSubscriptionRequest = serde_json::from_value(body).unwrap();
            let err = req.into_new_subscription().unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m.contains(key)), "{key}: {err}");
        }
    }

    #[test]
    fn create_rejects_nil_user_and_malformed_date() {
        let mut body = create_body();
        body["user_id"] = json!(Uuid::nil());
        let req: CreateSubscriptionRequest = serde_json::from_value(body).unwrap();
        assert!(req.into_new_subscription().is_err());

        let mut body = create_body();
        body["start_date"] = json!("2024-03");
        assert!(serde_json::from_value::<CreateSubscriptionRequest>(body).is_err());
    }

    #[test]
    fn update_parses_year_first_dates_and_nulls() {
        let req: UpdateSubscriptionRequest =
            serde_json::from_value(json!({"start_date": "2024-05", "end_date": null, "price": null})).unwrap();
        let updates = req.into_updates().unwrap();
        let got: Vec<_> = updates.iter().cloned().collect();
        assert_eq!(
            got,
            vec![
                FieldUpdate::Price(None),
                FieldUpdate::StartDate(MonthYear::new(2024, 5).unwrap()),
                FieldUpdate::EndDate(None),
            ]
        );
    }

    #[test]
    fn update_rejects_wire_format_start_date() {
        let req: UpdateSubscriptionRequest = serde_json::from_value(json!({"start_date": "05-2024"})).unwrap();
        let err = req.into_updates().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "invalid start_date"));
    }

    #[test]
    fn sum_query_keeps_first_of_repeated_keys() {
        let pairs = vec![
            ("name".to_string(), "a".to_string()),
            ("name".to_string(), "b".to_string()),
            ("users_ids".to_string(), "x".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        let q = SumQuery::from_pairs(pairs);
        assert_eq!(q.name.as_deref(), Some("a"));
        assert_eq!(q.users_ids.as_deref(), Some("x"));
        assert_eq!(q.start_date, None);
    }

    #[test]
    fn update_rejects_unknown_keys_and_empty_body() {
        assert!(serde_json::from_value::<UpdateSubscriptionRequest>(json!({"id": Uuid::new_v4()})).is_err());
        assert!(serde_json::from_value::<UpdateSubscriptionRequest>(json!({"colour": "red"})).is_err());

        let req: UpdateSubscriptionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(req.into_updates(), Err(AppError::Validation(_))));
    }
}
