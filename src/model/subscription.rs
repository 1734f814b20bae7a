//! Subscription record and the typed partial-update set.

use crate::model::MonthYear;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: Option<i32>,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "03-2024")]
    pub start_date: MonthYear,
    #[schema(value_type = Option<String>, example = "12-2024")]
    pub end_date: Option<MonthYear>,
}

/// Input to the create path; `id` is filled in by the service when absent or nil.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSubscription {
    pub id: Option<Uuid>,
    pub service_name: String,
    pub price: Option<i32>,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

/// One column overwrite. `id` is not updatable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    ServiceName(String),
    Price(Option<i32>),
    UserId(Uuid),
    StartDate(MonthYear),
    EndDate(Option<MonthYear>),
}

impl FieldUpdate {
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::ServiceName(_) => "service_name",
            FieldUpdate::Price(_) => "price",
            FieldUpdate::UserId(_) => "user_id",
            FieldUpdate::StartDate(_) => "start_date",
            FieldUpdate::EndDate(_) => "end_date",
        }
    }

    pub fn apply(&self, sub: &mut Subscription) {
        match self {
            FieldUpdate::ServiceName(v) => sub.service_name = v.clone(),
            FieldUpdate::Price(v) => sub.price = *v,
            FieldUpdate::UserId(v) => sub.user_id = *v,
            FieldUpdate::StartDate(v) => sub.start_date = *v,
            FieldUpdate::EndDate(v) => sub.end_date = *v,
        }
    }
}

/// Set of column overwrites, at most one per column; a later push for the same column wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldUpdates(Vec<FieldUpdate>);

impl FieldUpdates {
    pub fn new() -> Self {
        FieldUpdates(Vec::new())
    }

    pub fn push(&mut self, update: FieldUpdate) {
        self.0.retain(|u| u.column() != update.column());
        self.0.push(update);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldUpdate> {
        self.0.iter()
    }

    pub fn start_date(&self) -> Option<MonthYear> {
        self.0.iter().find_map(|u| match u {
            FieldUpdate::StartDate(m) => Some(*m),
            _ => None,
        })
    }

    pub fn apply(&self, sub: &mut Subscription) {
        for u in &self.0 {
            u.apply(sub);
        }
    }
}

impl FromIterator<FieldUpdate> for FieldUpdates {
    fn from_iter<I: IntoIterator<Item = FieldUpdate>>(iter: I) -> Self {
        let mut out = FieldUpdates::new();
        for u in iter {
            out.push(u);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            service_name: "Netflix".into(),
            price: Some(999),
            user_id: Uuid::new_v4(),
            start_date: MonthYear::new(2024, 3).unwrap(),
            end_date: None,
        }
    }

    #[test]
    fn later_update_for_same_column_wins() {
        let updates: FieldUpdates = [FieldUpdate::Price(Some(1)), FieldUpdate::Price(Some(2))]
            .into_iter()
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.iter().next(), Some(&FieldUpdate::Price(Some(2))));
    }

    #[test]
    fn apply_overwrites_only_named_columns() {
        let mut sub = sample();
        let before = sub.clone();
        let end = MonthYear::new(2024, 12).unwrap();
        let updates: FieldUpdates = [FieldUpdate::Price(None), FieldUpdate::EndDate(Some(end))]
            .into_iter()
            .collect();
        updates.apply(&mut sub);
        assert_eq!(sub.price, None);
        assert_eq!(sub.end_date, Some(end));
        assert_eq!(sub.service_name, before.service_name);
        assert_eq!(sub.start_date, before.start_date);
    }

    #[test]
    fn serializes_dates_in_wire_format() {
        let mut sub = sample();
        sub.end_date = MonthYear::new(2025, 1);
        let v = serde_json::to_value(&sub).unwrap();
        assert_eq!(v["start_date"], "03-2024");
        assert_eq!(v["end_date"], "01-2025");
        assert_eq!(v["price"], 999);
    }
}
