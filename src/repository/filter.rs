//! Optional filters for the price-sum query, parsed from raw query strings.

use crate::model::{MonthYear, Subscription};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Parsed sum filters. Unset fields add no predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SumFilter {
    /// `start_date >= start_from`
    pub start_from: Option<NaiveDateTime>,
    /// `end_date <= end_until`
    pub end_until: Option<NaiveDateTime>,
    pub service_name: Option<String>,
    pub user_ids: Vec<Uuid>,
}

impl SumFilter {
    /// Empty strings mean "no filter". Malformed dates are logged and skipped;
    /// `users_ids` is comma separated and unparseable entries are dropped one by one.
    pub fn parse(start_date: &str, end_date: &str, name: &str, users_ids: &str) -> Self {
        let mut filter = SumFilter::default();

        if !start_date.is_empty() {
            match MonthYear::parse_wire(start_date) {
                Ok(m) => filter.start_from = Some(m.start_of_month()),
                Err(e) => tracing::warn!(error = %e, "sum: ignoring start_date filter"),
            }
        }
        if !end_date.is_empty() {
            match MonthYear::parse_wire(end_date) {
                Ok(m) => filter.end_until = Some(m.end_of_month()),
                Err(e) => tracing::warn!(error = %e, "sum: ignoring end_date filter"),
            }
        }
        if !name.is_empty() {
            filter.service_name = Some(name.to_string());
        }
        for raw in users_ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match Uuid::parse_str(raw) {
                Ok(id) => filter.user_ids.push(id),
                Err(_) => tracing::debug!(user_id = raw, "sum: dropping unparseable user id"),
            }
        }
        filter
    }

    /// Same predicate the SQL form applies. A NULL `end_date` never satisfies the end bound.
    pub fn matches(&self, sub: &Subscription) -> bool {
        if let Some(from) = self.start_from {
            if sub.start_date.start_of_month() < from {
                return false;
            }
        }
        if let Some(until) = self.end_until {
            match sub.end_date {
                Some(end) if end.end_of_month() <= until => {}
                _ => return false,
            }
        }
        if let Some(name) = &self.service_name {
            if &sub.service_name != name {
                return false;
            }
        }
        self.user_ids.is_empty() || self.user_ids.contains(&sub.user_id)
    }
}
