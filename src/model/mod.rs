//! Domain types.

mod month_year;
mod subscription;

pub use month_year::{MonthYear, MonthYearError, UPDATE_FORMAT, WIRE_FORMAT};
pub use subscription::{FieldUpdate, FieldUpdates, NewSubscription, Subscription};
