//! Traits for the persistence collaborators the budget engine reads from and writes to.
//!
//! [`crate::db::Database`] implements all of them on SQLite.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    error::Result,
    models::{BudgetedCategory, Category, NewNotification, Notification, Threshold},
};

/// Read access to expense categories.
pub trait CategoryStore {
    /// Active, non-income categories of `user_id` that have a budget limit.
    fn list_budgeted_categories(&self, user_id: i64) -> Result<Vec<BudgetedCategory>>;

    /// Get a category by its ID, or `None` if it does not exist.
    fn get_category(&self, category_id: i64) -> Result<Option<Category>>;
}

/// Read access to recorded expenses.
pub trait ExpenseStore {
    /// Total of the expenses in `category_id` dated within `start..=end`.
    ///
    /// Returns zero when nothing matches.
    fn sum_expenses(&self, category_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Decimal>;
}

/// The append-only log of budget alerts.
pub trait NotificationStore {
    /// Whether `user_id` already has a `threshold` alert for `category_id`
    /// created on or after `since`.
    fn notification_exists(
        &self,
        user_id: i64,
        category_id: i64,
        threshold: Threshold,
        since: NaiveDate,
    ) -> Result<bool>;

    /// Append an alert to the log.
    ///
    /// Returns `None` when an alert for the same user, category, threshold
    /// and period start already exists, in which case nothing is written.
    fn insert_notification(&self, notification: &NewNotification) -> Result<Option<Notification>>;

    /// Alerts of `user_id`, newest first.
    fn list_notifications(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>>;

    /// Mark one alert as read.
    ///
    /// Returns `false` if `user_id` has no alert with that ID. Marking an
    /// alert that is already read returns `true` and changes nothing.
    fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<bool>;

    /// Mark every unread alert of `user_id` as read, returning how many changed.
    fn mark_all_read(&self, user_id: i64) -> Result<usize>;
}
