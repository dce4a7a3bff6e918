use chrono::NaiveDate;

use super::{BudgetPeriod, BudgetStatus, Clock, SystemClock};
use crate::error::{Error, Result};
use crate::models::{BudgetedCategory, NewNotification, Notification};
use crate::stores::{CategoryStore, ExpenseStore, NotificationStore};

/// Budget status of one category for its current cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudget {
    pub category_id: i64,
    pub name: String,
    pub period: BudgetPeriod,
    pub status: BudgetStatus,
}

/// Evaluates budgets against spending and records threshold alerts.
///
/// The monitor owns no storage of its own; it borrows a store for the
/// duration of a request.
pub struct BudgetMonitor<'a, S, C = SystemClock> {
    store: &'a S,
    clock: C,
}

impl<'a, S> BudgetMonitor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<'a, S, C: Clock> BudgetMonitor<'a, S, C> {
    pub fn with_clock(store: &'a S, clock: C) -> Self {
        Self { store, clock }
    }
}

impl<S, C> BudgetMonitor<'_, S, C>
where
    S: CategoryStore + ExpenseStore,
    C: Clock,
{
    /// Spending against the budget of `category_id` in its current cycle.
    ///
    /// Categories without a limit report [`super::BudgetState::NoLimit`].
    pub fn get_category_budget_status(&self, category_id: i64) -> Result<CategoryBudget> {
        let category = self
            .store
            .get_category(category_id)?
            .ok_or(Error::CategoryNotFound(category_id))?;

        let period = BudgetPeriod::resolve(self.clock.today(), category.cycle_start_day);
        let spent = self.store.sum_expenses(category_id, period.start, period.end)?;

        Ok(CategoryBudget {
            category_id,
            name: category.name,
            period,
            status: BudgetStatus::classify(spent, category.budget_limit),
        })
    }

    /// Budget status of every budgeted category of `user_id`, ordered by name.
    pub fn budget_overview(&self, user_id: i64) -> Result<Vec<CategoryBudget>> {
        let today = self.clock.today();
        let mut categories = self.store.list_budgeted_categories(user_id)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        categories
            .into_iter()
            .map(|category| self.evaluate(category, today))
            .collect()
    }

    fn evaluate(&self, category: BudgetedCategory, today: NaiveDate) -> Result<CategoryBudget> {
        let period = BudgetPeriod::resolve(today, category.cycle_start_day);
        let spent = self.store.sum_expenses(category.id, period.start, period.end)?;

        Ok(CategoryBudget {
            category_id: category.id,
            name: category.name,
            period,
            status: BudgetStatus::classify(spent, Some(category.budget_limit)),
        })
    }
}

impl<S, C> BudgetMonitor<'_, S, C>
where
    S: CategoryStore + ExpenseStore + NotificationStore,
    C: Clock,
{
    /// Record an alert for every threshold newly crossed in the current cycle
    /// of each budgeted category of `user_id`.
    ///
    /// Returns only the alerts created by this call. Repeating the call with
    /// unchanged spending creates nothing.
    pub fn check_budget_limits(&self, user_id: i64) -> Result<Vec<Notification>> {
        let now = self.clock.now();
        let categories = self.store.list_budgeted_categories(user_id)?;
        if categories.is_empty() {
            tracing::debug!("user {user_id} has no budgeted categories");
            return Ok(Vec::new());
        }

        let mut created = Vec::new();
        for category in categories {
            let budget = self.evaluate(category, now.date())?;
            tracing::debug!(
                "{} spent {} of {:?} ({}%) in {}",
                budget.name,
                budget.status.spent,
                budget.status.limit,
                budget.status.raw_percentage.round_dp(2),
                budget.period,
            );

            for threshold in budget.status.crossed_thresholds() {
                if self.store.notification_exists(
                    user_id,
                    budget.category_id,
                    threshold,
                    budget.period.start,
                )? {
                    continue;
                }

                let new = NewNotification {
                    user_id,
                    category_id: budget.category_id,
                    threshold,
                    period_start: budget.period.start,
                    message: threshold.message(&budget.name),
                    created_at: now,
                };
                match self.store.insert_notification(&new)? {
                    Some(notification) => {
                        tracing::info!(
                            "{threshold} budget alert for {} (user {user_id})",
                            budget.name
                        );
                        created.push(notification);
                    }
                    None => tracing::debug!(
                        "{threshold} alert for {} already recorded this cycle",
                        budget.name
                    ),
                }
            }
        }

        Ok(created)
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
