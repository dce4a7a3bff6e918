use chrono::{Datelike, NaiveDate};

use crate::models::CycleStartDay;

/// An inclusive date range over which a category's spending is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BudgetPeriod {
    /// The budget cycle that contains `reference` when cycles begin on `start_day`.
    ///
    /// A start day that does not exist in a month falls back to the last day
    /// of that month. Each cycle ends the day before the next one begins, so
    /// consecutive cycles never overlap.
    pub fn resolve(reference: NaiveDate, start_day: CycleStartDay) -> Self {
        let (year, month) = (reference.year(), reference.month());

        if start_day == CycleStartDay::FIRST {
            return Self {
                start: first_of(year, month),
                end: last_of(year, month),
            };
        }

        let (start_year, start_month) = if reference.day() < clamp_day(year, month, start_day) {
            previous_month(year, month)
        } else {
            (year, month)
        };
        let start = anchor(start_year, start_month, start_day);

        let (next_year, next_month) = next_month(start_year, start_month);
        let end = anchor(next_year, next_month, start_day)
            .pred_opt()
            .unwrap_or(start);

        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the period, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Number of days in `month` of `year`, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(28, |d| d.day())
}

fn clamp_day(year: i32, month: u32, day: CycleStartDay) -> u32 {
    day.get().min(days_in_month(year, month))
}

fn anchor(year: i32, month: u32, day: CycleStartDay) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, clamp_day(year, month, day))
        .unwrap_or_else(|| first_of(year, month))
}

fn first_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).unwrap_or(NaiveDate::MAX)
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
