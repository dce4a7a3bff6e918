use chrono::{NaiveDate, NaiveDateTime};

/// Spending levels that trigger an alert, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    NearLimit,
    LimitReached,
}

impl Threshold {
    pub const ALL: [Threshold; 2] = [Self::NearLimit, Self::LimitReached];

    /// Percentage of the budget limit at which the threshold is crossed.
    pub fn percent(self) -> u32 {
        match self {
            Self::NearLimit => 90,
            Self::LimitReached => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NearLimit => "near_limit",
            Self::LimitReached => "limit_reached",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "near_limit" => Some(Self::NearLimit),
            "limit_reached" => Some(Self::LimitReached),
            _ => None,
        }
    }

    pub fn message(self, category_name: &str) -> String {
        match self {
            Self::NearLimit => {
                format!("You've used 90% of your {category_name} budget this month.")
            }
            Self::LimitReached => {
                format!("You've reached your {category_name} budget limit for this month!")
            }
        }
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    /// `None` once the category has been deleted.
    pub category_id: Option<i64>,
    pub category_name: String,
    pub threshold: Threshold,
    pub period_start: NaiveDate,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
}

/// An alert waiting to be written to the notification log.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub category_id: i64,
    pub threshold: Threshold,
    pub period_start: NaiveDate,
    pub message: String,
    pub created_at: NaiveDateTime,
}
