use rust_decimal::Decimal;

/// Day of the month on which a category's budget cycle begins.
///
/// Always within 1..=31. Out-of-range configuration is clamped rather than
/// rejected so that a bad setting never blocks expense tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleStartDay(u32);

impl CycleStartDay {
    pub const FIRST: CycleStartDay = CycleStartDay(1);

    pub fn new(day: i64) -> Self {
        Self(day.clamp(1, 31) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CycleStartDay {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for CycleStartDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub budget_limit: Option<Decimal>,
    pub cycle_start_day: CycleStartDay,
    pub is_income: bool,
    pub is_active: bool,
}

impl Category {
    pub fn new(user_id: i64, name: String) -> Self {
        Self {
            id: None,
            user_id,
            name,
            budget_limit: None,
            cycle_start_day: CycleStartDay::FIRST,
            is_income: false,
            is_active: true,
        }
    }

    pub fn with_budget(mut self, limit: Decimal, cycle_start_day: CycleStartDay) -> Self {
        self.budget_limit = Some(limit);
        self.cycle_start_day = cycle_start_day;
        self
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An active expense category with a budget limit set.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetedCategory {
    pub id: i64,
    pub name: String,
    pub budget_limit: Decimal,
    pub cycle_start_day: CycleStartDay,
}
