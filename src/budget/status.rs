use rust_decimal::Decimal;

use crate::models::Threshold;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const NEAR_LIMIT_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetState {
    NoLimit,
    UnderBudget,
    NearLimit,
    OverBudget,
}

impl BudgetState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoLimit => "no_limit",
            Self::UnderBudget => "under_budget",
            Self::NearLimit => "near_limit",
            Self::OverBudget => "over_budget",
        }
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much of a budget has been spent.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub spent: Decimal,
    pub limit: Option<Decimal>,
    /// Share of the limit spent, capped at 100 for display.
    pub percentage: Decimal,
    /// Share of the limit spent without the cap. Thresholds compare against this.
    pub raw_percentage: Decimal,
    pub status: BudgetState,
}

impl BudgetStatus {
    /// A limit that is missing or not positive means the budget is not tracked.
    pub fn classify(spent: Decimal, limit: Option<Decimal>) -> Self {
        let Some(limit) = limit.filter(|l| *l > Decimal::ZERO) else {
            return Self {
                spent,
                limit,
                percentage: Decimal::ZERO,
                raw_percentage: Decimal::ZERO,
                status: BudgetState::NoLimit,
            };
        };

        let raw_percentage = raw_percentage(spent, limit);
        let status = if raw_percentage >= HUNDRED {
            BudgetState::OverBudget
        } else if raw_percentage >= NEAR_LIMIT_PERCENT {
            BudgetState::NearLimit
        } else {
            BudgetState::UnderBudget
        };

        Self {
            spent,
            limit: Some(limit),
            percentage: raw_percentage.min(HUNDRED),
            raw_percentage,
            status,
        }
    }

    /// Whether spending has reached `threshold`.
    pub fn has_crossed(&self, threshold: Threshold) -> bool {
        self.status != BudgetState::NoLimit
            && self.raw_percentage >= Decimal::from(threshold.percent())
    }

    /// Thresholds reached so far, in table order.
    pub fn crossed_thresholds(&self) -> impl Iterator<Item = Threshold> + '_ {
        Threshold::ALL.into_iter().filter(|t| self.has_crossed(*t))
    }

    pub fn remaining(&self) -> Option<Decimal> {
        self.limit.map(|limit| limit - self.spent)
    }
}

fn raw_percentage(spent: Decimal, limit: Decimal) -> Decimal {
    spent
        .checked_div(limit)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
