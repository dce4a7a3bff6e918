//! Budget cycles, spending status and threshold alerts.

mod clock;
mod monitor;
mod period;
mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use monitor::{BudgetMonitor, CategoryBudget};
pub use period::{days_in_month, BudgetPeriod};
pub use status::{BudgetState, BudgetStatus};
