mod category;
mod expense;
mod notification;

pub use category::{BudgetedCategory, Category, CycleStartDay};
pub use expense::Expense;
pub use notification::{NewNotification, Notification, Threshold};
