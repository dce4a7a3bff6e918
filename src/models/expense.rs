use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

impl Expense {
    pub fn new(user_id: i64, category_id: Option<i64>, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            user_id,
            category_id,
            amount,
            date,
            description: String::new(),
        }
    }
}
