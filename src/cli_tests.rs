#![allow(clippy::unwrap_used)]

use super::*;
use finarc::stores::ExpenseStore;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run(db: &Database, args: &[&str]) -> Result<String> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let mut out = Vec::new();
    as_cli(&args, db, 1, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn setup_food(db: &Database, spent: Decimal) -> i64 {
    let food = db
        .insert_category(&Category::new(1, "Food".into()).with_budget(dec!(200), CycleStartDay::FIRST))
        .unwrap();
    let today = chrono::Local::now().date_naive();
    db.insert_expense(&Expense::new(1, Some(food), spent, today))
        .unwrap();
    food
}

#[test]
fn test_check_reports_new_alerts_once() {
    let db = Database::open_in_memory().unwrap();
    setup_food(&db, dec!(190));

    let out = run(&db, &["check"]).unwrap();
    assert!(out.contains("[90%] You've used 90% of your Food budget this month."));
    assert!(out.contains("1 new alert(s)"));

    let out = run(&db, &["check"]).unwrap();
    assert!(out.contains("No new budget alerts"));
}

#[test]
fn test_status_output() {
    let db = Database::open_in_memory().unwrap();
    let food = setup_food(&db, dec!(190));

    let out = run(&db, &["status", &food.to_string()]).unwrap();
    assert!(out.contains("Cycle:   "));
    assert!(out.contains("Spent:   $190.00"));
    assert!(out.contains("Limit:   $200.00"));
    assert!(out.contains("Left:    $10.00"));
    assert!(out.contains("Used:    95.0%"));
    assert!(out.contains("near_limit"));
}

#[test]
fn test_status_unknown_category_fails() {
    let db = Database::open_in_memory().unwrap();
    assert!(run(&db, &["status", "77"]).is_err());
    assert!(run(&db, &["status"]).is_err());
    assert!(run(&db, &["status", "abc"]).is_err());
}

#[test]
fn test_budgets_overview() {
    let db = Database::open_in_memory().unwrap();
    assert!(run(&db, &["budgets"]).unwrap().contains("No budgets set"));

    let food = setup_food(&db, dec!(250));
    let out = run(&db, &["budgets"]).unwrap();
    assert!(out.contains("Food"));
    assert!(out.contains("over_budget"));

    let out = run(&db, &["status", &food.to_string()]).unwrap();
    assert!(out.contains("Over:    $50.00"));
    assert!(out.contains("Used:    100.0%"));
}

#[test]
fn test_set_and_clear_budget() {
    let db = Database::open_in_memory().unwrap();
    let id = db.insert_category(&Category::new(1, "Rent".into())).unwrap();

    let out = run(&db, &["budget", &id.to_string(), "1200", "15"]).unwrap();
    assert!(out.contains("set to $1200.00, resetting on day 15"));
    let cat = db.get_categories(1).unwrap().remove(0);
    assert_eq!(cat.budget_limit, Some(dec!(1200)));
    assert_eq!(cat.cycle_start_day.get(), 15);

    run(&db, &["budget", &id.to_string(), "none"]).unwrap();
    assert!(db.get_categories(1).unwrap()[0].budget_limit.is_none());

    assert!(run(&db, &["budget", &id.to_string(), "-5"]).is_err());
    assert!(run(&db, &["budget", &id.to_string()]).is_err());
    assert!(run(&db, &["budget", "999", "100"]).is_err());
}

#[test]
fn test_notifications_and_read() {
    let db = Database::open_in_memory().unwrap();
    setup_food(&db, dec!(200));
    run(&db, &["check"]).unwrap();

    let listed = db.list_notifications(1, false).unwrap();
    assert_eq!(listed.len(), 2);

    let out = run(&db, &["notifications", "--unread"]).unwrap();
    assert_eq!(out.lines().count(), 2);

    let out = run(&db, &["read", &listed[0].id.to_string()]).unwrap();
    assert!(out.contains("marked as read"));
    assert_eq!(db.list_notifications(1, true).unwrap().len(), 1);

    let out = run(&db, &["read-all"]).unwrap();
    assert!(out.contains("1 notifications marked as read"));
    assert!(run(&db, &["notifications", "--unread"])
        .unwrap()
        .contains("No notifications"));

    assert!(run(&db, &["read", "9999"]).is_err());
}

#[test]
fn test_categories_listing() {
    let db = Database::open_in_memory().unwrap();
    assert!(run(&db, &["categories"]).unwrap().contains("No categories"));

    setup_food(&db, dec!(1));
    let mut salary = Category::new(1, "Salary".into());
    salary.is_income = true;
    db.insert_category(&salary).unwrap();

    let out = run(&db, &["categories"]).unwrap();
    assert!(out.contains("Food"));
    assert!(out.contains("200.00"));
    assert!(out.contains("income"));
}

#[test]
fn test_unknown_command() {
    let db = Database::open_in_memory().unwrap();
    assert!(run(&db, &["frobnicate"]).is_err());
    assert!(run(&db, &[]).is_err());
}

fn info(args: &[&str]) -> (bool, String) {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let mut out = Vec::new();
    let handled = as_info(&args, &mut out).unwrap();
    (handled, String::from_utf8(out).unwrap())
}

#[test]
fn test_help_and_version_need_no_database() {
    let (handled, out) = info(&["help"]);
    assert!(handled);
    assert!(out.contains("Usage: finarc"));

    let (handled, out) = info(&[]);
    assert!(handled);
    assert!(out.contains("Usage: finarc"));

    let (handled, out) = info(&["--version"]);
    assert!(handled);
    assert!(out.starts_with("finarc "));

    let (handled, out) = info(&["check"]);
    assert!(!handled);
    assert!(out.is_empty());
}

// ── Categories and expenses ───────────────────────────────────

#[test]
fn test_seeded_categories_can_be_budgeted_and_alert() {
    let mut db = Database::open_in_memory().unwrap();
    db.seed_default_categories(1).unwrap();
    let food = db
        .get_categories(1)
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Food")
        .and_then(|c| c.id)
        .unwrap();

    run(&db, &["budget", &food.to_string(), "100"]).unwrap();

    let out = run(&db, &["expense", "add", &food.to_string(), "95"]).unwrap();
    assert!(out.contains("Recorded expense"));
    assert!(out.contains("$95.00 in Food"));
    assert!(out.contains("[90%] You've used 90% of your Food budget this month."));
    assert!(out.contains("1 new alert(s)"));

    let out = run(&db, &["expense", "add", &food.to_string(), "5"]).unwrap();
    assert!(out.contains("[100%] You've reached your Food budget limit for this month!"));
    assert!(!out.contains("[90%]"));
    assert_eq!(db.list_notifications(1, false).unwrap().len(), 2);
}

#[test]
fn test_expense_add_validation() {
    let db = Database::open_in_memory().unwrap();
    let food = setup_food(&db, dec!(1)).to_string();
    let other = db.insert_category(&Category::new(2, "Theirs".into())).unwrap();

    assert!(run(&db, &["expense", "add", &food]).is_err());
    assert!(run(&db, &["expense", "add", &food, "abc"]).is_err());
    assert!(run(&db, &["expense", "add", &food, "0"]).is_err());
    assert!(run(&db, &["expense", "add", &food, "10", "2025-13-01"]).is_err());
    assert!(run(&db, &["expense", "add", &other.to_string(), "10"]).is_err());
    assert!(run(&db, &["expense", "add", "999", "10"]).is_err());
    assert!(run(&db, &["expense"]).is_err());
}

#[test]
fn test_expense_add_with_date_and_description() {
    let db = Database::open_in_memory().unwrap();
    let food = setup_food(&db, dec!(1));

    let out = run(
        &db,
        &["expense", "add", &food.to_string(), "12.50", "2020-01-15", "Lunch", "out"],
    )
    .unwrap();
    assert!(out.contains("$12.50 in Food on 2020-01-15"));
    assert_eq!(
        db.sum_expenses(food, d(2020, 1, 1), d(2020, 1, 31)).unwrap(),
        dec!(12.50)
    );
}

#[test]
fn test_expense_delete() {
    let db = Database::open_in_memory().unwrap();
    let food = setup_food(&db, dec!(1));
    let today = chrono::Local::now().date_naive();
    let id = db
        .insert_expense(&Expense::new(1, Some(food), dec!(195), today))
        .unwrap();

    let out = run(&db, &["expense", "delete", &id.to_string()]).unwrap();
    assert!(out.contains(&format!("Expense {id} deleted")));
    assert!(!out.contains("new alert"));
    assert!(run(&db, &["expense", "delete", &id.to_string()]).is_err());
}

#[test]
fn test_category_add_and_delete_keeps_alerts() {
    let db = Database::open_in_memory().unwrap();
    let out = run(&db, &["category", "add", "Salary", "--income"]).unwrap();
    assert!(out.contains("Created category"));
    let salary = &db.get_categories(1).unwrap()[0];
    assert!(salary.is_income);

    assert!(run(&db, &["category", "add", "Salary"]).is_err());
    assert!(run(&db, &["category", "add", "  "]).is_err());

    let food = setup_food(&db, dec!(200));
    run(&db, &["check"]).unwrap();
    let out = run(&db, &["category", "delete", &food.to_string()]).unwrap();
    assert!(out.contains(&format!("Category {food} deleted")));

    let kept = db.list_notifications(1, false).unwrap();
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|n| n.category_id.is_none()));
    assert!(run(&db, &["notifications"]).unwrap().contains("Unknown"));
    assert!(run(&db, &["category", "delete", &food.to_string()]).is_err());
}

#[test]
fn test_category_rename_and_disable() {
    let db = Database::open_in_memory().unwrap();
    let food = setup_food(&db, dec!(250));
    let id = food.to_string();

    let out = run(&db, &["category", "rename", &id, "Groceries"]).unwrap();
    assert!(out.contains(&format!("Category {food} renamed to Groceries")));
    assert!(run(&db, &["budgets"]).unwrap().contains("Groceries"));

    let out = run(&db, &["category", "disable", &id]).unwrap();
    assert!(out.contains(&format!("Category {food} disabled")));
    assert!(run(&db, &["budgets"]).unwrap().contains("No budgets set"));
    assert!(run(&db, &["check"]).unwrap().contains("No new budget alerts"));
    assert!(run(&db, &["categories"]).unwrap().contains("inactive"));

    run(&db, &["category", "enable", &id]).unwrap();
    assert!(run(&db, &["check"]).unwrap().contains("2 new alert(s)"));

    assert!(run(&db, &["category", "rename", &id]).is_err());
    assert!(run(&db, &["category", "disable", "999"]).is_err());
    assert!(run(&db, &["category", "frobnicate"]).is_err());
}
