use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;

use finarc::budget::{BudgetMonitor, CategoryBudget};
use finarc::db::Database;
use finarc::models::{Category, CycleStartDay, Expense, Notification};
use finarc::stores::{CategoryStore, NotificationStore};

/// Handle the commands that need no database. Returns `false` for any other command.
pub(crate) fn as_info(args: &[String], out: &mut impl Write) -> Result<bool> {
    match args.first().map(String::as_str) {
        None | Some("--help" | "-h" | "help") => print_usage(out)?,
        Some("--version" | "-V" | "version") => {
            writeln!(out, "finarc {}", env!("CARGO_PKG_VERSION"))?
        }
        Some(_) => return Ok(false),
    }
    Ok(true)
}

pub(crate) fn as_cli(args: &[String], db: &Database, user_id: i64, out: &mut impl Write) -> Result<()> {
    let monitor = BudgetMonitor::new(db);
    let command = args.first().map(String::as_str).unwrap_or_default();
    match command {
        "check" => cli_check(&monitor, user_id, out),
        "status" | "s" => cli_status(&args[1..], &monitor, out),
        "budgets" => cli_budgets(&monitor, user_id, out),
        "categories" => cli_categories(db, user_id, out),
        "budget" => cli_set_budget(&args[1..], db, out),
        "category" => cli_category(&args[1..], db, user_id, out),
        "expense" => cli_expense(&args[1..], &monitor, db, user_id, out),
        "notifications" | "n" => cli_notifications(&args[1..], db, user_id, out),
        "read" => cli_read(&args[1..], db, user_id, out),
        "read-all" => {
            let count = db.mark_all_read(user_id)?;
            writeln!(out, "{count} notifications marked as read")?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Finarc - budget tracking and alerts

Usage: finarc <command>

Commands:
  check                                Record alerts for budgets crossing 90% / 100%
  status <category-id>                 Show spending against a category's budget
  budgets                              Show every budgeted category
  categories                           List categories and their budgets
  category add <name> [--income]       Create a category
  category rename <category-id> <name> Rename a category
  category enable|disable <category-id>
                                       Include or exclude a category from budgets
  category delete <category-id>        Delete a category, keeping its alerts
  expense add <category-id> <amount> [YYYY-MM-DD] [description]
                                       Record an expense and check budgets
  expense delete <expense-id>          Delete an expense and check budgets
  budget <category-id> <limit|none> [start-day]
                                       Set or clear a category's budget
  notifications [--unread]             List budget alerts
  read <id>                            Mark an alert as read
  read-all                             Mark every alert as read
  --help, -h                           Show this help
  --version, -V                        Show version

Environment:
  FINARC_DB     database file (default: platform data directory)
  FINARC_USER   user ID to operate on (default: 1)
  RUST_LOG      log filter (default: warn)"
    )?;
    Ok(())
}

fn cli_check(monitor: &BudgetMonitor<'_, Database>, user_id: i64, out: &mut impl Write) -> Result<()> {
    let created = monitor.check_budget_limits(user_id)?;
    if created.is_empty() {
        writeln!(out, "No new budget alerts")?;
        return Ok(());
    }
    write_alerts(out, &created)
}

fn write_alerts(out: &mut impl Write, created: &[Notification]) -> Result<()> {
    for n in created {
        writeln!(out, "  [{}] {}", n.threshold, n.message)?;
    }
    writeln!(out, "{} new alert(s)", created.len())?;
    Ok(())
}

fn cli_status(args: &[String], monitor: &BudgetMonitor<'_, Database>, out: &mut impl Write) -> Result<()> {
    let category_id = parse_id(args.first(), "Usage: finarc status <category-id>")?;
    let budget = monitor.get_category_budget_status(category_id)?;

    writeln!(out, "{}", budget.name)?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(
        out,
        "  Cycle:   {} ({} days)",
        budget.period,
        budget.period.len_days()
    )?;
    writeln!(out, "  Spent:   ${:.2}", budget.status.spent)?;
    match budget.status.limit {
        Some(limit) => writeln!(out, "  Limit:   ${:.2}", limit)?,
        None => writeln!(out, "  Limit:   none")?,
    }
    match budget.status.remaining() {
        Some(left) if left < Decimal::ZERO => writeln!(out, "  Over:    ${:.2}", -left)?,
        Some(left) => writeln!(out, "  Left:    ${:.2}", left)?,
        None => {}
    }
    writeln!(out, "  Used:    {:.1}%", budget.status.percentage)?;
    writeln!(out, "  Status:  {}", budget.status.status)?;
    Ok(())
}

fn cli_budgets(monitor: &BudgetMonitor<'_, Database>, user_id: i64, out: &mut impl Write) -> Result<()> {
    let overview = monitor.budget_overview(user_id)?;
    if overview.is_empty() {
        writeln!(out, "No budgets set")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<4} {:<20} {:>10} {:>10} {:>7}  Status",
        "ID", "Category", "Spent", "Limit", "Used"
    )?;
    writeln!(out, "{}", "─".repeat(68))?;
    for budget in &overview {
        write_budget_row(out, budget)?;
    }
    Ok(())
}

fn write_budget_row(out: &mut impl Write, budget: &CategoryBudget) -> Result<()> {
    writeln!(
        out,
        "{:<4} {:<20} {:>10.2} {:>10.2} {:>6.1}%  {}",
        budget.category_id,
        budget.name,
        budget.status.spent,
        budget.status.limit.unwrap_or_default(),
        budget.status.percentage,
        budget.status.status,
    )?;
    Ok(())
}

fn cli_categories(db: &Database, user_id: i64, out: &mut impl Write) -> Result<()> {
    let categories = db.get_categories(user_id)?;
    if categories.is_empty() {
        writeln!(out, "No categories")?;
        return Ok(());
    }

    writeln!(out, "{:<4} {:<20} {:>10} {:>5}  Flags", "ID", "Name", "Limit", "Day")?;
    writeln!(out, "{}", "─".repeat(50))?;
    for cat in &categories {
        let limit = cat
            .budget_limit
            .map(|l| format!("{l:.2}"))
            .unwrap_or_else(|| "-".into());
        let mut flags = Vec::new();
        if cat.is_income {
            flags.push("income");
        }
        if !cat.is_active {
            flags.push("inactive");
        }
        writeln!(
            out,
            "{:<4} {:<20} {:>10} {:>5}  {}",
            cat.id.unwrap_or(0),
            cat.name,
            limit,
            cat.cycle_start_day.get(),
            flags.join(",")
        )?;
    }
    Ok(())
}

fn cli_set_budget(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    const USAGE: &str = "Usage: finarc budget <category-id> <limit|none> [start-day]";
    let category_id = parse_id(args.first(), USAGE)?;
    let limit = match args.get(1).map(String::as_str) {
        Some("none") => None,
        Some(raw) => {
            let limit = Decimal::from_str(raw).with_context(|| format!("Invalid limit: {raw}"))?;
            if limit <= Decimal::ZERO {
                anyhow::bail!("Budget limit must be positive, got {raw}");
            }
            Some(limit)
        }
        None => anyhow::bail!(USAGE),
    };
    let start_day = match args.get(2) {
        Some(raw) => CycleStartDay::new(
            raw.parse()
                .with_context(|| format!("Invalid start day: {raw}"))?,
        ),
        None => CycleStartDay::FIRST,
    };

    if !db.update_category_budget(category_id, limit, start_day)? {
        anyhow::bail!("Category {category_id} not found");
    }
    match limit {
        Some(limit) => writeln!(
            out,
            "Budget for category {category_id} set to ${limit:.2}, resetting on day {start_day}"
        )?,
        None => writeln!(out, "Budget for category {category_id} cleared")?,
    }
    Ok(())
}

fn cli_category(args: &[String], db: &Database, user_id: i64, out: &mut impl Write) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => {
            let name = args
                .get(1)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Usage: finarc category add <name> [--income]"))?;
            let mut category = Category::new(user_id, name.to_string());
            category.is_income = args[2..].iter().any(|a| a == "--income");
            let id = db
                .insert_category(&category)
                .with_context(|| format!("Could not create category '{name}'"))?;
            writeln!(out, "Created category {id}: {name}")?;
        }
        Some("rename") => {
            let id = parse_id(args.get(1), "Usage: finarc category rename <category-id> <name>")?;
            let name = args
                .get(2)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Usage: finarc category rename <category-id> <name>"))?;
            owned_category(db, id, user_id)?;
            db.rename_category(id, name)
                .with_context(|| format!("Could not rename category to '{name}'"))?;
            writeln!(out, "Category {id} renamed to {name}")?;
        }
        Some(action @ ("enable" | "disable")) => {
            let id = parse_id(args.get(1), "Usage: finarc category <enable|disable> <category-id>")?;
            owned_category(db, id, user_id)?;
            db.set_category_active(id, action == "enable")?;
            writeln!(out, "Category {id} {action}d")?;
        }
        Some("delete") => {
            let id = parse_id(args.get(1), "Usage: finarc category delete <category-id>")?;
            owned_category(db, id, user_id)?;
            db.delete_category(id)?;
            writeln!(out, "Category {id} deleted")?;
        }
        _ => anyhow::bail!("Usage: finarc category <add|rename|enable|disable|delete> ..."),
    }
    Ok(())
}

fn cli_expense(
    args: &[String],
    monitor: &BudgetMonitor<'_, Database>,
    db: &Database,
    user_id: i64,
    out: &mut impl Write,
) -> Result<()> {
    const USAGE: &str = "Usage: finarc expense add <category-id> <amount> [YYYY-MM-DD] [description]";
    match args.first().map(String::as_str) {
        Some("add") => {
            let category_id = parse_id(args.get(1), USAGE)?;
            let category = owned_category(db, category_id, user_id)?;
            let raw = args.get(2).ok_or_else(|| anyhow::anyhow!(USAGE))?;
            let amount = Decimal::from_str(raw).with_context(|| format!("Invalid amount: {raw}"))?;
            if amount <= Decimal::ZERO {
                anyhow::bail!("Expense amount must be positive, got {raw}");
            }
            let date = match args.get(3) {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date: {raw} (expected YYYY-MM-DD)"))?,
                None => chrono::Local::now().date_naive(),
            };

            let mut expense = Expense::new(user_id, Some(category_id), amount, date);
            expense.description = args.get(4..).unwrap_or_default().join(" ");
            let id = db.insert_expense(&expense)?;
            writeln!(
                out,
                "Recorded expense {id}: ${amount:.2} in {} on {date}",
                category.name
            )?;
        }
        Some("delete") => {
            let id = parse_id(args.get(1), "Usage: finarc expense delete <expense-id>")?;
            if !db.delete_expense(id)? {
                anyhow::bail!("Expense {id} not found");
            }
            writeln!(out, "Expense {id} deleted")?;
        }
        _ => anyhow::bail!(USAGE),
    }

    let created = monitor.check_budget_limits(user_id)?;
    if !created.is_empty() {
        write_alerts(out, &created)?;
    }
    Ok(())
}

/// Look up a category, treating one owned by another user as missing.
fn owned_category(db: &Database, category_id: i64, user_id: i64) -> Result<Category> {
    db.get_category(category_id)?
        .filter(|c| c.user_id == user_id)
        .ok_or_else(|| anyhow::anyhow!("Category {category_id} not found"))
}

fn cli_notifications(args: &[String], db: &Database, user_id: i64, out: &mut impl Write) -> Result<()> {
    let unread_only = args.iter().any(|a| a == "--unread");
    let notifications = db.list_notifications(user_id, unread_only)?;
    if notifications.is_empty() {
        writeln!(out, "No notifications")?;
        return Ok(());
    }

    for n in &notifications {
        let marker = if n.is_read { ' ' } else { '*' };
        writeln!(
            out,
            "{marker} {:<4} {}  {:<16} {}",
            n.id,
            n.created_at.format("%Y-%m-%d %H:%M"),
            n.category_name,
            n.message
        )?;
    }
    Ok(())
}

fn cli_read(args: &[String], db: &Database, user_id: i64, out: &mut impl Write) -> Result<()> {
    let id = parse_id(args.first(), "Usage: finarc read <id>")?;
    if !db.mark_read(id, user_id)? {
        anyhow::bail!("Notification {id} not found");
    }
    writeln!(out, "Notification {id} marked as read")?;
    Ok(())
}

fn parse_id(arg: Option<&String>, usage: &str) -> Result<i64> {
    let raw = arg.ok_or_else(|| anyhow::anyhow!("{usage}"))?;
    raw.parse().with_context(|| format!("Invalid ID: {raw}"))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
