mod schema;

use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::*;
use crate::stores::{CategoryStore, ExpenseStore, NotificationStore};

const NOTIFICATION_COLUMNS: &str = "n.id, n.user_id, n.category_id, COALESCE(c.name, 'Unknown'),
        n.threshold, n.period_start, n.message, n.created_at, n.is_read
     FROM budget_notifications n
     LEFT JOIN categories c ON c.id = n.category_id";

const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food",
    "Transportation",
    "Housing",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Education",
    "Shopping",
    "Other",
];

/// SQLite storage for categories, expenses and budget notifications.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!("opened database at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> anyhow::Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!("migrating database schema from version {from_version}");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    /// Give `user_id` the starter set of expense categories if they have none.
    ///
    /// Returns the number of categories created.
    pub fn seed_default_categories(&mut self, user_id: i64) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        for name in DEFAULT_CATEGORIES {
            tx.execute(
                "INSERT OR IGNORE INTO categories (user_id, name) VALUES (?1, ?2)",
                params![user_id, name],
            )?;
        }
        tx.commit()?;

        tracing::info!("created default categories for user {user_id}");
        Ok(DEFAULT_CATEGORIES.len())
    }

    // ── Categories ────────────────────────────────────────────

    pub fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (user_id, name, budget_limit, cycle_start_day, is_income, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cat.user_id,
                cat.name,
                cat.budget_limit.map(|l| l.to_string()),
                cat.cycle_start_day.get(),
                cat.is_income,
                cat.is_active,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Set or clear a category's budget. Returns `false` if the category does not exist.
    pub fn update_category_budget(
        &self,
        category_id: i64,
        budget_limit: Option<Decimal>,
        cycle_start_day: CycleStartDay,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE categories SET budget_limit = ?1, cycle_start_day = ?2 WHERE id = ?3",
            params![
                budget_limit.map(|l| l.to_string()),
                cycle_start_day.get(),
                category_id
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn set_category_active(&self, category_id: i64, is_active: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE categories SET is_active = ?1 WHERE id = ?2",
            params![is_active, category_id],
        )?;
        Ok(changed > 0)
    }

    pub fn rename_category(&self, category_id: i64, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, category_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a category. Its expenses and notifications are kept, detached
    /// from any category.
    pub fn delete_category(&self, category_id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![category_id])?;
        Ok(changed > 0)
    }

    pub fn get_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, budget_limit, cycle_start_day, is_income, is_active
             FROM categories WHERE user_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![user_id], map_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (user_id, category_id, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.user_id,
                expense.category_id,
                expense.amount.to_string(),
                expense.date,
                expense.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete_expense(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Notifications ─────────────────────────────────────────

    fn get_notification(&self, id: i64) -> Result<Option<Notification>> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} WHERE n.id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], map_notification)
            .optional()?)
    }
}

impl CategoryStore for Database {
    fn list_budgeted_categories(&self, user_id: i64) -> Result<Vec<BudgetedCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, budget_limit, cycle_start_day FROM categories
             WHERE user_id = ?1 AND is_active = 1 AND is_income = 0 AND budget_limit IS NOT NULL
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(BudgetedCategory {
                id: row.get(0)?,
                name: row.get(1)?,
                budget_limit: decimal_column(row, 2)?,
                cycle_start_day: CycleStartDay::new(row.get(3)?),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, user_id, name, budget_limit, cycle_start_day, is_income, is_active
                 FROM categories WHERE id = ?1",
                params![category_id],
                map_category,
            )
            .optional()?)
    }
}

impl ExpenseStore for Database {
    fn sum_expenses(&self, category_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Decimal> {
        let mut stmt = self.conn.prepare(
            "SELECT amount FROM expenses WHERE category_id = ?1 AND date >= ?2 AND date <= ?3",
        )?;
        let amounts = stmt
            .query_map(params![category_id, start, end], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        amounts.iter().try_fold(Decimal::ZERO, |total, amount| {
            let amount =
                Decimal::from_str(amount).map_err(|_| Error::InvalidAmount(amount.clone()))?;
            total
                .checked_add(amount)
                .ok_or(Error::SpendingOverflow(category_id))
        })
    }
}

impl NotificationStore for Database {
    fn notification_exists(
        &self,
        user_id: i64,
        category_id: i64,
        threshold: Threshold,
        since: NaiveDate,
    ) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM budget_notifications
             WHERE user_id = ?1 AND category_id = ?2 AND threshold = ?3 AND created_at >= ?4)",
            params![user_id, category_id, threshold.as_str(), since],
            |row| row.get(0),
        )?)
    }

    fn insert_notification(&self, new: &NewNotification) -> Result<Option<Notification>> {
        let inserted = self.conn.execute(
            "INSERT INTO budget_notifications
                (user_id, category_id, threshold, period_start, message, created_at, is_read)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
             ON CONFLICT(user_id, category_id, threshold, period_start) DO NOTHING",
            params![
                new.user_id,
                new.category_id,
                new.threshold.as_str(),
                new.period_start,
                new.message,
                new.created_at,
            ],
        )?;
        if inserted == 0 {
            return Ok(None);
        }
        self.get_notification(self.conn.last_insert_rowid())
    }

    fn list_notifications(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>> {
        let mut sql = format!("SELECT {NOTIFICATION_COLUMNS} WHERE n.user_id = ?1");
        if unread_only {
            sql.push_str(" AND n.is_read = 0");
        }
        sql.push_str(" ORDER BY n.created_at DESC, n.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], map_notification)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        let matched = self.conn.execute(
            "UPDATE budget_notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
            params![notification_id, user_id],
        )?;
        Ok(matched > 0)
    }

    fn mark_all_read(&self, user_id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE budget_notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            params![user_id],
        )?)
    }
}

fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    let budget_limit = match row.get::<_, Option<String>>(3)? {
        Some(_) => Some(decimal_column(row, 3)?),
        None => None,
    };
    Ok(Category {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        name: row.get(2)?,
        budget_limit,
        cycle_start_day: CycleStartDay::new(row.get(4)?),
        is_income: row.get(5)?,
        is_active: row.get(6)?,
    })
}

fn map_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let threshold: String = row.get(4)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        category_name: row.get(3)?,
        threshold: Threshold::parse(&threshold).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("unknown threshold: {threshold}").into(),
            )
        })?,
        period_start: row.get(5)?,
        message: row.get(6)?,
        created_at: row.get(7)?,
        is_read: row.get(8)?,
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
