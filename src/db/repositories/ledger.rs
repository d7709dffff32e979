use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{expenses, incomes, prelude::*};

/// Fields shared by income and expense records.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

/// Partial update for a ledger record. Absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct LedgerPatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
}

pub struct LedgerRepository {
    conn: DatabaseConnection,
}

impl LedgerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Incomes
    // ========================================================================

    pub async fn add_income(
        &self,
        account_id: i32,
        entry: NewLedgerEntry,
    ) -> Result<incomes::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = incomes::ActiveModel {
            account_id: Set(account_id),
            title: Set(entry.title),
            amount: Set(entry.amount),
            category: Set(entry.category),
            date: Set(entry.date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert income")?;

        Ok(model)
    }

    pub async fn list_incomes(&self, account_id: i32) -> Result<Vec<incomes::Model>> {
        let rows = Incomes::find()
            .filter(incomes::Column::AccountId.eq(account_id))
            .order_by_desc(incomes::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list incomes")?;

        Ok(rows)
    }

    pub async fn update_income(
        &self,
        account_id: i32,
        income_id: i32,
        patch: LedgerPatch,
    ) -> Result<Option<incomes::Model>> {
        let Some(row) = Incomes::find_by_id(income_id)
            .filter(incomes::Column::AccountId.eq(account_id))
            .one(&self.conn)
            .await
            .context("Failed to query income")?
        else {
            return Ok(None);
        };

        let mut active: incomes::ActiveModel = row.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(date) = patch.date {
            active.date = Set(date);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn delete_income(&self, account_id: i32, income_id: i32) -> Result<bool> {
        let result = Incomes::delete_many()
            .filter(incomes::Column::Id.eq(income_id))
            .filter(incomes::Column::AccountId.eq(account_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete income")?;

        Ok(result.rows_affected > 0)
    }

    /// Incomes with `start <= date < end` (ISO date bounds).
    pub async fn incomes_in_range(
        &self,
        account_id: i32,
        start: &str,
        end: &str,
    ) -> Result<Vec<incomes::Model>> {
        let rows = Incomes::find()
            .filter(incomes::Column::AccountId.eq(account_id))
            .filter(incomes::Column::Date.gte(start))
            .filter(incomes::Column::Date.lt(end))
            .all(&self.conn)
            .await
            .context("Failed to query incomes in range")?;

        Ok(rows)
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    pub async fn add_expense(
        &self,
        account_id: i32,
        entry: NewLedgerEntry,
    ) -> Result<expenses::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = expenses::ActiveModel {
            account_id: Set(account_id),
            title: Set(entry.title),
            amount: Set(entry.amount),
            category: Set(entry.category),
            date: Set(entry.date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert expense")?;

        Ok(model)
    }

    pub async fn list_expenses(&self, account_id: i32) -> Result<Vec<expenses::Model>> {
        let rows = Expenses::find()
            .filter(expenses::Column::AccountId.eq(account_id))
            .order_by_desc(expenses::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list expenses")?;

        Ok(rows)
    }

    pub async fn update_expense(
        &self,
        account_id: i32,
        expense_id: i32,
        patch: LedgerPatch,
    ) -> Result<Option<expenses::Model>> {
        let Some(row) = Expenses::find_by_id(expense_id)
            .filter(expenses::Column::AccountId.eq(account_id))
            .one(&self.conn)
            .await
            .context("Failed to query expense")?
        else {
            return Ok(None);
        };

        let mut active: expenses::ActiveModel = row.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(date) = patch.date {
            active.date = Set(date);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn delete_expense(&self, account_id: i32, expense_id: i32) -> Result<bool> {
        let result = Expenses::delete_many()
            .filter(expenses::Column::Id.eq(expense_id))
            .filter(expenses::Column::AccountId.eq(account_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete expense")?;

        Ok(result.rows_affected > 0)
    }

    /// Expenses with `start <= date < end` (ISO date bounds).
    pub async fn expenses_in_range(
        &self,
        account_id: i32,
        start: &str,
        end: &str,
    ) -> Result<Vec<expenses::Model>> {
        let rows = Expenses::find()
            .filter(expenses::Column::AccountId.eq(account_id))
            .filter(expenses::Column::Date.gte(start))
            .filter(expenses::Column::Date.lt(end))
            .all(&self.conn)
            .await
            .context("Failed to query expenses in range")?;

        Ok(rows)
    }
}
