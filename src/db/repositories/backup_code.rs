use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{backup_codes, prelude::*};

pub struct BackupCodeRepository {
    conn: DatabaseConnection,
}

impl BackupCodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Replace the whole code set for an account. Any unused codes from a
    /// previous enrollment are discarded.
    pub async fn replace_for_account(&self, account_id: i32, codes: &[String]) -> Result<()> {
        BackupCodes::delete_many()
            .filter(backup_codes::Column::AccountId.eq(account_id))
            .exec(&self.conn)
            .await
            .context("Failed to clear previous backup codes")?;

        if codes.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let rows: Vec<backup_codes::ActiveModel> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| backup_codes::ActiveModel {
                account_id: Set(account_id),
                code: Set(code.clone()),
                position: Set(i as i32),
                created_at: Set(now.clone()),
                ..Default::default()
            })
            .collect();

        BackupCodes::insert_many(rows)
            .exec(&self.conn)
            .await
            .context("Failed to insert backup codes")?;

        Ok(())
    }

    pub async fn list_for_account(&self, account_id: i32) -> Result<Vec<String>> {
        let rows = BackupCodes::find()
            .filter(backup_codes::Column::AccountId.eq(account_id))
            .order_by_asc(backup_codes::Column::Position)
            .all(&self.conn)
            .await
            .context("Failed to list backup codes")?;

        Ok(rows.into_iter().map(|m| m.code).collect())
    }

    pub async fn count_for_account(&self, account_id: i32) -> Result<u64> {
        let count = BackupCodes::find()
            .filter(backup_codes::Column::AccountId.eq(account_id))
            .count(&self.conn)
            .await
            .context("Failed to count backup codes")?;

        Ok(count)
    }

    /// Atomically consume a code. The conditional delete is the whole
    /// single-use check: two racing logins with the same code issue the same
    /// statement, and only one sees a row deleted.
    pub async fn consume(&self, account_id: i32, code: &str) -> Result<bool> {
        let result = BackupCodes::delete_many()
            .filter(backup_codes::Column::AccountId.eq(account_id))
            .filter(backup_codes::Column::Code.eq(code))
            .exec(&self.conn)
            .await
            .context("Failed to consume backup code")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn clear_for_account(&self, account_id: i32) -> Result<u64> {
        let result = BackupCodes::delete_many()
            .filter(backup_codes::Column::AccountId.eq(account_id))
            .exec(&self.conn)
            .await
            .context("Failed to clear backup codes")?;

        Ok(result.rows_affected)
    }
}
