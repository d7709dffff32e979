use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{otp_codes, otp_cooldowns, prelude::*};

pub struct OtpRepository {
    conn: DatabaseConnection,
}

impl OtpRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        account_id: i32,
        code_hash: &str,
        expires_at: &str,
    ) -> Result<()> {
        let active = otp_codes::ActiveModel {
            account_id: Set(account_id),
            code_hash: Set(code_hash.to_string()),
            expires_at: Set(expires_at.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert OTP code")?;

        Ok(())
    }

    /// The most recently expiring code for an account, if any.
    pub async fn latest_for_account(&self, account_id: i32) -> Result<Option<otp_codes::Model>> {
        let row = OtpCodes::find()
            .filter(otp_codes::Column::AccountId.eq(account_id))
            .order_by_desc(otp_codes::Column::ExpiresAt)
            .one(&self.conn)
            .await
            .context("Failed to query OTP code")?;

        Ok(row)
    }

    pub async fn delete_all_for_account(&self, account_id: i32) -> Result<u64> {
        let result = OtpCodes::delete_many()
            .filter(otp_codes::Column::AccountId.eq(account_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete OTP codes")?;

        Ok(result.rows_affected)
    }

    /// Last time an OTP email was sent to this account, as RFC 3339.
    pub async fn last_sent_at(&self, account_id: i32) -> Result<Option<String>> {
        let row = OtpCooldowns::find_by_id(account_id)
            .one(&self.conn)
            .await
            .context("Failed to query OTP cooldown")?;

        Ok(row.map(|m| m.last_sent_at))
    }

    pub async fn touch_cooldown(&self, account_id: i32) -> Result<()> {
        let active = otp_cooldowns::ActiveModel {
            account_id: Set(account_id),
            last_sent_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        OtpCooldowns::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(otp_cooldowns::Column::AccountId)
                    .update_column(otp_cooldowns::Column::LastSentAt)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("Failed to record OTP send time")?;

        Ok(())
    }
}
