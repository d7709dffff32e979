//! `SeaORM` implementation of the `OtpService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tokio::task;

use crate::config::{OtpConfig, SecurityConfig};
use crate::db::{Account, Store};
use crate::db::repositories::account::{hash_secret, verify_secret};
use crate::services::email::{EmailTemplate, Mailer};
use crate::services::otp_service::{OtpError, OtpService};
use crate::services::validation;

pub struct SeaOrmOtpService {
    store: Store,
    mailer: Arc<Mailer>,
    security: SecurityConfig,
    otp: OtpConfig,
}

impl SeaOrmOtpService {
    #[must_use]
    pub const fn new(
        store: Store,
        mailer: Arc<Mailer>,
        security: SecurityConfig,
        otp: OtpConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            security,
            otp,
        }
    }

    async fn under_cooldown(&self, account_id: i32) -> Result<bool, OtpError> {
        let Some(last_sent) = self.store.otp_last_sent_at(account_id).await? else {
            return Ok(false);
        };

        // An unparseable timestamp must not lock the account out.
        let Ok(last_sent) = DateTime::parse_from_rfc3339(&last_sent) else {
            return Ok(false);
        };

        let elapsed = Utc::now().signed_duration_since(last_sent.with_timezone(&Utc));
        Ok(elapsed < Duration::seconds(self.otp.resend_cooldown_seconds))
    }
}

#[async_trait]
impl OtpService for SeaOrmOtpService {
    async fn issue(&self, email: &str) -> Result<(), OtpError> {
        validation::validate_email(email)
            .map_err(|msg| OtpError::Validation(msg.to_string()))?;

        let account = self
            .store
            .get_account_by_email(email)
            .await?
            .ok_or(OtpError::NotRegistered)?;

        if self.under_cooldown(account.id).await? {
            return Err(OtpError::Cooldown);
        }

        self.store.delete_otps(account.id).await?;

        let code = generate_otp_code();
        let security = self.security.clone();
        let plain = code.clone();
        let code_hash = task::spawn_blocking(move || hash_secret(&plain, Some(&security)))
            .await
            .map_err(|err| OtpError::Internal(err.to_string()))??;

        let expires_at = (Utc::now() + Duration::minutes(self.otp.ttl_minutes)).to_rfc3339();
        self.store
            .create_otp(account.id, &code_hash, &expires_at)
            .await?;

        let template = EmailTemplate::OtpCode {
            username: account.username.clone(),
            code,
            ttl_minutes: self.otp.ttl_minutes,
        };
        self.mailer
            .send(&account.email, &template)
            .await
            .map_err(|err| OtpError::Delivery(err.to_string()))?;

        self.store.touch_otp_cooldown(account.id).await?;

        Ok(())
    }

    async fn verify(&self, email: &str, code: &str) -> Result<Account, OtpError> {
        validation::validate_email(email)
            .map_err(|msg| OtpError::Validation(msg.to_string()))?;
        validation::validate_otp(code)
            .map_err(|msg| OtpError::Validation(msg.to_string()))?;

        let account = self
            .store
            .get_account_by_email(email)
            .await?
            .ok_or(OtpError::NotFound)?;

        if account.verified {
            return Err(OtpError::AlreadyVerified);
        }

        let record = self
            .store
            .latest_otp(account.id)
            .await?
            .ok_or(OtpError::NoActiveCode)?;

        let expired = DateTime::parse_from_rfc3339(&record.expires_at)
            .map_or(true, |ts| ts.with_timezone(&Utc) < Utc::now());
        if expired {
            self.store.delete_otps(account.id).await?;
            return Err(OtpError::Expired);
        }

        let submitted = code.to_string();
        let code_hash = record.code_hash;
        let valid = task::spawn_blocking(move || verify_secret(&submitted, &code_hash))
            .await
            .map_err(|err| OtpError::Internal(err.to_string()))??;

        if !valid {
            return Err(OtpError::InvalidCode);
        }

        let verified = self.store.set_account_verified(account.id, true).await?;
        self.store.delete_otps(account.id).await?;

        Ok(verified)
    }
}

/// A random six digit code. The leading digit is never zero so the rendered
/// length always matches what the email shows.
fn generate_otp_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..1_000_000u32).to_string()
}

#[cfg(test)]
mod tests {
    use super::generate_otp_code;
    use crate::constants;

    #[test]
    fn otp_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), constants::otp::CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
