//! `SeaORM` implementation of the `TwoFactorService` trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{Account, Store};
use crate::services::email::{EmailTemplate, Mailer};
use crate::services::two_factor::{self, TotpSetup, TwoFactorEngine};
use crate::services::two_factor_service::{TwoFactorError, TwoFactorService, TwoFactorStatus};

pub struct SeaOrmTwoFactorService {
    store: Store,
    mailer: Arc<Mailer>,
    engine: TwoFactorEngine,
}

impl SeaOrmTwoFactorService {
    #[must_use]
    pub const fn new(store: Store, mailer: Arc<Mailer>, engine: TwoFactorEngine) -> Self {
        Self {
            store,
            mailer,
            engine,
        }
    }

    async fn find_account(&self, account_id: i32) -> Result<Account, TwoFactorError> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(TwoFactorError::NotFound)
    }
}

#[async_trait]
impl TwoFactorService for SeaOrmTwoFactorService {
    async fn setup(&self, account_id: i32) -> Result<TotpSetup, TwoFactorError> {
        let account = self.find_account(account_id).await?;

        if account.two_factor_enabled {
            return Err(TwoFactorError::AlreadyEnabled);
        }

        let setup = self.engine.generate_setup(&account.email)?;

        // Parked until the user confirms with a live code; enable() flips
        // the account over.
        self.store
            .set_two_factor_secret(account_id, &setup.secret)
            .await?;

        Ok(setup)
    }

    async fn enable(&self, account_id: i32, token: &str) -> Result<Vec<String>, TwoFactorError> {
        let account = self.find_account(account_id).await?;

        let Some(secret) = account.two_factor_secret.as_deref() else {
            return Err(TwoFactorError::SetupNotInitiated);
        };

        if !self.engine.verify(secret, token, &account.email)? {
            return Err(TwoFactorError::InvalidSetupToken);
        }

        let backup_codes = two_factor::generate_backup_codes();
        self.store
            .replace_backup_codes(account_id, &backup_codes)
            .await?;
        self.store.enable_two_factor(account_id).await?;

        self.mailer.spawn_send(
            account.email.clone(),
            EmailTemplate::TwoFactorEnabled {
                username: account.username.clone(),
            },
        );

        Ok(backup_codes)
    }

    async fn disable(
        &self,
        account_id: i32,
        token: &str,
        password: &str,
    ) -> Result<(), TwoFactorError> {
        let account = self.find_account(account_id).await?;

        if !account.two_factor_enabled {
            return Err(TwoFactorError::NotEnabled);
        }

        if !self
            .store
            .verify_account_password(account_id, password)
            .await?
        {
            return Err(TwoFactorError::InvalidPassword);
        }

        let secret = account.two_factor_secret.as_deref().ok_or_else(|| {
            TwoFactorError::Internal("2FA enabled without a stored secret".to_string())
        })?;

        if !self.engine.verify(secret, token, &account.email)? {
            return Err(TwoFactorError::InvalidToken);
        }

        self.store.disable_two_factor(account_id).await?;
        self.store.clear_backup_codes(account_id).await?;

        Ok(())
    }

    async fn verify_login(
        &self,
        email: &str,
        token: &str,
        is_backup_code: bool,
    ) -> Result<Account, TwoFactorError> {
        let account = self
            .store
            .get_account_by_email(email)
            .await?
            .ok_or(TwoFactorError::NotFound)?;

        if !account.two_factor_enabled {
            return Err(TwoFactorError::NotEnabled);
        }

        if is_backup_code {
            let normalized = two_factor::normalize_backup_code(token);
            if !self
                .store
                .consume_backup_code(account.id, &normalized)
                .await?
            {
                return Err(TwoFactorError::InvalidBackupCode);
            }
        } else {
            let secret = account.two_factor_secret.as_deref().ok_or_else(|| {
                TwoFactorError::Internal("2FA enabled without a stored secret".to_string())
            })?;

            if !self.engine.verify(secret, token, &account.email)? {
                return Err(TwoFactorError::InvalidToken);
            }
        }

        Ok(account)
    }

    async fn status(&self, account_id: i32) -> Result<TwoFactorStatus, TwoFactorError> {
        let account = self.find_account(account_id).await?;
        let remaining = self.store.count_backup_codes(account_id).await?;

        Ok(TwoFactorStatus {
            enabled: account.two_factor_enabled,
            has_backup_codes: remaining > 0,
            remaining_backup_codes: remaining,
        })
    }
}
