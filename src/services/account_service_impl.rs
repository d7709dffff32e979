//! `SeaORM` implementation of the `AccountService` trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SecurityConfig;
use crate::constants::account::{DEFAULT_COUNTRY, DEFAULT_CURRENCY};
use crate::db::{Account, NewAccount, Store};
use crate::services::account_service::{AccountError, AccountService, LoginOutcome};
use crate::services::currency;
use crate::services::email::{EmailTemplate, Mailer};
use crate::services::validation;

pub struct SeaOrmAccountService {
    store: Store,
    mailer: Arc<Mailer>,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, mailer: Arc<Mailer>, security: SecurityConfig) -> Self {
        Self {
            store,
            mailer,
            security,
        }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        validation::validate_username(username)
            .map_err(|msg| AccountError::Validation(msg.to_string()))?;
        validation::validate_email(email)
            .map_err(|msg| AccountError::Validation(msg.to_string()))?;
        validation::validate_password(password)
            .map_err(|msg| AccountError::Validation(msg.to_string()))?;

        if self.store.get_account_by_email(email).await?.is_some() {
            return Err(AccountError::EmailRegistered);
        }
        if self.store.get_account_by_username(username).await?.is_some() {
            return Err(AccountError::UsernameTaken);
        }

        let account = self
            .store
            .create_account(
                NewAccount {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    currency: DEFAULT_CURRENCY.to_string(),
                    country: DEFAULT_COUNTRY.to_string(),
                },
                &self.security,
            )
            .await?;

        self.mailer.spawn_send(
            account.email.clone(),
            EmailTemplate::Welcome {
                username: account.username.clone(),
            },
        );

        Ok(account)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AccountError> {
        validation::validate_email(email)
            .map_err(|msg| AccountError::Validation(msg.to_string()))?;
        validation::validate_password(password)
            .map_err(|msg| AccountError::Validation(msg.to_string()))?;

        let Some(account) = self.store.get_account_by_email(email).await? else {
            return Ok(LoginOutcome::NotRegistered);
        };

        if !account.verified {
            return Ok(LoginOutcome::Unverified(account));
        }

        if !self
            .store
            .verify_account_password(account.id, password)
            .await?
        {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        if account.two_factor_enabled {
            return Ok(LoginOutcome::RequiresTwoFactor(account));
        }

        Ok(LoginOutcome::Success(account))
    }

    async fn get_profile(&self, account_id: i32) -> Result<Account, AccountError> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    async fn update_profile(
        &self,
        account_id: i32,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Account, AccountError> {
        let account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if username.is_none() && email.is_none() {
            return Err(AccountError::NoFieldsProvided);
        }

        let new_username = username.filter(|candidate| *candidate != account.username);
        let new_email = email.filter(|candidate| *candidate != account.email);

        if new_username.is_none() && new_email.is_none() {
            return Err(AccountError::NoChanges);
        }

        if let Some(candidate) = new_email {
            if self.store.get_account_by_email(candidate).await?.is_some() {
                return Err(AccountError::EmailInUse);
            }
        }

        if let Some(candidate) = new_username {
            validation::validate_username(candidate)
                .map_err(|msg| AccountError::Validation(msg.to_string()))?;
        }
        if let Some(candidate) = new_email {
            validation::validate_email(candidate)
                .map_err(|msg| AccountError::Validation(msg.to_string()))?;
        }

        let mut updated_fields = Vec::new();
        if new_username.is_some() {
            updated_fields.push("Username".to_string());
        }
        if new_email.is_some() {
            updated_fields.push("Email Address".to_string());
        }

        let updated = self
            .store
            .update_account_profile(
                account_id,
                new_username.unwrap_or(&account.username),
                new_email.unwrap_or(&account.email),
            )
            .await?;

        self.mailer.spawn_send(
            updated.email.clone(),
            EmailTemplate::ProfileUpdate {
                username: updated.username.clone(),
                updated_fields,
            },
        );

        Ok(updated)
    }

    async fn update_currency(
        &self,
        account_id: i32,
        currency: Option<&str>,
        country: Option<&str>,
    ) -> Result<Account, AccountError> {
        let account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let resolved = match (currency, country) {
            (Some(code), _) => code.to_string(),
            (None, Some(country)) => currency::currency_for_country(country).to_string(),
            (None, None) => return Err(AccountError::CurrencyRequired),
        };

        if !currency::is_supported(&resolved) {
            return Err(AccountError::UnsupportedCurrency);
        }

        let changed = account.currency != resolved;

        let updated = self
            .store
            .update_account_currency(account_id, &resolved, country)
            .await?;

        if changed {
            self.mailer.spawn_send(
                updated.email.clone(),
                EmailTemplate::CurrencyUpdate {
                    username: updated.username.clone(),
                    old_currency: account.currency,
                    new_currency: updated.currency.clone(),
                    symbol: currency::currency_symbol(&updated.currency).to_string(),
                },
            );
        }

        Ok(updated)
    }

    async fn reset_password(
        &self,
        account_id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        validation::validate_password(new_password)
            .map_err(|msg| AccountError::Validation(msg.to_string()))?;

        if old_password == new_password {
            return Err(AccountError::PasswordUnchanged);
        }

        let account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if !self
            .store
            .verify_account_password(account_id, old_password)
            .await?
        {
            return Err(AccountError::InvalidOldPassword);
        }

        self.store
            .update_account_password(account_id, new_password, &self.security)
            .await?;

        self.mailer.spawn_send(
            account.email,
            EmailTemplate::PasswordReset {
                username: account.username,
            },
        );

        Ok(())
    }
}
