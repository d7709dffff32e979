use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::accounts;

/// Account data returned from repository (without the password hash)
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub currency: String,
    pub country: String,
    pub two_factor_enabled: bool,
    pub two_factor_secret: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            verified: model.verified,
            currency: model.currency,
            country: model.country,
            two_factor_enabled: model.two_factor_enabled,
            two_factor_secret: model.two_factor_secret,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields required to create an account. The password arrives in plaintext
/// and is hashed inside `create`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub currency: String,
    pub country: String,
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewAccount, config: &SecurityConfig) -> Result<Account> {
        let password = new.password;
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_secret(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(password_hash),
            verified: Set(false),
            currency: Set(new.currency),
            country: Set(new.country),
            two_factor_enabled: Set(false),
            two_factor_secret: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert account")?;

        Ok(Account::from(model))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by ID")?;

        Ok(account.map(Account::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query account by email")?;

        Ok(account.map(Account::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(account.map(Account::from))
    }

    pub async fn list_verified(&self) -> Result<Vec<Account>> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Verified.eq(true))
            .order_by_asc(accounts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list verified accounts")?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Verify a password against the stored hash for an account.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, account_id: i32, password: &str) -> Result<bool> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.conn)
            .await
            .context("Failed to query account for password verification")?;

        let Some(account) = account else {
            return Ok(false);
        };

        let password_hash = account.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || verify_secret(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    pub async fn update_password(
        &self,
        account_id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let account = self.find_model(account_id).await?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_secret(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: accounts::ActiveModel = account.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn update_profile(
        &self,
        account_id: i32,
        username: &str,
        email: &str,
    ) -> Result<Account> {
        let account = self.find_model(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.username = Set(username.to_string());
        active.email = Set(email.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Account::from(model))
    }

    pub async fn set_verified(&self, account_id: i32, verified: bool) -> Result<Account> {
        let account = self.find_model(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.verified = Set(verified);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Account::from(model))
    }

    pub async fn update_currency(
        &self,
        account_id: i32,
        currency: &str,
        country: Option<&str>,
    ) -> Result<Account> {
        let account = self.find_model(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.currency = Set(currency.to_string());
        if let Some(country) = country {
            active.country = Set(country.to_string());
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Account::from(model))
    }

    /// Store a fresh TOTP secret without enabling 2FA. The account stays in
    /// the pending state until `enable_two_factor` is called.
    pub async fn set_two_factor_secret(&self, account_id: i32, secret: &str) -> Result<()> {
        let account = self.find_model(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.two_factor_secret = Set(Some(secret.to_string()));
        active.two_factor_enabled = Set(false);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn enable_two_factor(&self, account_id: i32) -> Result<()> {
        let account = self.find_model(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.two_factor_enabled = Set(true);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn disable_two_factor(&self, account_id: i32) -> Result<()> {
        let account = self.find_model(account_id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.two_factor_enabled = Set(false);
        active.two_factor_secret = Set(None);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    async fn find_model(&self, account_id: i32) -> Result<accounts::Model> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.conn)
            .await
            .context("Failed to query account")?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {account_id}"))
    }
}

/// Hash a secret using Argon2id with optional custom params.
/// Used for passwords and for one-time codes; plaintext secrets are never
/// persisted. If config is None, uses the library defaults.
pub fn hash_secret(secret: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a secret against a stored Argon2 hash.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid secret hash format: {e}"))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_secret("hunter2", None).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret("hunter2", &hash).unwrap());
        assert!(!verify_secret("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_secret("123456", None).unwrap();
        let b = hash_secret("123456", None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn custom_params_produce_valid_hash() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        let hash = hash_secret("s3cret", Some(&config)).unwrap();
        assert!(verify_secret("s3cret", &hash).unwrap());
    }
}
