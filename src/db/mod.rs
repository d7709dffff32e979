use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{expenses, incomes, otp_codes};

pub mod migrator;
pub mod repositories;

pub use repositories::account::{Account, NewAccount};
pub use repositories::ledger::{LedgerPatch, NewLedgerEntry};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn otp_repo(&self) -> repositories::otp::OtpRepository {
        repositories::otp::OtpRepository::new(self.conn.clone())
    }

    fn backup_code_repo(&self) -> repositories::backup_code::BackupCodeRepository {
        repositories::backup_code::BackupCodeRepository::new(self.conn.clone())
    }

    fn ledger_repo(&self) -> repositories::ledger::LedgerRepository {
        repositories::ledger::LedgerRepository::new(self.conn.clone())
    }

    // ========== Account Repository Methods ==========

    pub async fn create_account(&self, new: NewAccount, config: &SecurityConfig) -> Result<Account> {
        self.account_repo().create(new, config).await
    }

    pub async fn get_account(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get_by_id(id).await
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_email(email).await
    }

    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_username(username).await
    }

    pub async fn list_verified_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list_verified().await
    }

    pub async fn verify_account_password(&self, account_id: i32, password: &str) -> Result<bool> {
        self.account_repo()
            .verify_password(account_id, password)
            .await
    }

    pub async fn update_account_password(
        &self,
        account_id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.account_repo()
            .update_password(account_id, new_password, config)
            .await
    }

    pub async fn update_account_profile(
        &self,
        account_id: i32,
        username: &str,
        email: &str,
    ) -> Result<Account> {
        self.account_repo()
            .update_profile(account_id, username, email)
            .await
    }

    pub async fn set_account_verified(&self, account_id: i32, verified: bool) -> Result<Account> {
        self.account_repo().set_verified(account_id, verified).await
    }

    pub async fn update_account_currency(
        &self,
        account_id: i32,
        currency: &str,
        country: Option<&str>,
    ) -> Result<Account> {
        self.account_repo()
            .update_currency(account_id, currency, country)
            .await
    }

    pub async fn set_two_factor_secret(&self, account_id: i32, secret: &str) -> Result<()> {
        self.account_repo()
            .set_two_factor_secret(account_id, secret)
            .await
    }

    pub async fn enable_two_factor(&self, account_id: i32) -> Result<()> {
        self.account_repo().enable_two_factor(account_id).await
    }

    pub async fn disable_two_factor(&self, account_id: i32) -> Result<()> {
        self.account_repo().disable_two_factor(account_id).await
    }

    // ========== OTP Repository Methods ==========

    pub async fn create_otp(&self, account_id: i32, code_hash: &str, expires_at: &str) -> Result<()> {
        self.otp_repo()
            .create(account_id, code_hash, expires_at)
            .await
    }

    pub async fn latest_otp(&self, account_id: i32) -> Result<Option<otp_codes::Model>> {
        self.otp_repo().latest_for_account(account_id).await
    }

    pub async fn delete_otps(&self, account_id: i32) -> Result<u64> {
        self.otp_repo().delete_all_for_account(account_id).await
    }

    pub async fn otp_last_sent_at(&self, account_id: i32) -> Result<Option<String>> {
        self.otp_repo().last_sent_at(account_id).await
    }

    pub async fn touch_otp_cooldown(&self, account_id: i32) -> Result<()> {
        self.otp_repo().touch_cooldown(account_id).await
    }

    // ========== Backup Code Repository Methods ==========

    pub async fn replace_backup_codes(&self, account_id: i32, codes: &[String]) -> Result<()> {
        self.backup_code_repo()
            .replace_for_account(account_id, codes)
            .await
    }

    pub async fn list_backup_codes(&self, account_id: i32) -> Result<Vec<String>> {
        self.backup_code_repo().list_for_account(account_id).await
    }

    pub async fn count_backup_codes(&self, account_id: i32) -> Result<u64> {
        self.backup_code_repo().count_for_account(account_id).await
    }

    pub async fn consume_backup_code(&self, account_id: i32, code: &str) -> Result<bool> {
        self.backup_code_repo().consume(account_id, code).await
    }

    pub async fn clear_backup_codes(&self, account_id: i32) -> Result<u64> {
        self.backup_code_repo().clear_for_account(account_id).await
    }

    // ========== Ledger Repository Methods ==========

    pub async fn add_income(
        &self,
        account_id: i32,
        entry: NewLedgerEntry,
    ) -> Result<incomes::Model> {
        self.ledger_repo().add_income(account_id, entry).await
    }

    pub async fn list_incomes(&self, account_id: i32) -> Result<Vec<incomes::Model>> {
        self.ledger_repo().list_incomes(account_id).await
    }

    pub async fn update_income(
        &self,
        account_id: i32,
        income_id: i32,
        patch: LedgerPatch,
    ) -> Result<Option<incomes::Model>> {
        self.ledger_repo()
            .update_income(account_id, income_id, patch)
            .await
    }

    pub async fn delete_income(&self, account_id: i32, income_id: i32) -> Result<bool> {
        self.ledger_repo()
            .delete_income(account_id, income_id)
            .await
    }

    pub async fn incomes_in_range(
        &self,
        account_id: i32,
        start: &str,
        end: &str,
    ) -> Result<Vec<incomes::Model>> {
        self.ledger_repo()
            .incomes_in_range(account_id, start, end)
            .await
    }

    pub async fn add_expense(
        &self,
        account_id: i32,
        entry: NewLedgerEntry,
    ) -> Result<expenses::Model> {
        self.ledger_repo().add_expense(account_id, entry).await
    }

    pub async fn list_expenses(&self, account_id: i32) -> Result<Vec<expenses::Model>> {
        self.ledger_repo().list_expenses(account_id).await
    }

    pub async fn update_expense(
        &self,
        account_id: i32,
        expense_id: i32,
        patch: LedgerPatch,
    ) -> Result<Option<expenses::Model>> {
        self.ledger_repo()
            .update_expense(account_id, expense_id, patch)
            .await
    }

    pub async fn delete_expense(&self, account_id: i32, expense_id: i32) -> Result<bool> {
        self.ledger_repo()
            .delete_expense(account_id, expense_id)
            .await
    }

    pub async fn expenses_in_range(
        &self,
        account_id: i32,
        start: &str,
        end: &str,
    ) -> Result<Vec<expenses::Model>> {
        self.ledger_repo()
            .expenses_in_range(account_id, start, end)
            .await
    }
}
