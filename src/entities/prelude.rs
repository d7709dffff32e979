pub use super::accounts::Entity as Accounts;
pub use super::backup_codes::Entity as BackupCodes;
pub use super::expenses::Entity as Expenses;
pub use super::incomes::Entity as Incomes;
pub use super::otp_codes::Entity as OtpCodes;
pub use super::otp_cooldowns::Entity as OtpCooldowns;
