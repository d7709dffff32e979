pub mod prelude;

pub mod accounts;
pub mod backup_codes;
pub mod expenses;
pub mod incomes;
pub mod otp_codes;
pub mod otp_cooldowns;
