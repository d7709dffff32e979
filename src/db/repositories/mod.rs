pub mod account;
pub mod backup_code;
pub mod ledger;
pub mod otp;
