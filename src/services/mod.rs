pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService, LoginOutcome};
pub use account_service_impl::SeaOrmAccountService;

pub mod otp_service;
pub mod otp_service_impl;
pub use otp_service::{OtpError, OtpService};
pub use otp_service_impl::SeaOrmOtpService;

pub mod two_factor_service;
pub mod two_factor_service_impl;
pub use two_factor_service::{TwoFactorError, TwoFactorService, TwoFactorStatus};
pub use two_factor_service_impl::SeaOrmTwoFactorService;

pub mod two_factor;
pub use two_factor::{TotpSetup, TwoFactorEngine};

pub mod currency;

pub mod email;
pub use email::{EmailError, EmailTemplate, Mailer};

pub mod summary;
pub use summary::{SummaryRunStats, SummaryService};

pub mod scheduler;
pub use scheduler::Scheduler;

pub mod validation;
