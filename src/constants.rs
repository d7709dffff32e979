pub mod account {

    pub const DEFAULT_CURRENCY: &str = "USD";

    pub const DEFAULT_COUNTRY: &str = "US";
}

pub mod totp {

    pub const DIGITS: usize = 6;

    pub const STEP_SECONDS: u64 = 30;

    /// Accepted clock drift, in steps, on either side of now.
    pub const SKEW_STEPS: u8 = 2;
}

pub mod backup {

    pub const CODE_COUNT: usize = 8;

    /// Random bytes per code; rendered as hex pairs.
    pub const CODE_BYTES: usize = 4;
}

pub mod otp {

    pub const CODE_LENGTH: usize = 6;
}

pub mod summary {

    /// Pause between per-account summary emails, to stay under
    /// provider rate limits.
    pub const SEND_DELAY_MS: u64 = 2000;
}
