//! TOTP enrollment and recovery-code primitives.
//!
//! Everything here is pure: persistence and state transitions live in the
//! two-factor service, which calls into this module.

use anyhow::Result;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::constants::{backup, totp};

/// Data returned when provisioning TOTP for an account.
pub struct TotpSetup {
    /// Base32-encoded secret to store until the enrollment is confirmed.
    pub secret: String,
    /// otpauth:// URI for authenticator apps.
    pub otpauth_url: String,
    /// QR rendering of the URI as a data URL, for direct embedding.
    pub qr_code: String,
}

/// Builds and checks TOTP codes for a fixed issuer.
#[derive(Clone)]
pub struct TwoFactorEngine {
    issuer: String,
}

impl TwoFactorEngine {
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }

    /// Generate a fresh secret plus provisioning URI and QR code.
    ///
    /// A QR failure is a hard error: a setup response without a scannable
    /// code would leave the client stuck mid-enrollment.
    pub fn generate_setup(&self, account_email: &str) -> Result<TotpSetup> {
        let secret = Secret::generate_secret().to_encoded().to_string();

        let totp = self.build_totp(&secret, account_email)?;
        let otpauth_url = totp.get_url();

        let qr = totp
            .get_qr_base64()
            .map_err(|e| anyhow::anyhow!("Failed to generate QR code: {e}"))?;

        Ok(TotpSetup {
            secret,
            otpauth_url,
            qr_code: format!("data:image/png;base64,{qr}"),
        })
    }

    /// Check a code against the current time, tolerating configured skew.
    pub fn verify(&self, secret: &str, code: &str, account_email: &str) -> Result<bool> {
        let totp = self.build_totp(secret, account_email)?;
        let code = code.replace([' ', '-'], "");

        match totp.check_current(&code) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!(error = %e, "TOTP verification failed to read system time");
                Ok(false)
            }
        }
    }

    /// Check a code at an explicit Unix timestamp.
    pub fn verify_at(
        &self,
        secret: &str,
        code: &str,
        account_email: &str,
        time: u64,
    ) -> Result<bool> {
        let totp = self.build_totp(secret, account_email)?;
        let code = code.replace([' ', '-'], "");
        Ok(totp.check(&code, time))
    }

    /// The code an authenticator app would show right now.
    pub fn generate_current(&self, secret: &str, account_email: &str) -> Result<String> {
        let totp = self.build_totp(secret, account_email)?;
        totp.generate_current()
            .map_err(|e| anyhow::anyhow!("Failed to generate TOTP code: {e}"))
    }

    fn build_totp(&self, secret: &str, account_email: &str) -> Result<TOTP> {
        TOTP::new(
            Algorithm::SHA1,
            totp::DIGITS,
            totp::SKEW_STEPS,
            totp::STEP_SECONDS,
            Secret::Encoded(secret.to_string())
                .to_bytes()
                .map_err(|e| anyhow::anyhow!("Invalid TOTP secret: {e}"))?,
            Some(self.issuer.clone()),
            account_email.to_string(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to build TOTP: {e}"))
    }
}

/// Generate a fresh set of recovery codes.
///
/// Each code is four random bytes rendered as uppercase hex pairs joined by
/// hyphens, e.g. `A1-B2-C3-D4`.
#[must_use]
pub fn generate_backup_codes() -> Vec<String> {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..backup::CODE_COUNT)
        .map(|_| {
            let bytes: [u8; backup::CODE_BYTES] = rng.random();
            let pairs: Vec<String> = bytes.iter().map(|b| format!("{b:02X}")).collect();
            pairs.join("-")
        })
        .collect()
}

/// Canonicalize user input: uppercase with all whitespace removed.
/// Hyphens are part of the code and are kept.
#[must_use]
pub fn normalize_backup_code(code: &str) -> String {
    code.to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Position of the first code matching the provided input, or None.
#[must_use]
pub fn find_backup_code(codes: &[String], provided: &str) -> Option<usize> {
    let normalized = normalize_backup_code(provided);
    codes
        .iter()
        .position(|c| normalize_backup_code(c) == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = "user@example.com";

    fn engine() -> TwoFactorEngine {
        TwoFactorEngine::new("FinMate")
    }

    #[test]
    fn setup_secret_is_base32_of_expected_length() {
        let setup = engine().generate_setup(EMAIL).unwrap();
        assert_eq!(setup.secret.len(), 32);
        assert!(
            setup
                .secret
                .chars()
                .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c))
        );
    }

    #[test]
    fn setup_url_names_issuer_and_account() {
        let setup = engine().generate_setup(EMAIL).unwrap();
        assert!(setup.otpauth_url.starts_with("otpauth://totp/"));
        assert!(setup.otpauth_url.contains("FinMate"));
        assert!(setup.otpauth_url.contains("user%40example.com"));
    }

    #[test]
    fn setup_qr_is_a_png_data_url() {
        let setup = engine().generate_setup(EMAIL).unwrap();
        assert!(setup.qr_code.starts_with("data:image/png;base64,"));
        assert!(setup.qr_code.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn current_code_verifies() {
        let engine = engine();
        let setup = engine.generate_setup(EMAIL).unwrap();
        let code = engine.generate_current(&setup.secret, EMAIL).unwrap();
        assert!(engine.verify(&setup.secret, &code, EMAIL).unwrap());
    }

    #[test]
    fn wrong_code_is_rejected() {
        let engine = engine();
        let setup = engine.generate_setup(EMAIL).unwrap();
        assert!(!engine.verify(&setup.secret, "000000", EMAIL).unwrap());
    }

    #[test]
    fn codes_within_two_steps_are_accepted() {
        let engine = engine();
        let setup = engine.generate_setup(EMAIL).unwrap();
        let totp = engine.build_totp(&setup.secret, EMAIL).unwrap();

        let now = 1_700_000_000u64;
        let code = totp.generate(now);

        for drift in [0u64, 30, 60] {
            assert!(
                engine
                    .verify_at(&setup.secret, &code, EMAIL, now + drift)
                    .unwrap(),
                "code should verify {drift}s after issue"
            );
            assert!(
                engine
                    .verify_at(&setup.secret, &code, EMAIL, now - drift)
                    .unwrap(),
                "code should verify {drift}s before issue"
            );
        }
    }

    #[test]
    fn codes_past_the_window_are_rejected() {
        let engine = engine();
        let setup = engine.generate_setup(EMAIL).unwrap();
        let totp = engine.build_totp(&setup.secret, EMAIL).unwrap();

        let now = 1_700_000_000u64;
        let code = totp.generate(now);

        assert!(
            !engine
                .verify_at(&setup.secret, &code, EMAIL, now + 91)
                .unwrap()
        );
    }

    #[test]
    fn verify_tolerates_spaced_input() {
        let engine = engine();
        let setup = engine.generate_setup(EMAIL).unwrap();
        let code = engine.generate_current(&setup.secret, EMAIL).unwrap();
        let spaced = format!("{} {}", &code[..3], &code[3..]);
        assert!(engine.verify(&setup.secret, &spaced, EMAIL).unwrap());
    }

    #[test]
    fn backup_codes_have_expected_shape() {
        let codes = generate_backup_codes();
        assert_eq!(codes.len(), 8);

        for code in &codes {
            assert_eq!(code.len(), 11);
            let groups: Vec<&str> = code.split('-').collect();
            assert_eq!(groups.len(), 4);
            for group in groups {
                assert_eq!(group.len(), 2);
                assert!(
                    group
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
                );
            }
        }
    }

    #[test]
    fn find_matches_exact_and_sloppy_input() {
        let codes = vec!["A1-B2-C3-D4".to_string(), "0F-11-22-33".to_string()];

        assert_eq!(find_backup_code(&codes, "A1-B2-C3-D4"), Some(0));
        assert_eq!(find_backup_code(&codes, "a1-b2-c3-d4"), Some(0));
        assert_eq!(find_backup_code(&codes, " 0f-11-22-33 "), Some(1));
        assert_eq!(find_backup_code(&codes, "FF-FF-FF-FF"), None);
    }

    #[test]
    fn find_requires_hyphens() {
        let codes = vec!["A1-B2-C3-D4".to_string()];
        assert_eq!(find_backup_code(&codes, "A1B2C3D4"), None);
    }
}
