//! Input validation for account-facing operations.
//!
//! Each check returns the user-facing message on failure so callers can
//! surface it verbatim.

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 20;
const PASSWORD_MIN_CHARS: usize = 8;

/// Checks a username for acceptable length.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let length = username.chars().count();
    if length < USERNAME_MIN_CHARS || length > USERNAME_MAX_CHARS {
        return Err("Username must be between 3 and 20 characters!");
    }
    Ok(())
}

/// Checks an email address for a plausible shape. Deliberately loose: one
/// `@` separating a non-empty local part from a dotted domain, no
/// whitespace anywhere.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    const MESSAGE: &str = "Please provide a valid email address!";

    if email.chars().any(char::is_whitespace) {
        return Err(MESSAGE);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(MESSAGE);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(MESSAGE);
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(MESSAGE);
    };
    if host.is_empty() || tld.is_empty() {
        return Err(MESSAGE);
    }
    Ok(())
}

/// Checks a password for minimum length.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err("Password must be at least 8 characters long!");
    }
    Ok(())
}

/// Checks an emailed verification code: exactly six ASCII digits.
pub fn validate_otp(code: &str) -> Result<(), &'static str> {
    if code.len() != crate::constants::otp::CODE_LENGTH
        || !code.chars().all(|c| c.is_ascii_digit())
    {
        return Err("OTP must be a 6-digit code!");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_length_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("a".repeat(20).as_str()).is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("a".repeat(21).as_str()).is_err());
    }

    #[test]
    fn email_accepts_common_shapes() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.co").is_ok());
    }

    #[test]
    fn email_rejects_malformed_input() {
        assert!(validate_email("").is_err());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("alice@.com").is_err());
        assert!(validate_email("alice@example.").is_err());
        assert!(validate_email("al ice@example.com").is_err());
        assert!(validate_email("alice@exa@mple.com").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn otp_shape() {
        assert!(validate_otp("123456").is_ok());
        assert!(validate_otp("000000").is_ok());
        assert!(validate_otp("12345").is_err());
        assert!(validate_otp("1234567").is_err());
        assert!(validate_otp("12345a").is_err());
        assert!(validate_otp("").is_err());
    }
}
