use std::sync::LazyLock;

use regex::Regex;

/// Minimum accepted password length, in UTF-16 code units
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Top-level domain groups must be exactly three word characters (".com", ".org")
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{3})+$")
        .expect("email pattern is valid")
});

/// Trim surrounding whitespace and lowercase
pub fn sanitize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> bool {
    let sanitized = sanitize_email(email);
    !sanitized.is_empty() && EMAIL_PATTERN.is_match(&sanitized)
}

/// Length is measured in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane counts twice.
pub fn password_is_valid(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_email() {
        assert_eq!(sanitize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email(" First.Last@mail-server.org "));
        assert!(validate_email("a_b@c.net"));

        assert!(!validate_email(""));
        assert!(!validate_email("   "));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user.example.com"));
        assert!(!validate_email("user@example.io"));
        assert!(!validate_email("user@@example.com"));
    }

    #[test]
    fn test_password_is_valid() {
        assert!(password_is_valid("secret1"));
        assert!(password_is_valid("123456"));
        assert!(!password_is_valid("12345"));
        assert!(!password_is_valid(""));
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // Each emoji is a surrogate pair
        assert!(password_is_valid("🔑🔑🔑"));
        assert!(!password_is_valid("🔑🔑"));
        assert!(!password_is_valid("çãõéí"));
        assert!(password_is_valid("çãõéíú"));
    }
}
