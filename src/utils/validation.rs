//! Input validation utilities

use crate::constants::{self, MAX_PROMOTION_YEAR, MIN_PROMOTION_YEAR};

/// Validate email format (basic validation)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !email.contains('@') {
        return Err("Invalid email format");
    }
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err("Invalid email format");
    }
    if parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format");
    }
    if !parts[1].contains('.') {
        return Err("Invalid email domain");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.len() > 128 {
        return Err("Password must be at most 128 characters");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

/// Validate user role
pub fn validate_role(role: &str) -> Result<(), &'static str> {
    if constants::roles::ALL.contains(&role) {
        Ok(())
    } else {
        Err("Invalid role")
    }
}

/// Validate one entry of an activity's promotion restriction list.
///
/// Each entry must be a promotion year within the accepted range or the name
/// of a promotion group.
pub fn validate_promotion_entry(entry: &str) -> Result<(), &'static str> {
    if let Ok(year) = entry.parse::<i32>() {
        if (MIN_PROMOTION_YEAR..=MAX_PROMOTION_YEAR).contains(&year) {
            return Ok(());
        }
        return Err("Promotion year out of range");
    }
    if constants::promotion_groups::ALL.contains(&entry) {
        Ok(())
    } else {
        Err("Entry must be a promotion year or a promotion group name")
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("nouppercase123").is_err());
        assert!(validate_password("NOLOWERCASE123").is_err());
        assert!(validate_password("NoNumbers").is_err());
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("areaResponsible").is_ok());
        assert!(validate_role("superuser").is_err());
    }

    #[test]
    fn test_validate_promotion_entry() {
        assert!(validate_promotion_entry("2024").is_ok());
        assert!(validate_promotion_entry("student").is_ok());
        assert!(validate_promotion_entry("chick").is_ok());
        assert!(validate_promotion_entry("1990").is_err());
        assert!(validate_promotion_entry("alumni").is_err());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  hello \u{0000}world  "), "hello world");
    }
}
