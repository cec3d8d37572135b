// Field Validators - email shape checks for inbound requests
use once_cell::sync::Lazy;
use regex::Regex;

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Permissive `local@domain.tld` shape: no whitespace, exactly one `@`
/// separator and at least one dot in the domain part. Not RFC 5322.
static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Email validator
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl EmailValidator {
    /// Create a new email validator
    pub fn new() -> Self {
        Self
    }

    /// Convenience predicate for call sites that only need a yes/no answer.
    pub fn is_valid(&self, value: &str) -> bool {
        self.validate(value).is_ok()
    }
}

impl FieldValidator<str> for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match EMAIL_REGEX.as_ref() {
            Some(pattern) if pattern.is_match(value) => Ok(()),
            Some(_) => Err("Invalid email format".to_string()),
            None => Err("Email pattern failed to compile".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validator() {
        let validator = EmailValidator;

        assert!(validator.validate("user@example.com").is_ok());
        assert!(validator.validate("user.name+tag@example.co.uk").is_ok());
        assert!(validator.validate("invalid-email").is_err());
        assert!(validator.validate("@example.com").is_err());
        assert!(validator.validate("user@localhost").is_err());
        assert!(validator.validate("user name@example.com").is_err());
        assert!(validator.validate("a@b@example.com").is_err());
    }

    #[test]
    fn email_validator_is_permissive_about_characters() {
        let validator = EmailValidator::new();

        // Anything without whitespace or a second '@' passes.
        assert!(validator.is_valid("ünïcode@exämple.shop"));
        assert!(validator.is_valid("x@y.z"));
    }
}
