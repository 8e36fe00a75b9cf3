use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating service contact numbers
    /// Optional leading +, 7-19 digits
    /// - Valid: "+996700123456", "0700123456"
    /// - Invalid: "+996 700", "phone", "123"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,19}$").unwrap();
}

/// Escape LIKE/ILIKE metacharacters so user input only matches literally.
/// Postgres uses backslash as the default escape character.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("+996700123456"));
        assert!(PHONE_REGEX.is_match("0700123456"));
        assert!(PHONE_REGEX.is_match("79991234567"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("+996 700 123"));
        assert!(!PHONE_REGEX.is_match("phone"));
        assert!(!PHONE_REGEX.is_match("123"));
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_escape_like_passthrough() {
        assert_eq!(escape_like("plumbing"), "plumbing");
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
