//! Phone number and group JID normalization
//!
//! Recipients are either Brazilian phone numbers, normalized to the
//! `55` + area code + subscriber digits form, or group JIDs (`<digits>@g.us`)
//! which are passed through untouched.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

/// Suffix carried by group identifiers
pub const GROUP_SUFFIX: &str = "@g.us";

/// Brazilian country code
pub const COUNTRY_PREFIX: &str = "55";

static GROUP_JID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+@g\.us$").expect("valid group JID pattern"));

/// Validate and normalize a phone number or group JID.
///
/// Returns `None` when the input cannot be a valid recipient.
///
/// ```
/// use evolution_client::identifier::validate_number;
///
/// assert_eq!(validate_number("11952735931").as_deref(), Some("5511952735931"));
/// assert_eq!(validate_number("12345@g.us").as_deref(), Some("12345@g.us"));
/// assert_eq!(validate_number("123"), None);
/// ```
pub fn validate_number(number: impl Display) -> Option<String> {
    let raw = number.to_string();

    if is_group(&raw) {
        return GROUP_JID.is_match(&raw).then_some(raw);
    }

    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if !digits.starts_with(COUNTRY_PREFIX) {
        digits.insert_str(0, COUNTRY_PREFIX);
    }

    if digits.len() != 12 && digits.len() != 13 {
        return None;
    }

    let area_code: u8 = digits[2..4].parse().ok()?;
    if !(1..=99).contains(&area_code) {
        return None;
    }

    // 13 digits means a mobile number, which carries the leading 9
    if digits.len() == 13 && digits.as_bytes()[4] != b'9' {
        return None;
    }

    Some(digits)
}

/// Whether the identifier addresses a group rather than a contact
pub fn is_group(identifier: &str) -> bool {
    identifier.ends_with(GROUP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_canonical() {
        assert_eq!(
            validate_number("5511952735931").as_deref(),
            Some("5511952735931")
        );
    }

    #[test]
    fn test_prefix_added() {
        assert_eq!(
            validate_number("11952735931").as_deref(),
            Some("5511952735931")
        );
    }

    #[test]
    fn test_integer_input() {
        assert_eq!(validate_number(11952735931u64).as_deref(), Some("5511952735931"));
    }

    #[test]
    fn test_formatting_stripped() {
        assert_eq!(
            validate_number("+55 (11) 95273-5931").as_deref(),
            Some("5511952735931")
        );
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(validate_number("123"), None);
        assert_eq!(validate_number(""), None);
        assert_eq!(validate_number("55119527359311"), None);
    }

    #[test]
    fn test_twelve_digits_skip_mobile_check() {
        assert_eq!(
            validate_number("551195273593").as_deref(),
            Some("551195273593")
        );
        assert_eq!(validate_number("1132345678").as_deref(), Some("551132345678"));
    }

    #[test]
    fn test_thirteen_digits_require_nine() {
        assert_eq!(validate_number("5511852735931"), None);
    }

    #[test]
    fn test_area_code_zero_rejected() {
        assert_eq!(validate_number("550052735931"), None);
    }

    #[test]
    fn test_group_jid() {
        assert_eq!(validate_number("12345@g.us").as_deref(), Some("12345@g.us"));
        assert_eq!(
            validate_number("120363025246125486@g.us").as_deref(),
            Some("120363025246125486@g.us")
        );
        assert_eq!(validate_number("abc@g.us"), None);
        assert_eq!(validate_number("123-456@g.us"), None);
        assert_eq!(validate_number("@g.us"), None);
    }

    #[test]
    fn test_idempotent() {
        for input in ["11952735931", "5511952735931", "1132345678", "12345@g.us"] {
            let once = validate_number(input).unwrap();
            assert_eq!(validate_number(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_is_group() {
        assert!(is_group("12345@g.us"));
        assert!(!is_group("5511952735931"));
    }
}
