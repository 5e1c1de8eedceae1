//! Small text helpers used around the tables.

use heck::ToLowerCamelCase;

/// Default separator for list values stored as a single string.
pub const LIST_SEPARATOR: &str = ";";

/// Join list items into one stored string.
pub fn join_list<S: AsRef<str>>(items: &[S], separator: &str) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Split a stored string back into items, dropping empty segments.
pub fn split_list(value: &str, separator: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .split(separator)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// True if the name contains at least one CJK ideograph or radical.
pub fn is_chinese_name(value: &str) -> bool {
    value.chars().any(|c| {
        matches!(c,
            '\u{2E80}'..='\u{2FD5}'
            | '\u{3190}'..='\u{319F}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FCC}'
            | '\u{F900}'..='\u{FAAD}')
    })
}

/// camelCase an identifier: `given_name` -> `givenName`, `XMLHttpRequest` -> `xmlHttpRequest`.
pub fn camel_case(value: &str) -> String {
    value.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_round_trip_drops_empties() {
        assert_eq!(join_list(&["a", "b"], LIST_SEPARATOR), "a;b");
        assert_eq!(split_list("a;;b;", LIST_SEPARATOR), ["a", "b"]);
        assert!(split_list("", LIST_SEPARATOR).is_empty());
        assert_eq!(join_list::<&str>(&[], ","), "");
    }

    #[test]
    fn test_chinese_name() {
        assert!(is_chinese_name("陳大文"));
        assert!(is_chinese_name("Tai Man 陳"));
        assert!(!is_chinese_name("Chan Tai Man"));
        assert!(!is_chinese_name(""));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("sub"), "sub");
        assert_eq!(camel_case("email_verified"), "emailVerified");
        assert_eq!(camel_case("phone-number"), "phoneNumber");
        assert_eq!(camel_case("UserStatus"), "userStatus");
        assert_eq!(camel_case("given name"), "givenName");
        assert_eq!(camel_case("role"), "role");
    }

    #[test]
    fn test_camel_case_acronyms() {
        assert_eq!(camel_case("XMLHttpRequest"), "xmlHttpRequest");
        assert_eq!(camel_case("SMS_MFA"), "smsMfa");
    }
}
