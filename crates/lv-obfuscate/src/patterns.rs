//! Pattern catalog and classifiers.
//!
//! Each identifier category has one precompiled detector. The `contains_*`
//! predicates test for a match anywhere in the input; the `find_*` helpers
//! return the first qualifying match, which is the only one a category
//! operation acts on.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits a phone number may hold.
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

/// Digits a card number may hold.
pub const CARD_DIGITS: std::ops::RangeInclusive<usize> = 13..=19;

// Pre-compiled detectors
pub static RE_PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r":[0-9]{2,}").unwrap());

pub static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap());

pub static RE_IP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}").unwrap());

pub static RE_IP_CIDR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}(/[0-9]{1,2})?$").unwrap()
});

pub static RE_FQDN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z0-9-]{1,63}\.)+[a-zA-Z]{2,63}").unwrap());

pub static RE_NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^@$.\n]*\.[^\^@.\n]*([.][^\^@.\n]*)?").unwrap());

pub static RE_SSN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{3}-[0-9]{2}-[0-9]{4}").unwrap());

pub static RE_MAC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}").unwrap());

pub static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap());

pub static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+[0-9]{1,3}[-.\s]?)?(\(?[0-9]{3}\)?[-.\s]?)?[0-9]{3}[-.\s]?[0-9]{4}").unwrap()
});

// Grouped in fours, digit count checked separately (no Luhn check)
pub static RE_CARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}[-\s]?[0-9]{4}[-\s]?[0-9]{4}[-\s]?[0-9]{1,7}").unwrap());

pub static RE_HOST_PORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]+:[0-9]+$").unwrap());

/// Number of ASCII digits in `s`.
pub fn count_digits(s: &str) -> usize {
    s.bytes().filter(u8::is_ascii_digit).count()
}

/// True when `s` contains a path separator.
pub fn has_path_separator(s: &str) -> bool {
    s.contains('/') || s.contains('\\')
}

/// Checks if string contains a dotted-quad IPv4 address.
///
/// Permissive: `192.168.1.1.1` contains `192.168.1.1` and matches.
pub fn contains_ip(s: &str) -> bool {
    RE_IP.is_match(s)
}

/// Checks if the whole string is an IPv4 address with an optional CIDR suffix.
pub fn is_ip_cidr(s: &str) -> bool {
    RE_IP_CIDR.is_match(s)
}

/// Checks if string contains an email address.
pub fn contains_email(s: &str) -> bool {
    RE_EMAIL.is_match(s)
}

/// Checks if string contains a fully qualified domain name.
pub fn contains_fqdn(s: &str) -> bool {
    RE_FQDN.is_match(s)
}

/// Checks if string contains a `DDD-DD-DDDD` social security number.
pub fn contains_ssn(s: &str) -> bool {
    RE_SSN.is_match(s)
}

/// Checks if string contains a MAC address.
pub fn contains_mac(s: &str) -> bool {
    RE_MAC.is_match(s)
}

/// Checks if string contains a `YYYY-MM-DD` date.
pub fn contains_date(s: &str) -> bool {
    RE_DATE.is_match(s)
}

/// First phone-shaped match holding 10 to 15 digits.
pub fn find_phone_no(s: &str) -> Option<&str> {
    RE_PHONE
        .find_iter(s)
        .map(|m| m.as_str())
        .find(|m| PHONE_DIGITS.contains(&count_digits(m)))
}

/// Checks if string contains a phone number.
pub fn contains_phone_no(s: &str) -> bool {
    find_phone_no(s).is_some()
}

/// First card-shaped match holding 13 to 19 digits.
pub fn find_credit_card_no(s: &str) -> Option<&str> {
    RE_CARD
        .find_iter(s)
        .map(|m| m.as_str())
        .find(|m| CARD_DIGITS.contains(&count_digits(m)))
}

/// Checks if string contains a credit card number.
pub fn contains_credit_card_no(s: &str) -> bool {
    find_credit_card_no(s).is_some()
}

/// Checks if string looks like a namespace (`db.collection[.tail]`).
pub fn is_namespace(s: &str) -> bool {
    if has_path_separator(s) {
        return false;
    }
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return false;
    }
    parts.iter().all(|part| !part.is_empty())
}

/// Checks if string looks like a hostname.
pub fn looks_like_hostname(s: &str) -> bool {
    !s.contains(' ') && (s.contains('.') || s.contains('-'))
}

/// Checks if string matches `hostname:port` or `ip:port`.
pub fn looks_like_host_port(s: &str) -> bool {
    RE_HOST_PORT.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ip() {
        let cases = [
            ("192.168.1.1", true),
            ("10.0.0.1", true),
            ("0.0.0.0", true),
            ("255.255.255.255", true),
            ("host:192.168.1.1:27017", true),
            ("not an ip", false),
            ("192.168.1", false),
            ("192.168.1.1.1", true),
        ];
        for (input, expected) in cases {
            assert_eq!(contains_ip(input), expected, "contains_ip({:?})", input);
        }
    }

    #[test]
    fn test_is_ip_cidr() {
        assert!(is_ip_cidr("10.0.0.0/8"));
        assert!(is_ip_cidr("192.168.1.1"));
        assert!(!is_ip_cidr("10.0.0.0/123"));
        assert!(!is_ip_cidr("ip 10.0.0.0/8"));
    }

    #[test]
    fn test_contains_email() {
        let cases = [
            ("user@example.com", true),
            ("user.name@domain.org", true),
            ("user+tag@example.co.uk", true),
            ("not an email", false),
            ("@example.com", false),
            ("user@", false),
        ];
        for (input, expected) in cases {
            assert_eq!(contains_email(input), expected, "contains_email({:?})", input);
        }
    }

    #[test]
    fn test_contains_ssn() {
        let cases = [
            ("123-45-6789", true),
            ("SSN: 123-45-6789", true),
            ("12345-6789", false),
            ("123456789", false),
            ("not a ssn", false),
        ];
        for (input, expected) in cases {
            assert_eq!(contains_ssn(input), expected, "contains_ssn({:?})", input);
        }
    }

    #[test]
    fn test_contains_phone_no() {
        let cases = [
            ("555-123-4567", true),
            ("(555) 123-4567", true),
            ("+1-555-123-4567", true),
            ("5551234567", true),
            ("555-1234", false),
            ("123", false),
        ];
        for (input, expected) in cases {
            assert_eq!(contains_phone_no(input), expected, "contains_phone_no({:?})", input);
        }
    }

    #[test]
    fn test_phone_digits_counted_per_match() {
        // Short phone-shaped run, plenty of digits elsewhere
        assert!(!contains_phone_no("ext 555-1234 pid 12 34 56"));
        assert_eq!(find_phone_no("call 555-123-4567 now"), Some("555-123-4567"));
    }

    #[test]
    fn test_contains_credit_card_no() {
        assert!(contains_credit_card_no("4111-1111-1111-1111"));
        assert!(contains_credit_card_no("card 4111 1111 1111 1111 ok"));
        assert!(contains_credit_card_no("4111111111111"));
        assert!(!contains_credit_card_no("4111-1111-1111"));
        assert!(!contains_credit_card_no("no digits here"));
    }

    #[test]
    fn test_is_namespace() {
        let cases = [
            ("mydb.mycollection", true),
            ("mydb.mycollection.index", true),
            ("admin.system.version", true),
            ("mydb", false),
            ("/path/to/file", false),
            ("", false),
            (".collection", false),
            ("db.", false),
            ("a.b.c.d", false),
        ];
        for (input, expected) in cases {
            assert_eq!(is_namespace(input), expected, "is_namespace({:?})", input);
        }
    }

    #[test]
    fn test_looks_like_hostname() {
        assert!(looks_like_hostname("server1.example.com"));
        assert!(looks_like_hostname("db-primary"));
        assert!(!looks_like_hostname("localhost"));
        assert!(!looks_like_hostname("two words.com"));
    }

    #[test]
    fn test_looks_like_host_port() {
        assert!(looks_like_host_port("server1.example.com:27017"));
        assert!(looks_like_host_port("192.168.1.1:27017"));
        assert!(!looks_like_host_port("server1.example.com"));
        assert!(!looks_like_host_port("host:port"));
    }

    #[test]
    fn test_contains_mac_and_date() {
        assert!(contains_mac("00:1A:2B:3C:4D:5E"));
        assert!(contains_mac("00-1a-2b-3c-4d-5e"));
        assert!(!contains_mac("00:1A:2B"));
        assert!(contains_date("started 2024-06-15T10:00:00Z"));
        assert!(!contains_date("2024/06/15"));
    }

    #[test]
    fn test_contains_fqdn() {
        assert!(contains_fqdn("server1.example.com"));
        assert!(contains_fqdn("connect to db.internal.io now"));
        assert!(!contains_fqdn("192.168.1.1"));
        assert!(!contains_fqdn("nodots"));
    }
}
