//! `format` checkers.
//!
//! Only pass/fail matters. Unknown format names pass, the same way unknown
//! keywords are skipped.
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

pub trait FormatCheck: Sync {
    fn check(&self, value: &str, format: &str) -> bool;
}

/// Built-in draft-4/6 formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formats;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex")
});

static HOSTNAME_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("hostname regex")
});

static URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]*$").expect("uri regex")
});

static URI_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s]*$").expect("uri-reference regex"));

static TIME_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2}(?:\.\d+)?)(?:[Zz]|[+-]\d{2}:\d{2})?$").expect("time regex")
});

impl FormatCheck for Formats {
    fn check(&self, value: &str, format: &str) -> bool {
        match format {
            "date-time" => DateTime::parse_from_rfc3339(value).is_ok(),
            "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            "time" => is_time(value),
            "email" => EMAIL.is_match(value),
            "hostname" => is_hostname(value),
            "ipv4" => value.parse::<Ipv4Addr>().is_ok(),
            "ipv6" => value.parse::<Ipv6Addr>().is_ok(),
            "uri" => URI.is_match(value),
            "uri-reference" => URI_REFERENCE.is_match(value),
            "json-pointer" => is_json_pointer(value),
            "regex" => Regex::new(value).is_ok(),
            _ => true,
        }
    }
}

fn is_time(value: &str) -> bool {
    let Some(caps) = TIME_OFFSET.captures(value) else {
        return false;
    };
    NaiveTime::parse_from_str(&caps[1], "%H:%M:%S%.f").is_ok()
}

fn is_hostname(value: &str) -> bool {
    let value = value.strip_suffix('.').unwrap_or(value);
    !value.is_empty() && value.len() <= 253 && value.split('.').all(|label| HOSTNAME_LABEL.is_match(label))
}

fn is_json_pointer(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if !value.starts_with('/') {
        return false;
    }
    // every `~` must start an escape
    let bytes = value.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'~')
        .all(|(i, _)| matches!(bytes.get(i + 1), Some(b'0') | Some(b'1')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_and_times() {
        let f = Formats;
        assert!(f.check("2024-02-29T12:30:00Z", "date-time"));
        assert!(f.check("2024-02-29T12:30:00.5+02:00", "date-time"));
        assert!(!f.check("2024-02-30T12:30:00Z", "date-time"));
        assert!(f.check("2023-12-01", "date"));
        assert!(!f.check("2023-13-01", "date"));
        assert!(f.check("08:15:00Z", "time"));
        assert!(f.check("08:15:00.250", "time"));
        assert!(!f.check("25:00:00", "time"));
    }

    #[test]
    fn network_formats() {
        let f = Formats;
        assert!(f.check("a@b.io", "email"));
        assert!(!f.check("not-an-email", "email"));
        assert!(f.check("example.com", "hostname"));
        assert!(!f.check("-bad-.com", "hostname"));
        assert!(f.check("10.0.0.1", "ipv4"));
        assert!(!f.check("10.0.0.256", "ipv4"));
        assert!(f.check("::1", "ipv6"));
        assert!(f.check("https://example.com/a?b=c", "uri"));
        assert!(!f.check("/relative/path", "uri"));
        assert!(f.check("/relative/path", "uri-reference"));
    }

    #[test]
    fn misc_formats() {
        let f = Formats;
        assert!(f.check("/a~0b/c~1d", "json-pointer"));
        assert!(!f.check("/a~2", "json-pointer"));
        assert!(!f.check("a", "json-pointer"));
        assert!(f.check("^a+$", "regex"));
        assert!(!f.check("(", "regex"));
    }

    #[test]
    fn unknown_formats_pass() {
        assert!(Formats.check("anything", "x-vendor-thing"));
    }
}
