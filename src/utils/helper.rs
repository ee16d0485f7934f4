use chrono::{DateTime, Utc};

/// Compare two chain addresses ignoring case
pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Canonical key for grouping by address
pub fn address_key(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// Format unix seconds the way ledger rows display them
pub fn format_timestamp(unix_seconds: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_seconds, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{}s", unix_seconds),
    }
}

/// Truncate a string to a maximum length
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an address for display (truncated)
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_comparison() {
        assert!(same_address("0xAbCd", "0xabcd"));
        assert!(same_address(" TXyz ", "txyz"));
        assert!(!same_address("0xabcd", "0xabce"));
        assert_eq!(address_key("0xAB"), "0xab");
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_000), "1970-01-01 00:16:40 UTC");
    }

    #[test]
    fn display_helpers() {
        assert_eq!(truncate_string("abcdef", 10), "abcdef");
        assert_eq!(truncate_string("abcdefghijkl", 8), "abcde...");
        assert_eq!(
            format_address("0xdac17f958d2ee523a2206206994597c13d831ec7"),
            "0xdac1...1ec7"
        );
        assert_eq!(format_address("0xaa"), "0xaa");
    }
}
