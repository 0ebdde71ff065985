//! Static admission policy.
//!
//! Requests originating from private address prefixes are rejected
//! before they reach the queue. The prefix set is fixed.

/// Origin prefixes that are never admitted.
pub const BLOCKED_PREFIXES: [&str; 2] = ["192.168", "10."];

/// Whether a request from `address` must be rejected.
pub fn is_blocked(address: &str) -> bool {
    BLOCKED_PREFIXES
        .iter()
        .any(|prefix| address.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_prefixes_blocked() {
        assert!(is_blocked("192.168.0.1"));
        assert!(is_blocked("192.168.255.255"));
        assert!(is_blocked("10.0.0.5"));
        assert!(is_blocked("10.255.3.4"));
    }

    #[test]
    fn public_addresses_admitted() {
        assert!(!is_blocked("8.8.8.8"));
        assert!(!is_blocked("192.169.0.1"));
        assert!(!is_blocked("172.16.0.1"));
        // Leading "10" without the dot is a different first octet.
        assert!(!is_blocked("100.0.0.1"));
        assert!(!is_blocked("101.10.0.1"));
    }

    #[test]
    fn empty_address_admitted() {
        assert!(!is_blocked(""));
    }
}
