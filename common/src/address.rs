//! Syntactic address check used before any scan is launched.
//!
//! Only the *shape* is checked: four non-empty groups of ASCII digits joined
//! by three dots. Group values are not range checked, so `999.1.1.1` passes.

const GROUPS: usize = 4;

/// Returns `true` when `s` looks like `digits.digits.digits.digits`.
pub fn is_valid_address(s: &str) -> bool {
    let mut groups: usize = 0;

    for group in s.split('.') {
        groups += 1;
        if groups > GROUPS || group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }

    groups == GROUPS
}
