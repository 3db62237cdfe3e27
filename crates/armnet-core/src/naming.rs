//! Random resource name generation.
//!
//! Children created implicitly (default frontends, unique backends, routes
//! added without a name) get a name built from a prefix and random hex digits.

use uuid::Uuid;

/// Returns `prefix` followed by random lowercase hex digits, at most `max_len` long.
///
/// When the prefix alone is longer than `max_len` it is truncated so that at
/// least a few random characters remain.
#[must_use]
pub fn random_resource_name(prefix: &str, max_len: usize) -> String {
    let random = Uuid::new_v4().simple().to_string();
    let keep = prefix.len().min(max_len.saturating_sub(4));
    let mut name: String = prefix.chars().take(keep).collect();
    for ch in random.chars() {
        if name.len() >= max_len {
            break;
        }
        name.push(ch);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_has_prefix_and_length() {
        let name = random_resource_name("frontend", 14);
        assert!(name.starts_with("frontend"));
        assert_eq!(name.len(), 14);
        assert!(name[8..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn names_are_distinct() {
        assert_ne!(
            random_resource_name("backend", 12),
            random_resource_name("backend", 12)
        );
    }

    #[test]
    fn long_prefix_is_truncated() {
        let name = random_resource_name("averyveryverylongprefix", 10);
        assert_eq!(name.len(), 10);
        assert!(name.starts_with("averyv"));
    }
}
