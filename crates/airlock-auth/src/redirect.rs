//! Post-login redirect target sanitizing.
//!
//! The `next` parameter of the login route is attacker-controlled. Only
//! same-origin absolute paths survive [`sanitize_next`]; everything else
//! collapses to a caller-chosen default.

use std::fmt;

/// Fallback target when a candidate is rejected.
pub const DEFAULT_REDIRECT: &str = "/";

/// Substrings that mark a scheme or an authority, compared lowercase.
const SCHEME_MARKERS: &[&str] = &["://", "http:", "https:", "javascript:", "vbscript:", "data:"];

/// Validate an untrusted redirect target.
///
/// Returns the trimmed candidate verbatim (query and fragment included) when
/// it is a same-origin path, otherwise `default`. Never fails.
pub fn sanitize_next(candidate: &str, default: &str) -> String {
    let trimmed = candidate.trim();
    if is_safe_path(trimmed) {
        trimmed.to_string()
    } else {
        default.to_string()
    }
}

fn is_safe_path(value: &str) -> bool {
    if !value.starts_with('/') {
        return false;
    }

    // `//host` and `/\host` are both read as protocol-relative by browsers.
    if value.starts_with("//") || value.starts_with("/\\") {
        return false;
    }

    // Browsers drop tabs and newlines before resolving, so "/\t/evil" becomes "//evil".
    if value.chars().any(|c| c.is_ascii_control()) {
        return false;
    }

    let lowered = value.to_ascii_lowercase();
    !SCHEME_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// A redirect target that passed [`sanitize_next`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    /// Sanitize `candidate`, falling back to `default`.
    pub fn parse(candidate: &str, default: &str) -> Self {
        Self(sanitize_next(candidate, default))
    }

    /// The validated path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RedirectTarget {
    fn default() -> Self {
        Self(DEFAULT_REDIRECT.to_string())
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RedirectTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_accepted_values_are_trimmed_input(s in "\\PC*") {
            let out = sanitize_next(&s, DEFAULT_REDIRECT);
            if out != DEFAULT_REDIRECT || s.trim() == DEFAULT_REDIRECT {
                prop_assert_eq!(out.as_str(), s.trim());
            }
            prop_assert!(out.starts_with('/'));
            prop_assert!(!out.starts_with("//"));
        }

        #[test]
        fn test_idempotent(s in "\\PC*") {
            let once = sanitize_next(&s, DEFAULT_REDIRECT);
            let twice = sanitize_next(&once, DEFAULT_REDIRECT);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_scheme_markers_always_rejected(
            prefix in "/[a-z/]{0,8}",
            scheme in prop::sample::select(vec!["http:", "HTTPS:", "JavaScript:", "data:"]),
            suffix in "[a-z/.]{0,12}",
        ) {
            let candidate = format!("{prefix}{scheme}{suffix}");
            prop_assert_eq!(sanitize_next(&candidate, DEFAULT_REDIRECT), DEFAULT_REDIRECT);
        }

        #[test]
        fn test_protocol_relative_always_rejected(rest in "[a-zA-Z0-9./?#=&-]{0,24}") {
            let candidate = format!("//{rest}");
            prop_assert_eq!(sanitize_next(&candidate, "/home"), "/home");
        }

        #[test]
        fn test_plain_paths_round_trip(path in "(/[a-z0-9_-]{1,8}){1,4}(\\?[a-z]=[0-9]{1,3})?(#[a-z]{1,6})?") {
            prop_assert_eq!(sanitize_next(&path, DEFAULT_REDIRECT), path);
        }
    }
}
