//! Path Utilities
//!
//! Environment expansion and comparison of user-configured directory paths.

use std::path::Path;

/// Expand `$VAR` and `${VAR}` references using the process environment
///
/// Unset variables expand to the empty string. A `$` that does not start a
/// variable reference is kept as-is.
pub fn expand_env(path: &str) -> String {
    expand_with(path, |name| std::env::var(name).ok())
}

/// Expand variable references using a custom lookup
///
/// # Example
/// ```
/// use filtersnatch::logic::path::expand_with;
///
/// let lookup = |name: &str| (name == "HOME").then(|| "/home/exile".to_string());
/// assert_eq!(expand_with("$HOME/poe", lookup), "/home/exile/poe");
/// assert_eq!(expand_with("${HOME}/poe", lookup), "/home/exile/poe");
/// ```
pub fn expand_with<F>(path: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for nc in chars.by_ref() {
                if nc == '}' {
                    closed = true;
                    break;
                }
                name.push(nc);
            }
            if closed {
                out.push_str(&lookup(&name).unwrap_or_default());
            } else {
                out.push_str("${");
                out.push_str(&name);
            }
            continue;
        }

        let mut name = String::new();
        while let Some(&nc) = chars.peek() {
            if nc.is_ascii_alphanumeric() || nc == '_' {
                name.push(nc);
                chars.next();
            } else {
                break;
            }
        }

        if name.is_empty() {
            out.push('$');
        } else {
            out.push_str(&lookup(&name).unwrap_or_default());
        }
    }

    out
}

/// Case-insensitive file name / path comparison
pub fn names_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Check if a path exists and is a directory
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Check whether `chosen` matches any of the banned directories
///
/// Banned entries are env-expanded before comparison; empty entries never
/// match.
pub fn is_banned_directory(chosen: &str, banned: &[&str]) -> bool {
    banned
        .iter()
        .map(|b| expand_env(b))
        .filter(|b| !b.is_empty())
        .any(|b| names_equal(chosen, &b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "USERPROFILE" => Some("C:\\Users\\exile".to_string()),
            "X" => Some("x".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_plain_path_unchanged() {
        assert_eq!(expand_with("/home/exile/poe", lookup), "/home/exile/poe");
    }

    #[test]
    fn test_expand_bare_and_braced() {
        assert_eq!(
            expand_with("$USERPROFILE\\Documents", lookup),
            "C:\\Users\\exile\\Documents"
        );
        assert_eq!(expand_with("${X}y", lookup), "xy");
        assert_eq!(expand_with("$Xy", lookup), "");
    }

    #[test]
    fn test_expand_unknown_variable_is_empty() {
        assert_eq!(expand_with("/a/$NOPE/b", lookup), "/a//b");
    }

    #[test]
    fn test_expand_lone_dollar_kept() {
        assert_eq!(expand_with("cost$", lookup), "cost$");
        assert_eq!(expand_with("a $ b", lookup), "a $ b");
        assert_eq!(expand_with("${unterminated", lookup), "${unterminated");
    }

    #[test]
    fn test_names_equal_ignores_case() {
        assert!(names_equal("C:\\Downloads", "c:\\downloads"));
        assert!(!names_equal("/a", "/b"));
    }

    #[test]
    fn test_is_banned_directory() {
        assert!(is_banned_directory("/home/Exile/Downloads", &["/home/exile/downloads"]));
        assert!(!is_banned_directory("/home/exile/poe", &["/home/exile/downloads"]));
        assert!(!is_banned_directory("", &[""]));
    }

    #[test]
    fn test_dir_exists() {
        let dir = std::env::temp_dir();
        assert!(dir_exists(&dir));
        assert!(!dir_exists(&dir.join("filtersnatch-definitely-missing-dir")));
    }
}
