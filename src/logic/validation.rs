//! Filename validation logic
//!
//! Pure classification of a typed filter name.

/// Validation state of the typed-name input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Unset,   // Nothing typed (empty after trim)
    Pending, // Edited since the last validation
    Valid,
    Invalid,
}

impl ValidationState {
    pub fn as_str(&self) -> &str {
        match self {
            ValidationState::Unset => "unset",
            ValidationState::Pending => "pending",
            ValidationState::Valid => "valid",
            ValidationState::Invalid => "invalid",
        }
    }
}

const MAX_FILENAME_LEN: usize = 255;

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_DEVICE_NAMES: &[&str] = &["con", "prn", "aux", "nul"];

/// Check whether a name is safe to use as a file name on every platform
///
/// Rejects empty names, names over 255 bytes, path separators and other
/// reserved characters, control characters, `.`/`..` and Windows device
/// names (CON, PRN, AUX, NUL, COM0-9, LPT0-9).
///
/// # Examples
/// ```
/// use filtersnatch::logic::validation::is_valid_filename;
///
/// assert!(is_valid_filename("neversink-strict"));
/// assert!(!is_valid_filename("a/b"));
/// assert!(!is_valid_filename("nul"));
/// ```
pub fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_FILENAME_LEN {
        return false;
    }

    if name
        .chars()
        .any(|c| RESERVED_CHARS.contains(&c) || (c as u32) < 0x20)
    {
        return false;
    }

    if name == "." || name == ".." {
        return false;
    }

    !is_reserved_device_name(name)
}

fn is_reserved_device_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if RESERVED_DEVICE_NAMES.contains(&lower.as_str()) {
        return true;
    }

    let bytes = lower.as_bytes();
    bytes.len() == 4
        && (lower.starts_with("com") || lower.starts_with("lpt"))
        && bytes[3].is_ascii_digit()
}

/// Classify a raw typed value (the terminal states of the input machine)
///
/// `Pending` is never returned here; it only exists between a keystroke and
/// the next validation.
pub fn classify(raw: &str) -> ValidationState {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ValidationState::Unset
    } else if is_valid_filename(trimmed) {
        ValidationState::Valid
    } else {
        ValidationState::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_empty_and_whitespace_is_unset() {
        assert_eq!(classify(""), ValidationState::Unset);
        assert_eq!(classify("   "), ValidationState::Unset);
        assert_eq!(classify("\t \t"), ValidationState::Unset);
    }

    #[test]
    fn test_classify_plain_names_are_valid() {
        assert_eq!(classify("myfilter"), ValidationState::Valid);
        assert_eq!(classify("  padded  "), ValidationState::Valid);
        assert_eq!(classify("NeverSink's 3.24 [strict]"), ValidationState::Valid);
        assert_eq!(classify("comet"), ValidationState::Valid);
        assert_eq!(classify("com10"), ValidationState::Valid);
    }

    #[test]
    fn test_classify_path_separators_are_invalid() {
        assert_eq!(classify("a/b"), ValidationState::Invalid);
        assert_eq!(classify("a\\b"), ValidationState::Invalid);
    }

    #[test]
    fn test_classify_reserved_characters_are_invalid() {
        for name in ["a<b", "a>b", "c:d", "q\"", "x|y", "why?", "star*"] {
            assert_eq!(classify(name), ValidationState::Invalid, "{}", name);
        }
    }

    #[test]
    fn test_classify_control_characters_are_invalid() {
        assert_eq!(classify("bad\u{0}name"), ValidationState::Invalid);
        assert_eq!(classify("bad\u{1b}name"), ValidationState::Invalid);
    }

    #[test]
    fn test_classify_dot_names_are_invalid() {
        assert_eq!(classify("."), ValidationState::Invalid);
        assert_eq!(classify(" .. "), ValidationState::Invalid);
        assert_eq!(classify("..."), ValidationState::Valid);
    }

    #[test]
    fn test_classify_device_names_are_invalid() {
        for name in ["CON", "prn", "Aux", "nul", "COM1", "lpt9", "com0"] {
            assert_eq!(classify(name), ValidationState::Invalid, "{}", name);
        }
    }

    #[test]
    fn test_classify_length_limit() {
        let ok = "a".repeat(255);
        let too_long = "a".repeat(256);
        assert_eq!(classify(&ok), ValidationState::Valid);
        assert_eq!(classify(&too_long), ValidationState::Invalid);
    }

    #[test]
    fn test_validation_state_labels() {
        assert_eq!(ValidationState::Pending.as_str(), "pending");
        assert_eq!(ValidationState::Invalid.as_str(), "invalid");
    }
}
