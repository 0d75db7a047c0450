//! Storage path sanitization for user identifiers

/// Characters that are illegal or special in a remote store path segment
pub const PATH_SPECIAL_CHARS: [char; 5] = ['.', '#', '$', '[', ']'];

/// Replacement used for every path-special character
pub const REPLACEMENT_CHAR: char = '_';

/// Map an email address to a value usable as a storage path segment.
///
/// Each of `.`, `#`, `$`, `[` and `]` becomes `_`; everything else is kept.
///
/// ```
/// use notebook::sanitize::sanitize_email;
///
/// assert_eq!(sanitize_email("ada.lovelace@example.com"), "ada_lovelace@example_com");
/// ```
pub fn sanitize_email(email: &str) -> String {
    email
        .chars()
        .map(|c| {
            if PATH_SPECIAL_CHARS.contains(&c) {
                REPLACEMENT_CHAR
            } else {
                c
            }
        })
        .collect()
}

/// Whether a value can be used verbatim as a single path segment
pub fn is_path_safe(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.chars().any(|c| {
            PATH_SPECIAL_CHARS.contains(&c) || c == '/' || c.is_whitespace() || c.is_control()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_all_special_chars() {
        assert_eq!(sanitize_email("a.b#c$d[e]f"), "a_b_c_d_e_f");
    }

    #[test]
    fn test_sanitize_keeps_plain_characters() {
        assert_eq!(sanitize_email("user+tag@host"), "user+tag@host");
        assert_eq!(sanitize_email(""), "");
    }

    #[test]
    fn test_sanitize_multibyte() {
        assert_eq!(sanitize_email("josé.ñ@exámple.com"), "josé_ñ@exámple_com");
    }

    #[test]
    fn test_is_path_safe() {
        assert!(is_path_safe("-NzA1b2C3d4"));
        assert!(is_path_safe("01hx3k9v6w"));
        assert!(!is_path_safe(""));
        assert!(!is_path_safe("a.b"));
        assert!(!is_path_safe("a/b"));
        assert!(!is_path_safe("a b"));
        assert!(!is_path_safe("[0]"));
    }
}
