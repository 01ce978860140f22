//! Boundary detection for inline markup.
//!
//! A marker may only open after a boundary and only close before one, which
//! lets `*word*` toggle while `a*b*c` stays literal.

/// Punctuation that counts as a boundary, in addition to whitespace.
const SEPARATORS: &[char] = &[
    '-', '–', '—', '!', '$', '%', '^', '&', '*', '(', ')', '_', '+', '|', '~', '=', '`', '{', '}',
    '[', ']', ':', '/', '\\', '"', '\'', '“', '”', '‘', '’', ';', '<', '>', '?', ',', '.', '@', '#',
];

/// Returns true if `c` is a valid marker boundary.
///
/// `None` stands for the start or the end of a segment, which always counts.
///
/// # Examples
///
/// ```
/// # use lifecycle_logger::separator::is_boundary;
/// assert!(is_boundary(None));
/// assert!(is_boundary(Some(' ')));
/// assert!(is_boundary(Some('.')));
/// assert!(!is_boundary(Some('a')));
/// ```
#[inline]
pub fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || SEPARATORS.contains(&c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_boundary() {
        for c in [' ', '\n', '\t', '\r', '\u{a0}'] {
            assert!(is_boundary(Some(c)), "{:?} should be a boundary", c);
        }
    }

    #[test]
    fn test_quotes_are_boundaries() {
        for c in ['"', '\'', '“', '”', '‘', '’'] {
            assert!(is_boundary(Some(c)));
        }
    }

    #[test]
    fn test_word_characters_are_not() {
        for c in ['a', 'Z', '0', 'é', '中'] {
            assert!(!is_boundary(Some(c)));
        }
    }
}
