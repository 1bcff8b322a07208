//! Character classification
//!
//! Pure predicates over a single code point. Identifier rules exclude the
//! control, format, surrogate and separator general categories, so those
//! lookups go through `unicode-general-category`.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Characters that end a text run in node context
pub const TEXT_DELIMITERS: [char; 5] = ['{', '}', '<', '|', '>'];

/// Characters never allowed anywhere in a simple identifier
const IDENTIFIER_EXCLUDED: [char; 14] = [
    ':', '{', '}', '(', ')', '<', '|', '>', '=', '"', '\'', ';', '$', '!',
];

/// Cc, Cf or Cs
pub fn is_control_like(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::Control | GeneralCategory::Format | GeneralCategory::Surrogate
    )
}

/// Zs, Zl or Zp
pub fn is_separator(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

/// Whitespace skipped between tokens inside tags and collections
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

pub fn is_identifier_start(ch: char) -> bool {
    ch != '.'
        && !IDENTIFIER_EXCLUDED.contains(&ch)
        && get_general_category(ch) != GeneralCategory::DecimalNumber
        && !is_control_like(ch)
        && !is_separator(ch)
}

pub fn is_identifier_continue(ch: char) -> bool {
    !IDENTIFIER_EXCLUDED.contains(&ch) && !is_control_like(ch) && !is_separator(ch)
}

pub fn is_text_delimiter(ch: char) -> bool {
    TEXT_DELIMITERS.contains(&ch)
}

/// Characters allowed in an IRI body
pub fn is_iri_char(ch: char) -> bool {
    ch != '<' && ch != '>' && !ch.is_whitespace() && !is_separator(ch)
}

/// ASCII digit of the given radix (2, 10 or 16); hex is case-insensitive
pub fn is_digit_in(ch: char, radix: u32) -> bool {
    ch.is_digit(radix)
}

/// Characters that may not directly follow `true`/`false`
pub fn continues_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_start() {
        for ch in ['a', 'Z', '_', '-', '+', '[', 'é', '名', '%', '@'] {
            assert!(is_identifier_start(ch), "{:?} should start", ch);
        }
        for ch in ['1', '.', ':', '{', '!', '"', '\'', ';', '$', ' ', '\u{200B}', '\u{7}'] {
            assert!(!is_identifier_start(ch), "{:?} should not start", ch);
        }
        // Arabic-indic digit is Nd too
        assert!(!is_identifier_start('٣'));
    }

    #[test]
    fn test_identifier_continue_allows_digits_and_dot() {
        assert!(is_identifier_continue('1'));
        assert!(is_identifier_continue('.'));
        assert!(is_identifier_continue(','));
        assert!(!is_identifier_continue(':'));
        assert!(!is_identifier_continue('='));
        assert!(!is_identifier_continue('\u{3000}'));
        assert!(!is_identifier_continue('\n'));
    }

    #[test]
    fn test_separators_and_iri_chars() {
        assert!(is_separator(' '));
        assert!(is_separator('\u{2028}'));
        assert!(!is_separator('\t'));
        assert!(is_iri_char(':'));
        assert!(is_iri_char('#'));
        assert!(!is_iri_char('>'));
        assert!(!is_iri_char('\t'));
    }

    #[test]
    fn test_digits() {
        assert!(is_digit_in('f', 16));
        assert!(is_digit_in('F', 16));
        assert!(!is_digit_in('2', 2));
        assert!(!is_digit_in('a', 10));
        assert!(is_text_delimiter('|'));
        assert!(!is_text_delimiter(';'));
    }
}
