//! Call-sign character-class validation.

use crate::types::DupeStatus;

/// Minimum call-sign length before a duplicate lookup is issued.
pub const MIN_LOOKUP_LEN: usize = 3;

/// Classification of in-progress call-sign text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSignVerdict {
    /// True when any character is outside `[A-Za-z0-9_]`.
    pub illegal: bool,
    /// True when a duplicate lookup should be issued for this text.
    pub lookup: bool,
}

impl CallSignVerdict {
    /// Status to display immediately, before any lookup answers.
    pub fn status(&self) -> DupeStatus {
        if self.illegal {
            DupeStatus::InvalidInput
        } else {
            DupeStatus::Unknown
        }
    }
}

/// Returns true for a word character: ASCII letter, digit or underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Classifies the call-sign text after a keystroke.
pub fn classify(text: &str) -> CallSignVerdict {
    let illegal = !text.chars().all(is_word_char);
    let lookup = !illegal
        && text.chars().count() >= MIN_LOOKUP_LEN
        && text.chars().last().is_some_and(is_word_char);
    CallSignVerdict { illegal, lookup }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_legal_but_not_looked_up() {
        let v = classify("W1");
        assert!(!v.illegal);
        assert!(!v.lookup);
        assert_eq!(v.status(), DupeStatus::Unknown);
    }

    #[test]
    fn empty_text_is_legal() {
        assert_eq!(
            classify(""),
            CallSignVerdict {
                illegal: false,
                lookup: false
            }
        );
    }

    #[test]
    fn slash_marks_whole_field_invalid() {
        let v = classify("W1AW/P");
        assert!(v.illegal);
        assert!(!v.lookup);
        assert_eq!(v.status(), DupeStatus::InvalidInput);
    }

    #[test]
    fn underscore_and_digits_are_word_chars() {
        assert!(classify("K_9").lookup);
    }

    #[test]
    fn non_ascii_letters_are_illegal() {
        assert!(classify("DL1Ä").illegal);
    }
}
