//! Entry session state and the sequence label.

use serde::{Deserialize, Serialize};

use crate::types::{DupeStatus, FieldId, Sequence};

/// Label prefix rendered before the sequence number.
pub const SEQUENCE_LABEL_PREFIX: &str = "Sequence:";

/// Mutable entry state for one page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySession {
    /// Call-sign input text.
    pub call_sign: String,
    /// Sequence number of the next contact.
    pub sequence: Sequence,
    /// Exchange input texts, one per configured field.
    pub exchange_fields: Vec<String>,
    /// Dupe indicator state.
    pub dupe_status: DupeStatus,
    /// Last server message shown to the operator.
    pub message: String,
    /// Input that currently holds focus.
    pub focus: Option<FieldId>,
    autofilled: Vec<bool>,
}

impl EntrySession {
    pub fn new(field_count: usize, sequence: Sequence) -> Self {
        Self {
            call_sign: String::new(),
            sequence,
            exchange_fields: vec![String::new(); field_count],
            dupe_status: DupeStatus::Unknown,
            message: String::new(),
            focus: Some(FieldId::CallSign),
            autofilled: vec![false; field_count],
        }
    }

    /// Seeds the sequence from a server-rendered label, falling back to zero.
    pub fn from_label(field_count: usize, label: &str) -> Self {
        let sequence = parse_sequence_label(label).unwrap_or_else(|| {
            tracing::warn!(label, "sequence label unreadable, starting at 0");
            0
        });
        Self::new(field_count, sequence)
    }

    pub fn sequence_label(&self) -> String {
        format_sequence_label(self.sequence)
    }

    /// Clears transient entry state and moves to the next sequence number.
    ///
    /// Returns the sequence that was current before the advance.
    pub fn reset_after_submit(&mut self) -> Sequence {
        let used = self.sequence;
        self.call_sign.clear();
        for f in &mut self.exchange_fields {
            f.clear();
        }
        self.autofilled.iter_mut().for_each(|m| *m = false);
        self.dupe_status = DupeStatus::Unknown;
        self.sequence = self.sequence.saturating_add(1);
        self.focus = Some(FieldId::CallSign);
        used
    }

    pub fn field(&self, idx: usize) -> Option<&str> {
        self.exchange_fields.get(idx).map(String::as_str)
    }

    /// Overwrites field `idx`; out-of-range indices are ignored.
    pub fn set_field(&mut self, idx: usize, text: impl Into<String>) {
        if let Some(slot) = self.exchange_fields.get_mut(idx) {
            *slot = text.into();
        }
    }

    pub(crate) fn take_autofill_mark(&mut self, idx: usize) -> bool {
        match self.autofilled.get_mut(idx) {
            Some(mark) if !*mark => {
                *mark = true;
                true
            }
            _ => false,
        }
    }
}

/// Reads the number from the second whitespace token, e.g. `"Sequence: 42"`.
pub fn parse_sequence_label(label: &str) -> Option<Sequence> {
    label.split_whitespace().nth(1)?.parse().ok()
}

pub fn format_sequence_label(seq: Sequence) -> String {
    format!("{SEQUENCE_LABEL_PREFIX} {seq}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_second_token() {
        assert_eq!(parse_sequence_label("Sequence: 42"), Some(42));
        assert_eq!(parse_sequence_label("  Sequence:   7 "), Some(7));
    }

    #[test]
    fn malformed_label_is_none() {
        assert_eq!(parse_sequence_label("Sequence:"), None);
        assert_eq!(parse_sequence_label("Sequence: x"), None);
        assert_eq!(parse_sequence_label(""), None);
    }

    #[test]
    fn malformed_label_seeds_zero() {
        let s = EntrySession::from_label(2, "Sequence: ?");
        assert_eq!(s.sequence, 0);
        assert_eq!(s.sequence_label(), "Sequence: 0");
    }

    #[test]
    fn reset_keeps_sequence_monotonic() {
        let mut s = EntrySession::new(3, 7);
        s.call_sign = "W1AW".into();
        s.set_field(0, "599");
        s.dupe_status = DupeStatus::Dupe;
        assert!(s.take_autofill_mark(0));

        assert_eq!(s.reset_after_submit(), 7);
        assert_eq!(s.sequence, 8);
        assert!(s.call_sign.is_empty());
        assert!(s.exchange_fields.iter().all(String::is_empty));
        assert_eq!(s.dupe_status, DupeStatus::Unknown);
        assert!(s.take_autofill_mark(0));
    }
}
