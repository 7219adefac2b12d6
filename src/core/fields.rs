//! Exchange field layout, auto-fill and submit-key detection.

use serde::{Deserialize, Serialize};

use crate::{
    core::session::EntrySession,
    types::{
        DEFAULT_SIGNAL_REPORT, FieldId, KeyCode, MAX_EXCHANGE_FIELDS, MIN_EXCHANGE_FIELDS,
        SIGNAL_REPORT_PREFIX,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    FieldCount(usize),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::FieldCount(n) => write!(
                f,
                "{n} exchange fields configured, expected {MIN_EXCHANGE_FIELDS}..={MAX_EXCHANGE_FIELDS}"
            ),
        }
    }
}

/// Exchange format of the contest entry page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryLayout {
    /// Generic fields `Field1..FieldN` with operator-defined labels.
    FreeField {
        /// One label per visible field.
        labels: Vec<String>,
    },
    /// Signal report plus a single exchange field.
    Fixed,
}

impl Default for EntryLayout {
    fn default() -> Self {
        Self::FreeField {
            labels: vec!["RST".to_string(), "NR".to_string()],
        }
    }
}

impl EntryLayout {
    pub fn free_field<I, S>(labels: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layout = Self::FreeField {
            labels: labels.into_iter().map(Into::into).collect(),
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            EntryLayout::FreeField { labels }
                if !(MIN_EXCHANGE_FIELDS..=MAX_EXCHANGE_FIELDS).contains(&labels.len()) =>
            {
                Err(LayoutError::FieldCount(labels.len()))
            }
            _ => Ok(()),
        }
    }

    pub fn field_count(&self) -> usize {
        match self {
            EntryLayout::FreeField { labels } => labels.len(),
            EntryLayout::Fixed => 2,
        }
    }

    /// Input ids in tab order, excluding the call sign.
    pub fn fields(&self) -> Vec<FieldId> {
        (0..self.field_count()).filter_map(|i| self.field_at(i)).collect()
    }

    pub fn field_at(&self, idx: usize) -> Option<FieldId> {
        match self {
            EntryLayout::FreeField { labels } => {
                (idx < labels.len()).then(|| FieldId::Field(idx as u8 + 1))
            }
            EntryLayout::Fixed => match idx {
                0 => Some(FieldId::Rst),
                1 => Some(FieldId::Exchange),
                _ => None,
            },
        }
    }

    /// Position of `field` in the session's exchange values.
    pub fn index_of(&self, field: FieldId) -> Option<usize> {
        match (self, field) {
            (EntryLayout::FreeField { labels }, FieldId::Field(n)) => {
                let idx = usize::from(n).checked_sub(1)?;
                (idx < labels.len()).then_some(idx)
            }
            (EntryLayout::Fixed, FieldId::Rst) => Some(0),
            (EntryLayout::Fixed, FieldId::Exchange) => Some(1),
            _ => None,
        }
    }

    /// Input whose Enter key submits the contact.
    pub fn submit_field(&self) -> FieldId {
        match self {
            EntryLayout::FreeField { labels } => FieldId::Field(labels.len() as u8),
            EntryLayout::Fixed => FieldId::Exchange,
        }
    }

    pub fn is_submit_key(&self, field: FieldId, key: KeyCode) -> bool {
        key.is_enter() && field == self.submit_field()
    }

    pub fn label(&self, idx: usize) -> Option<&str> {
        match self {
            EntryLayout::FreeField { labels } => labels.get(idx).map(String::as_str),
            EntryLayout::Fixed => None,
        }
    }

    /// Applies signal-report auto-fill for a focus-in on `field`.
    ///
    /// Fires at most once per field between resets and only in free-field mode.
    pub fn autofill_on_focus(&self, session: &mut EntrySession, field: FieldId) -> Option<usize> {
        let idx = self.index_of(field)?;
        let label = self.label(idx)?;
        if !label.starts_with(SIGNAL_REPORT_PREFIX) {
            return None;
        }
        if !session.take_autofill_mark(idx) {
            return None;
        }
        session.set_field(idx, DEFAULT_SIGNAL_REPORT);
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_field_counts() {
        assert_eq!(
            EntryLayout::free_field(["RST"]),
            Err(LayoutError::FieldCount(1))
        );
        assert!(EntryLayout::free_field(["a", "b", "c", "d", "e", "f"]).is_err());
        assert!(EntryLayout::free_field(["RST", "NR", "ST", "CK", "SEC"]).is_ok());
    }

    #[test]
    fn submit_field_is_last_free_field() {
        let layout = EntryLayout::free_field(["RST", "NR", "ST"]).expect("layout");
        assert_eq!(layout.submit_field(), FieldId::Field(3));
        assert!(layout.is_submit_key(FieldId::Field(3), KeyCode::ENTER));
        assert!(!layout.is_submit_key(FieldId::Field(2), KeyCode::ENTER));
        assert!(!layout.is_submit_key(FieldId::Field(3), KeyCode(65)));
    }

    #[test]
    fn fixed_layout_submits_from_exchange() {
        let layout = EntryLayout::Fixed;
        assert_eq!(layout.fields(), vec![FieldId::Rst, FieldId::Exchange]);
        assert!(layout.is_submit_key(FieldId::Exchange, KeyCode::ENTER));
        assert!(!layout.is_submit_key(FieldId::Rst, KeyCode::ENTER));
    }

    #[test]
    fn autofill_only_for_rs_labels_and_only_once() {
        let layout = EntryLayout::free_field(["RST", "NR"]).expect("layout");
        let mut s = EntrySession::new(2, 1);

        assert_eq!(layout.autofill_on_focus(&mut s, FieldId::Field(2)), None);
        assert_eq!(layout.autofill_on_focus(&mut s, FieldId::Field(1)), Some(0));
        assert_eq!(s.field(0), Some("599"));

        s.set_field(0, "579");
        assert_eq!(layout.autofill_on_focus(&mut s, FieldId::Field(1)), None);
        assert_eq!(s.field(0), Some("579"));
    }

    #[test]
    fn fixed_layout_never_autofills() {
        let layout = EntryLayout::Fixed;
        let mut s = EntrySession::new(2, 1);
        assert_eq!(layout.autofill_on_focus(&mut s, FieldId::Rst), None);
        assert_eq!(s.field(0), Some(""));
    }
}
