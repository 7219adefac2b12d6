//! Defaults page editor for contest field labels.

use crate::{
    core::effect::{Effect, InputEvent},
    runtime::events::UiEvent,
    types::{FieldId, MAX_EXCHANGE_FIELDS, MIN_EXCHANGE_FIELDS},
};

/// Fields beyond the selected count that always carry a label.
pub const EXTRA_LABELS: usize = 2;

/// Shown when the label list does not match the selected field count.
pub const MISMATCH_TEXT: &str = "number of fields and field labels don't match up, try again";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// Label tokens did not match the selected count.
    Mismatch { expected: Option<usize>, got: usize },
}

impl std::fmt::Display for LabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(MISMATCH_TEXT)
    }
}

/// Splits a comma-separated label list and checks it against a count selection.
///
/// A selection of `k` expects exactly `k + 2` labels, and `k + 2` must fit the
/// entry page's exchange fields. Labels are trimmed.
pub fn parse_labels(selection: &str, text: &str) -> Result<Vec<String>, LabelError> {
    let labels: Vec<String> = text.split(',').map(|l| l.trim().to_string()).collect();
    let expected = selection
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|k| k.checked_add(EXTRA_LABELS))
        .filter(|n| (MIN_EXCHANGE_FIELDS..=MAX_EXCHANGE_FIELDS).contains(n));
    if expected != Some(labels.len()) {
        return Err(LabelError::Mismatch {
            expected,
            got: labels.len(),
        });
    }
    Ok(labels)
}

/// Visible-field state of the defaults page.
#[derive(Debug, Clone, Default)]
pub struct FieldLabelEditor {
    selection: String,
    visible: Vec<String>,
    mismatch: String,
}

impl FieldLabelEditor {
    /// Starts with every field hidden.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn mismatch_text(&self) -> &str {
        &self.mismatch
    }

    pub fn select_count(&mut self, value: impl Into<String>) {
        self.selection = value.into();
    }

    /// Applies `text` as the label list. On mismatch visibility is left as is.
    pub fn apply(&mut self, text: &str) -> Result<&[String], LabelError> {
        match parse_labels(&self.selection, text) {
            Ok(labels) => {
                self.mismatch.clear();
                self.visible = labels;
                Ok(&self.visible)
            }
            Err(err) => {
                self.mismatch = err.to_string();
                Err(err)
            }
        }
    }

    pub fn handle_input(&mut self, input: InputEvent) -> Vec<Effect> {
        match input {
            InputEvent::Select {
                field: FieldId::FieldCount,
                value,
            } => {
                self.select_count(value);
                Vec::new()
            }
            InputEvent::KeyUp {
                field: Some(FieldId::FieldNames),
                key,
                text,
            } if key.is_enter() => match self.apply(&text) {
                Ok(labels) => vec![
                    Effect::Ui(UiEvent::LabelMismatch {
                        text: String::new(),
                    }),
                    Effect::Ui(UiEvent::FieldLabels {
                        labels: labels.to_vec(),
                    }),
                ],
                Err(err) => {
                    tracing::debug!(?err, "field labels rejected");
                    vec![Effect::Ui(UiEvent::LabelMismatch {
                        text: err.to_string(),
                    })]
                }
            },
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_trimmed() {
        assert_eq!(
            parse_labels("1", " Call , RST,NR ").expect("labels"),
            vec!["Call", "RST", "NR"]
        );
    }

    #[test]
    fn non_numeric_selection_is_mismatch() {
        assert!(parse_labels("", "a,b").is_err());
    }

    #[test]
    fn selection_beyond_five_fields_is_mismatch() {
        let mut e = FieldLabelEditor::new();
        e.select_count("3");
        e.apply("RST, NR, ST, ZN, PWR").expect("five fields");

        e.select_count("10");
        let err = e
            .apply("a,b,c,d,e,f,g,h,i,j,k,l")
            .expect_err("twelve labels");
        assert_eq!(
            err,
            LabelError::Mismatch {
                expected: None,
                got: 12
            }
        );
        assert_eq!(e.visible(), ["RST", "NR", "ST", "ZN", "PWR"]);
        assert_eq!(e.mismatch_text(), MISMATCH_TEXT);
    }

    #[test]
    fn mismatch_keeps_previous_visibility() {
        let mut e = FieldLabelEditor::new();
        e.select_count("0");
        e.apply("RST, NR").expect("apply");
        e.select_count("2");
        assert!(e.apply("RST, NR").is_err());
        assert_eq!(e.visible(), ["RST", "NR"]);
        assert_eq!(e.mismatch_text(), MISMATCH_TEXT);
    }
}
