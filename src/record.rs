//! Immutable snapshots sent to the logging server.

use serde::{Deserialize, Serialize};

use crate::types::{FunctionKey, KeyCode, MAX_EXCHANGE_FIELDS, Sequence};

/// Contact snapshot taken when the operator presses Enter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogRecord {
    /// Generic exchange with up to five fields.
    FreeField(FreeFieldRecord),
    /// Signal report plus a single exchange.
    Fixed(FixedRecord),
}

impl LogRecord {
    /// Call sign carried by the record.
    pub fn call(&self) -> &str {
        match self {
            LogRecord::FreeField(r) => &r.call,
            LogRecord::Fixed(r) => &r.call,
        }
    }

    /// Sequence carried on the wire, if the format has one.
    pub fn seq(&self) -> Option<Sequence> {
        match self {
            LogRecord::FreeField(r) => Some(r.seq),
            LogRecord::Fixed(_) => None,
        }
    }
}

/// Free-field record: `{Call, Seq, Field1..Field5}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "FreeFieldWire", try_from = "FreeFieldWire")]
pub struct FreeFieldRecord {
    /// Logged call sign.
    pub call: String,
    /// Sequence number of this contact.
    pub seq: Sequence,
    /// Exchange field values; missing trailing fields are sent empty.
    pub fields: Vec<String>,
}

impl FreeFieldRecord {
    /// Builds a record in wire-canonical form.
    ///
    /// The wire always carries five slots, so trailing empty fields are not
    /// kept: a record built here decodes back equal to itself.
    pub fn new(call: impl Into<String>, seq: Sequence, fields: &[String]) -> Self {
        Self {
            call: call.into(),
            seq,
            fields: canonical_fields(fields),
        }
    }
}

/// Fixed record: `{Call, RST, Exchange}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRecord {
    /// Logged call sign.
    #[serde(rename = "Call")]
    pub call: String,
    /// Received signal report.
    #[serde(rename = "RST")]
    pub rst: String,
    /// Received exchange.
    #[serde(rename = "Exchange")]
    pub exchange: String,
}

/// Function-key press packaged with the current entry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "KeyerWire", try_from = "KeyerWire")]
pub struct KeyerEvent {
    /// Call sign currently typed.
    pub call: String,
    /// Exchange field values currently typed.
    pub fields: Vec<String>,
    /// Current sequence, not incremented.
    pub seq: Sequence,
    /// Pressed function key.
    pub key: FunctionKey,
}

impl KeyerEvent {
    /// Builds an event in wire-canonical form, like [`FreeFieldRecord::new`].
    pub fn new(
        call: impl Into<String>,
        fields: &[String],
        seq: Sequence,
        key: FunctionKey,
    ) -> Self {
        Self {
            call: call.into(),
            fields: canonical_fields(fields),
            seq,
            key,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FreeFieldWire {
    call: String,
    seq: String,
    #[serde(default)]
    field1: String,
    #[serde(default)]
    field2: String,
    #[serde(default)]
    field3: String,
    #[serde(default)]
    field4: String,
    #[serde(default)]
    field5: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyerWire {
    call: String,
    #[serde(default)]
    field1: String,
    #[serde(default)]
    field2: String,
    #[serde(default)]
    field3: String,
    #[serde(default)]
    field4: String,
    #[serde(default)]
    field5: String,
    seq: String,
    key: u16,
}

fn spread_fields(fields: &[String]) -> [String; MAX_EXCHANGE_FIELDS] {
    let mut out: [String; MAX_EXCHANGE_FIELDS] = Default::default();
    for (slot, value) in out.iter_mut().zip(fields) {
        slot.clone_from(value);
    }
    out
}

fn collect_fields(fields: [String; MAX_EXCHANGE_FIELDS]) -> Vec<String> {
    canonical_fields(&fields)
}

fn canonical_fields(fields: &[String]) -> Vec<String> {
    let fields = &fields[..fields.len().min(MAX_EXCHANGE_FIELDS)];
    let used = fields.iter().rposition(|f| !f.is_empty()).map_or(0, |i| i + 1);
    fields[..used].to_vec()
}

fn parse_seq(raw: &str) -> Result<Sequence, String> {
    raw.trim()
        .parse::<Sequence>()
        .map_err(|e| format!("bad Seq {raw:?}: {e}"))
}

impl From<FreeFieldRecord> for FreeFieldWire {
    fn from(value: FreeFieldRecord) -> Self {
        let [field1, field2, field3, field4, field5] = spread_fields(&value.fields);
        Self {
            call: value.call,
            seq: value.seq.to_string(),
            field1,
            field2,
            field3,
            field4,
            field5,
        }
    }
}

impl TryFrom<FreeFieldWire> for FreeFieldRecord {
    type Error = String;

    fn try_from(value: FreeFieldWire) -> Result<Self, Self::Error> {
        Ok(Self {
            seq: parse_seq(&value.seq)?,
            call: value.call,
            fields: collect_fields([
                value.field1,
                value.field2,
                value.field3,
                value.field4,
                value.field5,
            ]),
        })
    }
}

impl From<KeyerEvent> for KeyerWire {
    fn from(value: KeyerEvent) -> Self {
        let [field1, field2, field3, field4, field5] = spread_fields(&value.fields);
        Self {
            call: value.call,
            field1,
            field2,
            field3,
            field4,
            field5,
            seq: value.seq.to_string(),
            key: value.key.code().0,
        }
    }
}

impl TryFrom<KeyerWire> for KeyerEvent {
    type Error = String;

    fn try_from(value: KeyerWire) -> Result<Self, Self::Error> {
        let key = FunctionKey::from_code(KeyCode(value.key))
            .ok_or_else(|| format!("key code {} is not a function key", value.key))?;
        Ok(Self {
            seq: parse_seq(&value.seq)?,
            call: value.call,
            fields: collect_fields([
                value.field1,
                value.field2,
                value.field3,
                value.field4,
                value.field5,
            ]),
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_field_record_uses_pascal_case_and_string_seq() {
        let rec = LogRecord::FreeField(FreeFieldRecord {
            call: "W1AW".to_string(),
            seq: 7,
            fields: vec!["599".to_string(), "MA".to_string()],
        });
        let v = serde_json::to_value(&rec).expect("encode");
        assert_eq!(v["Call"], "W1AW");
        assert_eq!(v["Seq"], "7");
        assert_eq!(v["Field1"], "599");
        assert_eq!(v["Field2"], "MA");
        assert_eq!(v["Field5"], "");
    }

    #[test]
    fn fixed_record_has_no_seq() {
        let rec = LogRecord::Fixed(FixedRecord {
            call: "K1ABC".to_string(),
            rst: "579".to_string(),
            exchange: "CT".to_string(),
        });
        let v = serde_json::to_value(&rec).expect("encode");
        assert_eq!(v["RST"], "579");
        assert_eq!(v["Exchange"], "CT");
        assert!(v.get("Seq").is_none());
        assert_eq!(rec.seq(), None);
    }

    #[test]
    fn keyer_event_sends_numeric_key() {
        let ev = KeyerEvent {
            call: "N0CALL".to_string(),
            fields: vec![],
            seq: 12,
            key: FunctionKey::F3,
        };
        let v = serde_json::to_value(&ev).expect("encode");
        assert_eq!(v["Key"], 114);
        assert_eq!(v["Seq"], "12");
    }

    #[test]
    fn built_record_with_empty_trailing_field_decodes_equal() {
        let rec = LogRecord::FreeField(FreeFieldRecord::new(
            "K1ABC",
            3,
            &["599".to_string(), String::new()],
        ));
        let back: LogRecord =
            serde_json::from_str(&serde_json::to_string(&rec).expect("encode")).expect("decode");
        assert_eq!(back, rec);
        assert_eq!(
            back,
            LogRecord::FreeField(FreeFieldRecord {
                call: "K1ABC".to_string(),
                seq: 3,
                fields: vec!["599".to_string()],
            })
        );
    }

    #[test]
    fn canonical_fields_keep_inner_blanks() {
        let fields = ["".to_string(), "MA".to_string(), "".to_string()];
        assert_eq!(canonical_fields(&fields), vec!["", "MA"]);
        assert!(canonical_fields(&[String::new(), String::new()]).is_empty());
    }

    #[test]
    fn keyer_wire_rejects_non_function_key() {
        let raw = r#"{"Call":"K1ABC","Seq":"1","Key":13}"#;
        assert!(serde_json::from_str::<KeyerEvent>(raw).is_err());
    }
}
