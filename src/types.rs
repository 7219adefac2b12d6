//! Shared primitive IDs and entry-related enums.

use serde::{Deserialize, Serialize};

/// Contact sequence number shown as `"Sequence: N"`.
pub type Sequence = u64;
/// Monotonic request generation, one counter per [`RequestKind`].
pub type Generation = u64;

/// Sentinel label prefix that marks a signal-report field.
pub const SIGNAL_REPORT_PREFIX: &str = "RS";
/// Value written into a signal-report field on first focus.
pub const DEFAULT_SIGNAL_REPORT: &str = "599";
/// Maximum number of generic exchange fields.
pub const MAX_EXCHANGE_FIELDS: usize = 5;
/// Minimum number of generic exchange fields.
pub const MIN_EXCHANGE_FIELDS: usize = 2;

/// Input element on a station page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldId {
    /// Call-sign input.
    CallSign,
    /// Generic exchange field, numbered `1..=5`.
    Field(u8),
    /// Fixed-mode signal report input.
    Rst,
    /// Fixed-mode exchange input.
    Exchange,
    /// Defaults page comma-separated label input.
    FieldNames,
    /// Defaults page field-count selector.
    FieldCount,
}

/// Raw key code as delivered by the keyboard layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// The Enter key.
    pub const ENTER: KeyCode = KeyCode(13);

    /// Returns true for the Enter key.
    pub fn is_enter(self) -> bool {
        self == Self::ENTER
    }

    /// Maps a function-key code to its keyer macro slot.
    pub fn function_key(self) -> Option<FunctionKey> {
        FunctionKey::from_code(self)
    }
}

/// One of the ten function keys bound 1:1 to keyer macro slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKey {
    /// F1, code 112.
    F1,
    /// F2, code 113.
    F2,
    /// F3, code 114.
    F3,
    /// F4, code 115.
    F4,
    /// F5, code 116.
    F5,
    /// F6, code 117.
    F6,
    /// F7, code 118.
    F7,
    /// F8, code 119.
    F8,
    /// F9, code 120.
    F9,
    /// F10, code 121.
    F10,
}

impl FunctionKey {
    /// All keys in slot order.
    pub const ALL: [FunctionKey; 10] = [
        FunctionKey::F1,
        FunctionKey::F2,
        FunctionKey::F3,
        FunctionKey::F4,
        FunctionKey::F5,
        FunctionKey::F6,
        FunctionKey::F7,
        FunctionKey::F8,
        FunctionKey::F9,
        FunctionKey::F10,
    ];

    const FIRST_CODE: u16 = 112;

    /// Recognizes one of the ten function-key codes.
    pub fn from_code(code: KeyCode) -> Option<Self> {
        let idx = code.0.checked_sub(Self::FIRST_CODE)?;
        Self::ALL.get(usize::from(idx)).copied()
    }

    /// Key code sent on the wire.
    pub fn code(self) -> KeyCode {
        KeyCode(Self::FIRST_CODE + u16::from(self.slot()) - 1)
    }

    /// Keyer macro slot, `1..=10`.
    pub fn slot(self) -> u8 {
        match self {
            FunctionKey::F1 => 1,
            FunctionKey::F2 => 2,
            FunctionKey::F3 => 3,
            FunctionKey::F4 => 4,
            FunctionKey::F5 => 5,
            FunctionKey::F6 => 6,
            FunctionKey::F7 => 7,
            FunctionKey::F8 => 8,
            FunctionKey::F9 => 9,
            FunctionKey::F10 => 10,
        }
    }
}

/// Duplicate-check status shown next to the call sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DupeStatus {
    /// No answer for the current text.
    #[default]
    Unknown,
    /// Server reports the call sign as not yet logged.
    Clean,
    /// Server reports the call sign as already logged.
    Dupe,
    /// Call sign contains an illegal character.
    InvalidInput,
}

impl DupeStatus {
    /// Indicator text rendered next to the call sign.
    pub fn indicator(self) -> &'static str {
        match self {
            DupeStatus::Unknown | DupeStatus::Clean => "",
            DupeStatus::Dupe => "DUPE",
            DupeStatus::InvalidInput => "Error",
        }
    }
}

/// Which station page is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageMode {
    /// Live contest entry.
    #[default]
    Contest,
    /// Contest field-label editor.
    Defaults,
    /// General logbook with call-sign lookups.
    Log,
}

/// Logical network operation, each with its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// `/check-dupe`.
    DupeCheck,
    /// `/update-log`.
    Submission,
    /// `/update-key`.
    Keyer,
    /// `/update-band`.
    Band,
    /// `/callsearch`.
    CallSearch,
    /// `/getconn`.
    Connection,
    /// Local submission journal.
    Journal,
}
