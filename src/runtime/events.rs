//! Display updates emitted by the station runtime.

use crate::{
    server::CallSearchReply,
    types::{DupeStatus, FieldId, RequestKind},
};

/// Events a renderer applies to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Dupe indicator changed.
    DupeIndicator {
        /// New indicator state.
        status: DupeStatus,
    },
    /// An input value was set by the controller.
    FieldValue {
        /// Target input.
        field: FieldId,
        /// New value.
        value: String,
    },
    /// Call sign and every exchange input were cleared.
    EntryCleared,
    /// Sequence label changed.
    SequenceLabel {
        /// Rendered label, e.g. `"Sequence: 8"`.
        label: String,
    },
    /// Focus should move to `field`.
    Focus {
        /// Input to focus.
        field: FieldId,
    },
    /// Server message for the operator.
    Message {
        /// Message text.
        text: String,
    },
    /// A request or journal write failed; entry state is untouched.
    RequestFailed {
        /// Failed operation.
        kind: RequestKind,
        /// Human-readable cause.
        detail: String,
    },
    /// Operating band refreshed by the poller.
    Band {
        /// Band name, e.g. `"20m"`.
        band: String,
        /// Mode name when the server reports it.
        mode: String,
    },
    /// Defaults page: these labels are now visible, in order.
    FieldLabels {
        /// Visible labels.
        labels: Vec<String>,
    },
    /// Defaults page: label/count mismatch text; empty clears it.
    LabelMismatch {
        /// Message text.
        text: String,
    },
    /// Log page: call-sign search result.
    CallSearch {
        /// Lookup details.
        reply: CallSearchReply,
    },
    /// Log page: name and country pre-fill.
    Connection {
        /// Operator name.
        name: String,
        /// Operator country.
        country: String,
    },
}
