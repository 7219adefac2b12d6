//! Single-writer async runtime and event stream APIs.

/// Band status poller.
pub mod band;
/// Event stream types emitted by the runtime.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
