//! Page controllers and the entry session they own.

/// Contest entry controller and page routing.
pub mod controller;
/// Controller inputs, requests, replies and effects.
pub mod effect;
/// Exchange field layout and auto-fill.
pub mod fields;
/// Per-operation request generations.
pub mod generations;
/// Log page call-sign lookups.
pub mod lookup;
/// Entry session state.
pub mod session;
/// Call-sign validation.
pub mod validator;
