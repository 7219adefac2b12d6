//! Keystroke-driven contest QSO entry with duplicate lookups, log submission
//! and keyer macros against a station logging server.
//!
//! # Examples
//!
//! Driving the contest controller directly:
//! ```
//! use qsoentry::{
//!     core::{
//!         controller::EntryController,
//!         effect::{Effect, InputEvent, Request},
//!         fields::EntryLayout,
//!     },
//!     types::{FieldId, KeyCode},
//! };
//!
//! let layout = EntryLayout::free_field(["RST", "NR"]).expect("layout");
//! let mut entry = EntryController::new(layout, "Sequence: 7").expect("controller");
//! let effects = entry.handle_input(InputEvent::KeyUp {
//!     field: Some(FieldId::CallSign),
//!     key: KeyCode(87),
//!     text: "W1AW".to_string(),
//! });
//! assert!(effects.iter().any(|e| matches!(
//!     e,
//!     Effect::Dispatch(Request::CheckDupe { call, .. }) if call == "W1AW"
//! )));
//! ```
//!
//! Runtime usage against the HTTP server with a SQLite journal:
//! ```no_run
//! use std::sync::Arc;
//!
//! use qsoentry::{
//!     config::StationConfig,
//!     runtime::handle::{open_journal, spawn_station},
//!     server::http::HttpLogServer,
//!     types::{FieldId, KeyCode},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cfg = StationConfig::load("station.json").expect("config");
//! let server = HttpLogServer::new(&cfg.base_url, cfg.request_timeout()).expect("client");
//! let journal = open_journal(&cfg).expect("open journal");
//! let handle = spawn_station(Arc::new(server), journal, cfg).expect("spawn");
//! let mut events = handle.subscribe();
//! handle.key_up(Some(FieldId::CallSign), KeyCode(87), "W1AW").await.expect("key");
//! let _ = events.recv().await;
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Station configuration and the field-label editor.
pub mod config;
/// Page controllers and entry state.
pub mod core;
/// Local submission journal.
pub mod journal;
/// Log and keyer wire records.
pub mod record;
/// Station runtime, events and band poller.
pub mod runtime;
/// Logging server contract and HTTP client.
pub mod server;
/// Shared primitive types and enums.
pub mod types;
