//! Timer control core
//!
//! The countdown engine owns the remaining-time state; the ingest filter
//! turns raw topic payloads into engine set-values.

pub mod countdown;
pub mod ingest;

// Re-export main types
pub use countdown::{format_hms, CountdownEngine, EngineEvent};
pub use ingest::{parse_duration, IngestFilter, ParseError, DEFAULT_REPEAT_WINDOW};
