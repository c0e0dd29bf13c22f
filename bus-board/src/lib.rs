//! Curated bus departure board.
//!
//! Answers: "which buses can I catch from the stops near here, and how
//! long until I need to leave?"

pub mod config;
pub mod domain;
pub mod engine;
pub mod ingest;
pub mod source;
pub mod store;
pub mod tfe;
