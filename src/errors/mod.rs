//! # Error Handling
//!
//! Error types shared by the model layer, the backend clients and the snapshot
//! exporter. Errors coming back from the gateway or the dashboard are kept flat:
//! not found, any other non-2xx status, and transport/decode failures.

pub mod types;

pub use types::{ignore_not_found, OperatorError, Result};
