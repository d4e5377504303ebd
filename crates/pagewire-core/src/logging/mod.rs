//! In-memory capture of the page log.
//!
//! ## Usage
//!
//! ```ignore
//! use pagewire_core::logging::{CaptureLayer, LogBuffer};
//! use tracing_subscriber::prelude::*;
//!
//! let buffer = LogBuffer::new();
//! let subscriber = tracing_subscriber::registry()
//!     .with(CaptureLayer::new(buffer.clone()))
//!     .with(tracing_subscriber::fmt::layer());
//! tracing::subscriber::set_global_default(subscriber)?;
//!
//! // ... attach a page, replay a scenario ...
//!
//! buffer.write_jsonl(std::fs::File::create("page.jsonl")?)?;
//! ```

pub mod entry;
pub mod layer;

pub use entry::LogEntry;
pub use layer::{CaptureLayer, LogBuffer};
