//! Shared types for the last-known-status service.
//!
//! The engine, the HTTP server and the storage backends only meet here:
//! [`Record`] is what storage hands out, [`Event`] is what callers get back,
//! and [`RecordSource`] is the seam between the two.

pub mod error;
pub mod source;
pub mod types;
pub mod util;

pub use error::{SourceError, SourceErrorKind};
pub use source::RecordSource;
pub use types::{Event, Record};
pub use util::now_secs;
