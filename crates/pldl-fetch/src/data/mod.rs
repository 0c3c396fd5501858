//! Immutable data types for fetching operations.
//!
//! Options, progress events and the request/outcome pair passed between the
//! caller and [`crate::ResumableFetcher`].

pub mod options;
pub mod progress;
pub mod target;

pub use options::{DEFAULT_CHUNK_SIZE, FetchOptions, FetchPhase};
pub use progress::Progress;
pub use target::{FetchOutcome, FetchTarget};
