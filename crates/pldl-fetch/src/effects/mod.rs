//! I/O operations for fetching.
//!
//! The network sits behind [`HttpClient`] so the resume logic can be driven
//! by an in-memory client in tests.

mod http;
mod marker;
mod resumable;

pub use http::{BoxStream, HttpClient};
pub use resumable::ResumableFetcher;

#[cfg(feature = "reqwest")]
pub use http::{ClientSetting, ReqwestClient};
