//! Resumable HTTP downloads with duplicate-skip detection and atomic placement.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Resume From Disk**: The `.temp` file length is the only resume state
//! - **Idempotent**: A finished artifact is never fetched again
//! - **Atomic Placement**: The staging file is renamed into place on success
//! - **Mechanism-Only**: No policy; caller handles progress UI and reporting

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use core::{ArtifactPaths, range_header, sanitize_filename};
pub use data::{FetchOptions, FetchOutcome, FetchPhase, FetchTarget, Progress};
pub use effects::{BoxStream, HttpClient, ResumableFetcher};

#[cfg(feature = "reqwest")]
pub use effects::{ClientSetting, ReqwestClient};

pub use error::{FetchError, Result};
