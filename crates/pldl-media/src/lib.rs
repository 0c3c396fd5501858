//! Media-side collaborators of a playlist download.
//!
//! - [`model`] - Video and stream descriptors
//! - [`resolver`] - Turning playlist/video URLs into descriptors
//! - [`quality`] - Picking one resolution for the whole run

pub mod model;
pub mod quality;
pub mod resolver;

mod error;

pub use error::{ResolveError, SelectError};
pub use model::{StreamDescriptor, VideoDescriptor};
pub use quality::{Prompt, QualitySelector, available_qualities, select_stream};
pub use resolver::{Resolver, YtDlpResolver};
