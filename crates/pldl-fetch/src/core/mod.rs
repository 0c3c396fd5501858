//! Pure transformations for resumable fetching.
//!
//! Nothing in here touches the network or the filesystem; the effects layer
//! feeds these helpers and acts on their results.

mod paths;
mod range;
mod sanitize;

pub use paths::ArtifactPaths;
pub use range::range_header;
pub use sanitize::sanitize_filename;
