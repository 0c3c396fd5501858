use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::sanitize::sanitize_filename;

const TEMP_SUFFIX: &str = ".temp";
const MARKER_SUFFIX: &str = ".pickle";

/// On-disk layout of a single download.
///
/// ```text
/// <dir>/<title>.<ext>               finished artifact
/// <dir>/<title>.<ext>.temp          byte prefix being appended to
/// <dir>/<title>.<ext>.temp.pickle   progress marker, written then removed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub final_path: PathBuf,
    pub temp_path: PathBuf,
    pub marker_path: PathBuf,
}

impl ArtifactPaths {
    /// Lay out the artifact for `title` inside `dir`.
    ///
    /// The title is sanitized here, so callers pass the raw video title.
    pub fn new(dir: &Path, title: &str, extension: &str) -> Self {
        let final_path = dir.join(format!("{}.{}", sanitize_filename(title), extension));
        let temp_path = with_suffix(&final_path, TEMP_SUFFIX);
        let marker_path = with_suffix(&temp_path, MARKER_SUFFIX);

        Self {
            final_path,
            temp_path,
            marker_path,
        }
    }
}

// `Path::with_extension` would replace ".mp4"; we append instead.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
