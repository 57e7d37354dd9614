//! Representation records for published artifacts.

use crate::utils::md5sum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One published output artifact.
///
/// Representations are appended to the context's
/// [`RepresentationLog`](crate::context::RepresentationLog) in the order they
/// are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    /// Role or tag of the artifact (e.g. "beauty").
    pub name: String,

    /// Filesystem location of the artifact.
    pub path: PathBuf,

    /// File extension, without the leading dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,

    /// Hex digest of the artifact content.
    #[serde(default, alias = "md5", skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Size of the artifact in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Representation {
    /// Creates a representation with only a name and a path.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ext: None,
            checksum: None,
            size: None,
        }
    }

    /// Describes an existing file: extension, MD5 checksum and size are read
    /// from disk.
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        let checksum = md5sum(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);

        Ok(Self {
            name: name.into(),
            path: path.to_path_buf(),
            ext,
            checksum: Some(checksum),
            size: Some(size),
        })
    }

    /// Sets the extension.
    #[must_use]
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    /// Sets the checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Sets the size in bytes.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}
