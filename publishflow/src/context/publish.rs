//! The mutable publish context threaded through every step of a run.

use super::{DataBag, RepresentationLog};
use crate::core::Representation;
use crate::errors::PublishError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// State of one publish, mutated in place by every step of the run.
///
/// The host builds it once before the run; the run borrows it mutably and
/// hands a reborrow to each step in turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishContext {
    /// Project identifier.
    pub project: String,
    /// Sequence identifier.
    pub seq: String,
    /// Shot identifier.
    pub shot: String,
    /// Task name.
    pub task: String,
    /// Version number, starting at 1.
    pub version: u32,
    /// User identifier.
    pub user: String,
    /// Frame rate.
    pub fps: f64,
    /// Output resolution.
    pub resolution: Resolution,
    /// Free-form data for inter-step communication.
    #[serde(default)]
    pub data: DataBag,
    /// Artifacts produced so far.
    #[serde(default)]
    representations: RepresentationLog,
}

impl Default for PublishContext {
    fn default() -> Self {
        Self {
            project: "SHOW".to_string(),
            seq: "010".to_string(),
            shot: "020".to_string(),
            task: "comp".to_string(),
            version: 1,
            user: "artist".to_string(),
            fps: 24.0,
            resolution: Resolution::default(),
            data: DataBag::new(),
            representations: RepresentationLog::new(),
        }
    }
}

impl PublishContext {
    /// Creates a context for the given shot and task, other fields defaulted.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        seq: impl Into<String>,
        shot: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            seq: seq.into(),
            shot: shot.into(),
            task: task.into(),
            ..Self::default()
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Sets the user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the frame rate.
    #[must_use]
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Sets the resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: impl Into<Resolution>) -> Self {
        self.resolution = resolution.into();
        self
    }

    /// Seeds a data entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key, value);
        self
    }

    /// Loads a context from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PublishError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            PublishError::Config(format!("invalid context file {}: {e}", path.display()))
        })
    }

    /// Returns the artifacts produced so far, in production order.
    #[must_use]
    pub fn representations(&self) -> &RepresentationLog {
        &self.representations
    }

    /// Appends a produced artifact and returns its position.
    pub fn add_representation(&mut self, representation: Representation) -> usize {
        self.representations.push(representation)
    }

    /// Lists violations of the scalar field constraints.
    ///
    /// The engine never calls this; validator steps can use it to veto a
    /// publish.
    #[must_use]
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (field, value) in [
            ("project", &self.project),
            ("seq", &self.seq),
            ("shot", &self.shot),
            ("task", &self.task),
            ("user", &self.user),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{field} must not be empty"));
            }
        }
        if self.version == 0 {
            problems.push("version must be a positive integer".to_string());
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            problems.push(format!("Invalid frame rate: {}", self.fps));
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            problems.push(format!("Invalid resolution: {}", self.resolution));
        }

        problems
    }

    /// Short identifier of the publish, e.g. `SHOW_010_020_comp_v001`.
    #[must_use]
    pub fn publish_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_v{:03}",
            self.project, self.seq, self.shot, self.task, self.version
        )
    }
}
