//! Error types for the publish pipeline.
//!
//! Two failure kinds matter to the engine: a step definition that cannot be
//! loaded ([`LoadError`]) and a step whose `process` call fails
//! ([`StepError`]). Both surface to the host wrapped in [`PublishError`].

use crate::core::Phase;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for publish pipeline operations.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The package root does not exist or is not a directory.
    #[error("Package not found: {}", .0.display())]
    PackageNotFound(PathBuf),

    /// A step definition failed to load.
    #[error("{0}")]
    Load(#[from] LoadError),

    /// Two definitions with the same name were found in one phase.
    #[error("Duplicate step definition '{definition}' in phase '{phase}'")]
    DuplicateStep {
        /// The phase holding the duplicate.
        phase: Phase,
        /// The duplicated definition name.
        definition: String,
    },

    /// A step signalled a failure while processing the context.
    #[error("Step '{label}' ({phase}/{definition}) failed: {source}")]
    Step {
        /// The phase the step ran in.
        phase: Phase,
        /// The definition that exposed the step.
        definition: String,
        /// The step label.
        label: String,
        /// The failure reported by the step.
        #[source]
        source: StepError,
    },

    /// The run already reached a terminal state.
    #[error("Pipeline run {run_id} already finished")]
    RunFinished {
        /// The finished run.
        run_id: Uuid,
    },

    /// Configuration could not be read or applied.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// Creates a step failure error.
    #[must_use]
    pub fn step(
        phase: Phase,
        definition: impl Into<String>,
        label: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::Step {
            phase,
            definition: definition.into(),
            label: label.into(),
            source,
        }
    }

    /// Returns the message of the failing step, exactly as it reported it.
    #[must_use]
    pub fn step_message(&self) -> Option<String> {
        match self {
            Self::Step { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    /// Returns the phase the error occurred in, when known.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Step { phase, .. } | Self::DuplicateStep { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Returns true if this is a step failure rather than a loading problem.
    #[must_use]
    pub fn is_step_failure(&self) -> bool {
        matches!(self, Self::Step { .. })
    }
}

/// Errors raised while loading a step definition.
///
/// Any of these aborts discovery: a broken definition means a corrupt or
/// incompatible installation, not an empty phase.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The definition file or phase directory could not be read.
    #[error("Failed to read step definition {}: {source}", path.display())]
    Read {
        /// The unreadable path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The definition file is not valid TOML or has the wrong shape.
    #[error("Malformed step definition {}: {source}", path.display())]
    Malformed {
        /// The definition file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The definition exposes more than one step candidate.
    #[error("Step definition {} exposes more than one step", path.display())]
    Ambiguous {
        /// The definition file.
        path: PathBuf,
    },

    /// The definition names a step kind that no factory provides.
    #[error("Step definition {} references unknown step kind '{kind}'", path.display())]
    UnknownKind {
        /// The definition file.
        path: PathBuf,
        /// The requested kind.
        kind: String,
    },

    /// The step factory failed to build the step.
    #[error("Step definition {} failed to build '{kind}': {source}", path.display())]
    Build {
        /// The definition file.
        path: PathBuf,
        /// The requested kind.
        kind: String,
        /// The factory error.
        #[source]
        source: anyhow::Error,
    },
}

impl LoadError {
    /// Returns the path of the offending definition.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::Malformed { path, .. }
            | Self::Ambiguous { path }
            | Self::UnknownKind { path, .. }
            | Self::Build { path, .. } => path,
        }
    }
}

/// Failure reported by a step's `process` call.
///
/// The engine treats every variant identically; the split only helps step
/// authors produce an actionable message.
#[derive(Debug, Error)]
pub enum StepError {
    /// The context does not satisfy a precondition the step requires.
    #[error("{0}")]
    Rejected(String),

    /// Reading or writing inter-step data failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// IO error raised by the step body.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other runtime failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepError {
    /// Creates a rejection with a human-readable message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Errors raised by the context data bag.
#[derive(Debug, Error)]
pub enum DataError {
    /// The requested key is absent.
    #[error("Missing context data '{key}'")]
    Missing {
        /// The missing key.
        key: String,
    },

    /// Writing to a key that already holds a value.
    #[error("Data conflict: key '{key}' already exists")]
    Conflict {
        /// The conflicting key.
        key: String,
    },

    /// The stored value does not decode into the requested type.
    #[error("Context data '{key}' has an unexpected shape: {source}")]
    Decode {
        /// The key being read.
        key: String,
        /// The decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when parsing an unrecognised phase name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown phase '{0}': expected one of collect, validate, extract, integrate")]
pub struct UnknownPhaseError(pub String);
