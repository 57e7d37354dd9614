//! Pipeline phases.

use crate::errors::UnknownPhaseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed pipeline phases.
///
/// A step's role (collector, validator, extractor, integrator) is nothing
/// more than the phase it was registered or discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Gather the inputs of the publish.
    Collect,
    /// Veto the publish if the context is not acceptable.
    Validate,
    /// Produce output artifacts.
    Extract,
    /// Hand the artifacts over to their destination.
    Integrate,
}

impl Phase {
    /// The fixed execution sequence.
    pub const ALL: [Self; 4] = [Self::Collect, Self::Validate, Self::Extract, Self::Integrate];

    /// Returns the phase tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Validate => "validate",
            Self::Extract => "extract",
            Self::Integrate => "integrate",
        }
    }

    /// Returns the name of the hook directory holding this phase's definitions.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Collect => "collectors",
            Self::Validate => "validators",
            Self::Extract => "extractors",
            Self::Integrate => "integrators",
        }
    }

    /// Returns the role name given to steps of this phase.
    #[must_use]
    pub const fn role(self) -> &'static str {
        match self {
            Self::Collect => "Collector",
            Self::Validate => "Validator",
            Self::Extract => "Extractor",
            Self::Integrate => "Integrator",
        }
    }

    /// Returns the zero-based position of the phase in the run.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Phase {
    type Err = UnknownPhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.tag() == s || phase.dir_name() == s)
            .ok_or_else(|| UnknownPhaseError(s.to_string()))
    }
}
