//! Mission catalog entry types.

use crate::params::Tier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a mission in the static catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionId(String);

impl MissionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A static catalog entry describing a findable target.
///
/// Missions are immutable: the catalog is loaded read-only at startup and
/// never mutated by the bounty pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub tier: Tier,
    /// Human-readable description of the target ("a red fire hydrant").
    pub description: String,
    /// Keywords the adjudicator matches detected objects against.
    pub keywords: Vec<String>,
    /// Relative difficulty within the tier, 1 (easiest) to 5 (hardest).
    pub difficulty: u8,
}
