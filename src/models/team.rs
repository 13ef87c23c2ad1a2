//! Team data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and table rows).
pub type TeamId = Uuid;

/// Group label for group-stage competitions ('A', 'B', ...).
pub type GroupLabel = char;

/// A team in the competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// 1-100. Opaque to the scheduling engine; only the score simulator reads it.
    pub strength: u8,
    /// Assigned once by group composition, then immutable for the competition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupLabel>,
}

impl Team {
    /// Create a new team with no group label.
    pub fn new(name: impl Into<String>, strength: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            strength,
            group: None,
        }
    }
}
