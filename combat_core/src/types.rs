//! Core identifiers and small enums shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a combatant taking part in an encounter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub String);

impl From<&str> for CombatantId {
    fn from(s: &str) -> Self {
        CombatantId(s.to_string())
    }
}

impl From<String> for CombatantId {
    fn from(s: String) -> Self {
        CombatantId(s)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a (non-referee) participant controlling combatants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        ParticipantId(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        ParticipantId(s)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an attack is resolved on the melee or the missile path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackCategory {
    Melee,
    Missile,
}

impl fmt::Display for AttackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackCategory::Melee => f.write_str("melee"),
            AttackCategory::Missile => f.write_str("missile"),
        }
    }
}

/// Class affiliation used to restrict maneuvers and pick progressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassAffiliation {
    Fighter,
    Cleric,
    MagicUser,
    Thief,
    Dwarf,
    Elf,
    Halfling,
    Monster,
}

/// Which side of the table a combatant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatGroup {
    Friendly,
    #[default]
    Neutral,
    Hostile,
}

/// Who is asking for a state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requester {
    /// The single privileged role that owns encounter state
    Referee,
    /// An ordinary participant submitting requests for its own combatants
    Participant(ParticipantId),
}

impl Requester {
    pub fn is_referee(&self) -> bool {
        matches!(self, Requester::Referee)
    }
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requester::Referee => f.write_str("referee"),
            Requester::Participant(id) => write!(f, "participant {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combatant_id_conversions() {
        let a = CombatantId::from("orc-1");
        let b = CombatantId::from("orc-1".to_string());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "orc-1");
    }

    #[test]
    fn test_requester_display() {
        assert_eq!(Requester::Referee.to_string(), "referee");
        let p = Requester::Participant(ParticipantId::from("alice"));
        assert_eq!(p.to_string(), "participant alice");
        assert!(!p.is_referee());
    }

    #[test]
    fn test_group_serializes_snake_case() {
        let json = serde_json::to_string(&CombatGroup::Hostile).unwrap();
        assert_eq!(json, "\"hostile\"");
    }
}
