//! Ability score modifiers

use crate::stats::AbilityScores;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityScoreVariant {
    Classic,
}

impl fmt::Display for AbilityScoreVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityScoreVariant::Classic => f.write_str("classic"),
        }
    }
}

/// Maps ability scores to to-hit and initiative adjustments
pub trait AbilityScoreRules: fmt::Debug + Send + Sync {
    fn variant(&self) -> AbilityScoreVariant;

    /// General modifier for a single score
    fn modifier(&self, score: i32) -> i32;

    /// Initiative adjustment from dexterity
    fn initiative(&self, scores: &AbilityScores) -> i32;

    fn melee_to_hit(&self, scores: &AbilityScores) -> i32 {
        self.modifier(scores.strength)
    }

    fn missile_to_hit(&self, scores: &AbilityScores) -> i32 {
        self.modifier(scores.dexterity)
    }
}

/// The 3-18 table: -3 at 3, +3 at 18
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicAbilityScores;

impl AbilityScoreRules for ClassicAbilityScores {
    fn variant(&self) -> AbilityScoreVariant {
        AbilityScoreVariant::Classic
    }

    fn modifier(&self, score: i32) -> i32 {
        match score {
            i32::MIN..=3 => -3,
            4..=5 => -2,
            6..=8 => -1,
            9..=12 => 0,
            13..=15 => 1,
            16..=17 => 2,
            _ => 3,
        }
    }

    fn initiative(&self, scores: &AbilityScores) -> i32 {
        match scores.dexterity {
            i32::MIN..=3 => -2,
            4..=8 => -1,
            9..=12 => 0,
            13..=17 => 1,
            _ => 2,
        }
    }
}
