//! Dice evaluation - the boundary to the external roller
//!
//! The engine never rolls on its own. Callers hand it a `DiceRoller`, and
//! each attack or initiative roll makes exactly one `evaluate` call.

mod notation;
mod roller;

pub use notation::{DiceNotation, DiceTerm, MAX_DICE_PER_TERM, MAX_DIE_SIDES};
pub use roller::{RngDice, ScriptedDice};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dice evaluation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Scripted dice exhausted after {0} results")]
    Exhausted(usize),
}

/// Result of evaluating a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Individual die faces, in roll order
    pub results: Vec<i32>,
    /// Grand total including static modifiers
    pub total: i32,
}

impl DiceRoll {
    /// Sum of the randomly rolled dice only (no static modifiers)
    pub fn dice_sum(&self) -> i32 {
        self.results.iter().sum()
    }
}

/// Anything that can evaluate a formula string like `1d20+3`
pub trait DiceRoller {
    fn evaluate(&mut self, formula: &str) -> Result<DiceRoll, DiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_sum_excludes_modifier() {
        let roll = DiceRoll {
            results: vec![15],
            total: 18,
        };
        assert_eq!(roll.dice_sum(), 15);
    }
}
