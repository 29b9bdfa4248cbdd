//! Reference dice rollers: RNG-backed and scripted

use super::{DiceError, DiceNotation, DiceRoll, DiceRoller, DiceTerm};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Dice roller backed by any `rand` RNG
#[derive(Debug, Clone)]
pub struct RngDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        RngDice { rng }
    }
}

impl RngDice<StdRng> {
    /// Deterministic roller for reproducible runs
    pub fn from_seed(seed: u64) -> Self {
        RngDice::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceRoller for RngDice<R> {
    fn evaluate(&mut self, formula: &str) -> Result<DiceRoll, DiceError> {
        let notation: DiceNotation = formula.parse()?;
        let rng = &mut self.rng;
        evaluate_with(&notation, |sides| {
            let sides = i32::try_from(sides)
                .map_err(|_| DiceError::InvalidNotation(formula.to_string()))?;
            Ok(rng.gen_range(1..=sides))
        })
    }
}

/// Dice roller that replays a fixed sequence of die faces
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<i32>,
    consumed: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = i32>) -> Self {
        ScriptedDice {
            faces: faces.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of faces still queued
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceRoller for ScriptedDice {
    fn evaluate(&mut self, formula: &str) -> Result<DiceRoll, DiceError> {
        let notation: DiceNotation = formula.parse()?;
        let faces = &mut self.faces;
        let consumed = &mut self.consumed;
        evaluate_with(&notation, |_| {
            let face = faces.pop_front().ok_or(DiceError::Exhausted(*consumed))?;
            *consumed += 1;
            Ok(face)
        })
    }
}

fn evaluate_with(
    notation: &DiceNotation,
    mut roll_die: impl FnMut(u32) -> Result<i32, DiceError>,
) -> Result<DiceRoll, DiceError> {
    let overflow = || DiceError::InvalidNotation(notation.to_string());
    let mut results = Vec::new();
    let mut total: i32 = 0;

    for term in &notation.terms {
        match *term {
            DiceTerm::Dice { count, sides, sign } => {
                for _ in 0..count {
                    let face = roll_die(sides)?;
                    results.push(face);
                    let signed = face.checked_mul(sign).ok_or_else(overflow)?;
                    total = total.checked_add(signed).ok_or_else(overflow)?;
                }
            }
            DiceTerm::Flat(v) => total = total.checked_add(v).ok_or_else(overflow)?,
        }
    }

    Ok(DiceRoll { results, total })
}
