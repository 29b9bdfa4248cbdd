//! Dice notation parsing: `NdS` terms and flat modifiers joined by `+`/`-`

use super::DiceError;
use std::fmt;
use std::str::FromStr;

/// Most dice a single term may roll
pub const MAX_DICE_PER_TERM: u32 = 100;

/// Largest die a term may name
pub const MAX_DIE_SIDES: u32 = 1000;

/// One signed term of a dice formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceTerm {
    Dice { count: u32, sides: u32, sign: i32 },
    Flat(i32),
}

/// A parsed dice formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceNotation {
    pub terms: Vec<DiceTerm>,
}

impl FromStr for DiceNotation {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiceError::InvalidNotation(s.to_string());
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(invalid());
        }

        let mut terms = Vec::new();
        let mut sign = 1;
        let mut current = String::new();

        for (i, ch) in compact.char_indices() {
            if ch == '+' || ch == '-' {
                if current.is_empty() {
                    // Only a leading sign may stand without a term before it
                    if i != 0 {
                        return Err(invalid());
                    }
                } else {
                    terms.push(parse_term(&current, sign).ok_or_else(invalid)?);
                    current.clear();
                }
                sign = if ch == '-' { -1 } else { 1 };
            } else {
                current.push(ch);
            }
        }

        if current.is_empty() {
            return Err(invalid());
        }
        terms.push(parse_term(&current, sign).ok_or_else(invalid)?);

        Ok(DiceNotation { terms })
    }
}

fn parse_term(text: &str, sign: i32) -> Option<DiceTerm> {
    let lower = text.to_ascii_lowercase();
    match lower.split_once('d') {
        Some((count, sides)) => {
            let count: u32 = if count.is_empty() { 1 } else { count.parse().ok()? };
            let sides: u32 = sides.parse().ok()?;
            let in_range = (1..=MAX_DICE_PER_TERM).contains(&count)
                && (1..=MAX_DIE_SIDES).contains(&sides);
            if !in_range {
                return None;
            }
            Some(DiceTerm::Dice { count, sides, sign })
        }
        None => lower.parse::<i32>().ok().map(|v| DiceTerm::Flat(sign * v)),
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            let (negative, body) = match term {
                DiceTerm::Dice { count, sides, sign } => (*sign < 0, format!("{}d{}", count, sides)),
                DiceTerm::Flat(v) => (*v < 0, v.abs().to_string()),
            };
            match (i, negative) {
                (0, true) => write!(f, "-{}", body)?,
                (0, false) => write!(f, "{}", body)?,
                (_, true) => write!(f, "-{}", body)?,
                (_, false) => write!(f, "+{}", body)?,
            }
        }
        Ok(())
    }
}
