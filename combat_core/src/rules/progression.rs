//! Class progression: THAC0 by class and level, and for monsters by hit dice

use crate::types::ClassAffiliation;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionVariant {
    Classic,
}

impl fmt::Display for ProgressionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionVariant::Classic => f.write_str("classic"),
        }
    }
}

pub trait ClassProgressionRules: fmt::Debug + Send + Sync {
    fn variant(&self) -> ProgressionVariant;

    fn thac0(&self, class: ClassAffiliation, level: u32) -> i32;

    /// THAC0 from a hit dice descriptor like `3+1`, `1/2` or `4**`
    ///
    /// Returns `None` when the descriptor cannot be read.
    fn monster_thac0(&self, hit_dice: &str) -> Option<i32>;
}

/// Hit dice in half-die units: `3` is 6, `3+1` is 7, `1/2` is 1
pub fn half_hit_dice(descriptor: &str) -> Option<u32> {
    let cleaned: String = descriptor
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '*')
        .collect();

    if cleaned == "1/2" || cleaned == "½" {
        return Some(1);
    }

    if let Some((dice, bonus)) = cleaned.split_once('+') {
        let whole = dice.parse::<u32>().ok()?.checked_mul(2)?;
        let bonus: u32 = bonus.parse().ok()?;
        return if bonus > 0 { whole.checked_add(1) } else { Some(whole) };
    }

    if let Some((dice, penalty)) = cleaned.split_once('-') {
        let whole = dice.parse::<u32>().ok()?.checked_mul(2)?;
        let penalty: u32 = penalty.parse().ok()?;
        return Some(if penalty > 0 { whole.saturating_sub(1) } else { whole });
    }

    cleaned.parse::<u32>().ok()?.checked_mul(2)
}

/// Fighters improve every 3 levels, clerics and thieves every 4,
/// magic-users every 5
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicProgression;

impl ClassProgressionRules for ClassicProgression {
    fn variant(&self) -> ProgressionVariant {
        ProgressionVariant::Classic
    }

    fn thac0(&self, class: ClassAffiliation, level: u32) -> i32 {
        let steps = match class {
            ClassAffiliation::Fighter
            | ClassAffiliation::Dwarf
            | ClassAffiliation::Elf
            | ClassAffiliation::Halfling => 3,
            ClassAffiliation::Cleric | ClassAffiliation::Thief => 4,
            ClassAffiliation::MagicUser => 5,
            // Monsters use their hit dice as level
            ClassAffiliation::Monster => return monster_band(level.saturating_mul(2)),
        };
        let improvements = i32::try_from(level.saturating_sub(1) / steps).unwrap_or(i32::MAX);
        19i32.saturating_sub(improvements.saturating_mul(2))
    }

    fn monster_thac0(&self, hit_dice: &str) -> Option<i32> {
        half_hit_dice(hit_dice).map(monster_band)
    }
}

fn monster_band(half_dice: u32) -> i32 {
    match half_dice {
        0..=2 => 19,
        3..=4 => 18,
        5..=6 => 17,
        7..=8 => 16,
        9..=10 => 15,
        11..=12 => 14,
        13..=14 => 13,
        15..=18 => 12,
        19..=22 => 11,
        23..=26 => 10,
        27..=30 => 9,
        31..=34 => 8,
        35..=38 => 7,
        39..=42 => 6,
        _ => 5,
    }
}
