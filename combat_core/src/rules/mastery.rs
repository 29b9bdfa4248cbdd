//! Weapon mastery levels and their to-hit bonuses

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryVariant {
    Becmi,
}

impl fmt::Display for MasteryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasteryVariant::Becmi => f.write_str("becmi"),
        }
    }
}

/// How well a combatant knows a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Unskilled,
    Basic,
    Skilled,
    Expert,
    Master,
    GrandMaster,
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MasteryLevel::Unskilled => "unskilled",
            MasteryLevel::Basic => "basic",
            MasteryLevel::Skilled => "skilled",
            MasteryLevel::Expert => "expert",
            MasteryLevel::Master => "master",
            MasteryLevel::GrandMaster => "grand master",
        };
        f.write_str(name)
    }
}

pub trait WeaponMasteryRules: fmt::Debug + Send + Sync {
    fn variant(&self) -> MasteryVariant;

    fn to_hit_bonus(&self, level: MasteryLevel) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BecmiMastery;

impl WeaponMasteryRules for BecmiMastery {
    fn variant(&self) -> MasteryVariant {
        MasteryVariant::Becmi
    }

    fn to_hit_bonus(&self, level: MasteryLevel) -> i32 {
        match level {
            MasteryLevel::Unskilled => -1,
            MasteryLevel::Basic => 0,
            MasteryLevel::Skilled => 2,
            MasteryLevel::Expert => 4,
            MasteryLevel::Master => 6,
            MasteryLevel::GrandMaster => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_becmi_bonuses_rise_with_level() {
        let rules = BecmiMastery;
        assert_eq!(rules.to_hit_bonus(MasteryLevel::Unskilled), -1);
        assert_eq!(rules.to_hit_bonus(MasteryLevel::Basic), 0);
        assert_eq!(rules.to_hit_bonus(MasteryLevel::GrandMaster), 8);
        assert!(MasteryLevel::Expert > MasteryLevel::Skilled);
    }

    #[test]
    fn test_level_parses_from_snake_case() {
        let level: MasteryLevel = serde_json::from_str("\"grand_master\"").unwrap();
        assert_eq!(level, MasteryLevel::GrandMaster);
        assert_eq!(level.to_string(), "grand master");
    }
}
