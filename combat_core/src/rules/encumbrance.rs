//! Encumbrance: movement rate from carried load

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncumbranceVariant {
    Basic,
    Detailed,
}

impl fmt::Display for EncumbranceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncumbranceVariant::Basic => f.write_str("basic"),
            EncumbranceVariant::Detailed => f.write_str("detailed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorWeight {
    #[default]
    Unarmored,
    Light,
    Heavy,
}

/// What a combatant is carrying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncumbranceLoad {
    #[serde(default)]
    pub armor: ArmorWeight,
    #[serde(default)]
    pub carrying_treasure: bool,
    /// Total carried weight in coins
    #[serde(default)]
    pub coin_weight: u32,
}

pub trait EncumbranceRules: fmt::Debug + Send + Sync {
    fn variant(&self) -> EncumbranceVariant;

    /// Base movement rate in feet per turn
    fn movement_rate(&self, load: &EncumbranceLoad) -> u32;

    /// Movement in feet per combat round
    fn encounter_movement(&self, load: &EncumbranceLoad) -> u32 {
        self.movement_rate(load) / 3
    }
}

/// Armor weight sets the rate; treasure drops it one step
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEncumbrance;

impl EncumbranceRules for BasicEncumbrance {
    fn variant(&self) -> EncumbranceVariant {
        EncumbranceVariant::Basic
    }

    fn movement_rate(&self, load: &EncumbranceLoad) -> u32 {
        let rate: u32 = match load.armor {
            ArmorWeight::Unarmored => 120,
            ArmorWeight::Light => 90,
            ArmorWeight::Heavy => 60,
        };
        if load.carrying_treasure {
            rate.saturating_sub(30)
        } else {
            rate
        }
    }
}

/// Total coin weight picks a fraction of the base rate
#[derive(Debug, Clone, Copy)]
pub struct DetailedEncumbrance {
    pub base_rate: u32,
}

impl Default for DetailedEncumbrance {
    fn default() -> Self {
        DetailedEncumbrance { base_rate: 120 }
    }
}

impl EncumbranceRules for DetailedEncumbrance {
    fn variant(&self) -> EncumbranceVariant {
        EncumbranceVariant::Detailed
    }

    fn movement_rate(&self, load: &EncumbranceLoad) -> u32 {
        let quarters = match load.coin_weight {
            0..=400 => 4,
            401..=600 => 3,
            601..=800 => 2,
            801..=1600 => 1,
            _ => 0,
        };
        self.base_rate * quarters / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rates() {
        let rules = BasicEncumbrance;
        let mut load = EncumbranceLoad::default();
        assert_eq!(rules.movement_rate(&load), 120);
        assert_eq!(rules.encounter_movement(&load), 40);

        load.armor = ArmorWeight::Heavy;
        assert_eq!(rules.movement_rate(&load), 60);

        load.carrying_treasure = true;
        assert_eq!(rules.movement_rate(&load), 30);
        assert_eq!(rules.encounter_movement(&load), 10);
    }

    #[test]
    fn test_detailed_bands() {
        let rules = DetailedEncumbrance::default();
        let rate = |coins| {
            rules.movement_rate(&EncumbranceLoad {
                coin_weight: coins,
                ..EncumbranceLoad::default()
            })
        };
        assert_eq!(rate(400), 120);
        assert_eq!(rate(401), 90);
        assert_eq!(rate(800), 60);
        assert_eq!(rate(1600), 30);
        assert_eq!(rate(1601), 0);
    }
}
