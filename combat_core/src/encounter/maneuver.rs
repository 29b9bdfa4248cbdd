//! Declarable maneuvers and the phase each one acts in

use crate::types::{ClassAffiliation, CombatGroup};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase of the round in which a maneuver resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    Movement,
    Missile,
    Magic,
    Melee,
    Special,
}

/// A combatant's declared action for the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Attack,
    Cast,
    Fire,
    Throw,
    MoveOnly,
    ReadyWeapon,
    Withdrawal,
    Retreat,
    MultiAttack,
    SetSpear,
    Smash,
    Parry,
    Disarm,
    Nothing,
    /// Marks a combatant that has left the encounter; never declarable
    Untracked,
}

const FIGHTING_CLASSES: &[ClassAffiliation] = &[
    ClassAffiliation::Fighter,
    ClassAffiliation::Dwarf,
    ClassAffiliation::Elf,
    ClassAffiliation::Halfling,
];

const MULTI_ATTACK_CLASSES: &[ClassAffiliation] = &[
    ClassAffiliation::Fighter,
    ClassAffiliation::Dwarf,
    ClassAffiliation::Elf,
    ClassAffiliation::Halfling,
    ClassAffiliation::Monster,
];

const CASTING_CLASSES: &[ClassAffiliation] = &[
    ClassAffiliation::Cleric,
    ClassAffiliation::MagicUser,
    ClassAffiliation::Elf,
];

impl Maneuver {
    /// Every maneuver a combatant may declare
    pub fn declarable() -> &'static [Maneuver] {
        &[
            Maneuver::Attack,
            Maneuver::Cast,
            Maneuver::Fire,
            Maneuver::Throw,
            Maneuver::MoveOnly,
            Maneuver::ReadyWeapon,
            Maneuver::Withdrawal,
            Maneuver::Retreat,
            Maneuver::MultiAttack,
            Maneuver::SetSpear,
            Maneuver::Smash,
            Maneuver::Parry,
            Maneuver::Disarm,
            Maneuver::Nothing,
        ]
    }

    /// Action a combatant falls back to at the start of each round
    pub fn default_for(group: CombatGroup) -> Maneuver {
        match group {
            CombatGroup::Hostile => Maneuver::Attack,
            CombatGroup::Friendly | CombatGroup::Neutral => Maneuver::Nothing,
        }
    }

    pub fn is_declarable(&self) -> bool {
        *self != Maneuver::Untracked
    }

    pub fn phase(&self) -> CombatPhase {
        match self {
            Maneuver::MoveOnly | Maneuver::Withdrawal | Maneuver::Retreat => CombatPhase::Movement,
            Maneuver::Fire | Maneuver::Throw => CombatPhase::Missile,
            Maneuver::Cast => CombatPhase::Magic,
            Maneuver::Attack
            | Maneuver::MultiAttack
            | Maneuver::Smash
            | Maneuver::Disarm => CombatPhase::Melee,
            Maneuver::ReadyWeapon
            | Maneuver::SetSpear
            | Maneuver::Parry
            | Maneuver::Nothing
            | Maneuver::Untracked => CombatPhase::Special,
        }
    }

    /// Whether the combatant may also move this round
    pub fn permits_move(&self) -> bool {
        matches!(
            self,
            Maneuver::Attack
                | Maneuver::Fire
                | Maneuver::Throw
                | Maneuver::MoveOnly
                | Maneuver::Withdrawal
                | Maneuver::Retreat
                | Maneuver::Nothing
        )
    }

    /// Classes allowed to declare this maneuver; `None` means anyone
    pub fn eligible_classes(&self) -> Option<&'static [ClassAffiliation]> {
        match self {
            Maneuver::Cast => Some(CASTING_CLASSES),
            Maneuver::MultiAttack => Some(MULTI_ATTACK_CLASSES),
            Maneuver::Smash | Maneuver::Parry | Maneuver::Disarm => Some(FIGHTING_CLASSES),
            _ => None,
        }
    }

    pub fn allows(&self, classes: &[ClassAffiliation]) -> bool {
        match self.eligible_classes() {
            Some(eligible) => classes.iter().any(|c| eligible.contains(c)),
            None => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Maneuver::Attack => "attack",
            Maneuver::Cast => "cast",
            Maneuver::Fire => "fire",
            Maneuver::Throw => "throw",
            Maneuver::MoveOnly => "move_only",
            Maneuver::ReadyWeapon => "ready_weapon",
            Maneuver::Withdrawal => "withdrawal",
            Maneuver::Retreat => "retreat",
            Maneuver::MultiAttack => "multi_attack",
            Maneuver::SetSpear => "set_spear",
            Maneuver::Smash => "smash",
            Maneuver::Parry => "parry",
            Maneuver::Disarm => "disarm",
            Maneuver::Nothing => "nothing",
            Maneuver::Untracked => "untracked",
        }
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses declarable names; `-` and spaces count as `_`
impl FromStr for Maneuver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Maneuver::declarable()
            .iter()
            .copied()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| s.to_string())
    }
}
