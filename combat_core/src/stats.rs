//! Stat snapshots supplied by the host for a single attack
//!
//! These are plain data records. The engine never looks anything up by
//! string path; every contribution source has a named field.

use crate::rules::MasteryLevel;
use crate::types::{AttackCategory, CombatantId};
use serde::{Deserialize, Serialize};

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        AbilityScores {
            strength: 10,
            intelligence: 10,
            wisdom: 10,
            dexterity: 10,
            constitution: 10,
            charisma: 10,
        }
    }
}

/// Aggregated to-hit adjustments from the wielder's active effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectModifiers {
    #[serde(default)]
    pub melee_to_hit: i32,
    #[serde(default)]
    pub missile_to_hit: i32,
}

/// Attacker data relevant to the to-hit roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerStats {
    pub name: String,
    /// Descending difficulty value (THAC0)
    pub thac0: i32,
    /// Intrinsic attack bonus used on the ascending AC scale
    #[serde(default)]
    pub attack_bonus: i32,
    #[serde(default)]
    pub ability_scores: Option<AbilityScores>,
    #[serde(default)]
    pub effects: EffectModifiers,
}

impl AttackerStats {
    /// Create an attacker with the given THAC0 and no other modifiers
    pub fn new(name: impl Into<String>, thac0: i32) -> Self {
        AttackerStats {
            name: name.into(),
            thac0,
            attack_bonus: 19 - thac0,
            ability_scores: None,
            effects: EffectModifiers::default(),
        }
    }

    pub fn with_ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    pub fn with_effects(mut self, effects: EffectModifiers) -> Self {
        self.effects = effects;
        self
    }
}

/// A to-hit adjustment that only applies against a named opponent group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VsGroupModifier {
    /// Group name, e.g. "undead" or "giants"
    pub group: String,
    pub amount: i32,
    /// Special rule id handed to the rule oracle; defaults to the group name
    #[serde(default)]
    pub special_rule: Option<String>,
}

impl VsGroupModifier {
    pub fn new(group: impl Into<String>, amount: i32) -> Self {
        VsGroupModifier {
            group: group.into(),
            amount,
            special_rule: None,
        }
    }

    /// Rule id used when asking the oracle about this group
    pub fn rule_id(&self) -> &str {
        self.special_rule.as_deref().unwrap_or(&self.group)
    }
}

/// Weapon data relevant to the to-hit roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub name: String,
    #[serde(default)]
    pub to_hit: i32,
    pub category: AttackCategory,
    /// Thrown weapons resolve on the missile path with the melee ability bonus
    #[serde(default)]
    pub thrown: bool,
    #[serde(default)]
    pub vs_groups: Vec<VsGroupModifier>,
    /// Wielder's mastery of this weapon, if tracked
    #[serde(default)]
    pub mastery: Option<MasteryLevel>,
}

impl WeaponStats {
    pub fn melee(name: impl Into<String>, to_hit: i32) -> Self {
        WeaponStats {
            name: name.into(),
            to_hit,
            category: AttackCategory::Melee,
            thrown: false,
            vs_groups: Vec::new(),
            mastery: None,
        }
    }

    pub fn missile(name: impl Into<String>, to_hit: i32) -> Self {
        WeaponStats {
            category: AttackCategory::Missile,
            ..WeaponStats::melee(name, to_hit)
        }
    }

    pub fn thrown(name: impl Into<String>, to_hit: i32) -> Self {
        WeaponStats {
            thrown: true,
            ..WeaponStats::missile(name, to_hit)
        }
    }

    pub fn with_vs_group(mut self, modifier: VsGroupModifier) -> Self {
        self.vs_groups.push(modifier);
        self
    }

    pub fn with_mastery(mut self, level: MasteryLevel) -> Self {
        self.mastery = Some(level);
        self
    }
}

/// Ammunition data for missile attacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmoStats {
    pub name: String,
    #[serde(default)]
    pub to_hit: i32,
    #[serde(default)]
    pub vs_groups: Vec<VsGroupModifier>,
}

/// A target's armor class in both scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClass {
    /// Descending armor class total
    pub value: i32,
    /// Armor class against missiles, when it differs
    #[serde(default)]
    pub ranged: Option<i32>,
    /// Ascending armor class, when the host tracks it separately
    #[serde(default)]
    pub ascending: Option<i32>,
}

impl ArmorClass {
    pub fn new(value: i32) -> Self {
        ArmorClass {
            value,
            ranged: None,
            ascending: None,
        }
    }

    /// Descending armor class for the given attack path
    pub fn descending(&self, category: AttackCategory) -> i32 {
        match category {
            AttackCategory::Melee => self.value,
            AttackCategory::Missile => self.ranged.unwrap_or(self.value),
        }
    }

    /// Ascending armor class, derived as `19 - AC` when not tracked
    pub fn ascending(&self, category: AttackCategory) -> i32 {
        self.ascending
            .unwrap_or_else(|| 19 - self.descending(category))
    }
}

/// Target data relevant to the to-hit roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStats {
    pub id: CombatantId,
    pub name: String,
    #[serde(default)]
    pub armor_class: Option<ArmorClass>,
    /// Declared opponent groups this target belongs to
    #[serde(default)]
    pub groups: Vec<String>,
    /// Adjustment attackers gain from the target's own actions
    #[serde(default)]
    pub self_inflicted_to_hit: i32,
}

impl TargetStats {
    pub fn new(id: impl Into<CombatantId>, name: impl Into<String>, armor_class: i32) -> Self {
        TargetStats {
            id: id.into(),
            name: name.into(),
            armor_class: Some(ArmorClass::new(armor_class)),
            groups: Vec::new(),
            self_inflicted_to_hit: 0,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(group))
    }
}
