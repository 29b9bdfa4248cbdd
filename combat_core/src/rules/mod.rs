//! Rule variants - registry of interchangeable strategies per rule axis
//!
//! The registry is a plain lookup table. Choosing which variant is active
//! happens once, in `RuleSet::from_config`, and the resulting `RuleSet` is
//! handed to whatever needs it.

mod ability;
mod encumbrance;
mod initiative;
mod mastery;
mod progression;

pub use ability::{AbilityScoreRules, AbilityScoreVariant, ClassicAbilityScores};
pub use encumbrance::{
    ArmorWeight, BasicEncumbrance, DetailedEncumbrance, EncumbranceLoad, EncumbranceRules,
    EncumbranceVariant,
};
pub use initiative::{
    GroupInitiative, IndividualInitiative, InitiativeResetPolicy, InitiativeRules,
    InitiativeVariant, INITIATIVE_DICE,
};
pub use mastery::{BecmiMastery, MasteryLevel, MasteryVariant, WeaponMasteryRules};
pub use progression::{half_hit_dice, ClassProgressionRules, ClassicProgression, ProgressionVariant};

use crate::attack::{resolve_attack, AttackContext, AttackFormula, ResolvedAttack};
use crate::config::RulesConfig;
use crate::dice::{DiceError, DiceRoller};
use crate::modifier::{ModifierRules, SpecialRuleOracle};
use crate::to_hit::{ToHitResolver, ToHitVariant};
use crate::types::ClassAffiliation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// The independent rule axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAxis {
    ToHit,
    Initiative,
    Encumbrance,
    WeaponMastery,
    AbilityScores,
    ClassProgression,
}

impl fmt::Display for RuleAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleAxis::ToHit => "to_hit",
            RuleAxis::Initiative => "initiative",
            RuleAxis::Encumbrance => "encumbrance",
            RuleAxis::WeaponMastery => "weapon_mastery",
            RuleAxis::AbilityScores => "ability_scores",
            RuleAxis::ClassProgression => "class_progression",
        };
        f.write_str(name)
    }
}

/// Names one variant on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVariantId {
    ToHit(ToHitVariant),
    Initiative(InitiativeVariant),
    Encumbrance(EncumbranceVariant),
    WeaponMastery(MasteryVariant),
    AbilityScores(AbilityScoreVariant),
    ClassProgression(ProgressionVariant),
}

impl RuleVariantId {
    pub fn axis(&self) -> RuleAxis {
        match self {
            RuleVariantId::ToHit(_) => RuleAxis::ToHit,
            RuleVariantId::Initiative(_) => RuleAxis::Initiative,
            RuleVariantId::Encumbrance(_) => RuleAxis::Encumbrance,
            RuleVariantId::WeaponMastery(_) => RuleAxis::WeaponMastery,
            RuleVariantId::AbilityScores(_) => RuleAxis::AbilityScores,
            RuleVariantId::ClassProgression(_) => RuleAxis::ClassProgression,
        }
    }
}

impl fmt::Display for RuleVariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleVariantId::ToHit(v) => write!(f, "{}:{}", self.axis(), v),
            RuleVariantId::Initiative(v) => write!(f, "{}:{}", self.axis(), v),
            RuleVariantId::Encumbrance(v) => write!(f, "{}:{}", self.axis(), v),
            RuleVariantId::WeaponMastery(v) => write!(f, "{}:{}", self.axis(), v),
            RuleVariantId::AbilityScores(v) => write!(f, "{}:{}", self.axis(), v),
            RuleVariantId::ClassProgression(v) => write!(f, "{}:{}", self.axis(), v),
        }
    }
}

/// Rule lookup error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("No strategy registered for {0}")]
    Unregistered(RuleVariantId),
    #[error("Strategy registered for {id} belongs to the {found} axis")]
    AxisMismatch { id: RuleVariantId, found: RuleAxis },
}

/// A registered strategy instance
#[derive(Debug, Clone)]
pub enum RuleStrategy {
    ToHit(ToHitResolver),
    Initiative(Arc<dyn InitiativeRules>),
    Encumbrance(Arc<dyn EncumbranceRules>),
    WeaponMastery(Arc<dyn WeaponMasteryRules>),
    AbilityScores(Arc<dyn AbilityScoreRules>),
    ClassProgression(Arc<dyn ClassProgressionRules>),
}

impl RuleStrategy {
    pub fn axis(&self) -> RuleAxis {
        match self {
            RuleStrategy::ToHit(_) => RuleAxis::ToHit,
            RuleStrategy::Initiative(_) => RuleAxis::Initiative,
            RuleStrategy::Encumbrance(_) => RuleAxis::Encumbrance,
            RuleStrategy::WeaponMastery(_) => RuleAxis::WeaponMastery,
            RuleStrategy::AbilityScores(_) => RuleAxis::AbilityScores,
            RuleStrategy::ClassProgression(_) => RuleAxis::ClassProgression,
        }
    }
}

/// Strategy registry
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    strategies: HashMap<RuleVariantId, RuleStrategy>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        RuleRegistry {
            strategies: HashMap::new(),
        }
    }

    /// Register a strategy; a later registration for the same id replaces it
    pub fn register(&mut self, id: RuleVariantId, strategy: RuleStrategy) {
        if self.strategies.insert(id, strategy).is_some() {
            debug!(%id, "rule strategy replaced");
        }
    }

    pub fn resolve(&self, id: RuleVariantId) -> Result<&RuleStrategy, RuleError> {
        self.strategies.get(&id).ok_or(RuleError::Unregistered(id))
    }

    pub fn contains(&self, id: RuleVariantId) -> bool {
        self.strategies.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn resolve_to_hit(&self, variant: ToHitVariant) -> Result<ToHitResolver, RuleError> {
        let id = RuleVariantId::ToHit(variant);
        match self.resolve(id)? {
            RuleStrategy::ToHit(resolver) => Ok(resolver.clone()),
            other => Err(RuleError::AxisMismatch {
                id,
                found: other.axis(),
            }),
        }
    }

    pub fn resolve_initiative(
        &self,
        variant: InitiativeVariant,
    ) -> Result<Arc<dyn InitiativeRules>, RuleError> {
        let id = RuleVariantId::Initiative(variant);
        match self.resolve(id)? {
            RuleStrategy::Initiative(rules) => Ok(Arc::clone(rules)),
            other => Err(RuleError::AxisMismatch {
                id,
                found: other.axis(),
            }),
        }
    }

    pub fn resolve_encumbrance(
        &self,
        variant: EncumbranceVariant,
    ) -> Result<Arc<dyn EncumbranceRules>, RuleError> {
        let id = RuleVariantId::Encumbrance(variant);
        match self.resolve(id)? {
            RuleStrategy::Encumbrance(rules) => Ok(Arc::clone(rules)),
            other => Err(RuleError::AxisMismatch {
                id,
                found: other.axis(),
            }),
        }
    }

    pub fn resolve_weapon_mastery(
        &self,
        variant: MasteryVariant,
    ) -> Result<Arc<dyn WeaponMasteryRules>, RuleError> {
        let id = RuleVariantId::WeaponMastery(variant);
        match self.resolve(id)? {
            RuleStrategy::WeaponMastery(rules) => Ok(Arc::clone(rules)),
            other => Err(RuleError::AxisMismatch {
                id,
                found: other.axis(),
            }),
        }
    }

    pub fn resolve_ability_scores(
        &self,
        variant: AbilityScoreVariant,
    ) -> Result<Arc<dyn AbilityScoreRules>, RuleError> {
        let id = RuleVariantId::AbilityScores(variant);
        match self.resolve(id)? {
            RuleStrategy::AbilityScores(rules) => Ok(Arc::clone(rules)),
            other => Err(RuleError::AxisMismatch {
                id,
                found: other.axis(),
            }),
        }
    }

    pub fn resolve_class_progression(
        &self,
        variant: ProgressionVariant,
    ) -> Result<Arc<dyn ClassProgressionRules>, RuleError> {
        let id = RuleVariantId::ClassProgression(variant);
        match self.resolve(id)? {
            RuleStrategy::ClassProgression(rules) => Ok(Arc::clone(rules)),
            other => Err(RuleError::AxisMismatch {
                id,
                found: other.axis(),
            }),
        }
    }

    /// Registry holding every built-in strategy
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for variant in ToHitVariant::all() {
            registry.register(
                RuleVariantId::ToHit(*variant),
                RuleStrategy::ToHit(ToHitResolver::for_variant(*variant)),
            );
        }

        registry.register(
            RuleVariantId::Initiative(InitiativeVariant::Individual),
            RuleStrategy::Initiative(Arc::new(IndividualInitiative)),
        );
        registry.register(
            RuleVariantId::Initiative(InitiativeVariant::Group),
            RuleStrategy::Initiative(Arc::new(GroupInitiative)),
        );

        registry.register(
            RuleVariantId::Encumbrance(EncumbranceVariant::Basic),
            RuleStrategy::Encumbrance(Arc::new(BasicEncumbrance)),
        );
        registry.register(
            RuleVariantId::Encumbrance(EncumbranceVariant::Detailed),
            RuleStrategy::Encumbrance(Arc::new(DetailedEncumbrance::default())),
        );

        registry.register(
            RuleVariantId::WeaponMastery(MasteryVariant::Becmi),
            RuleStrategy::WeaponMastery(Arc::new(BecmiMastery)),
        );
        registry.register(
            RuleVariantId::AbilityScores(AbilityScoreVariant::Classic),
            RuleStrategy::AbilityScores(Arc::new(ClassicAbilityScores)),
        );
        registry.register(
            RuleVariantId::ClassProgression(ProgressionVariant::Classic),
            RuleStrategy::ClassProgression(Arc::new(ClassicProgression)),
        );

        registry
    }
}

/// The active strategy per axis plus encounter tunables
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub to_hit: ToHitResolver,
    pub initiative: Arc<dyn InitiativeRules>,
    pub encumbrance: Option<Arc<dyn EncumbranceRules>>,
    pub weapon_mastery: Option<Arc<dyn WeaponMasteryRules>>,
    pub ability_scores: Option<Arc<dyn AbilityScoreRules>>,
    pub class_progression: Option<Arc<dyn ClassProgressionRules>>,
    pub reset_policy: InitiativeResetPolicy,
    /// Game seconds per round
    pub round_duration: u32,
    /// Open a declaration phase when the encounter starts
    pub declarations: bool,
}

impl RuleSet {
    /// Rule set with only the two mandatory axes filled in
    pub fn new(to_hit: ToHitResolver, initiative: Arc<dyn InitiativeRules>) -> Self {
        RuleSet {
            to_hit,
            initiative,
            encumbrance: None,
            weapon_mastery: None,
            ability_scores: None,
            class_progression: None,
            reset_policy: InitiativeResetPolicy::default(),
            round_duration: crate::config::DEFAULT_ROUND_DURATION,
            declarations: true,
        }
    }

    /// Resolve every configured variant from the registry
    pub fn from_config(registry: &RuleRegistry, config: &RulesConfig) -> Result<Self, RuleError> {
        let rules = RuleSet {
            to_hit: registry.resolve_to_hit(config.to_hit)?,
            initiative: registry.resolve_initiative(config.initiative)?,
            encumbrance: config
                .encumbrance
                .map(|v| registry.resolve_encumbrance(v))
                .transpose()?,
            weapon_mastery: config
                .weapon_mastery
                .map(|v| registry.resolve_weapon_mastery(v))
                .transpose()?,
            ability_scores: config
                .ability_scores
                .map(|v| registry.resolve_ability_scores(v))
                .transpose()?,
            class_progression: config
                .class_progression
                .map(|v| registry.resolve_class_progression(v))
                .transpose()?,
            reset_policy: config.initiative_reset,
            round_duration: config.round_duration,
            declarations: config.declarations,
        };

        info!(
            to_hit = %config.to_hit,
            initiative = %config.initiative,
            reset = %config.initiative_reset,
            "rule set resolved"
        );
        Ok(rules)
    }

    pub fn with_reset_policy(mut self, policy: InitiativeResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn with_ability_scores(mut self, rules: Arc<dyn AbilityScoreRules>) -> Self {
        self.ability_scores = Some(rules);
        self
    }

    pub fn with_weapon_mastery(mut self, rules: Arc<dyn WeaponMasteryRules>) -> Self {
        self.weapon_mastery = Some(rules);
        self
    }

    pub fn with_encumbrance(mut self, rules: Arc<dyn EncumbranceRules>) -> Self {
        self.encumbrance = Some(rules);
        self
    }

    pub fn with_declarations(mut self, enabled: bool) -> Self {
        self.declarations = enabled;
        self
    }

    /// Collaborators for the modifier pipeline
    pub fn modifier_rules<'a>(
        &'a self,
        oracle: Option<&'a dyn SpecialRuleOracle>,
    ) -> ModifierRules<'a> {
        ModifierRules {
            ability_scores: self.ability_scores.as_deref(),
            weapon_mastery: self.weapon_mastery.as_deref(),
            special_rules: oracle,
        }
    }

    pub fn build_attack_formula(
        &self,
        ctx: &AttackContext,
        oracle: Option<&dyn SpecialRuleOracle>,
    ) -> AttackFormula {
        self.to_hit
            .build_attack_formula(ctx, self.modifier_rules(oracle))
    }

    pub fn resolve_attack(
        &self,
        ctx: &AttackContext,
        oracle: Option<&dyn SpecialRuleOracle>,
        dice: &mut dyn DiceRoller,
    ) -> Result<ResolvedAttack, DiceError> {
        resolve_attack(&self.to_hit, ctx, self.modifier_rules(oracle), dice)
    }

    /// THAC0 for a class and level, when a progression is active
    pub fn thac0_for(&self, class: ClassAffiliation, level: u32) -> Option<i32> {
        self.class_progression
            .as_ref()
            .map(|p| p.thac0(class, level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_is_configuration_error() {
        let registry = RuleRegistry::new();
        let err = registry.resolve_to_hit(ToHitVariant::Classic).unwrap_err();
        assert_eq!(
            err,
            RuleError::Unregistered(RuleVariantId::ToHit(ToHitVariant::Classic))
        );
        assert_eq!(err.to_string(), "No strategy registered for to_hit:classic");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = RuleRegistry::new();
        let id = RuleVariantId::ToHit(ToHitVariant::DarkDungeons);
        registry.register(id, RuleStrategy::ToHit(ToHitResolver::DescendingThac0));
        registry.register(id, RuleStrategy::ToHit(ToHitResolver::for_variant(ToHitVariant::DarkDungeons)));

        assert_eq!(registry.len(), 1);
        let resolver = registry.resolve_to_hit(ToHitVariant::DarkDungeons).unwrap();
        assert_eq!(resolver.variant(), ToHitVariant::DarkDungeons);
    }

    #[test]
    fn test_axis_mismatch() {
        let mut registry = RuleRegistry::new();
        let id = RuleVariantId::Initiative(InitiativeVariant::Group);
        registry.register(id, RuleStrategy::ToHit(ToHitResolver::AscendingAc));

        let err = registry.resolve_initiative(InitiativeVariant::Group).unwrap_err();
        assert_eq!(
            err,
            RuleError::AxisMismatch {
                id,
                found: RuleAxis::ToHit
            }
        );
    }

    #[test]
    fn test_defaults_cover_every_variant() {
        let registry = RuleRegistry::with_defaults();
        for variant in ToHitVariant::all() {
            assert!(registry.contains(RuleVariantId::ToHit(*variant)));
        }
        assert!(registry.resolve_initiative(InitiativeVariant::Group).is_ok());
        assert!(registry.resolve_weapon_mastery(MasteryVariant::Becmi).is_ok());
        assert!(registry.resolve_class_progression(ProgressionVariant::Classic).is_ok());
        assert_eq!(registry.len(), 12);
    }

    #[test]
    fn test_rule_set_from_default_config() {
        let registry = RuleRegistry::with_defaults();
        let config = RulesConfig::default();
        let rules = RuleSet::from_config(&registry, &config).unwrap();

        assert_eq!(rules.to_hit.variant(), config.to_hit);
        assert_eq!(rules.initiative.variant(), config.initiative);
        assert_eq!(rules.round_duration, 10);
    }

    #[test]
    fn test_rule_set_optional_axis_unregistered() {
        let mut registry = RuleRegistry::new();
        registry.register(
            RuleVariantId::ToHit(ToHitVariant::Classic),
            RuleStrategy::ToHit(ToHitResolver::for_variant(ToHitVariant::Classic)),
        );
        registry.register(
            RuleVariantId::Initiative(InitiativeVariant::Individual),
            RuleStrategy::Initiative(Arc::new(IndividualInitiative)),
        );

        let config = RulesConfig {
            to_hit: ToHitVariant::Classic,
            weapon_mastery: Some(MasteryVariant::Becmi),
            ..RulesConfig::default()
        };
        let err = RuleSet::from_config(&registry, &config).unwrap_err();
        assert_eq!(
            err,
            RuleError::Unregistered(RuleVariantId::WeaponMastery(MasteryVariant::Becmi))
        );

        let config = RulesConfig {
            to_hit: ToHitVariant::Classic,
            weapon_mastery: None,
            ability_scores: None,
            encumbrance: None,
            class_progression: None,
            ..RulesConfig::default()
        };
        let rules = RuleSet::from_config(&registry, &config).unwrap();
        assert!(rules.weapon_mastery.is_none());
        assert_eq!(rules.thac0_for(ClassAffiliation::Fighter, 4), None);
    }

    #[test]
    fn test_thac0_for_with_progression() {
        let registry = RuleRegistry::with_defaults();
        let config = RulesConfig {
            class_progression: Some(ProgressionVariant::Classic),
            ..RulesConfig::default()
        };
        let rules = RuleSet::from_config(&registry, &config).unwrap();
        assert_eq!(rules.thac0_for(ClassAffiliation::Fighter, 4), Some(17));
    }
}
