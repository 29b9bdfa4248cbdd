//! combat_core - Combat resolution core for old-school tabletop RPG rules
//!
//! This library provides:
//! - ToHitResolver: Five interchangeable to-hit algorithms
//! - Modifier aggregation: Additive to-hit modifiers with an ordered digest
//! - RuleRegistry / RuleSet: Strategy lookup per rule axis, resolved once from config
//! - CombatEncounter: Round/turn state machine with initiative and declarations
//!
//! Dice are rolled by the host through the `DiceRoller` trait.

pub mod attack;
pub mod config;
pub mod dice;
pub mod encounter;
pub mod modifier;
pub mod prelude;
pub mod rules;
pub mod stats;
pub mod to_hit;
pub mod types;

// Re-export core types for convenience
pub use attack::{
    resolve_attack, AttackContext, AttackFormula, AttackOptions, AttackOutcome,
    LowestArmorDefeated, ResolvedAttack, TargetResult,
};
pub use config::{default_rules_config, ConfigError, RulesConfig};
pub use dice::{DiceError, DiceRoll, DiceRoller, RngDice, ScriptedDice};
pub use encounter::{
    CombatEncounter, Combatant, CombatantState, EncounterError, EncounterObserver,
    EncounterPhase, EncounterState, Maneuver, SharedEncounter,
};
pub use modifier::{ModifierBreakdown, ModifierContribution, ModifierRules, SpecialRuleOracle};
pub use rules::{RuleError, RuleRegistry, RuleSet, RuleVariantId};
pub use stats::{AbilityScores, AmmoStats, ArmorClass, AttackerStats, TargetStats, WeaponStats};
pub use to_hit::{ToHitResolver, ToHitVariant};
pub use types::{AttackCategory, ClassAffiliation, CombatGroup, CombatantId, ParticipantId, Requester};
