//! Per-combatant encounter state

use super::maneuver::Maneuver;
use crate::rules::{AbilityScoreRules, EncumbranceLoad};
use crate::stats::AbilityScores;
use crate::types::{AttackCategory, ClassAffiliation, CombatGroup, CombatantId, ParticipantId, Requester};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable round state of a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantState {
    pub declared_action: Maneuver,
    /// Attacks made this round
    pub attacks_made: u32,
    /// Attacks received this round, per attack path
    pub attacks_against: BTreeMap<AttackCategory, u32>,
    /// `None` while awaiting a roll
    pub initiative: Option<i32>,
    pub group: CombatGroup,
}

impl CombatantState {
    /// Fresh state for a combatant joining on `group`'s side
    pub fn joined(group: CombatGroup) -> Self {
        CombatantState {
            declared_action: Maneuver::default_for(group),
            attacks_made: 0,
            attacks_against: BTreeMap::new(),
            initiative: None,
            group,
        }
    }

    pub fn attacks_against(&self, category: AttackCategory) -> u32 {
        self.attacks_against.get(&category).copied().unwrap_or(0)
    }

    pub fn attacks_against_total(&self) -> u32 {
        self.attacks_against.values().sum()
    }

    fn clear_counters(&mut self) {
        self.attacks_made = 0;
        self.attacks_against.clear();
    }
}

/// A participant in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    /// Participant allowed to submit declarations; `None` means referee only
    #[serde(default)]
    pub controller: Option<ParticipantId>,
    #[serde(default)]
    pub classes: Vec<ClassAffiliation>,
    /// Added to individual initiative rolls
    #[serde(default)]
    pub initiative_modifier: i32,
    /// Scores the ability rules read, when tracked
    #[serde(default)]
    pub ability_scores: Option<AbilityScores>,
    #[serde(default)]
    pub load: EncumbranceLoad,
    pub state: CombatantState,
}

impl Combatant {
    pub fn new(id: impl Into<CombatantId>, name: impl Into<String>, group: CombatGroup) -> Self {
        Combatant {
            id: id.into(),
            name: name.into(),
            controller: None,
            classes: Vec::new(),
            initiative_modifier: 0,
            ability_scores: None,
            load: EncumbranceLoad::default(),
            state: CombatantState::joined(group),
        }
    }

    pub fn with_controller(mut self, participant: impl Into<ParticipantId>) -> Self {
        self.controller = Some(participant.into());
        self
    }

    pub fn with_class(mut self, class: ClassAffiliation) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    pub fn with_load(mut self, load: EncumbranceLoad) -> Self {
        self.load = load;
        self
    }

    /// Flat modifier plus the dexterity adjustment, when both ability rules
    /// and scores are present
    pub fn initiative_bonus(&self, abilities: Option<&dyn AbilityScoreRules>) -> i32 {
        let from_scores = match (abilities, &self.ability_scores) {
            (Some(rules), Some(scores)) => rules.initiative(scores),
            _ => 0,
        };
        self.initiative_modifier + from_scores
    }

    pub fn group(&self) -> CombatGroup {
        self.state.group
    }

    /// Referees may always change a declaration; others only until
    /// initiative is assigned
    pub fn can_change_declared_action(&self, requester: &Requester) -> bool {
        requester.is_referee() || self.state.initiative.is_none()
    }

    pub fn is_controlled_by(&self, requester: &Requester) -> bool {
        match requester {
            Requester::Referee => true,
            Requester::Participant(p) => self.controller.as_ref() == Some(p),
        }
    }

    /// Start-of-round reset: counters to zero, group default action
    pub fn round_reset(&mut self) {
        self.state.clear_counters();
        self.state.declared_action = Maneuver::default_for(self.state.group);
    }

    /// End-of-encounter reset
    pub(crate) fn zero(&mut self) {
        self.state.clear_counters();
        self.state.initiative = None;
        self.state.declared_action = Maneuver::Nothing;
    }

    /// State left behind when the combatant leaves the encounter
    pub(crate) fn untrack(&mut self) {
        self.zero();
        self.state.declared_action = Maneuver::Untracked;
    }
}
