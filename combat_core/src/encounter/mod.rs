//! Encounter state machine - rounds, turns, initiative and declarations
//!
//! `CombatEncounter` owns every combatant's round state. Each mutating call
//! either commits in full or returns an error with nothing changed.

mod combatant;
mod maneuver;
mod shared;

pub use combatant::{Combatant, CombatantState};
pub use maneuver::{CombatPhase, Maneuver};
pub use shared::SharedEncounter;

use crate::dice::{DiceError, DiceRoller};
use crate::rules::{InitiativeResetPolicy, RuleSet};
use crate::types::{AttackCategory, CombatantId, Requester};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lifecycle of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EncounterPhase {
    NotStarted,
    Active { round: u32 },
    Ended { rounds: u32 },
}

impl fmt::Display for EncounterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterPhase::NotStarted => f.write_str("not started"),
            EncounterPhase::Active { round } => write!(f, "active (round {})", round),
            EncounterPhase::Ended { rounds } => write!(f, "ended after {} rounds", rounds),
        }
    }
}

/// Encounter error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncounterError {
    #[error("Cannot {action} while the encounter is {from}")]
    StateTransition {
        from: EncounterPhase,
        action: &'static str,
    },
    #[error("Invalid maneuver '{maneuver}': {reason}")]
    InvalidManeuver { maneuver: String, reason: String },
    #[error("Declaration for {0} is locked")]
    DeclarationLocked(CombatantId),
    #[error("{requester} may not act for {combatant}")]
    NotPermitted {
        requester: String,
        combatant: CombatantId,
    },
    #[error("Unknown combatant: {0}")]
    UnknownCombatant(CombatantId),
    #[error("Combatant already in the encounter: {0}")]
    DuplicateCombatant(CombatantId),
    #[error("Dice error: {0}")]
    Dice(#[from] DiceError),
    #[error("Encounter lock poisoned: {0}")]
    Poisoned(String),
}

/// Notified when the declaration phase opens or closes
pub trait EncounterObserver: Send {
    fn declarations_opened(&self, round: u32);

    fn declarations_closed(&self);
}

/// Display snapshot of an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterState {
    pub phase: EncounterPhase,
    pub round: u32,
    pub turn_index: usize,
    pub ordered_combatant_ids: Vec<CombatantId>,
    pub initiative_reset_policy: InitiativeResetPolicy,
    pub active_combatant: Option<CombatantId>,
    pub declarations_open: bool,
    /// Game seconds covered by the rounds so far
    pub elapsed_seconds: u32,
}

/// One combat encounter
pub struct CombatEncounter {
    rules: RuleSet,
    phase: EncounterPhase,
    combatants: Vec<Combatant>,
    turn_order: Vec<CombatantId>,
    turn_index: usize,
    declarations_open: bool,
    observers: Vec<Box<dyn EncounterObserver>>,
}

impl fmt::Debug for CombatEncounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatEncounter")
            .field("phase", &self.phase)
            .field("combatants", &self.combatants)
            .field("turn_order", &self.turn_order)
            .field("turn_index", &self.turn_index)
            .field("declarations_open", &self.declarations_open)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CombatEncounter {
    pub fn new(rules: RuleSet) -> Self {
        CombatEncounter {
            rules,
            phase: EncounterPhase::NotStarted,
            combatants: Vec::new(),
            turn_order: Vec::new(),
            turn_index: 0,
            declarations_open: false,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn EncounterObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn EncounterObserver>) {
        self.observers.push(observer);
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    /// Current round, or the last one played once ended; 0 before start
    pub fn round(&self) -> u32 {
        match self.phase {
            EncounterPhase::NotStarted => 0,
            EncounterPhase::Active { round } => round,
            EncounterPhase::Ended { rounds } => rounds,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, EncounterPhase::Active { .. })
    }

    pub fn declarations_open(&self) -> bool {
        self.declarations_open
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    pub fn turn_order(&self) -> &[CombatantId] {
        &self.turn_order
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.round() * self.rules.round_duration
    }

    // === Lifecycle ===

    /// NotStarted -> Active { round: 1 }
    pub fn start(&mut self) -> Result<(), EncounterError> {
        if self.phase != EncounterPhase::NotStarted {
            return Err(self.transition_error("start"));
        }

        for combatant in &mut self.combatants {
            combatant.round_reset();
        }
        self.phase = EncounterPhase::Active { round: 1 };
        self.order_turns();

        info!(combatants = self.combatants.len(), "encounter started");
        if self.rules.declarations {
            self.open_declarations();
        }
        Ok(())
    }

    /// Active { round: N } -> Active { round: N + 1 }
    ///
    /// Applies the configured initiative reset policy. With `Reroll` the
    /// roller is called once per roll the initiative strategy needs; if any
    /// roll fails the round does not advance.
    pub fn advance_round(&mut self, dice: &mut dyn DiceRoller) -> Result<u32, EncounterError> {
        let EncounterPhase::Active { round } = self.phase else {
            return Err(self.transition_error("advance the round"));
        };

        let mut next = self.combatants.clone();
        match self.rules.reset_policy {
            InitiativeResetPolicy::Hold => {}
            InitiativeResetPolicy::Reset => {
                for combatant in &mut next {
                    combatant.state.initiative = None;
                }
            }
            InitiativeResetPolicy::Reroll => {
                for combatant in &mut next {
                    combatant.state.initiative = None;
                }
                self.rules
                    .initiative
                    .roll(&mut next, self.rules.ability_scores.as_deref(), dice)?;
            }
        }
        for combatant in &mut next {
            combatant.round_reset();
        }

        self.combatants = next;
        let round = round + 1;
        self.phase = EncounterPhase::Active { round };
        self.order_turns();

        info!(round, policy = %self.rules.reset_policy, "round advanced");
        if self.rules.declarations {
            self.open_declarations();
        }
        Ok(round)
    }

    /// Active -> Ended; every combatant is zeroed
    pub fn end(&mut self) -> Result<(), EncounterError> {
        let EncounterPhase::Active { round } = self.phase else {
            return Err(self.transition_error("end"));
        };

        for combatant in &mut self.combatants {
            combatant.zero();
        }
        self.turn_order.clear();
        self.turn_index = 0;
        self.phase = EncounterPhase::Ended { rounds: round };
        self.close_declarations();

        info!(rounds = round, "encounter ended");
        Ok(())
    }

    // === Combatants ===

    /// Add a combatant with fresh state for its group
    pub fn add_combatant(&mut self, mut combatant: Combatant) -> Result<(), EncounterError> {
        if matches!(self.phase, EncounterPhase::Ended { .. }) {
            return Err(self.transition_error("add a combatant"));
        }
        if self.combatant(&combatant.id).is_some() {
            return Err(EncounterError::DuplicateCombatant(combatant.id));
        }

        combatant.state = CombatantState::joined(combatant.state.group);
        debug!(combatant = %combatant.id, group = ?combatant.state.group, "combatant joined");

        if self.is_active() {
            self.turn_order.push(combatant.id.clone());
        }
        self.combatants.push(combatant);
        Ok(())
    }

    /// Remove a combatant, returning it zeroed and marked untracked
    pub fn remove_combatant(&mut self, id: &CombatantId) -> Result<Combatant, EncounterError> {
        let index = self.index_of(id)?;
        let mut combatant = self.combatants.remove(index);
        combatant.untrack();

        if let Some(position) = self.turn_order.iter().position(|t| t == id) {
            self.turn_order.remove(position);
            if position < self.turn_index {
                self.turn_index -= 1;
            }
            if self.turn_index >= self.turn_order.len() {
                self.turn_index = 0;
            }
        }

        debug!(combatant = %id, "combatant left");
        Ok(combatant)
    }

    // === Initiative and turns ===

    /// Roll for every combatant awaiting initiative, then reorder
    ///
    /// Rolling closes the declaration phase.
    pub fn roll_initiative(&mut self, dice: &mut dyn DiceRoller) -> Result<(), EncounterError> {
        if matches!(self.phase, EncounterPhase::Ended { .. }) {
            return Err(self.transition_error("roll initiative"));
        }

        let mut next = self.combatants.clone();
        self.rules
            .initiative
            .roll(&mut next, self.rules.ability_scores.as_deref(), dice)?;
        self.combatants = next;

        self.close_declarations();
        self.order_turns();
        Ok(())
    }

    /// Assign (or clear) one combatant's initiative by hand
    pub fn set_initiative(&mut self, id: &CombatantId, value: Option<i32>) -> Result<(), EncounterError> {
        if matches!(self.phase, EncounterPhase::Ended { .. }) {
            return Err(self.transition_error("set initiative"));
        }
        let index = self.index_of(id)?;
        self.combatants[index].state.initiative = value;
        self.setup_turns();
        Ok(())
    }

    /// Recompute the turn order from current initiative values
    ///
    /// The active combatant keeps its turn when it is still in the order.
    pub fn setup_turns(&mut self) -> &[CombatantId] {
        let active = self.turn_order.get(self.turn_index).cloned();
        self.turn_order = self.rules.initiative.order(&self.combatants);
        self.turn_index = active
            .and_then(|id| self.turn_order.iter().position(|t| *t == id))
            .unwrap_or(0);
        &self.turn_order
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        if !self.is_active() {
            return None;
        }
        self.turn_order
            .get(self.turn_index)
            .and_then(|id| self.combatant(id))
    }

    /// Move to the next turn, starting a new round after the last one
    pub fn next_turn(&mut self, dice: &mut dyn DiceRoller) -> Result<Option<CombatantId>, EncounterError> {
        if !self.is_active() {
            return Err(self.transition_error("take a turn"));
        }

        if self.turn_index + 1 < self.turn_order.len() {
            self.turn_index += 1;
        } else {
            self.advance_round(dice)?;
        }
        Ok(self.active_combatant().map(|c| c.id.clone()))
    }

    // === Declarations ===

    /// Declare a maneuver for a combatant
    ///
    /// Participants may only declare for combatants they control, while the
    /// declaration phase is open and before initiative is assigned. A rejected
    /// declaration leaves the previous one in place.
    pub fn declare(
        &mut self,
        requester: &Requester,
        id: &CombatantId,
        maneuver: Maneuver,
    ) -> Result<(), EncounterError> {
        if matches!(self.phase, EncounterPhase::Ended { .. }) {
            return Err(self.transition_error("declare"));
        }
        let index = self.index_of(id)?;
        let combatant = &self.combatants[index];

        if let Err(e) = validate_declaration(combatant, requester, maneuver, self.declarations_open) {
            warn!(%requester, combatant = %id, %maneuver, error = %e, "declaration rejected");
            return Err(e);
        }

        self.combatants[index].state.declared_action = maneuver;
        debug!(%requester, combatant = %id, %maneuver, "maneuver declared");
        Ok(())
    }

    /// Declare by maneuver name, e.g. `"set-spear"`
    pub fn declare_named(
        &mut self,
        requester: &Requester,
        id: &CombatantId,
        name: &str,
    ) -> Result<(), EncounterError> {
        let maneuver: Maneuver = name.parse().map_err(|m| EncounterError::InvalidManeuver {
            maneuver: m,
            reason: "not a declarable maneuver".to_string(),
        })?;
        self.declare(requester, id, maneuver)
    }

    /// Close the declaration phase early; declarations already made stay
    pub fn abandon_declarations(&mut self) {
        if self.declarations_open {
            info!("declaration phase abandoned");
        }
        self.close_declarations();
    }

    // === Attacks ===

    /// Count an attack against the attacker and each target
    ///
    /// Every id is checked before anything is counted.
    pub fn record_attack(
        &mut self,
        attacker: &CombatantId,
        category: AttackCategory,
        targets: &[CombatantId],
    ) -> Result<(), EncounterError> {
        if !self.is_active() {
            return Err(self.transition_error("record an attack"));
        }
        let attacker_index = self.index_of(attacker)?;
        let target_indices = targets
            .iter()
            .map(|t| self.index_of(t))
            .collect::<Result<Vec<_>, _>>()?;

        self.combatants[attacker_index].state.attacks_made += 1;
        for index in target_indices {
            *self.combatants[index]
                .state
                .attacks_against
                .entry(category)
                .or_insert(0) += 1;
        }

        debug!(%attacker, %category, targets = targets.len(), "attack recorded");
        Ok(())
    }

    /// Feet a combatant may move this round, when encumbrance is tracked
    pub fn encounter_movement(&self, id: &CombatantId) -> Result<Option<u32>, EncounterError> {
        let combatant = self
            .combatant(id)
            .ok_or_else(|| EncounterError::UnknownCombatant(id.clone()))?;
        Ok(self
            .rules
            .encumbrance
            .as_ref()
            .map(|e| e.encounter_movement(&combatant.load)))
    }

    pub fn snapshot(&self) -> EncounterState {
        EncounterState {
            phase: self.phase,
            round: self.round(),
            turn_index: self.turn_index,
            ordered_combatant_ids: self.turn_order.clone(),
            initiative_reset_policy: self.rules.reset_policy,
            active_combatant: self.active_combatant().map(|c| c.id.clone()),
            declarations_open: self.declarations_open,
            elapsed_seconds: self.elapsed_seconds(),
        }
    }

    // === Internals ===

    fn index_of(&self, id: &CombatantId) -> Result<usize, EncounterError> {
        self.combatants
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| EncounterError::UnknownCombatant(id.clone()))
    }

    /// Fresh ordering with the first combatant up
    fn order_turns(&mut self) {
        self.turn_order = self.rules.initiative.order(&self.combatants);
        self.turn_index = 0;
    }

    fn transition_error(&self, action: &'static str) -> EncounterError {
        warn!(phase = %self.phase, action, "invalid encounter transition");
        EncounterError::StateTransition {
            from: self.phase,
            action,
        }
    }

    fn open_declarations(&mut self) {
        self.declarations_open = true;
        let round = self.round();
        for observer in &self.observers {
            observer.declarations_opened(round);
        }
    }

    fn close_declarations(&mut self) {
        if !self.declarations_open {
            return;
        }
        self.declarations_open = false;
        for observer in &self.observers {
            observer.declarations_closed();
        }
    }
}

fn validate_declaration(
    combatant: &Combatant,
    requester: &Requester,
    maneuver: Maneuver,
    declarations_open: bool,
) -> Result<(), EncounterError> {
    if !combatant.is_controlled_by(requester) {
        return Err(EncounterError::NotPermitted {
            requester: requester.to_string(),
            combatant: combatant.id.clone(),
        });
    }
    if !requester.is_referee() && !declarations_open {
        return Err(EncounterError::DeclarationLocked(combatant.id.clone()));
    }
    if !combatant.can_change_declared_action(requester) {
        return Err(EncounterError::DeclarationLocked(combatant.id.clone()));
    }
    if !maneuver.is_declarable() {
        return Err(EncounterError::InvalidManeuver {
            maneuver: maneuver.to_string(),
            reason: "not a declarable maneuver".to_string(),
        });
    }
    if !maneuver.allows(&combatant.classes) {
        return Err(EncounterError::InvalidManeuver {
            maneuver: maneuver.to_string(),
            reason: format!("not available to {}", combatant.name),
        });
    }
    Ok(())
}
