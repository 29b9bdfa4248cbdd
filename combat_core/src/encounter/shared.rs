//! Thread-safe encounter handle

use super::{CombatEncounter, EncounterError, EncounterState};
use std::sync::{Arc, Mutex};

/// Cloneable handle that serializes every call against one encounter
///
/// Each `with` call holds the lock for its whole closure, so requests from
/// different threads never interleave.
#[derive(Debug, Clone)]
pub struct SharedEncounter {
    inner: Arc<Mutex<CombatEncounter>>,
}

impl SharedEncounter {
    pub fn new(encounter: CombatEncounter) -> Self {
        SharedEncounter {
            inner: Arc::new(Mutex::new(encounter)),
        }
    }

    /// Run `f` with exclusive access to the encounter
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut CombatEncounter) -> Result<R, EncounterError>,
    ) -> Result<R, EncounterError> {
        let mut encounter = self
            .inner
            .lock()
            .map_err(|e| EncounterError::Poisoned(format!("Lock error: {}", e)))?;
        f(&mut encounter)
    }

    pub fn snapshot(&self) -> Result<EncounterState, EncounterError> {
        self.with(|e| Ok(e.snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::Combatant;
    use crate::rules::{IndividualInitiative, RuleSet};
    use crate::to_hit::ToHitResolver;
    use crate::types::{AttackCategory, CombatGroup, CombatantId};
    use std::thread;

    #[test]
    fn test_concurrent_attacks_all_counted() {
        let rules = RuleSet::new(ToHitResolver::DescendingThac0, Arc::new(IndividualInitiative));
        let mut encounter = CombatEncounter::new(rules);
        encounter
            .add_combatant(Combatant::new("a", "Archer", CombatGroup::Friendly))
            .unwrap();
        encounter
            .add_combatant(Combatant::new("t", "Troll", CombatGroup::Hostile))
            .unwrap();
        encounter.start().unwrap();

        let shared = SharedEncounter::new(encounter);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared
                            .with(|e| {
                                e.record_attack(
                                    &CombatantId::from("a"),
                                    AttackCategory::Missile,
                                    &[CombatantId::from("t")],
                                )
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (made, received) = shared
            .with(|e| {
                let a = e.combatant(&CombatantId::from("a")).map(|c| c.state.attacks_made);
                let t = e
                    .combatant(&CombatantId::from("t"))
                    .map(|c| c.state.attacks_against(AttackCategory::Missile));
                Ok((a, t))
            })
            .unwrap();
        assert_eq!(made, Some(200));
        assert_eq!(received, Some(200));
        assert_eq!(shared.snapshot().unwrap().round, 1);
    }

    #[test]
    fn test_failed_call_leaves_state() {
        let rules = RuleSet::new(ToHitResolver::DescendingThac0, Arc::new(IndividualInitiative));
        let shared = SharedEncounter::new(CombatEncounter::new(rules));
        let before = shared.snapshot().unwrap();
        assert!(shared.with(|e| e.end()).is_err());
        assert_eq!(shared.snapshot().unwrap(), before);
    }
}
