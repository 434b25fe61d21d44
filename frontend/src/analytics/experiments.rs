use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::storage::{experiment_key, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }
}

impl FromStr for Variant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Variant::A),
            "B" => Ok(Variant::B),
            _ => Err(()),
        }
    }
}

/// Durable A/B assignments, one per experiment id.
///
/// Every variant served is also held in memory, so an assignment stays fixed
/// for the page lifetime even when the store refuses writes.
pub struct ExperimentBook {
    store: Rc<dyn KeyValueStore>,
    rng: RefCell<StdRng>,
    assigned: RefCell<HashMap<String, Variant>>,
}

impl ExperimentBook {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: Rc<dyn KeyValueStore>, rng: StdRng) -> Self {
        Self {
            store,
            rng: RefCell::new(rng),
            assigned: RefCell::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, experiment_id: &str) -> Option<Variant> {
        if let Some(variant) = self.assigned.borrow().get(experiment_id) {
            return Some(*variant);
        }
        let raw = self.store.get(&experiment_key(experiment_id))?;
        match raw.parse() {
            Ok(variant) => {
                self.remember(experiment_id, variant);
                Some(variant)
            }
            Err(()) => {
                warn!(
                    "Ignoring unrecognized variant {:?} stored for experiment {}",
                    raw, experiment_id
                );
                None
            }
        }
    }

    /// Draws 50/50 and persists. Callers check `lookup` first.
    pub fn assign(&self, experiment_id: &str) -> Variant {
        let variant = if self.rng.borrow_mut().gen_bool(0.5) {
            Variant::A
        } else {
            Variant::B
        };
        self.remember(experiment_id, variant);
        if let Err(e) = self
            .store
            .set(&experiment_key(experiment_id), variant.as_str())
        {
            warn!(
                "Failed to persist variant for experiment {}: {}",
                experiment_id, e
            );
        }
        variant
    }

    fn remember(&self, experiment_id: &str, variant: Variant) {
        self.assigned
            .borrow_mut()
            .insert(experiment_id.to_string(), variant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::storage::{MemoryStore, StorageError};

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "QuotaExceededError".to_string(),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn assignment_is_persisted_and_read_back() {
        let store = Rc::new(MemoryStore::new());
        let book = ExperimentBook::with_rng(store.clone(), StdRng::seed_from_u64(7));
        assert_eq!(book.lookup("hero"), None);
        let variant = book.assign("hero");
        assert_eq!(book.lookup("hero"), Some(variant));
        assert_eq!(store.get("clinic_experiment_hero").as_deref(), Some(variant.as_str()));
    }

    #[test]
    fn unknown_stored_values_are_ignored() {
        let store = Rc::new(MemoryStore::new());
        store.set("clinic_experiment_hero", "C").unwrap();
        let book = ExperimentBook::new(store);
        assert_eq!(book.lookup("hero"), None);
    }

    #[test]
    fn draws_produce_both_variants() {
        let book = ExperimentBook::with_rng(Rc::new(MemoryStore::new()), StdRng::seed_from_u64(42));
        let drawn: Vec<Variant> = (0..64).map(|n| book.assign(&format!("exp_{}", n))).collect();
        assert!(drawn.contains(&Variant::A));
        assert!(drawn.contains(&Variant::B));
    }

    #[test]
    fn assignment_holds_when_store_rejects_writes() {
        let book = ExperimentBook::with_rng(Rc::new(ReadOnlyStore), StdRng::seed_from_u64(11));
        let variant = book.assign("hero");
        for _ in 0..10 {
            assert_eq!(book.lookup("hero"), Some(variant));
        }
    }
}
