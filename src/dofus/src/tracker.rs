//! Creature ledger ownership and persistence.
//!
//! A [`Tracker`] owns the tracked creatures and the active selection of
//! one user namespace. Mutations are committed in two phases: the next
//! snapshot is built aside and written through the [`LedgerStore`]; only
//! when the write succeeds does it replace the in-memory state and get
//! announced to subscribers. A failed write leaves everything as it was.

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::allocation::{self, AllocationError, Offer};
use crate::items::ItemRef;
use crate::ledger::{AppliedResource, CreatureId, CreatureProgress, NewCreature};

/// Failure reported by a ledger store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Persisted state of one namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub creatures: Vec<CreatureProgress>,
    #[serde(default)]
    pub active: Option<CreatureId>,
}

/// Key-value storage for ledger snapshots, last write wins
pub trait LedgerStore {
    /// Load the snapshot of `namespace`, empty if nothing was saved yet
    fn load_ledger(&self, namespace: &str) -> Result<LedgerSnapshot, StoreError>;

    /// Replace the snapshot of `namespace` atomically
    fn save_ledger(&mut self, namespace: &str, snapshot: &LedgerSnapshot) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackerError {
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("No tracked creature with id {0}")]
    UnknownCreature(CreatureId),

    #[error("Creature {creature} has no applied resource at position {index}")]
    UnknownResource { creature: CreatureId, index: usize },

    #[error("The creature already reached its experience ceiling")]
    AlreadyComplete,

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Could not save the ledger: {0}")]
    Persistence(#[from] StoreError),
}

/// Change committed to the ledger.
///
/// Events that modify a creature carry its committed state, so a view
/// holding its own copy can stay in sync with [`LedgerEvent::apply_to`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    CreatureAdded(CreatureProgress),
    CreatureRemoved(CreatureId),
    Selected(Option<CreatureId>),
    ResourceApplied {
        index: usize,
        creature: CreatureProgress,
    },
    ResourceRemoved {
        index: usize,
        creature: CreatureProgress,
    },
}

impl LedgerEvent {
    /// Committed state of the creature this event modified
    pub fn creature(&self) -> Option<&CreatureProgress> {
        match self {
            Self::CreatureAdded(creature)
            | Self::ResourceApplied { creature, .. }
            | Self::ResourceRemoved { creature, .. } => Some(creature),
            Self::CreatureRemoved(_) | Self::Selected(_) => None,
        }
    }

    /// Replay this event on a copy of the creature list
    pub fn apply_to(&self, creatures: &mut Vec<CreatureProgress>) {
        if let Self::CreatureRemoved(id) = self {
            creatures.retain(|c| c.id != *id);
            return;
        }
        let Some(updated) = self.creature() else {
            return;
        };
        match creatures.iter_mut().find(|c| c.id == updated.id) {
            Some(copy) => *copy = updated.clone(),
            None => creatures.push(updated.clone()),
        }
    }
}

pub struct Tracker<S: LedgerStore> {
    store: S,
    namespace: String,
    state: LedgerSnapshot,
    subscribers: Vec<Sender<LedgerEvent>>,
}

impl<S: LedgerStore> Tracker<S> {
    /// Load the ledger of `namespace` from `store`.
    ///
    /// Derived fields are recomputed and a selection pointing at a missing
    /// creature is dropped.
    pub fn open(store: S, namespace: impl Into<String>) -> Result<Self, TrackerError> {
        let namespace = namespace.into();
        let mut state = store.load_ledger(&namespace)?;

        for creature in &mut state.creatures {
            creature.recompute();
        }
        if let Some(active) = state.active {
            if !state.creatures.iter().any(|c| c.id == active) {
                tracing::debug!(active, "dropping dangling selection");
                state.active = None;
            }
        }

        Ok(Self {
            store,
            namespace,
            state,
            subscribers: Vec::new(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.state
    }

    pub fn creatures(&self) -> &[CreatureProgress] {
        &self.state.creatures
    }

    pub fn get(&self, id: CreatureId) -> Option<&CreatureProgress> {
        self.state.creatures.iter().find(|c| c.id == id)
    }

    /// The selected creature, if any
    pub fn active(&self) -> Option<&CreatureProgress> {
        self.state.active.and_then(|id| self.get(id))
    }

    /// Receive every committed change from now on
    pub fn subscribe(&mut self) -> Receiver<LedgerEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Start tracking a creature. It becomes the active one when nothing
    /// is selected yet.
    pub fn add_creature(
        &mut self,
        new: NewCreature,
        xp_ceiling: Option<u64>,
    ) -> Result<CreatureId, TrackerError> {
        let creature = new.creature.ok_or(TrackerError::MissingInput("creature"))?;
        let xp_ceiling = xp_ceiling.ok_or(TrackerError::MissingInput("experience table"))?;

        let id = self.state.creatures.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let progress = CreatureProgress::new(
            id,
            creature,
            new.starting_xp,
            xp_ceiling,
            new.purchase_price,
        );
        let mut next = self.state.clone();
        next.creatures.push(progress.clone());
        if next.active.is_none() {
            next.active = Some(id);
        }

        self.commit(next, LedgerEvent::CreatureAdded(progress))?;
        Ok(id)
    }

    pub fn select(&mut self, id: Option<CreatureId>) -> Result<(), TrackerError> {
        if let Some(id) = id {
            self.get(id).ok_or(TrackerError::UnknownCreature(id))?;
        }
        let mut next = self.state.clone();
        next.active = id;
        self.commit(next, LedgerEvent::Selected(id))
    }

    /// Allocate from `offer` toward the active creature and record it
    pub fn apply_offer(
        &mut self,
        item: ItemRef,
        offer: &Offer,
    ) -> Result<AppliedResource, TrackerError> {
        let resource = allocation::allocate(self.active(), item, offer)?;
        if resource.quantity == 0 {
            return Err(TrackerError::AlreadyComplete);
        }

        let mut next = self.state.clone();
        let active = next.active.ok_or(AllocationError::NoActiveCreature)?;
        let creature = next
            .creatures
            .iter_mut()
            .find(|c| c.id == active)
            .ok_or(TrackerError::UnknownCreature(active))?;
        creature.apply(resource.clone());
        let event = LedgerEvent::ResourceApplied {
            index: creature.applied_resources.len() - 1,
            creature: creature.clone(),
        };

        self.commit(next, event)?;
        Ok(resource)
    }

    pub fn remove_resource(
        &mut self,
        creature: CreatureId,
        index: usize,
    ) -> Result<AppliedResource, TrackerError> {
        let mut next = self.state.clone();
        let progress = next
            .creatures
            .iter_mut()
            .find(|c| c.id == creature)
            .ok_or(TrackerError::UnknownCreature(creature))?;
        let removed = progress
            .remove_resource(index)
            .ok_or(TrackerError::UnknownResource { creature, index })?;
        let event = LedgerEvent::ResourceRemoved {
            index,
            creature: progress.clone(),
        };

        self.commit(next, event)?;
        Ok(removed)
    }

    /// Stop tracking a creature, clearing the selection if it was active
    pub fn remove_creature(&mut self, id: CreatureId) -> Result<CreatureProgress, TrackerError> {
        let mut next = self.state.clone();
        let position = next
            .creatures
            .iter()
            .position(|c| c.id == id)
            .ok_or(TrackerError::UnknownCreature(id))?;
        let removed = next.creatures.remove(position);
        if next.active == Some(id) {
            next.active = None;
        }

        self.commit(next, LedgerEvent::CreatureRemoved(id))?;
        Ok(removed)
    }

    fn commit(&mut self, next: LedgerSnapshot, event: LedgerEvent) -> Result<(), TrackerError> {
        self.store.save_ledger(&self.namespace, &next)?;
        self.state = next;

        tracing::debug!(
            namespace = %self.namespace,
            creature = event.creature().map(|c| c.id),
            "ledger committed"
        );
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        Ok(())
    }
}
