//! Turn-Order Interface - what the queue consumes from the game engine.
//!
//! The engine hands over a [`TurnOrderSnapshot`] per pass. Its data is known
//! to be inconsistent in two ways, both absorbed here:
//!
//! - The active actor is usually missing from the snapshot queue, but not
//!   always. [`current_queue`] puts it back in front when missing.
//! - An actor's raw `delayed` flag can flip back while it is still delayed
//!   for the turn. [`DelayTracker`] remembers every actor seen delayed in the
//!   current and next turn, and is the only source of delay status.
//!
//! A third concern lives here too: hosts change actor data between passes
//! (stat text above all). [`LiveActors`] keeps one signal per actor id, shared
//! by every tile of that actor, so a refresh or a pointer event always sees
//! the latest data.
//!
//! # Delay state rotation
//!
//! ```text
//! turn N:    current = {..}   next = {3}
//! turn N+1:  current = {3}    next = {}      (rotated on turn change)
//! reset:     turn = -1, both sets cleared
//! ```

use std::collections::{HashMap, HashSet};

use spark_signals::{Signal, signal};
use tracing::debug;

use crate::types::{Actor, ActorId, NO_TURN, TurnNumber};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Turn order as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnOrderSnapshot {
    /// Actors still to act this turn.
    pub queue: Vec<Actor>,
    /// Actors in order for the next turn.
    pub next_queue: Vec<Actor>,
}

impl TurnOrderSnapshot {
    pub fn new(queue: Vec<Actor>, next_queue: Vec<Actor>) -> Self {
        Self { queue, next_queue }
    }
}

/// Every actor that still needs a turn, including `active`.
///
/// `active` is prepended when its id is missing from the queue and left in
/// place when present.
pub fn current_queue(snapshot: &TurnOrderSnapshot, active: Option<&Actor>) -> Vec<Actor> {
    let Some(active) = active else {
        return snapshot.queue.clone();
    };
    if snapshot.queue.iter().any(|a| a.id == active.id) {
        return snapshot.queue.clone();
    }

    let mut actors = Vec::with_capacity(snapshot.queue.len() + 1);
    actors.push(active.clone());
    actors.extend(snapshot.queue.iter().cloned());
    actors
}

pub fn next_queue(snapshot: &TurnOrderSnapshot) -> Vec<Actor> {
    snapshot.next_queue.clone()
}

// =============================================================================
// DELAY TRACKER
// =============================================================================

/// Delay status per actor for the current and the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayTracker {
    turn: TurnNumber,
    delayed_current: HashSet<ActorId>,
    delayed_next: HashSet<ActorId>,
}

impl Default for DelayTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayTracker {
    pub fn new() -> Self {
        Self {
            turn: NO_TURN,
            delayed_current: HashSet::new(),
            delayed_next: HashSet::new(),
        }
    }

    /// Forget everything: no turn observed, nobody delayed.
    pub fn reset(&mut self) {
        self.turn = NO_TURN;
        self.delayed_current.clear();
        self.delayed_next.clear();
    }

    /// Observed turn number, `NO_TURN` if none.
    pub fn turn_number(&self) -> TurnNumber {
        self.turn
    }

    pub fn delayed_current_turn(&self) -> &HashSet<ActorId> {
        &self.delayed_current
    }

    pub fn delayed_next_turn(&self) -> &HashSet<ActorId> {
        &self.delayed_next
    }

    /// Record the turn number of a new snapshot.
    ///
    /// Any change rotates the sets: next becomes current, next starts empty.
    /// Returns whether a rotation happened.
    pub fn set_turn_number(&mut self, turn: TurnNumber) -> bool {
        if turn == self.turn {
            return false;
        }
        debug!(from = self.turn, to = turn, "delay state rotated");
        self.turn = turn;
        self.delayed_current = std::mem::take(&mut self.delayed_next);
        true
    }

    /// Fold the raw delay flags of a snapshot into the tracked sets.
    ///
    /// Actors are never marked undelayed within a turn.
    pub fn observe(&mut self, current: &[Actor], next: &[Actor]) {
        for actor in current.iter().chain(next) {
            self.record(actor, current, next);
        }
    }

    /// Record one actor. An actor in both lists counts for the current turn.
    pub fn record(&mut self, actor: &Actor, current: &[Actor], next: &[Actor]) {
        if !actor.delayed {
            return;
        }
        if current.iter().any(|a| a.id == actor.id) {
            self.delayed_current.insert(actor.id);
        } else if next.iter().any(|a| a.id == actor.id) {
            self.delayed_next.insert(actor.id);
        }
    }

    /// Whether `actor_id` is delayed in `turn`.
    ///
    /// Only the observed turn and the one after it are known; any other turn
    /// reads as not delayed.
    pub fn is_delayed(&self, actor_id: ActorId, turn: TurnNumber) -> bool {
        if turn == self.turn {
            self.delayed_current.contains(&actor_id)
        } else if self.turn.checked_add(1) == Some(turn) {
            self.delayed_next.contains(&actor_id)
        } else {
            false
        }
    }
}

// =============================================================================
// LIVE ACTORS
// =============================================================================

/// One signal per actor id of the last snapshot.
///
/// Known ids get the new data on every sync, so tiles built in earlier passes
/// read current data through the same signal.
#[derive(Debug, Default)]
pub struct LiveActors {
    signals: HashMap<ActorId, Signal<Actor>>,
}

impl LiveActors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a snapshot in. Ids missing from both lists are dropped.
    ///
    /// An actor listed in both turns takes its current-turn data.
    pub fn sync(&mut self, current: &[Actor], next: &[Actor]) {
        let mut seen = HashSet::new();
        for actor in current.iter().chain(next) {
            if !seen.insert(actor.id) {
                continue;
            }
            match self.signals.get(&actor.id) {
                Some(live) => {
                    live.set(actor.clone());
                }
                None => {
                    self.signals.insert(actor.id, signal(actor.clone()));
                }
            }
        }
        self.signals.retain(|id, _| seen.contains(id));
    }

    pub fn get(&self, actor_id: ActorId) -> Option<Signal<Actor>> {
        self.signals.get(&actor_id).cloned()
    }

    /// Signal for `actor`, or a detached one if its id was never synced.
    pub fn live(&self, actor: &Actor) -> Signal<Actor> {
        self.get(actor.id).unwrap_or_else(|| signal(actor.clone()))
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
