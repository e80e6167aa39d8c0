//! Queue Controller - owns the rendered strip and drives passes.
//!
//! Every pass rebuilds the tile sequence from the engine's snapshot and
//! reconciles it against what is on the surface:
//!
//! ```text
//! snapshot ──▶ DelayTracker ──▶ expand ──▶ reconcile ──▶ Surface
//!                  (owned)                     │
//!                                              ▼
//!                                     rendered tiles (owned)
//! ```
//!
//! # Signals
//!
//! Hosts that render reactively can subscribe to:
//! - [`TurnQueue::revision`] - bumped after every pass that changed the strip
//! - [`TurnQueue::xrayed`] - the actor currently highlighted
//!
//! Actor data is live too: [`TurnQueue::actor`] hands out the signal every
//! tile of that actor reads from. Change it, then [`TurnQueue::refresh`].
//!
//! # Example
//!
//! ```ignore
//! use turn_queue::{Actor, QueueEventHandlers, Stage, TurnOrderSnapshot, TurnQueue};
//!
//! let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());
//! let snapshot = TurnOrderSnapshot::new(vec![Actor::new(2, 0)], vec![Actor::new(1, 0)]);
//! queue.set_queue(&snapshot, Some(&Actor::new(1, 0)), 0);
//!
//! queue.surface_mut().advance(std::time::Duration::from_millis(16));
//! ```

use std::rc::Rc;
use std::time::{Duration, Instant};

use spark_signals::{Signal, signal};
use tracing::debug;

use crate::config::QueueConfig;
use crate::expander::expand;
use crate::reconciler::{offsets, reconcile};
use crate::surface::Surface;
use crate::tile::{QueueEventHandlers, Tile};
use crate::turn_order::{DelayTracker, LiveActors, TurnOrderSnapshot, current_queue, next_queue};
use crate::types::{Actor, ActorId, TurnNumber};

// =============================================================================
// TYPES
// =============================================================================

/// How [`TurnQueue::empty`] takes the strip down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyMode {
    /// Drop every element at once.
    #[default]
    Immediate,
    /// Animate every tile out.
    Animated,
}

/// Leading-edge throttle: the first call in a window runs, the rest are
/// dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether a call at `now` may run. A call that may run opens a new window.
    pub fn ready(&mut self, now: Instant) -> bool {
        let open = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window);
        if open {
            self.last = Some(now);
        }
        open
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// The turn queue of one game view.
pub struct TurnQueue<S: Surface> {
    surface: S,
    tiles: Vec<Tile>,
    handlers: Rc<QueueEventHandlers>,
    delays: DelayTracker,
    actors: LiveActors,
    config: QueueConfig,
    bounce: Throttle,
    revision: Signal<u64>,
    xrayed: Signal<Option<ActorId>>,
}

impl<S: Surface> TurnQueue<S> {
    pub fn new(surface: S, handlers: QueueEventHandlers) -> Self {
        Self::with_config(surface, handlers, QueueConfig::default())
    }

    /// Take over `surface`, clearing whatever it shows.
    pub fn with_config(mut surface: S, handlers: QueueEventHandlers, config: QueueConfig) -> Self {
        surface.clear();
        Self {
            surface,
            tiles: Vec::new(),
            handlers: Rc::new(handlers),
            delays: DelayTracker::new(),
            actors: LiveActors::new(),
            bounce: Throttle::new(config.bounce_window),
            config,
            revision: signal(0),
            xrayed: signal(None),
        }
    }

    /// Render a new snapshot of the turn order.
    ///
    /// `active` is the actor whose turn it is; the engine may or may not list
    /// it in the snapshot queue.
    pub fn set_queue(
        &mut self,
        snapshot: &TurnOrderSnapshot,
        active: Option<&Actor>,
        turn: TurnNumber,
    ) {
        self.delays.set_turn_number(turn);

        let current = current_queue(snapshot, active);
        let next = next_queue(snapshot);
        self.delays.observe(&current, &next);
        self.actors.sync(&current, &next);

        let tiles = expand(&current, &next, turn, &self.delays, &self.actors, &self.handlers);
        self.render(tiles);
    }

    /// Re-apply state and current actor data of every tile without animating.
    pub fn refresh(&mut self) {
        for tile in &self.tiles {
            tile.refresh(&mut self.surface);
        }
    }

    /// Take the strip down and forget all delay state.
    pub fn empty(&mut self, mode: EmptyMode) {
        self.delays.reset();
        self.actors.clear();
        match mode {
            EmptyMode::Immediate => {
                debug!(tiles = self.tiles.len(), "empty queue");
                self.tiles.clear();
                self.surface.clear();
                self.bump_revision();
            }
            EmptyMode::Animated => self.render(Vec::new()),
        }
    }

    /// Highlight the tiles of `actor_id`, clearing every other highlight.
    pub fn xray(&mut self, actor_id: ActorId) {
        for tile in &self.tiles {
            tile.xray(&mut self.surface, actor_id);
        }
        self.xrayed.set(Some(actor_id));
    }

    /// Bounce the tiles of `actor_id` to draw attention to them.
    ///
    /// Throttled: returns `false` if another bounce ran within the window.
    pub fn bounce(&mut self, actor_id: ActorId, height: Option<f32>) -> bool {
        self.bounce_at(actor_id, height, Instant::now())
    }

    /// [`bounce`](Self::bounce) with an explicit clock.
    pub fn bounce_at(&mut self, actor_id: ActorId, height: Option<f32>, now: Instant) -> bool {
        if !self.bounce.ready(now) {
            debug!(actor_id, "bounce dropped by throttle");
            return false;
        }

        let height = height.unwrap_or(self.config.bounce_height);
        let mut started = 0;
        for (index, (tile, x)) in self.tiles.iter().zip(offsets(&self.tiles)).enumerate() {
            if tile.bounce(&mut self.surface, actor_id, index, x, height, &self.config) {
                started += 1;
            }
        }
        debug!(actor_id, height, started, "bounce");
        true
    }

    fn render(&mut self, next: Vec<Tile>) {
        let prev = std::mem::take(&mut self.tiles);
        self.tiles = reconcile(prev, next, &mut self.surface, &self.config);
        self.bump_revision();
    }

    fn bump_revision(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

// =============================================================================
// ACCESSORS
// =============================================================================

impl<S: Surface> TurnQueue<S> {
    /// Tiles of the last pass, in strip order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn delays(&self) -> &DelayTracker {
        &self.delays
    }

    /// Live data of an actor in the last snapshot.
    pub fn actor(&self, actor_id: ActorId) -> Option<Signal<Actor>> {
        self.actors.get(actor_id)
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Pass counter, bumped after every pass.
    pub fn revision(&self) -> Signal<u64> {
        self.revision.clone()
    }

    pub fn xrayed(&self) -> Signal<Option<ActorId>> {
        self.xrayed.clone()
    }
}
