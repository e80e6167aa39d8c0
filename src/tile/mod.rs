//! Tiles - the visual units of the queue strip.
//!
//! A tile is one of three kinds:
//! - [`TileKind::Creature`] - an actor's portrait for a given turn
//! - [`TileKind::TurnEnd`] - the boundary after a turn
//! - [`TileKind::Delay`] - separates actors that delayed from the rest
//!
//! # Identity
//!
//! Tiles are rebuilt from scratch on every pass. Two tiles are the same
//! logical tile iff their [`TileHash`]es are equal; the only thing carried
//! over is the rendered element, moved in by the reconciler.
//!
//! # Lifecycle
//!
//! - `insert` - append a fresh element and animate it in
//! - `update` - slide an existing element to its new offset
//! - `delete` / `delete_from_front` - consume the tile, animate out, and
//!   hand the element to the surface for removal when the animation ends

pub mod events;
pub mod motion;

pub use events::QueueEventHandlers;

use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;
use tracing::{trace, warn};

use crate::config::{ACTIVE_TILE_WIDTH, QueueConfig, TILE_WIDTH};
use crate::surface::{ElementHandle, Markup, Stats, Surface};
use crate::types::{Actor, ActorId, TileState, TurnNumber};
use crate::utils::to_class_name;

/// z-index of temporary creatures, above every queue position.
const TEMP_Z_INDEX: i32 = 1000;

// =============================================================================
// TYPES
// =============================================================================

/// Semantic identity of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHash(String);

impl TileHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of a creature tile.
#[derive(Debug, Clone)]
pub struct CreatureTile {
    /// Live actor data, shared with every other tile of the same actor.
    pub actor: Signal<Actor>,
    /// First creature tile of the pass: wider and scaled up.
    pub active: bool,
    /// Belongs to the current turn rather than the next one.
    pub current_turn: bool,
    /// Delay status as resolved by the delay tracker.
    pub delayed: bool,
}

impl CreatureTile {
    pub fn actor_id(&self) -> ActorId {
        self.actor.with(|a| a.id)
    }
}

#[derive(Debug, Clone)]
pub enum TileKind {
    Creature(CreatureTile),
    TurnEnd,
    Delay,
}

/// One tile of the queue strip.
pub struct Tile {
    kind: TileKind,
    turn: TurnNumber,
    position: Option<usize>,
    element: Option<ElementHandle>,
    handlers: Rc<QueueEventHandlers>,
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("hash", &self.hash())
            .field("position", &self.position)
            .field("element", &self.element)
            .finish()
    }
}

// =============================================================================
// CONSTRUCTION & IDENTITY
// =============================================================================

impl Tile {
    pub fn creature(
        creature: CreatureTile,
        turn: TurnNumber,
        handlers: Rc<QueueEventHandlers>,
    ) -> Self {
        Self::with_kind(TileKind::Creature(creature), turn, handlers)
    }

    pub fn turn_end(turn: TurnNumber, handlers: Rc<QueueEventHandlers>) -> Self {
        Self::with_kind(TileKind::TurnEnd, turn, handlers)
    }

    pub fn delay(turn: TurnNumber, handlers: Rc<QueueEventHandlers>) -> Self {
        Self::with_kind(TileKind::Delay, turn, handlers)
    }

    fn with_kind(kind: TileKind, turn: TurnNumber, handlers: Rc<QueueEventHandlers>) -> Self {
        Self {
            kind,
            turn,
            position: None,
            element: None,
            handlers,
        }
    }

    pub fn kind(&self) -> &TileKind {
        &self.kind
    }

    pub fn turn(&self) -> TurnNumber {
        self.turn
    }

    /// Queue position set by the last lifecycle op, if any.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn element(&self) -> Option<&ElementHandle> {
        self.element.as_ref()
    }

    pub(crate) fn take_element(&mut self) -> Option<ElementHandle> {
        self.element.take()
    }

    pub(crate) fn set_element(&mut self, element: ElementHandle) {
        self.element = Some(element);
    }

    pub fn creature_tile(&self) -> Option<&CreatureTile> {
        match &self.kind {
            TileKind::Creature(creature) => Some(creature),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.creature_tile().is_some_and(|c| c.active)
    }

    pub fn hash(&self) -> TileHash {
        TileHash(match &self.kind {
            TileKind::Creature(c) => format!("creature_id{}_turn{}", c.actor_id(), self.turn),
            TileKind::TurnEnd => format!("turnend_turn{}", self.turn),
            TileKind::Delay => format!("delay_turn{}", self.turn),
        })
    }

    /// Static template for a fresh element.
    pub fn markup(&self) -> Markup {
        match &self.kind {
            TileKind::Creature(c) => c.actor.with(|actor| Markup {
                classes: vec![
                    "vignette".into(),
                    "creature".into(),
                    format!("type{}", actor.kind),
                    format!("p{}", actor.team),
                ],
                attributes: vec![("creatureid".into(), actor.id.to_string())],
                label: format!("#{}", actor.id),
            }),
            TileKind::TurnEnd => Markup {
                classes: vec!["vignette".into(), "roundmarker".into()],
                attributes: vec![
                    ("turn".into(), self.turn.to_string()),
                    ("roundmarker".into(), "1".into()),
                ],
                label: format!("Round {}", i64::from(self.turn) + 1),
            },
            TileKind::Delay => Markup {
                classes: vec!["vignette".into(), "delaymarker".into()],
                attributes: Vec::new(),
                label: "Delayed".into(),
            },
        }
    }

    pub fn width(&self) -> f32 {
        if self.is_active() {
            ACTIVE_TILE_WIDTH
        } else {
            TILE_WIDTH
        }
    }

    fn scale(&self, config: &QueueConfig) -> f32 {
        if self.is_active() {
            config.active_scale
        } else {
            1.0
        }
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

impl Tile {
    /// Append a fresh element at `x` and animate it in.
    pub fn insert<S: Surface>(
        &mut self,
        surface: &mut S,
        position: usize,
        x: f32,
        config: &QueueConfig,
    ) {
        trace!(hash = %self.hash(), position, x, "insert");
        self.position = Some(position);
        if let Some(stale) = self.element.take() {
            surface.remove(stale);
        }

        let element = surface.append(self.markup());
        let handlers = &self.handlers;
        match &self.kind {
            TileKind::Creature(c) => events::bind_actor(surface, &element, handlers, &c.actor),
            TileKind::TurnEnd => events::bind_turn_end(surface, &element, handlers, self.turn),
            TileKind::Delay => events::bind_delay(surface, &element, handlers, self.turn),
        }

        let (keyframes, timing) = match self.kind {
            TileKind::Delay => motion::insert_delay_marker(x, config),
            _ => motion::insert(x, self.scale(config), config),
        };
        surface.animate(&element, keyframes, timing);
        self.element = Some(element);

        self.apply_state(surface);
    }

    /// Slide the existing element to `x`.
    ///
    /// A tile without an element is inserted instead.
    pub fn update<S: Surface>(
        &mut self,
        surface: &mut S,
        position: usize,
        x: f32,
        config: &QueueConfig,
    ) {
        if self.element.is_none() {
            warn!(hash = %self.hash(), position, "update without an element, inserting");
            self.insert(surface, position, x, config);
            return;
        }

        trace!(hash = %self.hash(), position, x, "update");
        self.position = Some(position);
        self.apply_state(surface);

        let (keyframes, timing) = motion::update(x, self.scale(config), config);
        if let Some(element) = &self.element {
            surface.animate(element, keyframes, timing);
        }
    }

    /// Animate out of the strip, then let the surface drop the element.
    pub fn delete<S: Surface>(
        mut self,
        surface: &mut S,
        position: usize,
        x: f32,
        config: &QueueConfig,
    ) {
        trace!(hash = %self.hash(), position, x, "delete");
        self.position = Some(position);
        let Some(element) = self.element.take() else {
            warn!(hash = %self.hash(), "delete without an element");
            return;
        };

        let (keyframes, timing) = match &self.kind {
            TileKind::Creature(c) => {
                surface.set_z_index(&element, -1);
                if c.active {
                    motion::delete_active(self.width(), config)
                } else {
                    motion::delete(x, config)
                }
            }
            _ => motion::delete(x, config),
        };
        let animation = surface.animate(&element, keyframes, timing);
        surface.remove_on_finish(animation, element);
    }

    /// Slide left by `gap` with the rest of the strip, then drop the element.
    pub fn delete_from_front<S: Surface>(
        mut self,
        surface: &mut S,
        position: usize,
        x: f32,
        gap: f32,
        config: &QueueConfig,
    ) {
        trace!(hash = %self.hash(), position, x, gap, "delete from front");
        self.position = Some(position);
        let Some(element) = self.element.take() else {
            warn!(hash = %self.hash(), "delete without an element");
            return;
        };

        let (keyframes, timing) = motion::delete_from_front(x, gap, self.scale(config), config);
        let animation = surface.animate(&element, keyframes, timing);
        surface.remove_on_finish(animation, element);
    }
}

// =============================================================================
// OUT-OF-BAND UPDATES
// =============================================================================

impl Tile {
    /// Re-apply the tile's state and the actor's current data to its
    /// element, without animating.
    pub fn refresh<S: Surface>(&self, surface: &mut S) {
        self.apply_state(surface);
    }

    /// Highlight this tile iff it stands for `actor_id`.
    pub fn xray<S: Surface>(&self, surface: &mut S, actor_id: ActorId) {
        if let (TileKind::Creature(c), Some(element)) = (&self.kind, &self.element) {
            surface.set_state(element, TileState::XRAY, c.actor_id() == actor_id);
        }
    }

    /// Bounce this tile if it stands for `actor_id`.
    ///
    /// Returns whether an animation was started.
    pub fn bounce<S: Surface>(
        &self,
        surface: &mut S,
        actor_id: ActorId,
        index: usize,
        x: f32,
        height: f32,
        config: &QueueConfig,
    ) -> bool {
        let (TileKind::Creature(c), Some(element)) = (&self.kind, &self.element) else {
            return false;
        };
        if c.actor_id() != actor_id {
            return false;
        }

        let scale = if index == 0 { config.active_scale } else { 1.0 };
        let (keyframes, timing) = motion::bounce(x, height, scale, config);
        surface.animate(element, keyframes, timing);
        true
    }

    fn apply_state<S: Surface>(&self, surface: &mut S) {
        let (TileKind::Creature(c), Some(element)) = (&self.kind, &self.element) else {
            return;
        };
        let actor = c.actor.get();

        surface.set_state(element, TileState::ACTIVE, c.active);
        surface.set_state(element, TileState::UNMATERIALIZED, actor.temp);
        surface.set_state(element, TileState::MATERIALIZED, !actor.temp);
        surface.set_state(element, TileState::DELAYED, c.delayed && c.current_turn);

        let z_index = if actor.temp {
            TEMP_Z_INDEX
        } else {
            self.position.map_or(0, |p| p as i32 + 1)
        };
        surface.set_z_index(element, z_index);

        surface.set_stats(
            element,
            Stats {
                class: to_class_name(&actor.fatigue_text),
                text: actor.fatigue_text,
            },
        );
    }
}
