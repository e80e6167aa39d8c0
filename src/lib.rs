//! # turn-queue
//!
//! Animated turn-order queue for turn-based games.
//!
//! Renders who acts next as a horizontal strip of tiles: creature portraits,
//! a turn-end marker between turns, and delay markers in front of actors that
//! postponed their turn. Every snapshot from the game engine produces a new
//! tile sequence, which is diffed against the rendered one so that only the
//! difference animates.
//!
//! ## Architecture
//!
//! ```text
//! TurnOrderSnapshot → DelayTracker → expand → reconcile → Surface
//! ```
//!
//! Tiles are identified by a semantic hash (`creature_id4_turn2`), never by
//! position. A tile keeping its hash across passes keeps its element and
//! slides; a new hash drops in; a vanished hash lifts out, or slides off the
//! front when the strip advanced.
//!
//! ## Modules
//!
//! - [`types`] - Actors, tile state flags, transforms and keyframes
//! - [`config`] - Animation and throttle configuration
//! - [`turn_order`] - Snapshot accessors, delay tracking, live actor data
//! - [`tile`] - Tile variants, lifecycle animations, host events
//! - [`expander`] - Actor lists to tile sequence
//! - [`reconciler`] - Keyed diff of two tile sequences
//! - [`surface`] - Rendering contract, in-memory stage, terminal preview
//! - [`queue`] - The controller tying it together

pub mod config;
pub mod expander;
pub mod queue;
pub mod reconciler;
pub mod surface;
pub mod tile;
pub mod turn_order;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use types::*;

pub use config::{ACTIVE_TILE_WIDTH, QueueConfig, TILE_WIDTH};

pub use expander::expand;

pub use queue::{EmptyMode, Throttle, TurnQueue};

pub use reconciler::{
    Placement, PlacementKind, Plan, Removal, RemovalKind, offsets, plan, reconcile,
};

pub use surface::{
    AnimationId, AnimationRecord, Element, ElementHandle, ElementId, Listener, Markup, Stage,
    StageError, Stats, Surface,
};

pub use tile::{CreatureTile, QueueEventHandlers, Tile, TileHash, TileKind};

pub use turn_order::{DelayTracker, LiveActors, TurnOrderSnapshot, current_queue, next_queue};
