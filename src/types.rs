//! Core types for turn-queue.
//!
//! Actors come from the turn-order engine. Transforms, keyframes and timings
//! are what tiles hand to the rendering surface.

use std::fmt;
use std::time::Duration;

// =============================================================================
// Identity
// =============================================================================

/// Actor identifier as reported by the turn-order engine.
pub type ActorId = u32;

/// Zero-based round counter. `NO_TURN` means no turn has been observed yet.
pub type TurnNumber = i32;

/// Sentinel turn number: nothing observed yet.
pub const NO_TURN: TurnNumber = -1;

// =============================================================================
// Actor
// =============================================================================

/// A creature as seen in one turn-order snapshot.
///
/// The queue never mutates actors. Each pass clones the snapshot's actors
/// into its tiles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Actor {
    /// Stable creature id.
    pub id: ActorId,
    /// Creature type, rendered as a `type<kind>` class.
    pub kind: String,
    /// Team (player) index, rendered as a `p<team>` class.
    pub team: u8,
    /// Raw delay flag. Unreliable on its own, see `DelayTracker`.
    pub delayed: bool,
    /// Temporary (unmaterialized) creature.
    pub temp: bool,
    /// Fatigue / stat text shown under the portrait.
    pub fatigue_text: String,
}

impl Actor {
    /// Create an undelayed, materialized actor.
    pub fn new(id: ActorId, team: u8) -> Self {
        Self {
            id,
            team,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_delayed(mut self, delayed: bool) -> Self {
        self.delayed = delayed;
        self
    }

    #[must_use]
    pub fn with_temp(mut self, temp: bool) -> Self {
        self.temp = temp;
        self
    }

    #[must_use]
    pub fn with_fatigue_text(mut self, text: impl Into<String>) -> Self {
        self.fatigue_text = text.into();
        self
    }
}

// =============================================================================
// Tile State (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Visual state flags toggled on a rendered tile element.
    ///
    /// Combine with bitwise OR: `TileState::ACTIVE | TileState::XRAY`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileState: u8 {
        const NONE = 0;
        const ACTIVE = 1 << 0;
        const MATERIALIZED = 1 << 1;
        const UNMATERIALIZED = 1 << 2;
        const DELAYED = 1 << 3;
        const XRAY = 1 << 4;
    }
}

impl TileState {
    /// Class names for the set flags, in declaration order.
    pub fn class_names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::ACTIVE) {
            names.push("active");
        }
        if self.contains(Self::MATERIALIZED) {
            names.push("materialized");
        }
        if self.contains(Self::UNMATERIALIZED) {
            names.push("unmaterialized");
        }
        if self.contains(Self::DELAYED) {
            names.push("delayed");
        }
        if self.contains(Self::XRAY) {
            names.push("xray");
        }
        names
    }
}

// =============================================================================
// Transform
// =============================================================================

/// 2D translate + uniform scale, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    pub const fn new(x: f32, y: f32, scale: f32) -> Self {
        Self { x, y, scale }
    }

    /// Linear interpolation towards `to`.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translateX({}px) translateY({}px) scale({})",
            self.x, self.y, self.scale
        )
    }
}

// =============================================================================
// Keyframes & Timing
// =============================================================================

/// Timing function applied to the segment starting at a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
}

impl Easing {
    /// Map linear progress `t` (0..=1) through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// One keyframe of a surface animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub transform: Transform,
    /// Easing for the segment that starts here.
    pub easing: Easing,
    /// Explicit offset (0..=1). `None` spreads keyframes evenly.
    pub offset: Option<f32>,
}

impl Keyframe {
    pub fn at(transform: Transform) -> Self {
        Self {
            transform,
            easing: Easing::Linear,
            offset: None,
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Whether the final keyframe keeps applying after the animation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    #[default]
    None,
    Forwards,
}

/// Duration and fill mode of one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub fill: Fill,
}

impl Timing {
    pub const fn forwards(duration: Duration) -> Self {
        Self {
            duration,
            fill: Fill::Forwards,
        }
    }

    pub const fn once(duration: Duration) -> Self {
        Self {
            duration,
            fill: Fill::None,
        }
    }
}

// =============================================================================
// Pointer Events
// =============================================================================

/// Pointer events a tile element can forward to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Click,
    MouseEnter,
    MouseLeave,
}
