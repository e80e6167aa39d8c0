//! Rendering Surface - the contract tiles draw against.
//!
//! The surface knows only about elements. It doesn't understand tiles,
//! turns, or reconciliation. Tiles append elements, toggle state flags on
//! them, and start keyframe animations.
//!
//! ```text
//! ┌──────────────┐   append / animate / set_state   ┌───────────────┐
//! │     Tile     │ ───────────────────────────────▶ │    Surface    │
//! └──────────────┘                                  └───────────────┘
//!                                                           │
//!                                       remove_on_finish    ▼
//!                                                     element teardown
//! ```
//!
//! # Ownership
//!
//! [`ElementHandle`] is not `Clone`. Exactly one tile owns the
//! handle of a live element. Reconciliation moves it into the next tile; a
//! delete moves it into the surface, which drops the element once the
//! animation finishes.
//!
//! # Implementations
//!
//! - [`Stage`] - in-memory surface with its own animation scheduler
//! - [`preview::draw_strip`] - draws a `Stage` to a terminal

pub mod preview;
mod stage;

pub use stage::{AnimationRecord, Element, Stage, StageError};

use std::fmt;
use std::rc::Rc;

use crate::types::{Keyframe, PointerEvent, TileState, Timing};

// =============================================================================
// HANDLES
// =============================================================================

/// Plain identifier of a surface element. Copyable, for lookups only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el{}", self.0)
    }
}

/// Owning handle to a surface element.
#[derive(Debug, PartialEq, Eq)]
pub struct ElementHandle {
    id: ElementId,
}

impl ElementHandle {
    /// Mint a handle. Only surfaces should call this.
    pub fn new(id: ElementId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }
}

/// Identifier of a started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

// =============================================================================
// MARKUP
// =============================================================================

/// Static template of a tile element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub label: String,
}

impl Markup {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Stats line under a creature portrait.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub text: String,
    pub class: String,
}

/// Host callback bound to a pointer event on an element.
pub type Listener = Rc<dyn Fn()>;

// =============================================================================
// SURFACE TRAIT
// =============================================================================

/// An append-only container of tile elements with keyframe animation.
pub trait Surface {
    /// Append a new element built from `markup`.
    fn append(&mut self, markup: Markup) -> ElementHandle;

    /// Start an animation on `element`.
    ///
    /// A newer animation takes over the element's displayed transform; older
    /// ones keep running to completion. On finish the final keyframe is
    /// committed as the element's resting transform.
    fn animate(
        &mut self,
        element: &ElementHandle,
        keyframes: Vec<Keyframe>,
        timing: Timing,
    ) -> AnimationId;

    /// Remove `element` once `animation` finishes.
    ///
    /// If the animation already finished, the element is removed now.
    fn remove_on_finish(&mut self, animation: AnimationId, element: ElementHandle);

    /// Remove `element` immediately. Removing a missing element is a no-op.
    fn remove(&mut self, element: ElementHandle);

    /// Turn `flags` on or off, leaving other flags untouched.
    fn set_state(&mut self, element: &ElementHandle, flags: TileState, enabled: bool);

    fn set_z_index(&mut self, element: &ElementHandle, z_index: i32);

    fn set_stats(&mut self, element: &ElementHandle, stats: Stats);

    /// Bind a host listener to a pointer event on `element`.
    fn listen(&mut self, element: &ElementHandle, event: PointerEvent, listener: Listener);

    /// Drop every element and running animation, without animating.
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_lookup() {
        let markup = Markup {
            classes: vec!["vignette".into(), "roundmarker".into()],
            attributes: vec![("turn".into(), "3".into())],
            label: "Round 4".into(),
        };

        assert!(markup.has_class("roundmarker"));
        assert!(!markup.has_class("creature"));
        assert_eq!(markup.attribute("turn"), Some("3"));
        assert_eq!(markup.attribute("creatureid"), None);
    }

    #[test]
    fn test_element_handle_id() {
        let handle = ElementHandle::new(ElementId(4));
        assert_eq!(handle.id(), ElementId(4));
        assert_eq!(handle.id().to_string(), "el4");
    }
}
