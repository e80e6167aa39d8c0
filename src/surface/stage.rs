//! Stage - in-memory rendering surface with its own animation clock.
//!
//! Elements live in append order. Animations are driven by [`Stage::advance`]:
//! the host calls it from its frame loop (or a test calls it directly), and
//! every animation whose duration has elapsed is finished in start order.
//!
//! # Finishing an animation
//!
//! 1. With `Fill::Forwards`, the final keyframe becomes the element's
//!    resting transform (commit-styles-on-finish), unless a newer animation
//!    on the same element already committed.
//! 2. Elements registered through `remove_on_finish` are dropped.
//!
//! Nothing is ever cancelled. A second animation on the same element takes
//! over the displayed transform while the first keeps its own clock.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use super::{AnimationId, ElementHandle, ElementId, Listener, Markup, Stats, Surface};
use crate::types::{Easing, Fill, Keyframe, PointerEvent, TileState, Timing, Transform};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("no element {0} on stage")]
    UnknownElement(ElementId),
}

/// One element on the stage.
pub struct Element {
    id: ElementId,
    markup: Markup,
    state: TileState,
    z_index: i32,
    stats: Stats,
    resting: Transform,
    committed: Option<AnimationId>,
    listeners: HashMap<PointerEvent, Vec<Listener>>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Transform committed by the last finished fill-forwards animation.
    pub fn resting_transform(&self) -> Transform {
        self.resting
    }

    pub fn listener_count(&self, event: PointerEvent) -> usize {
        self.listeners.get(&event).map(Vec::len).unwrap_or(0)
    }
}

/// Log entry for every animation started on the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecord {
    pub id: AnimationId,
    pub element: ElementId,
    pub keyframes: Vec<Keyframe>,
    pub timing: Timing,
}

struct Playback {
    id: AnimationId,
    element: ElementId,
    keyframes: Vec<Keyframe>,
    timing: Timing,
    /// Displayed transform when the animation started.
    from: Transform,
    elapsed: Duration,
    teardown: Vec<ElementHandle>,
}

impl Playback {
    fn progress(&self) -> f32 {
        if self.timing.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.timing.duration.as_secs_f32()).min(1.0)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.timing.duration
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// In-memory [`Surface`] implementation.
#[derive(Default)]
pub struct Stage {
    elements: Vec<Element>,
    running: Vec<Playback>,
    history: Vec<AnimationRecord>,
    next_element: u64,
    next_animation: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in append order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of animations still running.
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Every animation started since the last `take_history`.
    pub fn history(&self) -> &[AnimationRecord] {
        &self.history
    }

    pub fn take_history(&mut self) -> Vec<AnimationRecord> {
        std::mem::take(&mut self.history)
    }

    /// Transform currently displayed for `id`.
    ///
    /// The most recently started running animation wins. Without one, the
    /// element shows its resting transform.
    pub fn transform_of(&self, id: ElementId) -> Option<Transform> {
        let element = self.element(id)?;
        let playback = self.running.iter().rev().find(|p| p.element == id);
        Some(match playback {
            Some(p) => sample(p.from, &p.keyframes, p.progress()),
            None => element.resting,
        })
    }

    /// Move the animation clock forward by `dt`.
    ///
    /// Returns the number of animations that finished.
    pub fn advance(&mut self, dt: Duration) -> usize {
        for playback in &mut self.running {
            playback.elapsed += dt;
        }

        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.running)
            .into_iter()
            .partition(Playback::is_finished);
        self.running = running;

        let count = finished.len();
        for playback in finished {
            if playback.timing.fill == Fill::Forwards {
                let last = playback.keyframes.last().map(|k| k.transform);
                if let (Some(transform), Some(element)) = (last, self.element_mut(playback.element))
                    && element.committed.is_none_or(|newest| newest < playback.id)
                {
                    element.resting = transform;
                    element.committed = Some(playback.id);
                }
            }
            for handle in playback.teardown {
                self.remove(handle);
            }
        }
        count
    }

    /// Run every animation to completion, including ones started by teardown.
    pub fn finish_all(&mut self) -> usize {
        let mut total = 0;
        while let Some(remaining) = self
            .running
            .iter()
            .map(|p| p.timing.duration.saturating_sub(p.elapsed))
            .max()
        {
            total += self.advance(remaining);
        }
        total
    }

    /// Fire the host listeners bound to `event` on element `id`.
    ///
    /// Returns how many listeners ran.
    pub fn dispatch(&self, id: ElementId, event: PointerEvent) -> Result<usize, StageError> {
        let element = self.element(id).ok_or(StageError::UnknownElement(id))?;
        let listeners = element.listeners.get(&event).cloned().unwrap_or_default();
        for listener in &listeners {
            listener();
        }
        Ok(listeners.len())
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

impl Surface for Stage {
    fn append(&mut self, markup: Markup) -> ElementHandle {
        let id = ElementId(self.next_element);
        self.next_element += 1;

        self.elements.push(Element {
            id,
            markup,
            state: TileState::NONE,
            z_index: 0,
            stats: Stats::default(),
            resting: Transform::IDENTITY,
            committed: None,
            listeners: HashMap::new(),
        });
        ElementHandle::new(id)
    }

    fn animate(
        &mut self,
        element: &ElementHandle,
        keyframes: Vec<Keyframe>,
        timing: Timing,
    ) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation += 1;

        let from = self.transform_of(element.id()).unwrap_or_default();
        self.history.push(AnimationRecord {
            id,
            element: element.id(),
            keyframes: keyframes.clone(),
            timing,
        });
        self.running.push(Playback {
            id,
            element: element.id(),
            keyframes,
            timing,
            from,
            elapsed: Duration::ZERO,
            teardown: Vec::new(),
        });
        id
    }

    fn remove_on_finish(&mut self, animation: AnimationId, element: ElementHandle) {
        match self.running.iter_mut().find(|p| p.id == animation) {
            Some(playback) => playback.teardown.push(element),
            None => self.remove(element),
        }
    }

    fn remove(&mut self, element: ElementHandle) {
        self.elements.retain(|e| e.id != element.id());
    }

    fn set_state(&mut self, element: &ElementHandle, flags: TileState, enabled: bool) {
        if let Some(el) = self.element_mut(element.id()) {
            el.state.set(flags, enabled);
        }
    }

    fn set_z_index(&mut self, element: &ElementHandle, z_index: i32) {
        if let Some(el) = self.element_mut(element.id()) {
            el.z_index = z_index;
        }
    }

    fn set_stats(&mut self, element: &ElementHandle, stats: Stats) {
        if let Some(el) = self.element_mut(element.id()) {
            el.stats = stats;
        }
    }

    fn listen(&mut self, element: &ElementHandle, event: PointerEvent, listener: Listener) {
        if let Some(el) = self.element_mut(element.id()) {
            el.listeners.entry(event).or_default().push(listener);
        }
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.running.clear();
    }
}

// =============================================================================
// SAMPLING
// =============================================================================

/// Sample a keyframe track at `progress` (0..=1).
///
/// A single keyframe animates from `from`, the transform displayed when the
/// animation started. Keyframes without an explicit offset are spread
/// evenly over the track.
fn sample(from: Transform, keyframes: &[Keyframe], progress: f32) -> Transform {
    let stops: Vec<(f32, Transform, Easing)> = match keyframes {
        [] => return from,
        [only] => vec![(0.0, from, only.easing), (1.0, only.transform, Easing::Linear)],
        _ => {
            let last = (keyframes.len() - 1) as f32;
            keyframes
                .iter()
                .enumerate()
                .map(|(i, k)| (k.offset.unwrap_or(i as f32 / last), k.transform, k.easing))
                .collect()
        }
    };

    let Some(start) = stops.iter().rposition(|(offset, _, _)| *offset <= progress) else {
        return stops[0].1;
    };
    let Some(end) = stops.get(start + 1) else {
        return stops[start].1;
    };

    let (start_offset, start_transform, easing) = stops[start];
    let span = end.0 - start_offset;
    let local = if span > 0.0 {
        (progress - start_offset) / span
    } else {
        1.0
    };
    start_transform.lerp(end.1, easing.apply(local))
}
