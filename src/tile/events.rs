//! Host event pass-through.
//!
//! The queue never interprets pointer events. It binds the host's handlers
//! to tile elements on insert, each handler receiving the actor or the turn
//! number its tile stands for. Actor handlers read the live actor when the
//! event fires, so they see data from later passes.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use turn_queue::QueueEventHandlers;
//!
//! let handlers = QueueEventHandlers {
//!     on_actor_click: Some(Rc::new(|actor| println!("clicked {}", actor.id))),
//!     on_turn_end_mouse_enter: Some(Rc::new(|turn| println!("round {}", turn + 1))),
//!     ..Default::default()
//! };
//! ```

use std::rc::Rc;

use spark_signals::Signal;

use crate::surface::{ElementHandle, Listener, Surface};
use crate::types::{Actor, PointerEvent, TurnNumber};

pub type ActorHandler = Rc<dyn Fn(&Actor)>;
pub type TurnHandler = Rc<dyn Fn(TurnNumber)>;

/// Optional host callbacks for queue tiles.
#[derive(Clone, Default)]
pub struct QueueEventHandlers {
    pub on_actor_click: Option<ActorHandler>,
    pub on_actor_mouse_enter: Option<ActorHandler>,
    pub on_actor_mouse_leave: Option<ActorHandler>,
    pub on_delay_click: Option<TurnHandler>,
    pub on_delay_mouse_enter: Option<TurnHandler>,
    pub on_delay_mouse_leave: Option<TurnHandler>,
    pub on_turn_end_click: Option<TurnHandler>,
    pub on_turn_end_mouse_enter: Option<TurnHandler>,
    pub on_turn_end_mouse_leave: Option<TurnHandler>,
}

impl QueueEventHandlers {
    fn actor_handlers(&self) -> [(PointerEvent, &Option<ActorHandler>); 3] {
        [
            (PointerEvent::Click, &self.on_actor_click),
            (PointerEvent::MouseEnter, &self.on_actor_mouse_enter),
            (PointerEvent::MouseLeave, &self.on_actor_mouse_leave),
        ]
    }

    fn delay_handlers(&self) -> [(PointerEvent, &Option<TurnHandler>); 3] {
        [
            (PointerEvent::Click, &self.on_delay_click),
            (PointerEvent::MouseEnter, &self.on_delay_mouse_enter),
            (PointerEvent::MouseLeave, &self.on_delay_mouse_leave),
        ]
    }

    fn turn_end_handlers(&self) -> [(PointerEvent, &Option<TurnHandler>); 3] {
        [
            (PointerEvent::Click, &self.on_turn_end_click),
            (PointerEvent::MouseEnter, &self.on_turn_end_mouse_enter),
            (PointerEvent::MouseLeave, &self.on_turn_end_mouse_leave),
        ]
    }
}

/// Bind the actor handlers that are present to `element`.
pub(crate) fn bind_actor(
    surface: &mut impl Surface,
    element: &ElementHandle,
    handlers: &QueueEventHandlers,
    actor: &Signal<Actor>,
) {
    for (event, handler) in handlers.actor_handlers() {
        if let Some(handler) = handler {
            let handler = handler.clone();
            let actor = actor.clone();
            let listener: Listener = Rc::new(move || handler(&actor.get()));
            surface.listen(element, event, listener);
        }
    }
}

/// Bind the delay-marker handlers that are present to `element`.
pub(crate) fn bind_delay(
    surface: &mut impl Surface,
    element: &ElementHandle,
    handlers: &QueueEventHandlers,
    turn: TurnNumber,
) {
    bind_turn(surface, element, handlers.delay_handlers(), turn);
}

/// Bind the turn-end-marker handlers that are present to `element`.
pub(crate) fn bind_turn_end(
    surface: &mut impl Surface,
    element: &ElementHandle,
    handlers: &QueueEventHandlers,
    turn: TurnNumber,
) {
    bind_turn(surface, element, handlers.turn_end_handlers(), turn);
}

fn bind_turn(
    surface: &mut impl Surface,
    element: &ElementHandle,
    handlers: [(PointerEvent, &Option<TurnHandler>); 3],
    turn: TurnNumber,
) {
    for (event, handler) in handlers {
        if let Some(handler) = handler {
            let handler = handler.clone();
            let listener: Listener = Rc::new(move || handler(turn));
            surface.listen(element, event, listener);
        }
    }
}
