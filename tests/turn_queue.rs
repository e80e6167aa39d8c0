//! End-to-end passes through `TurnQueue` on an in-memory `Stage`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use turn_queue::surface::preview::draw_strip;
use turn_queue::{
    Actor, ActorId, EmptyMode, PointerEvent, QueueEventHandlers, Stage, TileState, Transform,
    TurnNumber, TurnOrderSnapshot, TurnQueue, offsets,
};

fn actor(id: ActorId) -> Actor {
    Actor::new(id, 1).with_kind("Goblin")
}

fn snapshot(current: &[ActorId], next: &[ActorId]) -> TurnOrderSnapshot {
    TurnOrderSnapshot::new(
        current.iter().map(|&id| actor(id)).collect(),
        next.iter().map(|&id| actor(id)).collect(),
    )
}

fn hashes(queue: &TurnQueue<Stage>) -> Vec<String> {
    queue.tiles().iter().map(|t| t.hash().to_string()).collect()
}

/// Displayed transform of every rendered tile, in strip order.
fn displayed(queue: &TurnQueue<Stage>) -> Vec<Transform> {
    queue
        .tiles()
        .iter()
        .filter_map(|t| t.element())
        .filter_map(|e| queue.surface().transform_of(e.id()))
        .collect()
}

#[test]
fn test_turn_advance_slides_strip_left() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());

    // Actor 1 acts, 2 and 3 follow
    queue.set_queue(&snapshot(&[2, 3], &[1, 2, 3]), Some(&actor(1)), 0);
    queue.surface_mut().finish_all();
    let element_of_2 = queue.tiles()[1].element().unwrap().id();

    // Actor 1 done, 2 acts
    queue.set_queue(&snapshot(&[3], &[1, 2, 3]), Some(&actor(2)), 0);

    assert_eq!(
        hashes(&queue),
        vec![
            "creature_id2_turn0",
            "creature_id3_turn0",
            "turnend_turn0",
            "creature_id1_turn1",
            "creature_id2_turn1",
            "creature_id3_turn1",
        ]
    );
    // 2 kept its element and becomes the active tile
    assert_eq!(queue.tiles()[0].element().unwrap().id(), element_of_2);

    // The old active tile is still on stage until its exit finishes
    assert_eq!(queue.surface().len(), 7);
    queue.surface_mut().finish_all();
    assert_eq!(queue.surface().len(), 6);

    assert_eq!(
        displayed(&queue),
        vec![
            Transform::new(0.0, 0.0, 1.25),
            Transform::new(100.0, 0.0, 1.0),
            Transform::new(180.0, 0.0, 1.0),
            Transform::new(260.0, 0.0, 1.0),
            Transform::new(340.0, 0.0, 1.0),
            Transform::new(420.0, 0.0, 1.0),
        ]
    );

    let active = queue.tiles()[0].element().unwrap().id();
    let state = queue.surface().element(active).unwrap().state();
    assert!(state.contains(TileState::ACTIVE));
}

#[test]
fn test_new_turn_drops_previous_turn_marker() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());

    queue.set_queue(&snapshot(&[], &[1, 2]), Some(&actor(3)), 0);
    queue.surface_mut().finish_all();

    queue.set_queue(&snapshot(&[2], &[1, 2]), Some(&actor(1)), 1);
    queue.surface_mut().finish_all();

    assert_eq!(
        hashes(&queue),
        vec![
            "creature_id1_turn1",
            "creature_id2_turn1",
            "turnend_turn1",
            "creature_id1_turn2",
            "creature_id2_turn2",
        ]
    );
    assert_eq!(queue.surface().len(), 5);
}

#[test]
fn test_delayed_actor_gets_marker_and_flag() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());

    let snapshot = TurnOrderSnapshot::new(
        vec![actor(2), actor(3).with_delayed(true)],
        vec![actor(1), actor(2), actor(3)],
    );
    queue.set_queue(&snapshot, Some(&actor(1)), 0);

    assert_eq!(
        &hashes(&queue)[..4],
        &["creature_id1_turn0", "creature_id2_turn0", "delay_turn0", "creature_id3_turn0"]
    );

    let delayed = queue.tiles()[3].element().unwrap().id();
    let state = queue.surface().element(delayed).unwrap().state();
    assert!(state.contains(TileState::DELAYED));
    assert_eq!(queue.revision().get(), 1);
}

#[test]
fn test_host_handlers_receive_actor_and_turn() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let on_click = seen.clone();
    let on_enter = seen.clone();
    let handlers = QueueEventHandlers {
        on_actor_click: Some(Rc::new(move |a: &Actor| {
            on_click.borrow_mut().push(format!("actor {}", a.id))
        })),
        on_turn_end_mouse_enter: Some(Rc::new(move |turn: TurnNumber| {
            on_enter.borrow_mut().push(format!("turn {turn}"))
        })),
        ..Default::default()
    };
    let mut queue = TurnQueue::new(Stage::new(), handlers);
    queue.set_queue(&snapshot(&[4], &[]), None, 6);

    let creature = queue.tiles()[0].element().unwrap().id();
    let marker = queue.tiles()[1].element().unwrap().id();
    queue.surface().dispatch(creature, PointerEvent::Click).unwrap();
    queue.surface().dispatch(marker, PointerEvent::MouseEnter).unwrap();
    assert_eq!(queue.surface().dispatch(marker, PointerEvent::Click), Ok(0));

    assert_eq!(*seen.borrow(), vec!["actor 4", "turn 6"]);
}

#[test]
fn test_bounce_plays_and_returns_to_rest() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());
    queue.set_queue(&snapshot(&[1, 2], &[]), None, 0);
    queue.surface_mut().finish_all();

    assert!(queue.bounce(2, None));
    let element = queue.tiles()[1].element().unwrap().id();

    queue.surface_mut().advance(Duration::from_millis(140));
    let mid = queue.surface().transform_of(element).unwrap();
    assert!(mid.y > 0.0);

    queue.surface_mut().finish_all();
    assert_eq!(
        queue.surface().transform_of(element),
        Some(Transform::new(100.0, 0.0, 1.0))
    );
}

#[test]
fn test_refresh_shows_stat_change_from_host() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());
    let snapshot = TurnOrderSnapshot::new(vec![actor(1).with_fatigue_text("Fresh")], vec![]);
    queue.set_queue(&snapshot, None, 0);
    let element = queue.tiles()[0].element().unwrap().id();

    let live = queue.actor(1).unwrap();
    live.update(|a| a.fatigue_text = "Exhausted".into());
    queue.refresh();

    let stats = queue.surface().element(element).unwrap().stats();
    assert_eq!(stats.text, "Exhausted");
    assert_eq!(stats.class, "exhausted");
    assert_eq!(live.get().fatigue_text, "Exhausted");
}

#[test]
fn test_handlers_see_actor_data_from_later_pass() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let on_click = seen.clone();
    let handlers = QueueEventHandlers {
        on_actor_click: Some(Rc::new(move |a: &Actor| {
            on_click.borrow_mut().push(a.fatigue_text.clone())
        })),
        ..Default::default()
    };
    let mut queue = TurnQueue::new(Stage::new(), handlers);

    let fresh = TurnOrderSnapshot::new(vec![actor(1).with_fatigue_text("Fresh")], vec![]);
    queue.set_queue(&fresh, None, 0);
    let element = queue.tiles()[0].element().unwrap().id();

    let tired = TurnOrderSnapshot::new(vec![actor(1).with_fatigue_text("Tired")], vec![]);
    queue.set_queue(&tired, None, 0);

    // Same element, listener bound on the first pass
    assert_eq!(queue.tiles()[0].element().unwrap().id(), element);
    queue.surface().dispatch(element, PointerEvent::Click).unwrap();

    assert_eq!(*seen.borrow(), vec!["Tired"]);
    assert_eq!(queue.surface().element(element).unwrap().stats().text, "Tired");
}

#[test]
fn test_passes_while_animations_still_run() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());
    let frame = Duration::from_millis(200);

    queue.set_queue(&snapshot(&[2, 3], &[1, 2, 3]), Some(&actor(1)), 0);
    queue.surface_mut().advance(frame);
    queue.set_queue(&snapshot(&[3], &[1, 2, 3]), Some(&actor(2)), 0);
    queue.surface_mut().advance(frame);
    queue.set_queue(&snapshot(&[], &[1, 2, 3]), Some(&actor(3)), 0);
    queue.surface_mut().advance(frame);
    queue.set_queue(&snapshot(&[2, 3], &[1, 2, 3]), Some(&actor(1)), 1);

    queue.surface_mut().finish_all();

    assert_eq!(queue.tiles().len(), 7);
    assert_eq!(queue.surface().len(), queue.tiles().len());

    let expected: Vec<Transform> = offsets(queue.tiles())
        .into_iter()
        .enumerate()
        .map(|(i, x)| Transform::new(x, 0.0, if i == 0 { 1.25 } else { 1.0 }))
        .collect();
    assert_eq!(displayed(&queue), expected);
}

#[test]
fn test_animated_empty_then_refill() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());
    queue.set_queue(&snapshot(&[1], &[1]), None, 0);
    queue.surface_mut().finish_all();

    queue.empty(EmptyMode::Animated);
    assert!(queue.tiles().is_empty());
    queue.surface_mut().finish_all();
    assert!(queue.surface().is_empty());

    queue.set_queue(&snapshot(&[1], &[]), None, 0);
    assert_eq!(hashes(&queue), vec!["creature_id1_turn0", "turnend_turn0"]);
    assert_eq!(queue.revision().get(), 3);
}

#[test]
fn test_preview_draws_settled_strip() {
    let mut queue = TurnQueue::new(Stage::new(), QueueEventHandlers::default());
    queue.set_queue(&snapshot(&[1, 2], &[]), None, 0);
    queue.xray(2);
    queue.surface_mut().finish_all();

    let mut out = Vec::new();
    draw_strip(&mut out, queue.surface(), 0).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("[#1]"));
    assert!(text.contains("[#2]"));
    assert!(text.contains("[Round 1]"));
}
