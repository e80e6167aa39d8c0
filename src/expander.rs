//! Turn-Order Expander - actor lists to tile sequence.
//!
//! # Standard order
//!
//! ```text
//! (undelayed…) (delay marker) (delayed…) (turn end)
//!     (undelayed next…) (delay marker next) (delayed next…)
//! ```
//!
//! Delay markers only appear when their turn has delayed actors. The split
//! happens at the first delayed actor: everyone after it counts as delayed.
//!
//! # Delayed actors at the front
//!
//! When nobody undelayed is left in the current turn, a marker in front of
//! the first (about to act) actor would read as "this one waits". So:
//!
//! ```text
//! several delayed:  (delayed, active) (delay marker) (delayed) …  (turn end) …
//! one delayed:      (delayed, active) (turn end) …
//! ```
//!
//! Only the current turn gets this treatment.
//!
//! At the last representable turn number there is no next turn, so the next
//! segment is dropped.

use std::rc::Rc;

use tracing::warn;

use crate::tile::{CreatureTile, QueueEventHandlers, Tile};
use crate::turn_order::{DelayTracker, LiveActors};
use crate::types::{Actor, TurnNumber};
use crate::utils::{first_only, partition_at};

/// Build the tile sequence for one pass.
///
/// The first creature tile built is flagged active. Creature tiles are built
/// current-turn first, so that is the first tile of the strip whenever the
/// current turn has anyone left.
///
/// Creature tiles read their actor through `actors`.
pub fn expand(
    current: &[Actor],
    next: &[Actor],
    turn: TurnNumber,
    delays: &DelayTracker,
    actors: &LiveActors,
    handlers: &Rc<QueueEventHandlers>,
) -> Vec<Tile> {
    let (next, next_turn) = match turn.checked_add(1) {
        Some(next_turn) => (next, next_turn),
        None => {
            warn!(turn, dropped = next.len(), "no turn after the last turn number");
            (&[][..], turn)
        }
    };
    let (undelayed_curr, delayed_curr) = partition_at(current, |a| delays.is_delayed(a.id, turn));
    let (undelayed_next, delayed_next) =
        partition_at(next, |a| delays.is_delayed(a.id, next_turn));

    let mut is_first = first_only();
    let mut creature_tiles = |group: &[Actor], turn: TurnNumber, current_turn: bool| {
        group
            .iter()
            .map(|actor| {
                Tile::creature(
                    CreatureTile {
                        actor: actors.live(actor),
                        active: is_first(),
                        current_turn,
                        delayed: delays.is_delayed(actor.id, turn),
                    },
                    turn,
                    handlers.clone(),
                )
            })
            .collect::<Vec<_>>()
    };

    let undelayed_curr = creature_tiles(undelayed_curr, turn, true);
    let mut delayed_curr = creature_tiles(delayed_curr, turn, true);
    let undelayed_next = creature_tiles(undelayed_next, next_turn, false);
    let delayed_next = creature_tiles(delayed_next, next_turn, false);

    let mut tiles = Vec::with_capacity(
        undelayed_curr.len() + delayed_curr.len() + undelayed_next.len() + delayed_next.len() + 3,
    );

    match (undelayed_curr.is_empty(), delayed_curr.len()) {
        (true, n) if n > 1 => {
            let rest = delayed_curr.split_off(1);
            tiles.extend(delayed_curr);
            tiles.push(Tile::delay(turn, handlers.clone()));
            tiles.extend(rest);
        }
        (true, 1) => tiles.extend(delayed_curr),
        _ => {
            tiles.extend(undelayed_curr);
            if !delayed_curr.is_empty() {
                tiles.push(Tile::delay(turn, handlers.clone()));
            }
            tiles.extend(delayed_curr);
        }
    }

    tiles.push(Tile::turn_end(turn, handlers.clone()));

    tiles.extend(undelayed_next);
    if !delayed_next.is_empty() {
        tiles.push(Tile::delay(next_turn, handlers.clone()));
    }
    tiles.extend(delayed_next);

    tiles
}
