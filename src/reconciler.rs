//! Reconciler - diff two tile sequences and drive the surface.
//!
//! # Algorithm
//!
//! 1. Transplant: every next tile whose hash was rendered before takes over
//!    the previous tile's element (keeps in-flight animations and styles).
//! 2. Removals: previous tiles whose hash is gone are deleted. The leading
//!    run of removed tiles is deleted "from the front": they slide left by
//!    the run's total width together with everything behind them, instead of
//!    lifting out and leaving a hole at the origin.
//! 3. Placements: next tiles are inserted (new hash) or updated (known hash)
//!    at their running x-offset.
//!
//! [`plan`] computes steps 2 and 3 without side effects; [`reconcile`]
//! performs all three against a surface.
//!
//! # Duplicate hashes
//!
//! Sequences from the expander never repeat a hash. If one does, the last
//! previous tile with that hash is the transplant source, and only the first
//! next tile with that hash gets its element. Both cases are logged, not
//! repaired.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::QueueConfig;
use crate::surface::Surface;
use crate::tile::{Tile, TileHash};

// =============================================================================
// PLAN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemovalKind {
    Delete,
    /// Part of the leading removed run; `gap` is the run's total width.
    DeleteFromFront { gap: f32 },
}

/// Removal of one previous tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// Index in the previous sequence, also its queue position.
    pub index: usize,
    pub hash: TileHash,
    /// Offset in the previous sequence.
    pub x: f32,
    pub kind: RemovalKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    Insert,
    Update,
}

/// Placement of one next tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Index in the next sequence, also its queue position.
    pub index: usize,
    pub hash: TileHash,
    /// Offset in the next sequence.
    pub x: f32,
    pub kind: PlacementKind,
}

/// Everything one pass will do, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub removals: Vec<Removal>,
    pub placements: Vec<Placement>,
    /// Total width removed at the front of the strip.
    pub front_gap: f32,
}

impl Plan {
    pub fn inserts(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| p.kind == PlacementKind::Insert)
    }

    pub fn updates(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| p.kind == PlacementKind::Update)
    }
}

/// Left edge of every tile: the running sum of the widths before it.
pub fn offsets(tiles: &[Tile]) -> Vec<f32> {
    tiles
        .iter()
        .scan(0.0, |x, tile| {
            let left = *x;
            *x += tile.width();
            Some(left)
        })
        .collect()
}

/// Compute the removals and placements turning `prev` into `next`.
pub fn plan(prev: &[Tile], next: &[Tile]) -> Plan {
    let prev_hashes: Vec<TileHash> = prev.iter().map(Tile::hash).collect();
    let next_hashes: Vec<TileHash> = next.iter().map(Tile::hash).collect();
    let prev_set: HashSet<&TileHash> = prev_hashes.iter().collect();
    let next_set: HashSet<&TileHash> = next_hashes.iter().collect();

    let front_run = prev_hashes
        .iter()
        .take_while(|h| !next_set.contains(h))
        .count();
    let front_gap: f32 = prev[..front_run].iter().map(Tile::width).sum();

    let removals = prev_hashes
        .iter()
        .zip(offsets(prev))
        .enumerate()
        .filter(|(_, (hash, _))| !next_set.contains(hash))
        .map(|(index, (hash, x))| Removal {
            index,
            hash: hash.clone(),
            x,
            kind: if index < front_run {
                RemovalKind::DeleteFromFront { gap: front_gap }
            } else {
                RemovalKind::Delete
            },
        })
        .collect();

    let placements = next_hashes
        .iter()
        .zip(offsets(next))
        .enumerate()
        .map(|(index, (hash, x))| Placement {
            index,
            hash: hash.clone(),
            x,
            kind: if prev_set.contains(&hash) {
                PlacementKind::Update
            } else {
                PlacementKind::Insert
            },
        })
        .collect();

    Plan {
        removals,
        placements,
        front_gap,
    }
}

// =============================================================================
// RECONCILE
// =============================================================================

/// Turn the rendered `prev` sequence into `next` on `surface`.
///
/// Returns `next`, now owning the elements, as the new rendered sequence.
pub fn reconcile<S: Surface>(
    prev: Vec<Tile>,
    mut next: Vec<Tile>,
    surface: &mut S,
    config: &QueueConfig,
) -> Vec<Tile> {
    let plan = plan(&prev, &next);
    debug!(
        prev = prev.len(),
        next = next.len(),
        removed = plan.removals.len(),
        inserted = plan.inserts().count(),
        updated = plan.updates().count(),
        front_gap = plan.front_gap,
        "reconcile"
    );

    let mut prev: Vec<Option<Tile>> = prev.into_iter().map(Some).collect();
    transplant(&mut prev, &mut next);

    for removal in &plan.removals {
        let Some(tile) = prev[removal.index].take() else {
            continue;
        };
        match removal.kind {
            RemovalKind::Delete => tile.delete(surface, removal.index, removal.x, config),
            RemovalKind::DeleteFromFront { gap } => {
                tile.delete_from_front(surface, removal.index, removal.x, gap, config)
            }
        }
    }

    for placement in &plan.placements {
        let tile = &mut next[placement.index];
        match placement.kind {
            PlacementKind::Insert => tile.insert(surface, placement.index, placement.x, config),
            PlacementKind::Update => tile.update(surface, placement.index, placement.x, config),
        }
    }

    next
}

/// Move elements from previous tiles into next tiles with the same hash.
fn transplant(prev: &mut [Option<Tile>], next: &mut [Tile]) {
    let mut by_hash: HashMap<TileHash, usize> = HashMap::new();
    for (index, tile) in prev.iter().enumerate() {
        if let Some(tile) = tile {
            if let Some(shadowed) = by_hash.insert(tile.hash(), index) {
                warn!(hash = %tile.hash(), shadowed, index, "duplicate hash in rendered queue");
            }
        }
    }

    for tile in next.iter_mut() {
        let hash = tile.hash();
        let Some(&index) = by_hash.get(&hash) else {
            continue;
        };
        match prev[index].as_mut().and_then(Tile::take_element) {
            Some(element) => tile.set_element(element),
            None => warn!(%hash, "duplicate hash in next queue, element already claimed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Stage;
    use crate::tile::{CreatureTile, QueueEventHandlers};
    use crate::types::{Actor, ActorId, Transform};
    use pretty_assertions::assert_eq;
    use spark_signals::signal;
    use std::rc::Rc;

    fn handlers() -> Rc<QueueEventHandlers> {
        Rc::new(QueueEventHandlers::default())
    }

    fn creature(id: ActorId, active: bool) -> Tile {
        Tile::creature(
            CreatureTile {
                actor: signal(Actor::new(id, 0)),
                active,
                current_turn: true,
                delayed: false,
            },
            0,
            handlers(),
        )
    }

    fn tiles(ids: &[ActorId]) -> Vec<Tile> {
        ids.iter().map(|&id| creature(id, false)).collect()
    }

    fn hash(id: ActorId) -> TileHash {
        creature(id, false).hash()
    }

    /// Render `ids` from scratch and let the animations settle.
    fn rendered(stage: &mut Stage, ids: &[ActorId]) -> Vec<Tile> {
        let config = QueueConfig::default();
        let out = reconcile(Vec::new(), tiles(ids), stage, &config);
        stage.finish_all();
        stage.take_history();
        out
    }

    #[test]
    fn test_offsets_accumulate_widths() {
        let seq = vec![
            creature(1, true),
            creature(2, false),
            Tile::delay(0, handlers()),
            creature(3, false),
            Tile::turn_end(0, handlers()),
        ];
        assert_eq!(offsets(&seq), vec![0.0, 100.0, 180.0, 260.0, 340.0]);
        assert!(offsets(&[]).is_empty());
    }

    #[test]
    fn test_plan_prefix_removal() {
        // A B C D -> C D E
        let prev = tiles(&[1, 2, 3, 4]);
        let next = tiles(&[3, 4, 5]);

        let plan = plan(&prev, &next);

        assert_eq!(plan.front_gap, 160.0);
        assert_eq!(
            plan.removals,
            vec![
                Removal {
                    index: 0,
                    hash: hash(1),
                    x: 0.0,
                    kind: RemovalKind::DeleteFromFront { gap: 160.0 },
                },
                Removal {
                    index: 1,
                    hash: hash(2),
                    x: 80.0,
                    kind: RemovalKind::DeleteFromFront { gap: 160.0 },
                },
            ]
        );
        let updates: Vec<_> = plan.updates().map(|p| (p.hash.clone(), p.x)).collect();
        assert_eq!(updates, vec![(hash(3), 0.0), (hash(4), 80.0)]);
        let inserts: Vec<_> = plan.inserts().map(|p| (p.hash.clone(), p.x)).collect();
        assert_eq!(inserts, vec![(hash(5), 160.0)]);
    }

    #[test]
    fn test_plan_non_prefix_removal() {
        // A B C -> A C
        let plan = plan(&tiles(&[1, 2, 3]), &tiles(&[1, 3]));

        assert_eq!(plan.front_gap, 0.0);
        assert_eq!(
            plan.removals,
            vec![Removal {
                index: 1,
                hash: hash(2),
                x: 80.0,
                kind: RemovalKind::Delete,
            }]
        );
        assert_eq!(plan.inserts().count(), 0);
    }

    #[test]
    fn test_plan_mixed_front_and_middle_removal() {
        // A B C D E -> C E: A B from front, D plain
        let plan = plan(&tiles(&[1, 2, 3, 4, 5]), &tiles(&[3, 5]));
        let kinds: Vec<_> = plan.removals.iter().map(|r| (r.index, r.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0, RemovalKind::DeleteFromFront { gap: 160.0 }),
                (1, RemovalKind::DeleteFromFront { gap: 160.0 }),
                (3, RemovalKind::Delete),
            ]
        );
    }

    #[test]
    fn test_plan_front_gap_uses_active_width() {
        let prev = vec![creature(1, true), creature(2, false)];
        let next = vec![creature(2, true)];
        let plan = plan(&prev, &next);
        assert_eq!(plan.front_gap, 100.0);
    }

    #[test]
    fn test_plan_is_repeatable() {
        let prev = tiles(&[1, 2, 3, 4]);
        let next = tiles(&[4, 2, 6]);
        assert_eq!(plan(&prev, &next), plan(&prev, &next));
    }

    #[test]
    fn test_plan_empty_sequences() {
        let inserted = plan(&[], &tiles(&[1, 2]));
        assert!(inserted.removals.is_empty());
        assert_eq!(inserted.inserts().count(), 2);

        let emptied = plan(&tiles(&[1, 2]), &[]);
        assert!(emptied.placements.is_empty());
        assert_eq!(emptied.front_gap, 160.0);
        assert!(
            emptied
                .removals
                .iter()
                .all(|r| matches!(r.kind, RemovalKind::DeleteFromFront { .. }))
        );
    }

    #[test]
    fn test_plan_total_replacement() {
        let plan = plan(&tiles(&[1, 2]), &tiles(&[3, 4]));
        assert_eq!(plan.removals.len(), 2);
        assert_eq!(plan.inserts().count(), 2);
        assert_eq!(plan.updates().count(), 0);
    }

    #[test]
    fn test_reconcile_transplants_elements() {
        let mut stage = Stage::new();
        let config = QueueConfig::default();
        let prev = rendered(&mut stage, &[1, 2, 3]);
        let element_of_3 = prev[2].element().unwrap().id();

        let next = reconcile(prev, tiles(&[3, 4]), &mut stage, &config);

        assert_eq!(next[0].element().unwrap().id(), element_of_3);
        assert_ne!(next[1].element().unwrap().id(), element_of_3);
        assert_eq!(next[0].position(), Some(0));
        assert_eq!(next[1].position(), Some(1));
    }

    #[test]
    fn test_reconcile_drives_surface_in_order() {
        let mut stage = Stage::new();
        let config = QueueConfig::default();
        let prev = rendered(&mut stage, &[1, 2, 3, 4]);

        let next = reconcile(prev, tiles(&[3, 4, 5]), &mut stage, &config);

        let history = stage.take_history();
        let targets: Vec<Transform> = history
            .iter()
            .map(|r| r.keyframes.last().unwrap().transform)
            .collect();
        assert_eq!(
            targets,
            vec![
                // A, B slide left out of view by the front gap
                Transform::new(-160.0, 0.0, 1.0),
                Transform::new(-80.0, 0.0, 1.0),
                // C, D move into the gap
                Transform::new(0.0, 0.0, 1.0),
                Transform::new(80.0, 0.0, 1.0),
                // E arrives at the end
                Transform::new(160.0, 0.0, 1.0),
            ]
        );

        // A and B are gone once their animations finish
        assert_eq!(stage.len(), 5);
        stage.finish_all();
        assert_eq!(stage.len(), 3);
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn test_reconcile_same_input_same_calls() {
        let config = QueueConfig::default();
        let run = || {
            let mut stage = Stage::new();
            let prev = rendered(&mut stage, &[1, 2, 3]);
            reconcile(prev, tiles(&[2, 5, 3]), &mut stage, &config);
            stage
                .take_history()
                .into_iter()
                .map(|r| (r.element, r.keyframes, r.timing))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reconcile_to_empty() {
        let mut stage = Stage::new();
        let config = QueueConfig::default();
        let prev = rendered(&mut stage, &[1, 2]);

        let next = reconcile(prev, Vec::new(), &mut stage, &config);

        assert!(next.is_empty());
        stage.finish_all();
        assert!(stage.is_empty());
    }

    #[test]
    fn test_reconcile_duplicate_next_hash_gets_fresh_element() {
        let mut stage = Stage::new();
        let config = QueueConfig::default();
        let prev = rendered(&mut stage, &[1]);
        let element_of_1 = prev[0].element().unwrap().id();

        let next = reconcile(prev, tiles(&[1, 1]), &mut stage, &config);

        assert_eq!(next[0].element().unwrap().id(), element_of_1);
        // Second copy has no element to take over and falls back to insert
        assert_ne!(next[1].element().unwrap().id(), element_of_1);
        assert_eq!(stage.len(), 2);
    }
}
