//! Collision rectangles derived from collidable tile kinds.

use std::collections::BTreeMap;

use jungle_ruins_core::{BoxTrapId, RoomId, TilePosition, WorldRect};

use crate::rooms::TileWorld;

/// Blocking rectangle owned by a room, optionally tagged with the box trap it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionRect {
    rect: WorldRect,
    trap: Option<BoxTrapId>,
}

impl CollisionRect {
    /// Creates a collision rectangle.
    #[must_use]
    pub const fn new(rect: WorldRect, trap: Option<BoxTrapId>) -> Self {
        Self { rect, trap }
    }

    /// Blocking rectangle in world space.
    #[must_use]
    pub const fn rect(&self) -> WorldRect {
        self.rect
    }

    /// Box trap that disables the rectangle once triggered.
    #[must_use]
    pub const fn trap(&self) -> Option<BoxTrapId> {
        self.trap
    }
}

/// Per-room lists of collision rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionIndex {
    rooms: Vec<Vec<CollisionRect>>,
}

impl CollisionIndex {
    /// Derives the index from every collidable cell of `tiles`.
    ///
    /// Cells listed in `trap_tags` carry the identifier of their box trap.
    #[must_use]
    pub fn build(tiles: &TileWorld, trap_tags: &BTreeMap<TilePosition, BoxTrapId>) -> Self {
        let mut rooms = vec![Vec::new(); tiles.rooms().len()];
        for position in tiles.positions() {
            if !tiles.kind_at(position).is_collidable() {
                continue;
            }
            let (Some(rect), Some(bucket)) =
                (tiles.tile_rect(position), rooms.get_mut(position.room().get()))
            else {
                continue;
            };
            bucket.push(CollisionRect::new(rect, trap_tags.get(&position).copied()));
        }
        Self { rooms }
    }

    /// Reports whether `rect` overlaps any rectangle that is still blocking.
    ///
    /// `is_open` decides whether a tagged rectangle's trap has been triggered.
    pub fn is_colliding<F>(&self, rect: &WorldRect, is_open: F) -> bool
    where
        F: Fn(BoxTrapId) -> bool,
    {
        self.rooms.iter().flatten().any(|candidate| {
            candidate.rect.overlaps(rect) && !candidate.trap.map_or(false, &is_open)
        })
    }

    /// Removes the single rectangle of `room` positioned exactly at `rect`.
    pub fn remove_at(&mut self, room: RoomId, rect: &WorldRect) -> bool {
        let Some(bucket) = self.rooms.get_mut(room.get()) else {
            return false;
        };
        let Some(index) = bucket.iter().position(|candidate| candidate.rect == *rect) else {
            return false;
        };
        let _ = bucket.remove(index);
        true
    }

    /// Reinserts `entry` into `room` unless an equal rectangle is already present.
    pub fn restore(&mut self, room: RoomId, entry: CollisionRect) -> bool {
        let Some(bucket) = self.rooms.get_mut(room.get()) else {
            return false;
        };
        if bucket.iter().any(|candidate| candidate.rect == entry.rect) {
            return false;
        }
        bucket.push(entry);
        true
    }

    /// Reports whether `room` holds a rectangle positioned exactly at `rect`.
    #[must_use]
    pub fn contains(&self, room: RoomId, rect: &WorldRect) -> bool {
        self.rects(room).iter().any(|candidate| candidate.rect == *rect)
    }

    /// Rectangles of `room`; empty for unknown rooms.
    #[must_use]
    pub fn rects(&self, room: RoomId) -> &[CollisionRect] {
        self.rooms.get(room.get()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of rectangles across every room.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.iter().map(Vec::len).sum()
    }

    /// Reports whether no room holds a rectangle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::Room;
    use jungle_ruins_core::{LocalTile, TileKind, WorldPoint};

    fn tiles() -> TileWorld {
        TileWorld::new(vec![Room::new(
            3,
            1,
            0,
            0,
            vec![TileKind::Wall, TileKind::DoorButton, TileKind::BoxTrap],
        )])
    }

    fn trap_position() -> TilePosition {
        TilePosition::new(RoomId::new(0), LocalTile::new(2, 0))
    }

    #[test]
    fn pads_contribute_no_rectangles() {
        let index = CollisionIndex::build(&tiles(), &BTreeMap::new());
        assert_eq!(index.len(), 2);
        assert!(!index.is_colliding(&WorldRect::new(36.0, 4.0, 24.0, 24.0), |_| false));
    }

    #[test]
    fn open_traps_never_block() {
        let mut tags = BTreeMap::new();
        let _ = tags.insert(trap_position(), BoxTrapId::new(0));
        let index = CollisionIndex::build(&tiles(), &tags);
        let sample = WorldRect::new(68.0, 4.0, 24.0, 24.0);

        assert!(index.is_colliding(&sample, |_| false));
        assert!(!index.is_colliding(&sample, |trap| trap == BoxTrapId::new(0)));
    }

    #[test]
    fn removal_and_restore_are_exact_and_idempotent() {
        let mut index = CollisionIndex::build(&tiles(), &BTreeMap::new());
        let room = RoomId::new(0);
        let wall = WorldRect::tile(WorldPoint::new(0.0, 0.0));

        assert!(!index.remove_at(room, &WorldRect::new(1.0, 0.0, 32.0, 32.0)));
        assert!(index.remove_at(room, &wall));
        assert!(!index.contains(room, &wall));
        assert!(index.restore(room, CollisionRect::new(wall, None)));
        assert!(!index.restore(room, CollisionRect::new(wall, None)));
        assert_eq!(index.len(), 2);
        assert!(index.rects(RoomId::new(5)).is_empty());
    }
}
