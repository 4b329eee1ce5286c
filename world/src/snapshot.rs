//! Load-time capture of every tile and body that can change during a session.

use jungle_ruins_core::{TileKind, TilePosition, WorldRect};
use jungle_ruins_system_pushing::Crate;

use crate::rooms::TileWorld;

/// Door tile recorded with the collision rectangle it contributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorRecord {
    position: TilePosition,
    rect: WorldRect,
}

impl DoorRecord {
    /// Tile holding the door.
    #[must_use]
    pub const fn position(&self) -> TilePosition {
        self.position
    }

    /// Collision rectangle of the closed door.
    #[must_use]
    pub const fn rect(&self) -> WorldRect {
        self.rect
    }
}

/// Structural tile recorded with the kind it had after loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerRecord {
    position: TilePosition,
    kind: TileKind,
}

impl MarkerRecord {
    /// Tile holding the marker.
    #[must_use]
    pub const fn position(&self) -> TilePosition {
        self.position
    }

    /// Kind the tile is restored to.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }
}

/// Immutable copy of the post-load state that [`crate::World::reset`] restores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    doors: Vec<DoorRecord>,
    markers: Vec<MarkerRecord>,
    crate_homes: Vec<WorldRect>,
}

impl SessionSnapshot {
    pub(crate) fn capture(tiles: &TileWorld, crates: &[Crate]) -> Self {
        let mut doors = Vec::new();
        let mut markers = Vec::new();
        for position in tiles.positions() {
            let kind = tiles.kind_at(position);
            if kind == TileKind::Door {
                if let Some(rect) = tiles.tile_rect(position) {
                    doors.push(DoorRecord { position, rect });
                }
            } else if kind.is_structural_marker() {
                markers.push(MarkerRecord { position, kind });
            }
        }

        Self {
            doors,
            markers,
            crate_homes: crates.iter().map(Crate::home).collect(),
        }
    }

    /// Every door in row-major order.
    #[must_use]
    pub fn doors(&self) -> &[DoorRecord] {
        &self.doors
    }

    /// Every structural marker in row-major order.
    #[must_use]
    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    /// Home rectangle of every free-standing crate, in spawn order.
    #[must_use]
    pub fn crate_homes(&self) -> &[WorldRect] {
        &self.crate_homes
    }
}
