#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Jungle Ruins simulation.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure hazard and pushing systems, and the adapters that drive them.
//! Geometry is expressed in world units with the y axis pointing up, tile
//! semantics are attached through the closed [`TileKind`] enumeration, and
//! every observable state change is broadcast as an [`Event`] value pushed
//! into a caller-provided buffer. The controlled entity lives outside the
//! simulation and is reached exclusively through the [`Mover`] contract.

use std::time::Duration;

mod tiles;

pub use tiles::{
    CatalogEntry, TeleportRoute, TileCatalog, TileEvent, TileKind, TileTraits, RETURN_ROUTE,
    TELEPORT_ROUTE, TELEPORT_ROUTES,
};

/// Side length of a single square tile expressed in world units.
pub const TILE_SIZE: f32 = 32.0;

/// Point in world space measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the point; larger values are higher up.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Axis-aligned rectangle anchored at its lower-left corner in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl WorldRect {
    /// Creates a rectangle from its lower-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a tile-sized square whose lower-left corner sits at `origin`.
    #[must_use]
    pub const fn tile(origin: WorldPoint) -> Self {
        Self::new(origin.x, origin.y, TILE_SIZE, TILE_SIZE)
    }

    /// Left edge of the rectangle.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Bottom edge of the rectangle.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal extent of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Right edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge of the rectangle.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Lower-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// Reports whether the interiors of both rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    /// Returns a copy of the rectangle shifted by the provided offsets.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Returns a copy of the rectangle with its lower-left corner moved to `origin`.
    #[must_use]
    pub const fn moved_to(&self, origin: WorldPoint) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }
}

/// Index of a room inside the level, assigned in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(usize);

impl RoomId {
    /// Creates a new room identifier.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Cell inside a room matrix. Row zero is the top row of the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalTile {
    column: u32,
    row: u32,
}

impl LocalTile {
    /// Creates a new local tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index inside the room.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index inside the room, counted from the top.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Fully qualified tile location: a room and a cell inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePosition {
    room: RoomId,
    tile: LocalTile,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(room: RoomId, tile: LocalTile) -> Self {
        Self { room, tile }
    }

    /// Room that contains the tile.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Cell inside the room.
    #[must_use]
    pub const fn tile(&self) -> LocalTile {
        self.tile
    }
}

/// Unique identifier assigned to a box trap at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxTrapId(u32);

impl BoxTrapId {
    /// Creates a new box trap identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Traversal state of the controlled mover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalMode {
    /// Regular traversal; saw blades and barrier tiles hurt.
    #[default]
    Normal,
    /// Ghost traversal; saw blades pass through and barrier tiles can be consumed.
    Ghost,
}

impl TraversalMode {
    /// Maps the ghost flag used by the [`Mover`] contract onto a mode.
    #[must_use]
    pub const fn from_ghost_flag(ghost: bool) -> Self {
        if ghost {
            Self::Ghost
        } else {
            Self::Normal
        }
    }

    /// Reports whether the mode is [`TraversalMode::Ghost`].
    #[must_use]
    pub const fn is_ghost(self) -> bool {
        matches!(self, Self::Ghost)
    }
}

/// Result of asking the world to displace a pushable body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PushOutcome {
    /// No pushable body overlaps the mover; ordinary movement may proceed.
    NoContact,
    /// A body is in the way but cannot be displaced; the mover must stay put.
    Blocked,
    /// The body moved by the requested delta; the mover should follow it.
    Pushed,
}

impl PushOutcome {
    /// Reports whether a body was displaced.
    #[must_use]
    pub const fn is_pushed(self) -> bool {
        matches!(self, Self::Pushed)
    }
}

/// Contract the simulation uses to reach the externally owned mover.
///
/// Implementations own hit points, invulnerability windows, and the mover's
/// position. The world reads the mover's bounds and flags and calls the
/// mutators below while dispatching tile events; it never calls back into
/// the world from inside these methods.
pub trait Mover {
    /// Current axis-aligned hitbox of the mover.
    fn bounds(&self) -> WorldRect;

    /// Reports whether the mover is in ghost traversal mode.
    fn is_in_ghost_mode(&self) -> bool;

    /// Switches the mover between ghost and normal traversal.
    fn set_ghost_mode(&mut self, ghost: bool);

    /// Inflicts one unit of damage. Cooldowns are the mover's own concern.
    fn take_damage(&mut self);

    /// Number of collectibles the mover currently carries.
    fn currency(&self) -> u32;

    /// Overwrites the mover's collectible count. The world clamps before calling.
    fn set_currency(&mut self, value: u32);

    /// Repositions the mover. The world never calls this itself; it returns
    /// teleport destinations to the caller instead.
    fn teleport_to(&mut self, destination: WorldPoint);
}

/// Events broadcast by the world while advancing, pushing, dispatching, or resetting.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a fire hazard started falling from a vent.
    FireSpawned {
        /// Lower-left corner of the vent the fire spawned at.
        origin: WorldPoint,
    },
    /// Announces that a box trap's crate reached its button.
    BoxTrapTriggered {
        /// Identifier of the trap that switched off.
        trap: BoxTrapId,
    },
    /// Confirms that a pushable body was displaced by the mover.
    BodyPushed {
        /// Rectangle occupied by the body after the push.
        rect: WorldRect,
    },
    /// Announces that every door in the level opened.
    DoorsOpened {
        /// Number of door tiles converted to floor.
        count: usize,
    },
    /// Reports that the world inflicted damage on the mover.
    MoverDamaged,
    /// Reports that the world changed the mover's traversal mode.
    TraversalModeChanged {
        /// Mode the mover switched to.
        mode: TraversalMode,
    },
    /// Confirms that a collectible was dropped into the world.
    CollectibleDropped {
        /// Lower-left corner of the collectible.
        position: WorldPoint,
        /// Collectibles dropped so far in the session, including this one.
        total_dropped: u32,
    },
    /// Confirms that the mover picked up a collectible.
    CollectibleCollected {
        /// Lower-left corner of the collected item.
        position: WorldPoint,
    },
    /// Reports the mover's new collectible count after a pickup.
    CurrencyChanged {
        /// Collectibles carried after the update.
        total: u32,
    },
    /// Confirms that a teleport pad resolved a destination and armed its cooldown.
    TeleportArmed {
        /// Landing point the caller should move the mover to.
        destination: WorldPoint,
    },
    /// Reports that a teleport pad could not find its companion tile.
    TeleportTargetMissing {
        /// Kind of the pad the mover stood on.
        source: TileKind,
        /// Kind of the companion tile that was searched for.
        target: TileKind,
        /// Room that was searched.
        room: RoomId,
    },
    /// Announces that marker tiles were converted into victory tiles.
    MarkersConverted {
        /// Number of tiles converted across all rooms.
        count: usize,
    },
    /// Announces that the session was won. Emitted once per session.
    Victory,
    /// Confirms that the world returned to its post-load state.
    WorldReset,
}
