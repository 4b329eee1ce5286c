//! Tile kinds, their capability table, and the id catalog used at load time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::RoomId;

/// Semantic type of a grid cell.
///
/// Numeric ids found in level files are translated into kinds by a
/// [`TileCatalog`]; all behavior hangs off the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Sentinel returned for points outside every room.
    Empty,
    /// Walkable ground.
    Floor,
    /// Static blocking geometry.
    Wall,
    /// Walkable scenery without behavior.
    Decoration,
    /// Blocking door that opens when a door button is pressed.
    Door,
    /// Pad that opens every door in the level.
    DoorButton,
    /// Shrine that turns the mover into a ghost.
    GhostToggle,
    /// Barrier a ghost can consume; hurts a mover in normal mode.
    GhostConsumable,
    /// Outbound teleport pad.
    TeleportPad,
    /// Pad that teleports the mover back to the first room.
    ReturnPad,
    /// Landing beacon searched for by outbound teleports.
    TeleportBeacon,
    /// Goal tile that wins the session.
    Victory,
    /// One-shot trigger converting every victory marker into a victory tile.
    VictoryTrigger,
    /// Placeholder that becomes a victory tile once the trigger fires.
    VictoryMarker,
    /// Left-most slot of a saw track.
    SawAnchor,
    /// Spawn point for falling fire.
    FireVent,
    /// Origin of a free-standing pushable crate.
    Crate,
    /// Hazard tile of a box trap; blocks until the trap is triggered.
    BoxTrap,
    /// Origin of the crate belonging to a box trap.
    BoxTrapCrate,
    /// Button that disarms the neighbouring box trap.
    BoxTrapButton,
}

/// Capability flags derived from a [`TileKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileTraits {
    /// Tile contributes a collision rectangle.
    pub collidable: bool,
    /// Tile spawns a pushable body at load time.
    pub pushable_origin: bool,
    /// Tile only reacts to overlap and never blocks movement.
    pub interaction_only: bool,
}

impl TileTraits {
    const INERT: Self = Self {
        collidable: false,
        pushable_origin: false,
        interaction_only: false,
    };
    const SOLID: Self = Self {
        collidable: true,
        pushable_origin: false,
        interaction_only: false,
    };
    const PAD: Self = Self {
        collidable: false,
        pushable_origin: false,
        interaction_only: true,
    };
    const PUSHABLE: Self = Self {
        collidable: false,
        pushable_origin: true,
        interaction_only: false,
    };
}

/// Handler variant fired when the mover overlaps a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileEvent {
    /// Open every door in every room.
    OpenDoors,
    /// Switch the mover into ghost mode.
    EnterGhostMode,
    /// Consume the tile as a ghost, or damage a normal mover.
    GhostBarrier,
    /// Resolve the teleport route registered for this tile kind.
    Teleport,
    /// Win the session.
    Victory,
    /// Convert all victory markers into victory tiles.
    ConvertMarkers,
}

impl TileKind {
    /// Capability flags attached to the kind.
    #[must_use]
    pub const fn traits(self) -> TileTraits {
        match self {
            Self::Wall | Self::Door | Self::BoxTrap => TileTraits::SOLID,
            Self::DoorButton
            | Self::GhostToggle
            | Self::GhostConsumable
            | Self::TeleportPad
            | Self::ReturnPad
            | Self::Victory
            | Self::VictoryTrigger
            | Self::BoxTrapButton => TileTraits::PAD,
            Self::Crate => TileTraits::PUSHABLE,
            Self::Empty
            | Self::Floor
            | Self::Decoration
            | Self::TeleportBeacon
            | Self::VictoryMarker
            | Self::SawAnchor
            | Self::FireVent
            | Self::BoxTrapCrate => TileTraits::INERT,
        }
    }

    /// Reports whether the kind contributes a collision rectangle.
    #[must_use]
    pub const fn is_collidable(self) -> bool {
        let traits = self.traits();
        traits.collidable && !traits.interaction_only
    }

    /// Reports whether the kind spawns a pushable crate at load time.
    #[must_use]
    pub const fn is_pushable_origin(self) -> bool {
        self.traits().pushable_origin
    }

    /// Event fired when the mover overlaps a tile of this kind.
    #[must_use]
    pub const fn event(self) -> Option<TileEvent> {
        match self {
            Self::DoorButton => Some(TileEvent::OpenDoors),
            Self::GhostToggle => Some(TileEvent::EnterGhostMode),
            Self::GhostConsumable => Some(TileEvent::GhostBarrier),
            Self::TeleportPad | Self::ReturnPad => Some(TileEvent::Teleport),
            Self::Victory => Some(TileEvent::Victory),
            Self::VictoryTrigger => Some(TileEvent::ConvertMarkers),
            _ => None,
        }
    }

    /// Reports whether tiles of this kind are captured by the session snapshot
    /// because dispatch may rewrite them at runtime.
    #[must_use]
    pub const fn is_structural_marker(self) -> bool {
        matches!(
            self,
            Self::GhostConsumable | Self::VictoryTrigger | Self::VictoryMarker
        )
    }
}

/// Pairing between a teleport pad and the companion tile it lands next to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TeleportRoute {
    /// Pad kind that starts the teleport.
    pub source: TileKind,
    /// Companion kind searched for in row-major order.
    pub target: TileKind,
    /// Room searched for the companion tile.
    pub room: RoomId,
    /// Column offset from the companion tile to the landing tile.
    pub approach_columns: i32,
    /// Row offset from the companion tile to the landing tile; positive is down the matrix.
    pub approach_rows: i32,
}

/// Outbound route: teleport pad to the beacon in the second room, landing two tiles right.
pub const TELEPORT_ROUTE: TeleportRoute = TeleportRoute {
    source: TileKind::TeleportPad,
    target: TileKind::TeleportBeacon,
    room: RoomId::new(1),
    approach_columns: 2,
    approach_rows: 0,
};

/// Return route: return pad to the teleport pad in the first room, landing two tiles left.
pub const RETURN_ROUTE: TeleportRoute = TeleportRoute {
    source: TileKind::ReturnPad,
    target: TileKind::TeleportPad,
    room: RoomId::new(0),
    approach_columns: -2,
    approach_rows: 0,
};

/// Default teleport route table.
pub const TELEPORT_ROUTES: [TeleportRoute; 2] = [TELEPORT_ROUTE, RETURN_ROUTE];

/// Single id-to-kind mapping as written in level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Numeric tile id used by room matrices.
    pub id: u16,
    /// Kind the id resolves to.
    pub kind: TileKind,
}

const CLASSIC_WALLS: [u16; 21] = [
    2, 3, 4, 5, 6, 7, 8, 11, 16, 17, 18, 19, 20, 22, 23, 24, 25, 27, 50, 64, 69,
];
const CLASSIC_FLOORS: [u16; 3] = [1, 14, 21];
const CLASSIC_DECORATIONS: [u16; 11] = [13, 36, 38, 44, 47, 51, 52, 53, 54, 65, 70];
const CLASSIC_SPECIALS: [(u16, TileKind); 19] = [
    (0, TileKind::Empty),
    (29, TileKind::Door),
    (56, TileKind::DoorButton),
    (63, TileKind::GhostToggle),
    (72, TileKind::GhostConsumable),
    (34, TileKind::TeleportPad),
    (67, TileKind::ReturnPad),
    (68, TileKind::ReturnPad),
    (66, TileKind::TeleportBeacon),
    (71, TileKind::Victory),
    (62, TileKind::VictoryTrigger),
    (55, TileKind::VictoryMarker),
    (43, TileKind::SawAnchor),
    (35, TileKind::FireVent),
    (37, TileKind::FireVent),
    (42, TileKind::Crate),
    (31, TileKind::BoxTrap),
    (39, TileKind::BoxTrapCrate),
    (32, TileKind::BoxTrapButton),
];

/// Lookup table translating numeric tile ids into [`TileKind`] values.
///
/// Ids that are not registered resolve to [`TileKind::Floor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileCatalog {
    kinds: BTreeMap<u16, TileKind>,
}

impl TileCatalog {
    /// Creates a catalog containing only the provided entries.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        Self {
            kinds: entries
                .into_iter()
                .map(|entry| (entry.id, entry.kind))
                .collect(),
        }
    }

    /// Catalog matching the classic tile set shipped with the demo level.
    #[must_use]
    pub fn classic() -> Self {
        let floors = CLASSIC_FLOORS.iter().map(|&id| (id, TileKind::Floor));
        let walls = CLASSIC_WALLS.iter().map(|&id| (id, TileKind::Wall));
        let decorations = CLASSIC_DECORATIONS
            .iter()
            .map(|&id| (id, TileKind::Decoration));
        let specials = CLASSIC_SPECIALS.iter().copied();
        Self {
            kinds: floors
                .chain(walls)
                .chain(decorations)
                .chain(specials)
                .collect(),
        }
    }

    /// Returns a copy of the catalog with the provided entries taking precedence.
    #[must_use]
    pub fn with_overrides<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        self.kinds
            .extend(entries.into_iter().map(|entry| (entry.id, entry.kind)));
        self
    }

    /// Resolves a numeric id, falling back to floor for unknown ids.
    #[must_use]
    pub fn kind_of(&self, id: u16) -> TileKind {
        self.kinds.get(&id).copied().unwrap_or(TileKind::Floor)
    }

    /// Reports whether the id has an explicit entry.
    #[must_use]
    pub fn contains(&self, id: u16) -> bool {
        self.kinds.contains_key(&id)
    }

    /// Iterator over the registered entries in ascending id order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.kinds
            .iter()
            .map(|(&id, &kind)| CatalogEntry { id, kind })
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::classic()
    }
}
