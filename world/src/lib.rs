#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Jungle Ruins.

use std::{collections::BTreeMap, time::Duration};

use jungle_ruins_core::{
    Event, LocalTile, Mover, PushOutcome, RoomId, TeleportRoute, TileKind, TilePosition,
    TraversalMode, WorldPoint, WorldRect, TELEPORT_ROUTES, TILE_SIZE,
};
use jungle_ruins_system_hazards::{HazardConfig, HazardEngine};
use jungle_ruins_system_pushing::{
    Crate, PushResolution, Pushing, DEFAULT_ALIGNMENT_TOLERANCE,
};
use log::{debug, info, warn};

mod collision;
mod dispatch;
mod level;
mod rooms;
mod snapshot;

pub use collision::{CollisionIndex, CollisionRect};
pub use dispatch::{Collectible, TileEventDispatcher};
pub use level::{LevelDescription, LevelError, RoomData};
pub use rooms::{Room, TileWorld};
pub use snapshot::{DoorRecord, MarkerRecord, SessionSnapshot};

use dispatch::DispatchTargets;

const DEFAULT_COLLECTIBLE_CAP: u32 = 3;
const DEFAULT_TELEPORT_COOLDOWN: Duration = Duration::from_secs(1);
const DEFAULT_ROOM_GAP: u32 = 2;

/// Tunable parameters applied when a level is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Maximum number of collectibles dropped per session.
    pub collectible_cap: u32,
    /// Time teleport pads stay inert after firing.
    pub teleport_cooldown: Duration,
    /// Alignment slack used when resolving pushes.
    pub push_tolerance: f32,
    /// Tiles left empty between neighbouring rooms.
    pub room_gap: u32,
    /// Hazard parameters shared by every automaton.
    pub hazards: HazardConfig,
    /// Teleport pads and the companion tiles they land next to.
    pub routes: Vec<TeleportRoute>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            collectible_cap: DEFAULT_COLLECTIBLE_CAP,
            teleport_cooldown: DEFAULT_TELEPORT_COOLDOWN,
            push_tolerance: DEFAULT_ALIGNMENT_TOLERANCE,
            room_gap: DEFAULT_ROOM_GAP,
            hazards: HazardConfig::default(),
            routes: TELEPORT_ROUTES.to_vec(),
        }
    }
}

/// Represents the authoritative Jungle Ruins world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    tiles: TileWorld,
    collision: CollisionIndex,
    crates: Vec<Crate>,
    hazards: HazardEngine,
    pushing: Pushing,
    dispatcher: TileEventDispatcher,
    snapshot: SessionSnapshot,
    spawn: WorldPoint,
}

impl World {
    /// Loads `level`, converts load-time marker tiles, and captures the session snapshot.
    pub fn from_level(level: &LevelDescription, config: WorldConfig) -> Result<Self, LevelError> {
        let mut tiles = level.layout(config.room_gap)?;
        let mut hazards = HazardEngine::new(config.hazards);
        let mut crates = Vec::new();
        let mut trap_tags = BTreeMap::new();

        let positions: Vec<TilePosition> = tiles.positions().collect();
        for position in positions {
            let Some(rect) = tiles.tile_rect(position) else {
                continue;
            };

            match tiles.kind_at(position) {
                TileKind::Crate => {
                    debug!("crate at {position:?}");
                    crates.push(Crate::new(position, rect));
                    let _ = tiles.set_kind(position, TileKind::Floor);
                }
                TileKind::SawAnchor => {
                    debug!("saw anchor at {position:?}");
                    hazards.add_saw(rect.origin());
                    clear_saw_track(&mut tiles, position, config.hazards.saw_slots());
                }
                TileKind::FireVent => {
                    debug!("fire vent at {position:?}");
                    hazards.add_fire_vent(rect.origin());
                }
                TileKind::BoxTrap => {
                    let Some((home, button)) = box_trap_parts(&tiles, position) else {
                        warn!("box trap at {position:?} lacks a crate or button; left as a wall");
                        continue;
                    };
                    let (Some(home_rect), Some(button_rect)) =
                        (tiles.tile_rect(home), tiles.tile_rect(button))
                    else {
                        continue;
                    };
                    let id = hazards.add_box_trap(rect, home_rect, button_rect);
                    debug!("box trap {} at {position:?}", id.get());
                    let _ = trap_tags.insert(position, id);
                    let _ = tiles.set_kind(home, TileKind::Floor);
                }
                _ => {}
            }
        }

        let collision = CollisionIndex::build(&tiles, &trap_tags);
        let snapshot = SessionSnapshot::capture(&tiles, &crates);
        let spawn = spawn_point(&tiles, level.spawn);
        info!(
            "loaded {} rooms with {} crates, {} saws, {} vents, {} box traps",
            tiles.rooms().len(),
            crates.len(),
            hazards.saws().len(),
            hazards.spawner().vents().len(),
            hazards.box_traps().len()
        );

        Ok(Self {
            pushing: Pushing::new(config.push_tolerance),
            config,
            tiles,
            collision,
            crates,
            hazards,
            dispatcher: TileEventDispatcher::default(),
            snapshot,
            spawn,
        })
    }

    /// Advances hazards, box-trap triggers, and the teleport cooldown by `dt`.
    pub fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        self.hazards.update(dt, out_events);
        self.dispatcher.advance(dt);
    }

    /// Attempts to push a body the mover at `mover` overlaps by `(dx, dy)`.
    ///
    /// Free-standing crates are considered before box-trap crates and the
    /// first overlapping body decides the outcome. A crate locked onto its
    /// button is a fixture and always blocks.
    pub fn try_push(
        &mut self,
        mover: &WorldRect,
        dx: f32,
        dy: f32,
        out_events: &mut Vec<Event>,
    ) -> PushOutcome {
        let resolved = self.pushing.resolve_first(
            mover,
            dx,
            dy,
            self.crates.iter().map(Crate::rect),
            |candidate| self.is_colliding(candidate),
        );
        if let Some((index, resolution)) = resolved {
            if let (PushResolution::Moved(rect), Some(body)) =
                (resolution, self.crates.get_mut(index))
            {
                body.place(rect);
                out_events.push(Event::BodyPushed { rect });
            }
            return resolution.outcome();
        }

        let resolved = self.pushing.resolve_first(
            mover,
            dx,
            dy,
            self.hazards.box_traps().iter().map(|trap| trap.crate_rect()),
            |candidate| self.is_colliding(candidate),
        );
        let Some((index, resolution)) = resolved else {
            return PushOutcome::NoContact;
        };
        let Some((id, triggered)) = self
            .hazards
            .box_traps()
            .get(index)
            .map(|trap| (trap.id(), trap.is_triggered()))
        else {
            return PushOutcome::NoContact;
        };
        if triggered {
            return PushOutcome::Blocked;
        }

        if let PushResolution::Moved(rect) = resolution {
            let fired = self
                .hazards
                .box_trap_mut(id)
                .map_or(false, |trap| trap.move_crate(rect));
            out_events.push(Event::BodyPushed { rect });
            if fired {
                info!("box trap {} triggered by push", id.get());
                out_events.push(Event::BoxTrapTriggered { trap: id });
            }
        }
        resolution.outcome()
    }

    /// Reports whether `rect` overlaps static geometry, a closed door, an armed
    /// box trap, or a crate locked onto its button.
    #[must_use]
    pub fn is_colliding(&self, rect: &WorldRect) -> bool {
        self.collision
            .is_colliding(rect, |trap| self.hazards.is_trap_triggered(trap))
            || self.hazards.overlaps_locked_crate(rect)
    }

    /// Reports whether `rect` touches a hazard that hurts a mover in `mode`.
    #[must_use]
    pub fn is_colliding_with_hazards(&self, rect: &WorldRect, mode: TraversalMode) -> bool {
        self.hazards.is_colliding_with_hazards(rect, mode)
    }

    /// Fires the tile events for every tile the mover overlaps.
    ///
    /// Returns the teleport destination when a pad fired; the caller is
    /// responsible for moving the mover there.
    pub fn dispatch_tile_events<M>(
        &mut self,
        mover: &mut M,
        out_events: &mut Vec<Event>,
    ) -> Option<WorldPoint>
    where
        M: Mover + ?Sized,
    {
        self.dispatcher.dispatch(
            DispatchTargets {
                tiles: &mut self.tiles,
                collision: &mut self.collision,
                config: &self.config,
            },
            mover,
            out_events,
        )
    }

    /// Restores every crate, hazard, door, marker, and session flag to its post-load state.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) {
        for (body, home) in self.crates.iter_mut().zip(self.snapshot.crate_homes()) {
            body.place(*home);
        }

        self.hazards.clear_fires();
        self.hazards.reset_traps();
        self.dispatcher.reset();

        for door in self.snapshot.doors() {
            let _ = self.tiles.set_kind(door.position(), TileKind::Door);
            let _ = self
                .collision
                .restore(door.position().room(), CollisionRect::new(door.rect(), None));
        }
        for marker in self.snapshot.markers() {
            let _ = self.tiles.set_kind(marker.position(), marker.kind());
        }

        info!("world reset");
        out_events.push(Event::WorldReset);
    }
}

fn clear_saw_track(tiles: &mut TileWorld, anchor: TilePosition, slots: u32) {
    for step in 0..slots {
        let tile = LocalTile::new(anchor.tile().column().saturating_add(step), anchor.tile().row());
        let _ = tiles.set_kind(TilePosition::new(anchor.room(), tile), TileKind::Floor);
    }
}

/// Locates the crate and button of the box trap at `trap` inside its 3x3 neighbourhood.
///
/// Later matches in row-major order replace earlier ones.
fn box_trap_parts(tiles: &TileWorld, trap: TilePosition) -> Option<(TilePosition, TilePosition)> {
    let mut home = None;
    let mut button = None;
    let column = i64::from(trap.tile().column());
    let row = i64::from(trap.tile().row());
    for check_row in row - 1..=row + 1 {
        for check_column in column - 1..=column + 1 {
            let (Ok(check_column), Ok(check_row)) =
                (u32::try_from(check_column), u32::try_from(check_row))
            else {
                continue;
            };
            let position = TilePosition::new(trap.room(), LocalTile::new(check_column, check_row));
            match tiles.kind_at(position) {
                TileKind::BoxTrapCrate => home = Some(position),
                TileKind::BoxTrapButton => button = Some(position),
                _ => {}
            }
        }
    }
    Some((home?, button?))
}

fn spawn_point(tiles: &TileWorld, spawn: Option<[u32; 2]>) -> WorldPoint {
    let room = RoomId::new(0);
    let tile = spawn
        .map(|[column, row]| TilePosition::new(room, LocalTile::new(column, row)))
        .or_else(|| tiles.find_first(room, TileKind::Floor));
    tiles
        .tile_origin(tile.unwrap_or(TilePosition::new(room, LocalTile::new(0, 0))))
        .unwrap_or_default()
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use jungle_ruins_core::{TileKind, TilePosition, WorldPoint, WorldRect};
    use jungle_ruins_system_hazards::{BoxTrap, FireHazard, SawTrap};
    use jungle_ruins_system_pushing::Crate;

    use super::{Collectible, CollisionIndex, Room, SessionSnapshot, TileWorld, World, WorldConfig};

    /// Configuration the world was loaded with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Provides read-only access to the rooms and their tiles.
    #[must_use]
    pub fn tile_world(world: &World) -> &TileWorld {
        &world.tiles
    }

    /// Rooms in registration order.
    #[must_use]
    pub fn rooms(world: &World) -> &[Room] {
        world.tiles.rooms()
    }

    /// Kind of the tile containing `point`, or [`TileKind::Empty`] outside every room.
    #[must_use]
    pub fn tile_at(world: &World, point: WorldPoint) -> TileKind {
        world.tiles.tile_at(point)
    }

    /// Kind of the tile at `position`.
    #[must_use]
    pub fn kind_at(world: &World, position: TilePosition) -> TileKind {
        world.tiles.kind_at(position)
    }

    /// Collision rectangles currently held by the world.
    #[must_use]
    pub fn collision_index(world: &World) -> &CollisionIndex {
        &world.collision
    }

    /// Free-standing crates in spawn order.
    #[must_use]
    pub fn crates(world: &World) -> &[Crate] {
        &world.crates
    }

    /// Current rectangle of every free-standing crate.
    #[must_use]
    pub fn crate_rects(world: &World) -> Vec<WorldRect> {
        world.crates.iter().map(Crate::rect).collect()
    }

    /// Saw traps in load order.
    #[must_use]
    pub fn saws(world: &World) -> &[SawTrap] {
        world.hazards.saws()
    }

    /// Fires that are still falling.
    #[must_use]
    pub fn fires(world: &World) -> &[FireHazard] {
        world.hazards.fires()
    }

    /// Box traps in load order.
    #[must_use]
    pub fn box_traps(world: &World) -> &[BoxTrap] {
        world.hazards.box_traps()
    }

    /// Collectibles waiting to be picked up.
    #[must_use]
    pub fn collectibles(world: &World) -> &[Collectible] {
        world.dispatcher.collectibles()
    }

    /// Collectibles dropped since load or the last reset.
    #[must_use]
    pub fn collectibles_dropped(world: &World) -> u32 {
        world.dispatcher.dropped()
    }

    /// Time left before teleport pads react again.
    #[must_use]
    pub fn teleport_cooldown(world: &World) -> Duration {
        world.dispatcher.teleport_cooldown()
    }

    /// Reports whether a door button has opened the doors.
    #[must_use]
    pub fn doors_open(world: &World) -> bool {
        world.dispatcher.doors_open()
    }

    /// Reports whether the victory markers were converted.
    #[must_use]
    pub fn markers_converted(world: &World) -> bool {
        world.dispatcher.markers_converted()
    }

    /// Reports whether the session was won.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        world.dispatcher.is_won()
    }

    /// Post-load state restored by reset.
    #[must_use]
    pub fn snapshot(world: &World) -> &SessionSnapshot {
        &world.snapshot
    }

    /// Lower-left corner of the mover's start tile.
    #[must_use]
    pub fn spawn_point(world: &World) -> WorldPoint {
        world.spawn
    }
}

/// Convenience for placing a mover of `size` centred on the tile at `origin`.
#[must_use]
pub fn centred_in_tile(origin: WorldPoint, size: f32) -> WorldPoint {
    let inset = (TILE_SIZE - size) / 2.0;
    WorldPoint::new(origin.x() + inset, origin.y() + inset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(rows: Vec<Vec<u16>>) -> LevelDescription {
        LevelDescription::new(vec![rows])
    }

    #[test]
    fn saw_anchor_clears_its_track() {
        let world = World::from_level(
            &level(vec![vec![2, 43, 5, 6, 7, 8, 2]]),
            WorldConfig::default(),
        )
        .expect("level loads");
        let kinds = query::rooms(&world)[0].kinds().to_vec();
        assert_eq!(
            kinds,
            vec![
                TileKind::Wall,
                TileKind::Floor,
                TileKind::Floor,
                TileKind::Floor,
                TileKind::Wall,
                TileKind::Wall,
                TileKind::Wall,
            ]
        );
        assert_eq!(query::saws(&world).len(), 1);
    }

    #[test]
    fn wall_past_the_saw_track_keeps_colliding_after_reset() {
        let mut world = World::from_level(
            &level(vec![vec![1, 43, 1, 1, 2, 1]]),
            WorldConfig::default(),
        )
        .expect("level loads");
        let wall = TilePosition::new(RoomId::new(0), LocalTile::new(4, 0));
        let rect = query::tile_world(&world)
            .tile_rect(wall)
            .expect("wall tile exists");
        assert_eq!(query::kind_at(&world, wall), TileKind::Wall);
        assert!(world.is_colliding(&rect));

        let mut events = Vec::new();
        world.reset(&mut events);
        assert_eq!(query::kind_at(&world, wall), TileKind::Wall);
        assert!(world.is_colliding(&rect));
    }

    #[test]
    fn box_trap_without_button_stays_solid() {
        let world = World::from_level(&level(vec![vec![39, 31, 1]]), WorldConfig::default())
            .expect("level loads");
        assert!(query::box_traps(&world).is_empty());
        assert!(world.is_colliding(&WorldRect::new(36.0, 4.0, 24.0, 24.0)));
        assert_eq!(
            query::kind_at(&world, TilePosition::new(RoomId::new(0), LocalTile::new(0, 0))),
            TileKind::BoxTrapCrate
        );
    }

    #[test]
    fn box_trap_parts_prefer_the_last_match() {
        let level = level(vec![vec![39, 31, 39], vec![1, 32, 1]]);
        let world = World::from_level(&level, WorldConfig::default()).expect("level loads");
        let trap = &query::box_traps(&world)[0];
        assert_eq!(trap.home(), WorldRect::tile(WorldPoint::new(64.0, 32.0)));
        assert_eq!(trap.button(), WorldRect::tile(WorldPoint::new(32.0, 0.0)));
    }

    #[test]
    fn spawn_defaults_to_the_first_floor_tile() {
        let world = World::from_level(&level(vec![vec![2, 2], vec![2, 1]]), WorldConfig::default())
            .expect("level loads");
        assert_eq!(query::spawn_point(&world), WorldPoint::new(32.0, 0.0));
        assert_eq!(
            centred_in_tile(WorldPoint::new(32.0, 0.0), 24.0),
            WorldPoint::new(36.0, 4.0)
        );
    }
}
