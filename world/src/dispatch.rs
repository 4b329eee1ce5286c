//! Tile-triggered events fired while the mover overlaps interactive tiles.

use std::time::Duration;

use jungle_ruins_core::{
    Event, Mover, TileEvent, TileKind, TilePosition, TraversalMode, WorldPoint, WorldRect,
};
use log::{debug, info, warn};

use crate::{collision::CollisionIndex, rooms::TileWorld, WorldConfig};

/// Pickup dropped into the world by a tile event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    position: WorldPoint,
}

impl Collectible {
    /// Lower-left corner of the pickup.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Pickup hitbox.
    #[must_use]
    pub const fn rect(&self) -> WorldRect {
        WorldRect::tile(self.position)
    }
}

/// Session state owned by the tile-event dispatcher.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileEventDispatcher {
    doors_open: bool,
    markers_converted: bool,
    won: bool,
    teleport_cooldown: Duration,
    unresolved_pad: Option<TilePosition>,
    collectibles: Vec<Collectible>,
    dropped: u32,
    scratch: Vec<TilePosition>,
}

/// Mutable world parts the dispatcher rewrites while handling tile events.
pub(crate) struct DispatchTargets<'a> {
    pub(crate) tiles: &'a mut TileWorld,
    pub(crate) collision: &'a mut CollisionIndex,
    pub(crate) config: &'a WorldConfig,
}

impl TileEventDispatcher {
    /// Reports whether a door button has opened the doors.
    #[must_use]
    pub const fn doors_open(&self) -> bool {
        self.doors_open
    }

    /// Reports whether the victory markers were converted.
    #[must_use]
    pub const fn markers_converted(&self) -> bool {
        self.markers_converted
    }

    /// Reports whether the session was won.
    #[must_use]
    pub const fn is_won(&self) -> bool {
        self.won
    }

    /// Time left before teleport pads react again.
    #[must_use]
    pub const fn teleport_cooldown(&self) -> Duration {
        self.teleport_cooldown
    }

    /// Collectibles waiting to be picked up.
    #[must_use]
    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Collectibles dropped since load or the last reset.
    #[must_use]
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Counts the teleport cooldown down by `dt`.
    pub(crate) fn advance(&mut self, dt: Duration) {
        self.teleport_cooldown = self.teleport_cooldown.saturating_sub(dt);
    }

    /// Clears every session flag, timer, and collectible.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            scratch: std::mem::take(&mut self.scratch),
            ..Self::default()
        };
    }

    /// Runs one dispatch pass for `mover`.
    ///
    /// Pickups resolve first, then every overlapped tile is handled in
    /// row-major order, reading kinds live so earlier handlers in the same
    /// pass are observed by later ones. Returns the teleport destination, if
    /// a pad fired.
    pub(crate) fn dispatch<M>(
        &mut self,
        targets: DispatchTargets<'_>,
        mover: &mut M,
        out: &mut Vec<Event>,
    ) -> Option<WorldPoint>
    where
        M: Mover + ?Sized,
    {
        let bounds = mover.bounds();
        self.collect_pickups(&bounds, targets.config.collectible_cap, mover, out);

        let mut overlapped = std::mem::take(&mut self.scratch);
        overlapped.clear();
        targets.tiles.overlapping(&bounds, &mut overlapped);

        let mut destination = None;
        for position in overlapped.iter().copied() {
            let kind = targets.tiles.kind_at(position);
            let Some(event) = kind.event() else {
                continue;
            };

            match event {
                TileEvent::OpenDoors => self.open_doors(targets.tiles, targets.collision, out),
                TileEvent::EnterGhostMode => {
                    if !mover.is_in_ghost_mode() {
                        mover.set_ghost_mode(true);
                        out.push(Event::TraversalModeChanged {
                            mode: TraversalMode::Ghost,
                        });
                    }
                }
                TileEvent::GhostBarrier => {
                    if mover.is_in_ghost_mode() {
                        let _ = targets.tiles.set_kind(position, TileKind::Floor);
                        mover.set_ghost_mode(false);
                        out.push(Event::TraversalModeChanged {
                            mode: TraversalMode::Normal,
                        });
                        if let Some(origin) = targets.tiles.tile_origin(position) {
                            self.drop_collectible(origin, targets.config.collectible_cap, out);
                        }
                    } else {
                        mover.take_damage();
                        out.push(Event::MoverDamaged);
                    }
                }
                TileEvent::Teleport => {
                    if destination.is_none()
                        && self.teleport_cooldown.is_zero()
                        && self.unresolved_pad != Some(position)
                    {
                        destination =
                            self.resolve_teleport(kind, targets.tiles, targets.config, out);
                        if destination.is_none() {
                            self.unresolved_pad = Some(position);
                        }
                    }
                }
                TileEvent::Victory => {
                    if !self.won {
                        self.won = true;
                        info!("victory reached");
                        out.push(Event::Victory);
                    }
                }
                TileEvent::ConvertMarkers => {
                    if !self.markers_converted {
                        self.convert_markers(targets.tiles, out);
                        if let Some(origin) = targets.tiles.tile_origin(position) {
                            self.drop_collectible(origin, targets.config.collectible_cap, out);
                        }
                    }
                }
            }
        }

        // A pad without a target reports again only after the mover steps off it.
        if self.unresolved_pad.is_some_and(|pad| !overlapped.contains(&pad)) {
            self.unresolved_pad = None;
        }

        self.scratch = overlapped;
        destination
    }

    fn collect_pickups<M>(
        &mut self,
        bounds: &WorldRect,
        cap: u32,
        mover: &mut M,
        out: &mut Vec<Event>,
    )
    where
        M: Mover + ?Sized,
    {
        let mut index = 0;
        while index < self.collectibles.len() {
            let collectible = self.collectibles[index];
            if !collectible.rect().overlaps(bounds) {
                index += 1;
                continue;
            }

            let _ = self.collectibles.remove(index);
            out.push(Event::CollectibleCollected {
                position: collectible.position,
            });
            let current = mover.currency();
            if current < cap {
                let total = current + 1;
                mover.set_currency(total);
                out.push(Event::CurrencyChanged { total });
            }
        }
    }

    fn drop_collectible(&mut self, position: WorldPoint, cap: u32, out: &mut Vec<Event>) {
        if self.dropped >= cap {
            debug!("collectible cap of {cap} reached; skipping drop");
            return;
        }

        self.dropped += 1;
        self.collectibles.push(Collectible { position });
        out.push(Event::CollectibleDropped {
            position,
            total_dropped: self.dropped,
        });
    }

    fn open_doors(
        &mut self,
        tiles: &mut TileWorld,
        collision: &mut CollisionIndex,
        out: &mut Vec<Event>,
    ) {
        if self.doors_open {
            return;
        }
        self.doors_open = true;

        let doors = tiles.positions_of(TileKind::Door);
        for position in &doors {
            let _ = tiles.set_kind(*position, TileKind::Floor);
            if let Some(rect) = tiles.tile_rect(*position) {
                let _ = collision.remove_at(position.room(), &rect);
            }
        }

        info!("opened {} doors", doors.len());
        out.push(Event::DoorsOpened { count: doors.len() });
    }

    fn convert_markers(&mut self, tiles: &mut TileWorld, out: &mut Vec<Event>) {
        self.markers_converted = true;

        let markers = tiles.positions_of(TileKind::VictoryMarker);
        for position in &markers {
            let _ = tiles.set_kind(*position, TileKind::Victory);
        }

        info!("converted {} victory markers", markers.len());
        out.push(Event::MarkersConverted {
            count: markers.len(),
        });
    }

    fn resolve_teleport(
        &mut self,
        source: TileKind,
        tiles: &TileWorld,
        config: &WorldConfig,
        out: &mut Vec<Event>,
    ) -> Option<WorldPoint> {
        let route = config.routes.iter().find(|route| route.source == source)?;

        let landing = tiles.find_first(route.room, route.target).and_then(|target| {
            let room = tiles.room(target.room())?;
            Some(room.origin_of(
                i64::from(target.tile().column()) + i64::from(route.approach_columns),
                i64::from(target.tile().row()) + i64::from(route.approach_rows),
            ))
        });

        let Some(destination) = landing else {
            warn!(
                "no {:?} found in room {} for {:?}",
                route.target,
                route.room.get(),
                source
            );
            out.push(Event::TeleportTargetMissing {
                source,
                target: route.target,
                room: route.room,
            });
            return None;
        };

        self.teleport_cooldown = config.teleport_cooldown;
        out.push(Event::TeleportArmed { destination });
        Some(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_counts_down_to_zero() {
        let mut dispatcher = TileEventDispatcher {
            teleport_cooldown: Duration::from_millis(300),
            ..TileEventDispatcher::default()
        };
        dispatcher.advance(Duration::from_millis(200));
        assert_eq!(dispatcher.teleport_cooldown(), Duration::from_millis(100));
        dispatcher.advance(Duration::from_millis(200));
        assert!(dispatcher.teleport_cooldown().is_zero());
    }

    #[test]
    fn drops_stop_at_the_cap() {
        let mut dispatcher = TileEventDispatcher::default();
        let mut events = Vec::new();
        for step in 0..5 {
            dispatcher.drop_collectible(WorldPoint::new(step as f32 * 32.0, 0.0), 3, &mut events);
        }
        assert_eq!(dispatcher.dropped(), 3);
        assert_eq!(dispatcher.collectibles().len(), 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn reset_clears_session_state() {
        let mut dispatcher = TileEventDispatcher {
            doors_open: true,
            markers_converted: true,
            won: true,
            teleport_cooldown: Duration::from_secs(1),
            dropped: 2,
            ..TileEventDispatcher::default()
        };
        dispatcher.reset();
        assert_eq!(dispatcher, TileEventDispatcher::default());
    }
}
