//! Scripted explorer driven through the world's mover contract.

use std::time::Duration;

use jungle_ruins_core::{Mover, WorldPoint, WorldRect};
use jungle_ruins_world::centred_in_tile;
use log::info;

/// Side length of the explorer's square hitbox.
pub(crate) const EXPLORER_SIZE: f32 = 24.0;
/// Walking speed in world units per second.
pub(crate) const EXPLORER_SPEED: f32 = 150.0;

const MAX_HEARTS: u32 = 3;
const INVULNERABILITY: Duration = Duration::from_secs(1);

/// Mover owned by the runner: hit points, invulnerability, and position.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Explorer {
    bounds: WorldRect,
    start: WorldPoint,
    ghost: bool,
    hearts: u32,
    invulnerable_for: Duration,
    currency: u32,
}

impl Explorer {
    /// Creates an explorer standing centred on the tile whose corner is `spawn`.
    pub(crate) fn new(spawn: WorldPoint) -> Self {
        let start = centred_in_tile(spawn, EXPLORER_SIZE);
        Self {
            bounds: WorldRect::new(start.x(), start.y(), EXPLORER_SIZE, EXPLORER_SIZE),
            start,
            ghost: false,
            hearts: MAX_HEARTS,
            invulnerable_for: Duration::ZERO,
            currency: 0,
        }
    }

    pub(crate) const fn hearts(&self) -> u32 {
        self.hearts
    }

    pub(crate) fn is_defeated(&self) -> bool {
        self.hearts == 0
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.bounds.origin()
    }

    /// Counts the invulnerability window down.
    pub(crate) fn tick(&mut self, dt: Duration) {
        self.invulnerable_for = self.invulnerable_for.saturating_sub(dt);
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.bounds = self.bounds.translated(dx, dy);
    }

    /// Restores hit points, mode, and position after a defeat.
    pub(crate) fn respawn(&mut self) {
        *self = Self {
            bounds: self.bounds.moved_to(self.start),
            ghost: false,
            hearts: MAX_HEARTS,
            invulnerable_for: Duration::ZERO,
            currency: 0,
            start: self.start,
        };
    }
}

impl Mover for Explorer {
    fn bounds(&self) -> WorldRect {
        self.bounds
    }

    fn is_in_ghost_mode(&self) -> bool {
        self.ghost
    }

    fn set_ghost_mode(&mut self, ghost: bool) {
        self.ghost = ghost;
    }

    fn take_damage(&mut self) {
        if !self.invulnerable_for.is_zero() || self.hearts == 0 {
            return;
        }

        self.hearts -= 1;
        self.invulnerable_for = INVULNERABILITY;
        self.bounds = self.bounds.moved_to(self.start);
        info!("explorer hit, {} hearts left", self.hearts);
    }

    fn currency(&self) -> u32 {
        self.currency
    }

    fn set_currency(&mut self, value: u32) {
        self.currency = value;
    }

    fn teleport_to(&mut self, destination: WorldPoint) {
        self.bounds = self.bounds.moved_to(centred_in_tile(destination, EXPLORER_SIZE));
    }
}
