#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic hazard automata: oscillating saws, falling fire, and box traps.
//!
//! Every automaton advances from plain [`Duration`] accumulators so the same
//! elapsed time produces the same state regardless of how it is sliced into
//! ticks.

use std::time::Duration;

use jungle_ruins_core::{BoxTrapId, Event, TraversalMode, WorldPoint, WorldRect, TILE_SIZE};

const DEFAULT_SAW_SLOTS: u32 = 3;
const DEFAULT_SAW_STEP: Duration = Duration::from_secs(1);
const DEFAULT_FIRE_SPAWN_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_FIRE_SPEED: f32 = 100.0;
const DEFAULT_FIRE_TRAVEL_CAP: f32 = TILE_SIZE * 3.0;

/// Configuration parameters shared by every hazard in a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardConfig {
    saw_slots: u32,
    saw_step: Duration,
    fire_spawn_interval: Duration,
    fire_speed: f32,
    fire_travel_cap: f32,
}

impl HazardConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(
        saw_slots: u32,
        saw_step: Duration,
        fire_spawn_interval: Duration,
        fire_speed: f32,
        fire_travel_cap: f32,
    ) -> Self {
        Self {
            saw_slots,
            saw_step,
            fire_spawn_interval,
            fire_speed,
            fire_travel_cap,
        }
    }

    /// Number of discrete slots a saw travels across.
    #[must_use]
    pub const fn saw_slots(&self) -> u32 {
        self.saw_slots
    }

    /// Time a saw rests on a slot before moving.
    #[must_use]
    pub const fn saw_step(&self) -> Duration {
        self.saw_step
    }

    /// Time between two fire spawns.
    #[must_use]
    pub const fn fire_spawn_interval(&self) -> Duration {
        self.fire_spawn_interval
    }

    /// Downward speed of falling fire in world units per second.
    #[must_use]
    pub const fn fire_speed(&self) -> f32 {
        self.fire_speed
    }

    /// Distance a fire falls before burning out.
    #[must_use]
    pub const fn fire_travel_cap(&self) -> f32 {
        self.fire_travel_cap
    }
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SAW_SLOTS,
            DEFAULT_SAW_STEP,
            DEFAULT_FIRE_SPAWN_INTERVAL,
            DEFAULT_FIRE_SPEED,
            DEFAULT_FIRE_TRAVEL_CAP,
        )
    }
}

/// Direction a saw is currently travelling along its track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SawHeading {
    /// Toward the last slot.
    Outward,
    /// Toward slot zero.
    Homeward,
}

/// Saw blade ping-ponging across a row of slots.
#[derive(Clone, Debug, PartialEq)]
pub struct SawTrap {
    start: WorldPoint,
    slots: u32,
    step: Duration,
    slot: u32,
    heading: SawHeading,
    accumulator: Duration,
}

impl SawTrap {
    /// Creates a saw resting on slot zero at `start`.
    #[must_use]
    pub fn new(start: WorldPoint, config: &HazardConfig) -> Self {
        Self {
            start,
            slots: config.saw_slots.max(1),
            step: config.saw_step,
            slot: 0,
            heading: SawHeading::Outward,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates elapsed time and performs every slot transition it pays for.
    ///
    /// Returns the number of transitions performed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut transitions = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.step_once();
            transitions += 1;
        }
        transitions
    }

    fn step_once(&mut self) {
        if self.slots <= 1 {
            return;
        }

        let last = self.slots - 1;
        match self.heading {
            SawHeading::Outward if self.slot < last => self.slot += 1,
            SawHeading::Outward => {
                self.slot -= 1;
                self.heading = SawHeading::Homeward;
            }
            SawHeading::Homeward if self.slot > 0 => self.slot -= 1,
            SawHeading::Homeward => {
                self.slot += 1;
                self.heading = SawHeading::Outward;
            }
        }
    }

    /// Slot the blade currently occupies.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Number of slots on the track.
    #[must_use]
    pub const fn slots(&self) -> u32 {
        self.slots
    }

    /// Direction of the next transition.
    #[must_use]
    pub const fn heading(&self) -> SawHeading {
        self.heading
    }

    /// Lower-left corner of slot zero.
    #[must_use]
    pub const fn start(&self) -> WorldPoint {
        self.start
    }

    /// Hitbox of the blade at its current slot.
    #[must_use]
    pub fn hitbox(&self) -> WorldRect {
        let x = self.start.x() + self.slot as f32 * TILE_SIZE;
        WorldRect::tile(WorldPoint::new(x, self.start.y()))
    }

    /// Returns the blade to slot zero with a fresh timer.
    pub fn reset(&mut self) {
        self.slot = 0;
        self.heading = SawHeading::Outward;
        self.accumulator = Duration::ZERO;
    }
}

/// Fire falling straight down from a vent until it burns out.
#[derive(Clone, Debug, PartialEq)]
pub struct FireHazard {
    origin: WorldPoint,
    position: WorldPoint,
    traveled: f32,
    active: bool,
}

impl FireHazard {
    /// Creates an active fire at its vent.
    #[must_use]
    pub const fn new(origin: WorldPoint) -> Self {
        Self {
            origin,
            position: origin,
            traveled: 0.0,
            active: true,
        }
    }

    /// Moves the fire down by `speed * dt` and burns it out once `cap` is reached.
    pub fn advance(&mut self, dt: Duration, speed: f32, cap: f32) {
        if !self.active {
            return;
        }

        let distance = speed * dt.as_secs_f32();
        self.position = WorldPoint::new(self.position.x(), self.position.y() - distance);
        self.traveled += distance;
        if self.traveled >= cap {
            self.active = false;
        }
    }

    /// Vent the fire spawned from.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Distance fallen so far.
    #[must_use]
    pub const fn traveled(&self) -> f32 {
        self.traveled
    }

    /// Reports whether the fire is still burning.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Current hitbox of the fire.
    #[must_use]
    pub const fn hitbox(&self) -> WorldRect {
        WorldRect::tile(self.position)
    }
}

/// Round-robin spawner cycling over the level's fire vents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FireSpawner {
    vents: Vec<WorldPoint>,
    cursor: usize,
    accumulator: Duration,
}

impl FireSpawner {
    /// Registers a vent at the end of the spawn cycle.
    pub fn add_vent(&mut self, vent: WorldPoint) {
        self.vents.push(vent);
    }

    /// Vents in spawn order.
    #[must_use]
    pub fn vents(&self) -> &[WorldPoint] {
        &self.vents
    }

    /// Index of the vent that spawns next.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Accumulates elapsed time and emits one vent per elapsed interval.
    pub fn advance(&mut self, dt: Duration, interval: Duration, out: &mut Vec<WorldPoint>) {
        if interval.is_zero() || self.vents.is_empty() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            if let Some(vent) = self.vents.get(self.cursor) {
                out.push(*vent);
            }
            self.cursor = (self.cursor + 1) % self.vents.len();
        }
    }

    /// Rewinds the spawn cycle and timer. Vents are kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.accumulator = Duration::ZERO;
    }
}

/// Compound hazard disarmed by pushing its crate onto its button.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxTrap {
    id: BoxTrapId,
    trap: WorldRect,
    home: WorldRect,
    button: WorldRect,
    crate_rect: WorldRect,
    triggered: bool,
}

impl BoxTrap {
    /// Creates an armed trap whose crate rests on `home`.
    #[must_use]
    pub const fn new(id: BoxTrapId, trap: WorldRect, home: WorldRect, button: WorldRect) -> Self {
        Self {
            id,
            trap,
            home,
            button,
            crate_rect: home,
            triggered: false,
        }
    }

    /// Identifier assigned at load time.
    #[must_use]
    pub const fn id(&self) -> BoxTrapId {
        self.id
    }

    /// Hitbox of the hazard tile.
    #[must_use]
    pub const fn trap(&self) -> WorldRect {
        self.trap
    }

    /// Recorded origin of the crate.
    #[must_use]
    pub const fn home(&self) -> WorldRect {
        self.home
    }

    /// Hitbox of the button.
    #[must_use]
    pub const fn button(&self) -> WorldRect {
        self.button
    }

    /// Current rectangle of the trap's crate.
    #[must_use]
    pub const fn crate_rect(&self) -> WorldRect {
        self.crate_rect
    }

    /// Reports whether the trap has been disarmed.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Moves the crate and evaluates the trigger immediately.
    ///
    /// Returns `true` when this move disarmed the trap. Triggered traps keep
    /// their crate where it is.
    pub fn move_crate(&mut self, rect: WorldRect) -> bool {
        if self.triggered {
            return false;
        }
        self.crate_rect = rect;
        self.check_trigger()
    }

    /// Performs the armed to triggered transition if the crate covers the button.
    ///
    /// Returns `true` only on the transition itself.
    pub fn check_trigger(&mut self) -> bool {
        if self.triggered || !self.crate_rect.overlaps(&self.button) {
            return false;
        }
        self.triggered = true;
        true
    }

    /// Re-arms the trap and returns the crate to its origin.
    pub fn reset(&mut self) {
        self.triggered = false;
        self.crate_rect = self.home;
    }
}

/// Owner of every hazard automaton in a level.
#[derive(Clone, Debug, Default)]
pub struct HazardEngine {
    config: HazardConfig,
    saws: Vec<SawTrap>,
    fires: Vec<FireHazard>,
    spawner: FireSpawner,
    box_traps: Vec<BoxTrap>,
    scratch: Vec<WorldPoint>,
}

impl HazardEngine {
    /// Creates an engine without hazards.
    #[must_use]
    pub fn new(config: HazardConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration used by the engine.
    #[must_use]
    pub const fn config(&self) -> &HazardConfig {
        &self.config
    }

    /// Registers a saw whose slot zero sits at `start`.
    pub fn add_saw(&mut self, start: WorldPoint) {
        self.saws.push(SawTrap::new(start, &self.config));
    }

    /// Registers a fire vent at the end of the spawn cycle.
    pub fn add_fire_vent(&mut self, vent: WorldPoint) {
        self.spawner.add_vent(vent);
    }

    /// Registers an armed box trap and returns its identifier.
    pub fn add_box_trap(
        &mut self,
        trap: WorldRect,
        home: WorldRect,
        button: WorldRect,
    ) -> BoxTrapId {
        let id = BoxTrapId::new(u32::try_from(self.box_traps.len()).unwrap_or(u32::MAX));
        self.box_traps.push(BoxTrap::new(id, trap, home, button));
        id
    }

    /// Advances every automaton by `dt`.
    ///
    /// Order: saws, falling fire (burnt-out fires are dropped on the same
    /// tick), spawns, then box-trap triggers.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        for saw in &mut self.saws {
            let _ = saw.advance(dt);
        }

        let speed = self.config.fire_speed;
        let cap = self.config.fire_travel_cap;
        for fire in &mut self.fires {
            fire.advance(dt, speed, cap);
        }
        self.fires.retain(FireHazard::is_active);

        self.scratch.clear();
        self.spawner
            .advance(dt, self.config.fire_spawn_interval, &mut self.scratch);
        for origin in self.scratch.drain(..) {
            self.fires.push(FireHazard::new(origin));
            out.push(Event::FireSpawned { origin });
        }

        for trap in &mut self.box_traps {
            if trap.check_trigger() {
                log::info!("box trap {} triggered", trap.id.get());
                out.push(Event::BoxTrapTriggered { trap: trap.id });
            }
        }
    }

    /// Reports whether `rect` touches a hazard that hurts a mover in `mode`.
    ///
    /// Saws spare ghosts; fire and armed box traps hurt everyone.
    #[must_use]
    pub fn is_colliding_with_hazards(&self, rect: &WorldRect, mode: TraversalMode) -> bool {
        if !mode.is_ghost() && self.saws.iter().any(|saw| saw.hitbox().overlaps(rect)) {
            return true;
        }

        if self.fires.iter().any(|fire| fire.hitbox().overlaps(rect)) {
            return true;
        }

        self.box_traps
            .iter()
            .any(|trap| !trap.is_triggered() && trap.trap().overlaps(rect))
    }

    /// Reports whether the trap with `id` has been disarmed.
    #[must_use]
    pub fn is_trap_triggered(&self, id: BoxTrapId) -> bool {
        self.box_trap(id).map_or(false, BoxTrap::is_triggered)
    }

    /// Reports whether `rect` overlaps a crate that was locked onto its button.
    #[must_use]
    pub fn overlaps_locked_crate(&self, rect: &WorldRect) -> bool {
        self.box_traps
            .iter()
            .any(|trap| trap.is_triggered() && trap.crate_rect().overlaps(rect))
    }

    /// Saws in registration order.
    #[must_use]
    pub fn saws(&self) -> &[SawTrap] {
        &self.saws
    }

    /// Fires that are still falling.
    #[must_use]
    pub fn fires(&self) -> &[FireHazard] {
        &self.fires
    }

    /// Spawner driving the fire cycle.
    #[must_use]
    pub const fn spawner(&self) -> &FireSpawner {
        &self.spawner
    }

    /// Box traps in registration order.
    #[must_use]
    pub fn box_traps(&self) -> &[BoxTrap] {
        &self.box_traps
    }

    /// Looks up a box trap by identifier.
    #[must_use]
    pub fn box_trap(&self, id: BoxTrapId) -> Option<&BoxTrap> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.box_traps.get(index))
    }

    /// Mutable access to a box trap by identifier.
    pub fn box_trap_mut(&mut self, id: BoxTrapId) -> Option<&mut BoxTrap> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.box_traps.get_mut(index))
    }

    /// Drops every active fire and rewinds the spawn cycle.
    pub fn clear_fires(&mut self) {
        self.fires.clear();
        self.spawner.reset();
    }

    /// Returns every saw to slot zero and re-arms every box trap.
    pub fn reset_traps(&mut self) {
        for saw in &mut self.saws {
            saw.reset();
        }
        for trap in &mut self.box_traps {
            trap.reset();
        }
    }
}
