//! Fixed-step session loop that drives an [`Explorer`] through a [`World`].

use std::{fmt, time::Duration};

use jungle_ruins_core::{Event, Mover, PushOutcome, TraversalMode, WorldPoint};
use jungle_ruins_world::{query, World};
use log::{debug, info, warn};

use crate::{
    explorer::{Explorer, EXPLORER_SPEED},
    script::MoveScript,
};

/// Largest displacement applied in one walk step, kept below the push tolerance
/// so the explorer never sinks into a crate deeper than a push allows.
const MAX_STEP: f32 = 1.0;

/// Totals gathered over one headless session.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Summary {
    ticks: u32,
    elapsed: Duration,
    hearts: u32,
    currency: u32,
    defeats: u32,
    pushes: u32,
    fires_spawned: u32,
    traps_triggered: u32,
    teleports: u32,
    collectibles_dropped: u32,
    doors_open: bool,
    won: bool,
    position: WorldPoint,
}

impl Summary {
    pub(crate) const fn doors_open(&self) -> bool {
        self.doors_open
    }

    pub(crate) const fn won(&self) -> bool {
        self.won
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ran {} ticks ({:.2}s simulated)",
            self.ticks,
            self.elapsed.as_secs_f32()
        )?;
        writeln!(
            f,
            "explorer at ({:.1}, {:.1}) with {} hearts, {} currency, {} defeats",
            self.position.x(),
            self.position.y(),
            self.hearts,
            self.currency,
            self.defeats
        )?;
        writeln!(
            f,
            "pushes: {}, fires spawned: {}, traps triggered: {}, teleports: {}",
            self.pushes, self.fires_spawned, self.traps_triggered, self.teleports
        )?;
        write!(
            f,
            "collectibles dropped: {}, doors open: {}, won: {}",
            self.collectibles_dropped, self.doors_open, self.won
        )
    }
}

/// Runs `ticks` fixed steps of length `dt`, walking the explorer along `script`.
///
/// Each step advances hazards, moves or pushes, applies hazard damage, then
/// dispatches tile events. A defeated explorer resets the session.
pub(crate) fn run(
    world: &mut World,
    explorer: &mut Explorer,
    script: &MoveScript,
    ticks: u32,
    dt: Duration,
) -> Summary {
    let mut summary = Summary::default();
    let mut events = Vec::new();
    let distance = EXPLORER_SPEED * dt.as_secs_f32();
    let steps = (distance / MAX_STEP).ceil().max(1.0) as u32;
    let step = distance / steps as f32;

    for tick in 0..ticks {
        events.clear();
        world.update(dt, &mut events);
        explorer.tick(dt);

        if let Some(direction) = script.direction_at(tick) {
            let (dx, dy) = direction.delta(step);
            for _ in 0..steps {
                walk(world, explorer, dx, dy, &mut events);
            }
        }

        let mode = TraversalMode::from_ghost_flag(explorer.is_in_ghost_mode());
        if world.is_colliding_with_hazards(&explorer.bounds(), mode) {
            explorer.take_damage();
        }

        if let Some(destination) = world.dispatch_tile_events(explorer, &mut events) {
            explorer.teleport_to(destination);
            summary.teleports += 1;
        }

        if explorer.is_defeated() {
            warn!("explorer defeated on tick {tick}, resetting session");
            world.reset(&mut events);
            explorer.respawn();
            summary.defeats += 1;
        }

        tally(&mut summary, &events);
        summary.ticks += 1;
        summary.elapsed += dt;
    }

    summary.hearts = explorer.hearts();
    summary.currency = explorer.currency();
    summary.position = explorer.position();
    summary.collectibles_dropped = query::collectibles_dropped(world);
    summary.doors_open = query::doors_open(world);
    summary.won = query::is_won(world);
    info!(
        "session finished after {} ticks with {} events of note",
        summary.ticks,
        summary.pushes + summary.fires_spawned + summary.traps_triggered + summary.teleports
    );
    summary
}

fn walk(world: &mut World, explorer: &mut Explorer, dx: f32, dy: f32, events: &mut Vec<Event>) {
    let bounds = explorer.bounds();
    match world.try_push(&bounds, dx, dy, events) {
        PushOutcome::Pushed => explorer.translate(dx, dy),
        PushOutcome::Blocked => {}
        PushOutcome::NoContact => {
            if dx != 0.0 && !world.is_colliding(&bounds.translated(dx, 0.0)) {
                explorer.translate(dx, 0.0);
            }
            let bounds = explorer.bounds();
            if dy != 0.0 && !world.is_colliding(&bounds.translated(0.0, dy)) {
                explorer.translate(0.0, dy);
            }
        }
    }
}

fn tally(summary: &mut Summary, events: &[Event]) {
    for event in events {
        match event {
            Event::TimeAdvanced { .. } => continue,
            Event::BodyPushed { .. } => summary.pushes += 1,
            Event::FireSpawned { .. } => summary.fires_spawned += 1,
            Event::BoxTrapTriggered { .. } => summary.traps_triggered += 1,
            _ => {}
        }
        debug!("{event:?}");
    }
}
