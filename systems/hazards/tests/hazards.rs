use std::time::Duration;

use jungle_ruins_core::{Event, TraversalMode, WorldPoint, WorldRect, TILE_SIZE};
use jungle_ruins_system_hazards::{HazardConfig, HazardEngine, SawHeading, SawTrap};

fn tile(column: f32, row: f32) -> WorldRect {
    WorldRect::tile(WorldPoint::new(column * TILE_SIZE, row * TILE_SIZE))
}

fn slot_sequence(saw: &mut SawTrap, steps: usize, dt: Duration, ticks_per_step: u32) -> Vec<u32> {
    let mut slots = vec![saw.slot()];
    for _ in 0..steps {
        for _ in 0..ticks_per_step {
            let _ = saw.advance(dt);
        }
        slots.push(saw.slot());
    }
    slots
}

#[test]
fn saw_ping_pongs_across_three_slots() {
    let mut saw = SawTrap::new(WorldPoint::new(0.0, 0.0), &HazardConfig::default());
    let slots = slot_sequence(&mut saw, 6, Duration::from_secs(1), 1);
    assert_eq!(slots, vec![0, 1, 2, 1, 0, 1, 2]);
    assert_eq!(saw.heading(), SawHeading::Outward);
}

#[test]
fn saw_sequence_is_independent_of_tick_size() {
    let config = HazardConfig::default();
    let mut coarse = SawTrap::new(WorldPoint::new(0.0, 0.0), &config);
    let mut fine = SawTrap::new(WorldPoint::new(0.0, 0.0), &config);

    let coarse_slots = slot_sequence(&mut coarse, 8, Duration::from_millis(500), 2);
    let fine_slots = slot_sequence(&mut fine, 8, Duration::from_millis(125), 8);

    assert_eq!(coarse_slots, fine_slots);
    assert_eq!(coarse, fine);
}

#[test]
fn long_tick_performs_every_pending_transition() {
    let mut saw = SawTrap::new(WorldPoint::new(0.0, 0.0), &HazardConfig::default());
    assert_eq!(saw.advance(Duration::from_millis(3_500)), 3);
    assert_eq!(saw.slot(), 1);
    assert_eq!(saw.heading(), SawHeading::Homeward);
    assert_eq!(saw.advance(Duration::from_millis(500)), 1);
    assert_eq!(saw.slot(), 0);
}

#[test]
fn fire_burns_out_after_three_tiles_and_is_dropped_that_tick() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    engine.add_fire_vent(WorldPoint::new(0.0, 256.0));
    let mut events = Vec::new();

    engine.update(Duration::from_secs(2), &mut events);
    assert_eq!(
        events,
        vec![Event::FireSpawned {
            origin: WorldPoint::new(0.0, 256.0)
        }]
    );
    assert_eq!(engine.fires().len(), 1);

    events.clear();
    engine.update(Duration::from_millis(500), &mut events);
    let fire = &engine.fires()[0];
    assert!((fire.traveled() - 50.0).abs() < 1e-3);
    assert!((fire.hitbox().y() - 206.0).abs() < 1e-3);

    engine.update(Duration::from_millis(500), &mut events);
    assert!(engine.fires().is_empty(), "fire past its cap must not linger");
    assert!(events.is_empty());
}

#[test]
fn spawner_cycles_vents_round_robin() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    let vents = [
        WorldPoint::new(0.0, 128.0),
        WorldPoint::new(64.0, 128.0),
        WorldPoint::new(128.0, 128.0),
    ];
    for vent in vents {
        engine.add_fire_vent(vent);
    }

    let mut events = Vec::new();
    for _ in 0..8 {
        engine.update(Duration::from_secs(1), &mut events);
    }

    let spawned: Vec<WorldPoint> = events
        .iter()
        .filter_map(|event| match event {
            Event::FireSpawned { origin } => Some(*origin),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![vents[0], vents[1], vents[2], vents[0]]);
    assert_eq!(engine.spawner().cursor(), 1);
}

#[test]
fn spawner_carries_remainder_between_ticks() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    engine.add_fire_vent(WorldPoint::new(0.0, 128.0));
    let mut events = Vec::new();

    engine.update(Duration::from_millis(1_500), &mut events);
    assert!(events.is_empty());
    engine.update(Duration::from_millis(1_500), &mut events);
    assert_eq!(events.len(), 1);
    engine.update(Duration::from_millis(1_000), &mut events);
    assert_eq!(events.len(), 2);
}

#[test]
fn saws_spare_ghosts_but_fire_does_not() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    engine.add_saw(WorldPoint::new(0.0, 0.0));
    engine.add_fire_vent(WorldPoint::new(256.0, 256.0));
    let mut events = Vec::new();
    engine.update(Duration::from_secs(2), &mut events);

    let on_saw = WorldRect::new(68.0, 4.0, 24.0, 24.0);
    assert!(engine.is_colliding_with_hazards(&on_saw, TraversalMode::Normal));
    assert!(!engine.is_colliding_with_hazards(&on_saw, TraversalMode::Ghost));

    let in_fire = WorldRect::new(260.0, 260.0, 24.0, 24.0);
    assert!(engine.is_colliding_with_hazards(&in_fire, TraversalMode::Normal));
    assert!(engine.is_colliding_with_hazards(&in_fire, TraversalMode::Ghost));
}

#[test]
fn box_trap_disarms_when_crate_reaches_button() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    let trap_rect = tile(3.0, 3.0);
    let id = engine.add_box_trap(trap_rect, tile(2.0, 2.0), tile(4.0, 2.0));
    let sample = WorldRect::new(100.0, 100.0, 8.0, 8.0);

    assert!(engine.is_colliding_with_hazards(&sample, TraversalMode::Normal));
    assert!(!engine.is_trap_triggered(id));

    let trap = engine.box_trap_mut(id).expect("trap registered");
    assert!(!trap.move_crate(tile(3.0, 2.0)));
    assert!(trap.move_crate(tile(3.5, 2.0)));

    assert!(engine.is_trap_triggered(id));
    assert!(!engine.is_colliding_with_hazards(&sample, TraversalMode::Normal));
    assert!(engine.overlaps_locked_crate(&tile(3.5, 2.0)));
}

#[test]
fn update_reports_trigger_exactly_once() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    let id = engine.add_box_trap(tile(0.0, 0.0), tile(1.0, 0.0), tile(1.0, 0.0));
    let mut events = Vec::new();

    engine.update(Duration::from_millis(16), &mut events);
    engine.update(Duration::from_millis(16), &mut events);

    let triggers = events
        .iter()
        .filter(|event| matches!(event, Event::BoxTrapTriggered { trap } if *trap == id))
        .count();
    assert_eq!(triggers, 1);
}

#[test]
fn reset_rearms_traps_and_rewinds_saws() {
    let mut engine = HazardEngine::new(HazardConfig::default());
    engine.add_saw(WorldPoint::new(0.0, 0.0));
    engine.add_fire_vent(WorldPoint::new(0.0, 256.0));
    let id = engine.add_box_trap(tile(0.0, 5.0), tile(1.0, 5.0), tile(2.0, 5.0));

    let mut events = Vec::new();
    engine.update(Duration::from_millis(2_500), &mut events);
    let _ = engine
        .box_trap_mut(id)
        .expect("trap registered")
        .move_crate(tile(2.0, 5.0));
    assert!(engine.is_trap_triggered(id));
    assert!(!engine.fires().is_empty());

    engine.clear_fires();
    engine.reset_traps();

    assert!(!engine.is_trap_triggered(id));
    assert!(engine.fires().is_empty());
    assert_eq!(engine.saws()[0].slot(), 0);
    assert_eq!(engine.box_traps()[0].crate_rect(), tile(1.0, 5.0));
    assert_eq!(engine.spawner().cursor(), 0);
}
