use jungle_ruins_core::{WorldRect, TILE_SIZE};
use jungle_ruins_system_pushing::{PushResolution, Pushing};

fn body() -> WorldRect {
    WorldRect::new(96.0, 96.0, TILE_SIZE, TILE_SIZE)
}

fn never_blocked(_: &WorldRect) -> bool {
    false
}

#[test]
fn pushes_right_when_flush_against_left_edge() {
    let mover = WorldRect::new(73.5, 100.0, 24.0, 24.0);
    let resolution = Pushing::default().resolve(&mover, &body(), 2.5, 0.0, never_blocked);
    assert_eq!(resolution, PushResolution::Moved(body().translated(2.5, 0.0)));
}

#[test]
fn pushes_left_when_flush_against_right_edge() {
    let mover = WorldRect::new(126.5, 100.0, 24.0, 24.0);
    let resolution = Pushing::default().resolve(&mover, &body(), -2.5, 0.0, never_blocked);
    assert_eq!(resolution, PushResolution::Moved(body().translated(-2.5, 0.0)));
}

#[test]
fn pushes_up_when_flush_against_bottom_edge() {
    let mover = WorldRect::new(100.0, 73.0, 24.0, 24.0);
    let resolution = Pushing::default().resolve(&mover, &body(), 0.0, 3.0, never_blocked);
    assert_eq!(resolution, PushResolution::Moved(body().translated(0.0, 3.0)));
}

#[test]
fn pushes_down_when_flush_against_top_edge() {
    let mover = WorldRect::new(100.0, 127.0, 24.0, 24.0);
    let resolution = Pushing::default().resolve(&mover, &body(), 0.0, -3.0, never_blocked);
    assert_eq!(resolution, PushResolution::Moved(body().translated(0.0, -3.0)));
}

#[test]
fn deep_overlap_blocks_instead_of_pushing() {
    let mover = WorldRect::new(90.0, 100.0, 24.0, 24.0);
    let resolution = Pushing::default().resolve(&mover, &body(), 2.5, 0.0, never_blocked);
    assert_eq!(resolution, PushResolution::Blocked);
}

#[test]
fn blocked_destination_keeps_body_in_place() {
    let mover = WorldRect::new(73.5, 100.0, 24.0, 24.0);
    let wall = WorldRect::new(128.0, 96.0, TILE_SIZE, TILE_SIZE);
    let resolution = Pushing::default().resolve(&mover, &body(), 2.5, 0.0, |candidate| {
        candidate.overlaps(&wall)
    });
    assert_eq!(resolution, PushResolution::Blocked);
}

#[test]
fn separated_mover_reports_no_contact() {
    let mover = WorldRect::new(40.0, 100.0, 24.0, 24.0);
    let resolution = Pushing::default().resolve(&mover, &body(), 2.5, 0.0, never_blocked);
    assert_eq!(resolution, PushResolution::NoContact);
}

#[test]
fn first_overlapping_body_wins() {
    let far = WorldRect::new(0.0, 0.0, TILE_SIZE, TILE_SIZE);
    let bodies = [far, body(), body().translated(TILE_SIZE, 0.0)];
    let mover = WorldRect::new(73.5, 100.0, 24.0, 24.0);

    let resolved = Pushing::default().resolve_first(&mover, 2.5, 0.0, bodies, never_blocked);
    assert_eq!(
        resolved,
        Some((1, PushResolution::Moved(body().translated(2.5, 0.0))))
    );

    let nothing = Pushing::default().resolve_first(
        &WorldRect::new(300.0, 300.0, 24.0, 24.0),
        2.5,
        0.0,
        bodies,
        never_blocked,
    );
    assert_eq!(nothing, None);
}
