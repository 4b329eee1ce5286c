#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure push resolution for tile-sized bodies displaced by a mover.
//!
//! A push only succeeds when the mover approaches the body flush from the
//! side it is moving away from and the body's destination is free. The
//! caller supplies the blocking query so the system never needs to see the
//! tile world itself.

use jungle_ruins_core::{PushOutcome, TilePosition, WorldRect};

/// Slack, in world units, allowed between the mover's leading edge and the body's trailing edge.
pub const DEFAULT_ALIGNMENT_TOLERANCE: f32 = 2.0;

/// Free-standing pushable crate spawned from a crate tile at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct Crate {
    origin: TilePosition,
    home: WorldRect,
    rect: WorldRect,
}

impl Crate {
    /// Creates a crate resting on its home rectangle.
    #[must_use]
    pub const fn new(origin: TilePosition, home: WorldRect) -> Self {
        Self {
            origin,
            home,
            rect: home,
        }
    }

    /// Tile the crate was spawned from.
    #[must_use]
    pub const fn origin(&self) -> TilePosition {
        self.origin
    }

    /// Rectangle recorded at load time.
    #[must_use]
    pub const fn home(&self) -> WorldRect {
        self.home
    }

    /// Rectangle the crate currently occupies.
    #[must_use]
    pub const fn rect(&self) -> WorldRect {
        self.rect
    }

    /// Moves the crate to `rect`.
    pub fn place(&mut self, rect: WorldRect) {
        self.rect = rect;
    }

    /// Returns the crate to its home rectangle.
    pub fn reset(&mut self) {
        self.rect = self.home;
    }
}

/// Outcome of resolving a push against a single body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PushResolution {
    /// The mover does not touch the body.
    NoContact,
    /// The mover touches the body but cannot displace it.
    Blocked,
    /// The body may move to the contained rectangle.
    Moved(WorldRect),
}

impl PushResolution {
    /// Collapses the resolution into the outcome reported to callers.
    #[must_use]
    pub const fn outcome(&self) -> PushOutcome {
        match self {
            Self::NoContact => PushOutcome::NoContact,
            Self::Blocked => PushOutcome::Blocked,
            Self::Moved(_) => PushOutcome::Pushed,
        }
    }
}

/// Reports whether `mover` approaches `body` from the trailing side of the push.
///
/// Axes are checked in the order right, left, up, down; the first nonzero
/// component decides which edges are compared.
#[must_use]
pub fn is_aligned_push(
    mover: &WorldRect,
    body: &WorldRect,
    dx: f32,
    dy: f32,
    tolerance: f32,
) -> bool {
    if dx > 0.0 {
        mover.right() <= body.x() + tolerance
    } else if dx < 0.0 {
        mover.x() >= body.right() - tolerance
    } else if dy > 0.0 {
        mover.top() <= body.y() + tolerance
    } else if dy < 0.0 {
        mover.y() >= body.top() - tolerance
    } else {
        false
    }
}

/// Stateless push resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pushing {
    tolerance: f32,
}

impl Pushing {
    /// Creates a resolver with the provided alignment tolerance.
    #[must_use]
    pub const fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Alignment tolerance used by the resolver.
    #[must_use]
    pub const fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Resolves a push of `body` by `mover` travelling `(dx, dy)`.
    ///
    /// `is_blocked` receives the candidate rectangle and reports whether
    /// anything solid prevents the body from occupying it.
    pub fn resolve<F>(
        &self,
        mover: &WorldRect,
        body: &WorldRect,
        dx: f32,
        dy: f32,
        is_blocked: F,
    ) -> PushResolution
    where
        F: Fn(&WorldRect) -> bool,
    {
        if !mover.overlaps(body) {
            return PushResolution::NoContact;
        }

        if !is_aligned_push(mover, body, dx, dy, self.tolerance) {
            return PushResolution::Blocked;
        }

        let candidate = body.translated(dx, dy);
        if is_blocked(&candidate) {
            PushResolution::Blocked
        } else {
            PushResolution::Moved(candidate)
        }
    }

    /// Resolves a push against the first body in `bodies` the mover overlaps.
    ///
    /// Returns the index of that body with its resolution, or `None` when the
    /// mover touches none of them.
    pub fn resolve_first<I, F>(
        &self,
        mover: &WorldRect,
        dx: f32,
        dy: f32,
        bodies: I,
        is_blocked: F,
    ) -> Option<(usize, PushResolution)>
    where
        I: IntoIterator<Item = WorldRect>,
        F: Fn(&WorldRect) -> bool,
    {
        bodies
            .into_iter()
            .enumerate()
            .find(|(_, body)| mover.overlaps(body))
            .map(|(index, body)| (index, self.resolve(mover, &body, dx, dy, &is_blocked)))
    }
}

impl Default for Pushing {
    fn default() -> Self {
        Self::new(DEFAULT_ALIGNMENT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jungle_ruins_core::{LocalTile, RoomId};

    #[test]
    fn zero_delta_is_never_aligned() {
        let mover = WorldRect::new(0.0, 0.0, 24.0, 24.0);
        let body = WorldRect::new(20.0, 0.0, 32.0, 32.0);
        assert!(!is_aligned_push(&mover, &body, 0.0, 0.0, DEFAULT_ALIGNMENT_TOLERANCE));
    }

    #[test]
    fn crate_returns_home_on_reset() {
        let home = WorldRect::new(32.0, 32.0, 32.0, 32.0);
        let mut body = Crate::new(TilePosition::new(RoomId::new(0), LocalTile::new(1, 1)), home);
        body.place(home.translated(5.0, 0.0));
        assert_ne!(body.rect(), body.home());
        body.reset();
        assert_eq!(body.rect(), home);
    }

    #[test]
    fn resolution_maps_onto_outcome() {
        assert_eq!(PushResolution::NoContact.outcome(), PushOutcome::NoContact);
        assert_eq!(PushResolution::Blocked.outcome(), PushOutcome::Blocked);
        let moved = PushResolution::Moved(WorldRect::new(0.0, 0.0, 1.0, 1.0));
        assert!(moved.outcome().is_pushed());
    }
}
