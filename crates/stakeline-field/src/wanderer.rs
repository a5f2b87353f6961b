//! The free-roaming hostile.
//!
//! Wanders through the open field towards randomly chosen targets,
//! picked by rejection sampling against the unclaimed area. It never
//! steps into blocked territory: a step that would leave the open field
//! is dropped and a new target chosen instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::field::Field;
use crate::types::Point;

/// Sampling attempts per retarget before giving up for this tick.
const TARGET_ATTEMPTS: usize = 50;

/// Targets are sampled this far inside the field rectangle.
const TARGET_INSET: f64 = 10.0;

/// Per-axis distance at which the target counts as reached.
const ARRIVAL_TOLERANCE: f64 = 5.0;

/// Retarget timer range, in ticks.
const MIN_TARGET_TICKS: u32 = 45;
const MAX_TARGET_TICKS: u32 = 120;

/// Free-roaming hostile driven by a seeded RNG.
#[derive(Debug, Clone)]
pub struct Wanderer {
    position: Point,
    speed: f64,
    target: Option<Point>,
    target_ticks: u32,
    rng: StdRng,
}

impl Wanderer {
    /// Create a wanderer at `position` with a deterministic RNG.
    #[must_use]
    pub fn new(position: Point, speed: f64, seed: u64) -> Self {
        let mut wanderer = Self {
            position,
            speed,
            target: None,
            target_ticks: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        wanderer.reset_motion();
        wanderer
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Current target, if one was found.
    #[must_use]
    pub const fn target(&self) -> Option<Point> {
        self.target
    }

    /// Forget the current target and restart the retarget timer.
    pub fn reset_motion(&mut self) {
        self.target = None;
        self.target_ticks = self.rng.gen_range(MIN_TARGET_TICKS..=MAX_TARGET_TICKS);
    }

    /// Advance one tick.
    pub fn update(&mut self, field: &Field) {
        self.target_ticks = self.target_ticks.saturating_sub(1);
        if self.target_ticks == 0 || self.at_target() {
            self.choose_target(field);
        }
        let Some(target) = self.target else {
            return;
        };

        let distance = self.position.distance(target);
        if distance < 0.1 {
            self.choose_target(field);
            return;
        }
        let step = self.speed / distance;
        let next = self.position.offset(
            (target.x - self.position.x) * step,
            (target.y - self.position.y) * step,
        );
        if field.is_point_in_unclaimed_area(next) {
            self.position = next;
        } else {
            self.choose_target(field);
        }
    }

    /// Missing targets count as reached.
    fn at_target(&self) -> bool {
        self.target
            .is_none_or(|target| self.position.coincides(target, ARRIVAL_TOLERANCE))
    }

    fn choose_target(&mut self, field: &Field) {
        let rect = field.rect();
        let (min_x, max_x) = inset_range(rect.x, rect.right());
        let (min_y, max_y) = inset_range(rect.y, rect.bottom());
        self.target = (0..TARGET_ATTEMPTS)
            .map(|_| {
                Point::new(
                    self.rng.gen_range(min_x..=max_x),
                    self.rng.gen_range(min_y..=max_y),
                )
            })
            .find(|&candidate| field.is_point_in_unclaimed_area(candidate));
        self.target_ticks = self.rng.gen_range(MIN_TARGET_TICKS..=MAX_TARGET_TICKS);
    }
}

/// The sampling interval for one axis; collapses to the midpoint when
/// the field is too narrow for the inset.
fn inset_range(lo: f64, hi: f64) -> (f64, f64) {
    let (inset_lo, inset_hi) = (lo + TARGET_INSET, hi - TARGET_INSET);
    if inset_lo <= inset_hi {
        (inset_lo, inset_hi)
    } else {
        let mid = (lo + hi) / 2.0;
        (mid, mid)
    }
}
