//! The player entity and its incursion (push) state machine.
//!
//! The player is either sliding along the live boundary or pushing an
//! incursion through open field. While pushing, every accepted move
//! extends the field's trace; a move that lands back on the boundary
//! attempts a claim. Collisions, idle timeouts, manual cancels and
//! failed claims all end the push the same way: the trace is discarded,
//! the player returns to the push-start point and one life is lost
//! (subject to the invulnerability window).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::claim::{ClaimError, ClaimReport};
use crate::field::Field;
use crate::types::{Axis, Direction, FieldError, Point};

/// Trace segments at the tail ignored by the self-collision check.
const COLLISION_SKIP_TAIL: usize = 1;

/// Tunable player parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Distance covered per accepted move.
    pub speed: f64,

    /// Lives at spawn.
    pub lives: u32,

    /// A push with no accepted move for this long fails.
    #[serde(with = "crate::duration_millis")]
    pub idle_timeout: Duration,

    /// Idle time after which the trace warning is raised.
    #[serde(with = "crate::duration_millis")]
    pub warning_delay: Duration,

    /// How long the hit flash lasts after losing a life.
    #[serde(with = "crate::duration_millis")]
    pub hit_flash: Duration,

    /// Window after losing a life during which further losses are
    /// ignored and pushes cannot start.
    #[serde(with = "crate::duration_millis")]
    pub invulnerability: Duration,

    /// Distance within which an axis-aligned boundary edge determines
    /// the player's edge axis.
    pub edge_axis_tolerance: f64,

    /// Per-axis distance from the trace's last point within which a
    /// move may continue the trace outside the open field.
    pub trace_proximity: f64,
}

impl PlayerConfig {
    /// Default [`speed`](Self::speed).
    pub const DEFAULT_SPEED: f64 = 3.0;
    /// Default [`lives`](Self::lives).
    pub const DEFAULT_LIVES: u32 = 3;
    /// Default [`idle_timeout`](Self::idle_timeout).
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(1500);
    /// Default [`warning_delay`](Self::warning_delay): warn as soon as
    /// the player stops.
    pub const DEFAULT_WARNING_DELAY: Duration = Duration::ZERO;
    /// Default [`hit_flash`](Self::hit_flash).
    pub const DEFAULT_HIT_FLASH: Duration = Duration::from_millis(400);
    /// Default [`invulnerability`](Self::invulnerability).
    pub const DEFAULT_INVULNERABILITY: Duration = Duration::from_millis(800);
    /// Default [`edge_axis_tolerance`](Self::edge_axis_tolerance).
    pub const DEFAULT_EDGE_AXIS_TOLERANCE: f64 = 4.0;
    /// Default [`trace_proximity`](Self::trace_proximity).
    pub const DEFAULT_TRACE_PROXIMITY: f64 = 10.0;

    /// Check the scalars are usable.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "player speed must be positive, got {}",
                self.speed
            )));
        }
        if self.lives == 0 {
            return Err(FieldError::InvalidConfig(
                "player must start with at least one life".to_owned(),
            ));
        }
        if !(self.edge_axis_tolerance.is_finite() && self.edge_axis_tolerance >= 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "edge axis tolerance must be non-negative, got {}",
                self.edge_axis_tolerance
            )));
        }
        if !(self.trace_proximity.is_finite() && self.trace_proximity >= 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "trace proximity must be non-negative, got {}",
                self.trace_proximity
            )));
        }
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            lives: Self::DEFAULT_LIVES,
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
            warning_delay: Self::DEFAULT_WARNING_DELAY,
            hit_flash: Self::DEFAULT_HIT_FLASH,
            invulnerability: Self::DEFAULT_INVULNERABILITY,
            edge_axis_tolerance: Self::DEFAULT_EDGE_AXIS_TOLERANCE,
            trace_proximity: Self::DEFAULT_TRACE_PROXIMITY,
        }
    }
}

/// Why an in-progress incursion ended without a claim during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncursionFailure {
    /// The move ran into the player's own trace.
    #[error("incursion crossed its own trace")]
    Collision,

    /// The trace reached the boundary but the claim failed.
    #[error("claim failed: {0}")]
    Claim(#[from] ClaimError),
}

/// Result of [`Player::move_by`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Nothing changed.
    Rejected,
    /// Moved along the boundary while not pushing.
    Slid,
    /// The incursion trace grew by one point.
    Extended,
    /// The trace reached the boundary and the enclosed area was claimed.
    Completed(ClaimReport),
    /// The incursion ended in failure; the player is back at the
    /// push-start point.
    Failed(IncursionFailure),
}

impl MoveOutcome {
    /// Returns `true` if the player moved to the requested position.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        matches!(self, Self::Slid | Self::Extended | Self::Completed(_))
    }
}

/// State of an active push.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Push {
    start: Point,
    direction: Option<Direction>,
    last_move: Duration,
}

/// The player-controlled marker.
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    position: Point,
    lives: u32,
    last_edge_pos: Point,
    edge_axis: Axis,
    push: Option<Push>,
    invulnerable_until: Duration,
    hit_flash_until: Duration,
}

impl Player {
    /// Spawn a player at `position` (expected to be on the boundary).
    #[must_use]
    pub fn new(position: Point, config: PlayerConfig, field: &Field) -> Self {
        let edge_axis = field
            .boundary()
            .axis_near(position, config.edge_axis_tolerance)
            .unwrap_or(Axis::Horizontal);
        Self {
            lives: config.lives,
            config,
            position,
            last_edge_pos: position,
            edge_axis,
            push: None,
            invulnerable_until: Duration::ZERO,
            hit_flash_until: Duration::ZERO,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// The configuration this player was spawned with.
    #[must_use]
    pub const fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Returns `true` while an incursion is in progress.
    #[must_use]
    pub const fn is_pushing(&self) -> bool {
        self.push.is_some()
    }

    /// Where the active push started.
    #[must_use]
    pub fn push_start(&self) -> Option<Point> {
        self.push.map(|push| push.start)
    }

    /// The locked push direction, if any.
    #[must_use]
    pub fn push_direction(&self) -> Option<Direction> {
        self.push.and_then(|push| push.direction)
    }

    /// The last position the player was anchored on the boundary.
    #[must_use]
    pub const fn last_edge_position(&self) -> Point {
        self.last_edge_pos
    }

    /// Orientation of the boundary side the player is anchored to.
    #[must_use]
    pub const fn edge_axis(&self) -> Axis {
        self.edge_axis
    }

    /// Returns `true` while at least one life remains.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Returns `true` inside the post-hit invulnerability window.
    #[must_use]
    pub fn is_invulnerable(&self, now: Duration) -> bool {
        now < self.invulnerable_until
    }

    /// Returns `true` while the hit flash is showing.
    #[must_use]
    pub fn is_hit_flashing(&self, now: Duration) -> bool {
        now < self.hit_flash_until
    }

    /// Move one step in `direction`.
    ///
    /// `hostile` is the free-roaming hostile's position, used as the
    /// reference point if this move completes a claim.
    pub fn move_by(
        &mut self,
        direction: Option<Direction>,
        field: &mut Field,
        hostile: Option<Point>,
        now: Duration,
    ) -> MoveOutcome {
        let Some(direction) = direction else {
            return MoveOutcome::Rejected;
        };
        let (dx, dy) = direction.delta();
        let candidate = self
            .position
            .offset(dx * self.config.speed, dy * self.config.speed);

        if self.push.is_some() {
            self.push_move(direction, candidate, field, hostile, now)
        } else {
            self.slide(candidate, field)
        }
    }

    fn slide(&mut self, candidate: Point, field: &Field) -> MoveOutcome {
        if !(field.is_point_on_edge(candidate) && field.is_point_within_bounds(candidate)) {
            return MoveOutcome::Rejected;
        }
        self.position = field.snap_to_edge(candidate);
        self.last_edge_pos = self.position;
        self.update_edge_axis(field);
        MoveOutcome::Slid
    }

    fn push_move(
        &mut self,
        direction: Direction,
        candidate: Point,
        field: &mut Field,
        hostile: Option<Point>,
        now: Duration,
    ) -> MoveOutcome {
        let on_current = field.is_point_on_edge(self.position);
        let mut on_candidate = field.is_point_on_edge(candidate);

        if on_current && on_candidate {
            if self.is_departing_edge(direction, field) {
                on_candidate = false;
            } else {
                return MoveOutcome::Rejected;
            }
        }

        if on_candidate && field.is_point_within_bounds(candidate) {
            if !self.lock_direction(direction) {
                return MoveOutcome::Rejected;
            }
            self.position = field.snap_to_edge(candidate);
            field.add_to_incursion(self.position);
            self.record_push_move(field, now);
            self.update_edge_axis(field);
            return self.complete_incursion(field, hostile, now);
        }

        if !self.can_extend(candidate, field) {
            return MoveOutcome::Rejected;
        }
        let threshold = self.config.speed + 1.0;
        if field.check_incursion_collision(candidate, threshold, COLLISION_SKIP_TAIL) {
            log::warn!(
                "incursion collided with its own trace at ({:.1}, {:.1})",
                candidate.x,
                candidate.y
            );
            self.fail_incursion(field, now);
            return MoveOutcome::Failed(IncursionFailure::Collision);
        }
        if !self.lock_direction(direction) {
            return MoveOutcome::Rejected;
        }
        self.position = candidate;
        field.add_to_incursion(candidate);
        self.record_push_move(field, now);
        MoveOutcome::Extended
    }

    fn complete_incursion(
        &mut self,
        field: &mut Field,
        hostile: Option<Point>,
        now: Duration,
    ) -> MoveOutcome {
        match field.complete_incursion(hostile) {
            Ok(report) => {
                self.push = None;
                self.last_edge_pos = self.position;
                field.set_incursion_warning(false);
                self.update_edge_axis(field);
                MoveOutcome::Completed(report)
            }
            Err(err) => {
                log::warn!("incursion reached the boundary but {err}");
                self.fail_incursion(field, now);
                MoveOutcome::Failed(IncursionFailure::Claim(err))
            }
        }
    }

    /// Begin an incursion from the current boundary position.
    ///
    /// Refused (returns `false`) while already pushing, while off the
    /// boundary or outside the field, and during the invulnerability
    /// window.
    pub fn start_push(&mut self, field: &mut Field, now: Duration) -> bool {
        if self.is_invulnerable(now) || self.push.is_some() {
            return false;
        }
        if !(field.is_point_on_edge(self.position) && field.is_point_within_bounds(self.position)) {
            return false;
        }
        self.position = field.start_incursion(self.position);
        self.push = Some(Push {
            start: self.position,
            direction: None,
            last_move: now,
        });
        field.set_incursion_warning(false);
        self.update_edge_axis(field);
        log::debug!(
            "push started at ({:.1}, {:.1})",
            self.position.x,
            self.position.y
        );
        true
    }

    /// Abandon the active push: back to the push-start point, one life
    /// lost.
    ///
    /// Returns `false` if no push was active.
    pub fn cancel_push(&mut self, field: &mut Field, now: Duration) -> bool {
        if self.push.is_none() {
            return false;
        }
        self.fail_incursion(field, now);
        true
    }

    /// Lose one life unless invulnerable.
    ///
    /// Returns `true` if a life was actually lost, which also opens a
    /// new invulnerability window.
    pub fn lose_life(&mut self, now: Duration) -> bool {
        if self.is_invulnerable(now) {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.hit_flash_until = now + self.config.hit_flash;
        self.invulnerable_until = now + self.config.invulnerability;
        log::info!("life lost, {} remaining", self.lives);
        true
    }

    /// Return to the last boundary anchor, cancelling any push.
    pub fn reset_position(&mut self, field: &mut Field, now: Duration) {
        self.position = self.last_edge_pos;
        if self.push.is_some() {
            self.fail_incursion(field, now);
        }
        self.update_edge_axis(field);
    }

    /// Enforce the idle timeout and maintain the trace warning flag.
    ///
    /// Returns `true` if the push failed because of the timeout.
    pub fn check_push_idle(&mut self, field: &mut Field, now: Duration) -> bool {
        let Some(push) = self.push else {
            field.set_incursion_warning(false);
            return false;
        };
        let idle = now.saturating_sub(push.last_move);
        if idle >= self.config.idle_timeout {
            log::warn!("incursion idle for {}ms, failing", idle.as_millis());
            self.fail_incursion(field, now);
            return true;
        }
        field.set_incursion_warning(idle >= self.config.warning_delay);
        false
    }

    /// Lock (or re-lock) the push direction. Reversing onto the locked
    /// direction is refused.
    fn lock_direction(&mut self, direction: Direction) -> bool {
        let Some(push) = self.push.as_mut() else {
            return false;
        };
        if push.direction.is_some_and(|locked| locked.opposite() == direction) {
            return false;
        }
        push.direction = Some(direction);
        true
    }

    fn record_push_move(&mut self, field: &mut Field, now: Duration) {
        if let Some(push) = self.push.as_mut() {
            push.last_move = now;
        }
        field.set_incursion_warning(false);
    }

    fn update_edge_axis(&mut self, field: &Field) {
        if let Some(axis) = field
            .boundary()
            .axis_near(self.position, self.config.edge_axis_tolerance)
        {
            self.edge_axis = axis;
        }
    }

    /// A move leaves the current edge when it runs across the edge axis.
    fn is_departing_edge(&self, direction: Direction, field: &Field) -> bool {
        let axis = field
            .boundary()
            .axis_near(self.position, self.config.edge_axis_tolerance)
            .unwrap_or(self.edge_axis);
        direction.axis() != axis
    }

    fn can_extend(&self, candidate: Point, field: &Field) -> bool {
        if field.is_point_in_unclaimed_area(candidate) {
            return true;
        }
        let Some(&last) = field.incursion().last() else {
            return false;
        };
        let proximity = self.config.trace_proximity;
        field.is_point_within_bounds(candidate)
            && !field.is_point_claimed(candidate)
            && (candidate.x - last.x).abs() < proximity
            && (candidate.y - last.y).abs() < proximity
    }

    /// Common exit for every failed push.
    fn fail_incursion(&mut self, field: &mut Field, now: Duration) {
        let trace_start = field.cancel_incursion();
        if let Some(start) = self.push.take().map(|push| push.start).or(trace_start) {
            self.last_edge_pos = start;
        }
        field.set_incursion_warning(false);
        self.position = self.last_edge_pos;
        self.update_edge_axis(field);
        self.lose_life(now);
    }
}
