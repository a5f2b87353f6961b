//! Hostile entities as a tagged variant.

use crate::crawler::EdgeCrawler;
use crate::field::Field;
use crate::types::Point;
use crate::wanderer::Wanderer;

/// Contact distance for the free-roaming hostile.
pub const WANDERER_CONTACT_RADIUS: f64 = 15.0;

/// Contact distance for boundary patrollers.
pub const PATROLLER_CONTACT_RADIUS: f64 = 10.0;

/// A hostile entity on the playfield.
#[derive(Debug, Clone)]
pub enum Hostile {
    /// Roams the open field; its position decides which side of a
    /// split stays live.
    Wanderer(Wanderer),
    /// Patrols the live boundary.
    Patroller(EdgeCrawler),
}

impl Hostile {
    /// Advance one tick. Patrollers only read the field's boundary.
    pub fn update(&mut self, field: &Field) {
        match self {
            Self::Wanderer(wanderer) => wanderer.update(field),
            Self::Patroller(crawler) => crawler.update(field.boundary()),
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        match self {
            Self::Wanderer(wanderer) => wanderer.position(),
            Self::Patroller(crawler) => crawler.position(),
        }
    }

    /// Distance under which this hostile touches the player or a trace.
    #[must_use]
    pub const fn contact_radius(&self) -> f64 {
        match self {
            Self::Wanderer(_) => WANDERER_CONTACT_RADIUS,
            Self::Patroller(_) => PATROLLER_CONTACT_RADIUS,
        }
    }

    /// Returns `true` if `p` is within contact range.
    #[must_use]
    pub fn touches(&self, p: Point) -> bool {
        self.position().distance(p) < self.contact_radius()
    }

    /// Returns `true` if this hostile touches the field's active trace.
    #[must_use]
    pub fn touches_trace(&self, field: &Field) -> bool {
        field.check_incursion_collision(self.position(), self.contact_radius(), 0)
    }
}
