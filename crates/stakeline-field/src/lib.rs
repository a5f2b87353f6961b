//! stakeline-field: Playfield-claiming engine (sans-IO).
//!
//! The player traces an incursion from the boundary of an open field
//! and back; when it reconnects, the side without the free-roaming
//! hostile is claimed and the live boundary polygon is rebuilt around
//! what remains. Boundary patrollers follow that polygon as it changes
//! shape underneath them.
//!
//! Building blocks, leaf-first:
//! rasterization -> occupancy grid -> boundary polygon -> claim engine
//! -> field facade -> player / hostiles -> session.
//!
//! This crate has **no I/O dependencies**. Time is passed in
//! explicitly as a [`Duration`](std::time::Duration) since session
//! start; front ends (see `stakeline-sim`) own input and output.

pub mod boundary;
pub mod claim;
pub mod clock;
pub mod crawler;
mod duration_millis;
pub mod field;
pub mod grid;
pub mod hostile;
pub mod incursion;
pub mod level;
pub mod player;
pub mod raster;
pub mod session;
pub mod types;
pub mod wanderer;

pub use boundary::BoundaryPolygon;
pub use claim::{ClaimError, ClaimReport};
pub use clock::FrameClock;
pub use crawler::EdgeCrawler;
pub use field::Field;
pub use grid::OccupancyGrid;
pub use hostile::Hostile;
pub use level::LevelConfig;
pub use player::{IncursionFailure, MoveOutcome, Player, PlayerConfig};
pub use session::{ClaimRecord, Command, Control, Phase, Session, Snapshot};
pub use types::{Axis, Direction, FieldError, FieldRect, Point, Segment};
pub use wanderer::Wanderer;
