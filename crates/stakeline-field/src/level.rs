//! Per-level parameters and spawn layout.

use serde::{Deserialize, Serialize};

use crate::player::PlayerConfig;
use crate::types::{FieldError, FieldRect, Point};

/// Everything needed to set up one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level number, starting at 1.
    pub level: u32,

    /// The playfield rectangle.
    pub field: FieldRect,

    /// Claimed percentage that completes the level.
    pub target_percentage: f64,

    /// Free-roaming hostile speed, per tick.
    pub wanderer_speed: f64,

    /// Boundary patroller speed, per tick.
    pub crawler_speed: f64,

    /// Number of boundary patrollers.
    pub crawler_count: usize,

    /// Seed for the wanderer's RNG.
    pub seed: u64,

    /// Player parameters.
    pub player: PlayerConfig,
}

impl LevelConfig {
    /// Default playfield: an 800x600 screen with a 50-unit margin and
    /// room for a status line below.
    pub const DEFAULT_FIELD: FieldRect = FieldRect {
        x: 50.0,
        y: 50.0,
        width: 700.0,
        height: 450.0,
    };
    /// Target percentage gained per level.
    pub const TARGET_STEP: f64 = 12.5;
    /// Target percentage ceiling.
    pub const MAX_TARGET: f64 = 62.5;
    /// Wanderer speed on level 1.
    pub const WANDERER_BASE_SPEED: f64 = 1.5;
    /// Wanderer speed gained per level.
    pub const WANDERER_SPEED_STEP: f64 = 0.25;
    /// Patroller speed on level 1.
    pub const CRAWLER_BASE_SPEED: f64 = 1.4;
    /// Patroller speed gained per level.
    pub const CRAWLER_SPEED_STEP: f64 = 0.15;
    /// Last level with a single patroller.
    pub const SINGLE_CRAWLER_LEVELS: u32 = 2;
    /// Default RNG seed.
    pub const DEFAULT_SEED: u64 = 0x5eed;

    /// Derive the parameters for `level` (levels below 1 are treated as 1).
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let steps = f64::from(level - 1);
        Self {
            level,
            field: Self::DEFAULT_FIELD,
            target_percentage: (Self::TARGET_STEP * f64::from(level)).min(Self::MAX_TARGET),
            wanderer_speed: Self::WANDERER_SPEED_STEP.mul_add(steps, Self::WANDERER_BASE_SPEED),
            crawler_speed: Self::CRAWLER_SPEED_STEP.mul_add(steps, Self::CRAWLER_BASE_SPEED),
            crawler_count: if level <= Self::SINGLE_CRAWLER_LEVELS { 1 } else { 2 },
            seed: Self::DEFAULT_SEED,
            player: PlayerConfig::default(),
        }
    }

    /// Replace the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration can start a level.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimensions`] for a malformed field
    /// rectangle and [`FieldError::InvalidConfig`] for any other bad
    /// scalar.
    pub fn validate(&self) -> Result<(), FieldError> {
        self.field.validate()?;
        if self.level == 0 {
            return Err(FieldError::InvalidConfig("levels start at 1".to_owned()));
        }
        if !(self.target_percentage > 0.0 && self.target_percentage <= 100.0) {
            return Err(FieldError::InvalidConfig(format!(
                "target percentage must be in (0, 100], got {}",
                self.target_percentage
            )));
        }
        for (name, speed) in [
            ("wanderer", self.wanderer_speed),
            ("crawler", self.crawler_speed),
        ] {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(FieldError::InvalidConfig(format!(
                    "{name} speed must be finite and non-negative, got {speed}"
                )));
            }
        }
        self.player.validate()
    }

    /// The player starts at the field's top-left corner.
    #[must_use]
    pub const fn player_spawn(&self) -> Point {
        Point::new(self.field.x, self.field.y)
    }

    /// The wanderer starts three quarters of the way across and down.
    #[must_use]
    pub fn wanderer_spawn(&self) -> Point {
        Point::new(
            self.field.x + (self.field.width * 3.0 / 4.0).floor(),
            self.field.y + (self.field.height * 3.0 / 4.0).floor(),
        )
    }

    /// Patroller spawn points on the right edge, with their direction
    /// (`true` = ring order).
    ///
    /// The first starts at the bottom-right corner moving forward; each
    /// further one starts one spacing higher moving backward.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn crawler_spawns(&self) -> Vec<(Point, bool)> {
        let n = self.crawler_count as f64;
        let spacing = (self.field.height / (n + 1.0)).floor().max(1.0);
        let right = self.field.right();
        let bottom = self.field.bottom();
        (0..self.crawler_count)
            .map(|i| (Point::new(right, (i as f64).mul_add(-spacing, bottom)), i == 0))
            .collect()
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_level(1)
    }
}
