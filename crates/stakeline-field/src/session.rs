//! Headless game session: phases, level setup and the per-tick update.
//!
//! A [`Session`] owns the current level's [`Field`], [`Player`] and
//! hostiles, and drives them one tick at a time from an explicit
//! direction input and timestamp. No I/O happens here; front ends feed
//! [`Command`]s and read back [`Snapshot`]s.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::claim::ClaimReport;
use crate::crawler::EdgeCrawler;
use crate::field::Field;
use crate::hostile::Hostile;
use crate::level::LevelConfig;
use crate::player::{MoveOutcome, Player};
use crate::types::{Direction, FieldError, Point};
use crate::wanderer::Wanderer;

/// Coarse game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the first confirm.
    Start,
    /// Ticks update the level.
    Playing,
    /// Ticks are ignored until resumed.
    Paused,
    /// The target percentage was reached.
    LevelComplete,
    /// The player ran out of lives.
    GameOver,
}

/// Discrete player commands, separate from per-tick movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Start, pause, resume, advance to the next level, or restart.
    Confirm,
    /// Begin an incursion.
    StartPush,
    /// Leave the session (only from paused or finished phases).
    Quit,
}

/// Whether the front end should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep going.
    Continue,
    /// The player quit.
    Quit,
}

/// A successful claim and the level it happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Level number.
    pub level: u32,
    /// Claim diagnostics.
    pub report: ClaimReport,
}

/// Point-in-time summary of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current phase.
    pub phase: Phase,
    /// Current level number.
    pub level: u32,
    /// Remaining lives (`None` before the first level starts).
    pub lives: Option<u32>,
    /// Claimed share of the field.
    pub claimed_percentage: f64,
    /// Share needed to finish the level.
    pub target_percentage: f64,
    /// Vertex count of the live boundary.
    pub boundary_vertices: usize,
    /// Boundary version.
    pub boundary_version: u64,
    /// Player position.
    pub player: Option<Point>,
    /// Whether an incursion is in progress.
    pub pushing: bool,
}

/// The entities of one level.
#[derive(Debug, Clone)]
struct Level {
    field: Field,
    player: Player,
    hostiles: Vec<Hostile>,
}

impl Level {
    fn new(config: &LevelConfig) -> Result<Self, FieldError> {
        config.validate()?;
        let field = Field::new(config.field)?;
        let player = Player::new(config.player_spawn(), config.player.clone(), &field);

        let mut hostiles = vec![Hostile::Wanderer(Wanderer::new(
            config.wanderer_spawn(),
            config.wanderer_speed,
            config.seed,
        ))];
        hostiles.extend(config.crawler_spawns().into_iter().map(|(position, forward)| {
            Hostile::Patroller(EdgeCrawler::new(
                position,
                forward,
                config.crawler_speed,
                field.boundary(),
            ))
        }));

        Ok(Self {
            field,
            player,
            hostiles,
        })
    }

    /// The wanderer decides which side of a split stays live.
    fn reference(&self) -> Option<Point> {
        self.hostiles.iter().find_map(|hostile| match hostile {
            Hostile::Wanderer(wanderer) => Some(wanderer.position()),
            Hostile::Patroller(_) => None,
        })
    }

    /// Apply hostile contact rules after everything has moved.
    fn resolve_contacts(&mut self, now: Duration) {
        let position = self.player.position();
        if self.player.is_pushing() {
            let hit = self
                .hostiles
                .iter()
                .any(|hostile| hostile.touches(position) || hostile.touches_trace(&self.field));
            if hit {
                log::warn!("hostile reached the incursion, cancelling");
                self.player.cancel_push(&mut self.field, now);
            }
        } else {
            let hit = self.hostiles.iter().any(|hostile| {
                matches!(hostile, Hostile::Patroller(_)) && hostile.touches(position)
            });
            if hit && self.player.lose_life(now) {
                self.player.reset_position(&mut self.field, now);
            }
        }
    }
}

/// A game from the start screen through any number of levels.
#[derive(Debug, Clone)]
pub struct Session {
    base: LevelConfig,
    config: LevelConfig,
    phase: Phase,
    level: Option<Level>,
    claims: Vec<ClaimRecord>,
}

impl Session {
    /// Create a session whose first level uses `config`.
    ///
    /// Later levels take their progression values from
    /// [`LevelConfig::for_level`] and keep `config`'s field, player
    /// parameters and seed.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if `config` is invalid.
    pub fn new(config: LevelConfig) -> Result<Self, FieldError> {
        config.validate()?;
        Ok(Self {
            base: config.clone(),
            config,
            phase: Phase::Start,
            level: None,
            claims: Vec::new(),
        })
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Configuration of the current (or next) level.
    #[must_use]
    pub const fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// The current field, once a level has started.
    #[must_use]
    pub fn field(&self) -> Option<&Field> {
        self.level.as_ref().map(|level| &level.field)
    }

    /// The current player, once a level has started.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.level.as_ref().map(|level| &level.player)
    }

    /// The current hostiles (wanderer first).
    #[must_use]
    pub fn hostiles(&self) -> &[Hostile] {
        match &self.level {
            Some(level) => &level.hostiles,
            None => &[],
        }
    }

    /// Every successful claim so far.
    #[must_use]
    pub fn claims(&self) -> &[ClaimRecord] {
        &self.claims
    }

    /// Apply a command.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if a new level cannot be set up.
    pub fn command(&mut self, command: Command, now: Duration) -> Result<Control, FieldError> {
        match command {
            Command::Confirm => self.confirm()?,
            Command::StartPush => {
                if self.phase == Phase::Playing
                    && let Some(level) = self.level.as_mut()
                {
                    level.player.start_push(&mut level.field, now);
                }
            }
            Command::Quit => {
                if matches!(
                    self.phase,
                    Phase::Paused | Phase::LevelComplete | Phase::GameOver
                ) {
                    log::info!("quit from {:?}", self.phase);
                    return Ok(Control::Quit);
                }
            }
        }
        Ok(Control::Continue)
    }

    fn confirm(&mut self) -> Result<(), FieldError> {
        match self.phase {
            Phase::Start | Phase::GameOver => self.start_level(self.base.level)?,
            Phase::Playing => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Playing,
            Phase::LevelComplete => self.start_level(self.config.level + 1)?,
        }
        Ok(())
    }

    fn start_level(&mut self, number: u32) -> Result<(), FieldError> {
        let config = if number == self.base.level {
            self.base.clone()
        } else {
            LevelConfig {
                field: self.base.field,
                player: self.base.player.clone(),
                seed: self.base.seed.wrapping_add(u64::from(number)),
                ..LevelConfig::for_level(number)
            }
        };
        let level = Level::new(&config)?;
        log::info!(
            "level {} started: target {:.1}%, {} patroller(s)",
            config.level,
            config.target_percentage,
            config.crawler_count
        );
        self.config = config;
        self.level = Some(level);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Advance one tick.
    ///
    /// `direction` is the movement input for this tick, if any. Returns
    /// the player's move outcome when a move was attempted.
    pub fn tick(&mut self, direction: Option<Direction>, now: Duration) -> Option<MoveOutcome> {
        if self.phase != Phase::Playing {
            return None;
        }
        let level = self.level.as_mut()?;

        let reference = level.reference();
        let outcome = direction
            .map(|direction| level.player.move_by(Some(direction), &mut level.field, reference, now));
        if let Some(MoveOutcome::Completed(report)) = &outcome {
            self.claims.push(ClaimRecord {
                level: self.config.level,
                report: report.clone(),
            });
        }

        for hostile in &mut level.hostiles {
            hostile.update(&level.field);
        }
        level.resolve_contacts(now);
        level.player.check_push_idle(&mut level.field, now);

        // Reaching the target wins over losing the last life on the
        // same tick.
        if level.field.claimed_percentage() >= self.config.target_percentage {
            log::info!(
                "level {} complete at {:.1}%",
                self.config.level,
                level.field.claimed_percentage()
            );
            self.phase = Phase::LevelComplete;
        } else if !level.player.is_alive() {
            log::info!("game over on level {}", self.config.level);
            self.phase = Phase::GameOver;
        }
        outcome
    }

    /// Summarize the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let level = self.level.as_ref();
        Snapshot {
            phase: self.phase,
            level: self.config.level,
            lives: level.map(|level| level.player.lives()),
            claimed_percentage: level.map_or(0.0, |level| level.field.claimed_percentage()),
            target_percentage: self.config.target_percentage,
            boundary_vertices: level.map_or(0, |level| level.field.boundary().vertices().len()),
            boundary_version: level.map_or(0, |level| level.field.boundary().version()),
            player: level.map(|level| level.player.position()),
            pushing: level.is_some_and(|level| level.player.is_pushing()),
        }
    }
}
