//! Scripted input: a flat list of steps played through a [`Session`]
//! against a [`FrameClock`].

use serde::{Deserialize, Serialize};
use stakeline_field::{
    ClaimRecord, Command, Control, Direction, FieldError, FrameClock, MoveOutcome, Session,
    Snapshot,
};

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Start, pause, resume or advance.
    Confirm,
    /// Begin an incursion.
    Push,
    /// Hold a direction for `frames` ticks.
    Move {
        direction: Direction,
        #[serde(default = "one_frame")]
        frames: u32,
    },
    /// Raw stick input for `frames` ticks, snapped to one of the four
    /// directions (horizontal wins; a zero vector is no input).
    Steer {
        dx: f64,
        dy: f64,
        #[serde(default = "one_frame")]
        frames: u32,
    },
    /// Tick without input.
    Idle { frames: u32 },
    /// Leave the session (ignored while playing).
    Quit,
}

const fn one_frame() -> u32 {
    1
}

/// Parse a JSON array of steps.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed input.
pub fn parse(json: &str) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Built-in script for the default level: slide along the top edge,
/// cut down into the field and across to the right edge.
#[must_use]
pub fn demo() -> Vec<Step> {
    vec![
        Step::Confirm,
        Step::Move {
            direction: Direction::Right,
            frames: 60,
        },
        Step::Push,
        Step::Move {
            direction: Direction::Down,
            frames: 50,
        },
        Step::Move {
            direction: Direction::Right,
            frames: 175,
        },
        Step::Idle { frames: 30 },
        Step::Confirm,
        Step::Quit,
    ]
}

/// Per-outcome move counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTally {
    pub slid: u32,
    pub extended: u32,
    pub completed: u32,
    pub rejected: u32,
    pub failed: u32,
}

impl MoveTally {
    fn record(&mut self, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Slid => self.slid += 1,
            MoveOutcome::Extended => self.extended += 1,
            MoveOutcome::Completed(_) => self.completed += 1,
            MoveOutcome::Rejected => self.rejected += 1,
            MoveOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Result of playing a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Frames ticked.
    pub frames: u64,
    /// Simulated time in milliseconds.
    pub elapsed_ms: f64,
    /// Whether a `quit` step ended the run.
    pub quit: bool,
    pub moves: MoveTally,
    pub snapshot: Snapshot,
    pub claims: Vec<ClaimRecord>,
}

impl Report {
    /// Human-readable multi-line summary.
    #[must_use]
    pub fn render(&self) -> String {
        let s = &self.snapshot;
        let mut out = format!(
            "Phase: {:?}\nLevel: {}\nLives: {}\nClaimed: {:.2}% (target {:.1}%)\n\
             Boundary: {} vertices (v{})\nFrames: {} ({:.0} ms){}\n",
            s.phase,
            s.level,
            s.lives.map_or_else(|| "-".to_owned(), |lives| lives.to_string()),
            s.claimed_percentage,
            s.target_percentage,
            s.boundary_vertices,
            s.boundary_version,
            self.frames,
            self.elapsed_ms,
            if self.quit { ", quit" } else { "" },
        );
        let m = &self.moves;
        out.push_str(&format!(
            "Moves: {} slid, {} extended, {} completed, {} rejected, {} failed\n",
            m.slid, m.extended, m.completed, m.rejected, m.failed
        ));
        if self.claims.is_empty() {
            out.push_str("Claims: none\n");
        } else {
            out.push_str("Claims:\n");
            for (i, claim) in self.claims.iter().enumerate() {
                let r = &claim.report;
                out.push_str(&format!(
                    "  {:>3}. level {} +{} cells ({} stroke) -> {:.2}%, {} vertices, {:.3} ms\n",
                    i + 1,
                    claim.level,
                    r.enclosed_cells,
                    r.stroke_cells,
                    r.claimed_percentage,
                    r.boundary_vertices,
                    r.duration.as_secs_f64() * 1000.0,
                ));
            }
        }
        out
    }
}

/// Play `steps` through `session`, advancing `clock` once per ticked
/// frame.
///
/// # Errors
///
/// Returns a [`FieldError`] if the session cannot set up a level.
pub fn run(
    session: &mut Session,
    clock: &mut FrameClock,
    steps: &[Step],
) -> Result<Report, FieldError> {
    let mut moves = MoveTally::default();
    let mut quit = false;

    for step in steps {
        log::debug!("step {step:?} at frame {}", clock.frames());
        match *step {
            Step::Confirm => {
                session.command(Command::Confirm, clock.now())?;
            }
            Step::Push => {
                session.command(Command::StartPush, clock.now())?;
            }
            Step::Move { direction, frames } => {
                hold(session, clock, Some(direction), frames, &mut moves);
            }
            Step::Steer { dx, dy, frames } => {
                hold(session, clock, Direction::from_delta(dx, dy), frames, &mut moves);
            }
            Step::Idle { frames } => {
                for _ in 0..frames {
                    session.tick(None, clock.tick());
                }
            }
            Step::Quit => {
                if session.command(Command::Quit, clock.now())? == Control::Quit {
                    quit = true;
                    break;
                }
            }
        }
    }

    Ok(Report {
        frames: clock.frames(),
        elapsed_ms: clock.now().as_secs_f64() * 1000.0,
        quit,
        moves,
        snapshot: session.snapshot(),
        claims: session.claims().to_vec(),
    })
}

/// Tick `frames` times with the same input, counting move outcomes.
fn hold(
    session: &mut Session,
    clock: &mut FrameClock,
    direction: Option<Direction>,
    frames: u32,
    moves: &mut MoveTally,
) {
    for _ in 0..frames {
        if let Some(outcome) = session.tick(direction, clock.tick()) {
            moves.record(&outcome);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stakeline_field::{LevelConfig, Phase, Point};

    fn play(steps: &[Step]) -> Report {
        let mut session = Session::new(LevelConfig::default()).unwrap();
        let mut clock = FrameClock::default();
        run(&mut session, &mut clock, steps).unwrap()
    }

    #[test]
    fn parses_steps_with_default_frames() {
        let steps = parse(
            r#"[
                {"step": "confirm"},
                {"step": "move", "direction": "left"},
                {"step": "move", "direction": "down", "frames": 4},
                {"step": "idle", "frames": 2},
                {"step": "push"},
                {"step": "quit"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Confirm,
                Step::Move {
                    direction: Direction::Left,
                    frames: 1,
                },
                Step::Move {
                    direction: Direction::Down,
                    frames: 4,
                },
                Step::Idle { frames: 2 },
                Step::Push,
                Step::Quit,
            ]
        );
    }

    #[test]
    fn steer_snaps_raw_input() {
        let steps = parse(r#"[{"step": "steer", "dx": 0.7, "dy": -0.7, "frames": 3}]"#).unwrap();
        assert_eq!(
            steps,
            vec![Step::Steer {
                dx: 0.7,
                dy: -0.7,
                frames: 3,
            }]
        );

        let report = play(&[
            Step::Confirm,
            Step::Steer {
                dx: 0.9,
                dy: 0.4,
                frames: 4,
            },
            Step::Steer {
                dx: 0.0,
                dy: 0.0,
                frames: 2,
            },
        ]);
        // Diagonal input slides right along the top edge; no input
        // attempts no move.
        assert_eq!(report.moves.slid, 4);
        assert_eq!(report.frames, 6);
        let player = report.snapshot.player.unwrap();
        assert!(player.coincides(Point::new(62.0, 50.0), 1e-9));
    }

    #[test]
    fn rejects_unknown_steps() {
        assert!(parse(r#"[{"step": "jump"}]"#).is_err());
        assert!(parse(r#"[{"step": "idle"}]"#).is_err());
    }

    #[test]
    fn small_corner_claim() {
        let report = play(&[
            Step::Confirm,
            Step::Move {
                direction: Direction::Right,
                frames: 10,
            },
            Step::Push,
            Step::Move {
                direction: Direction::Down,
                frames: 10,
            },
            Step::Move {
                direction: Direction::Left,
                frames: 12,
            },
        ]);
        assert_eq!(report.frames, 32);
        assert_eq!(report.moves.slid, 10);
        assert_eq!(report.moves.completed, 1);
        assert_eq!(report.moves.failed, 0);
        assert_eq!(report.claims.len(), 1);
        assert_eq!(report.snapshot.phase, Phase::Playing);
        assert!(report.snapshot.claimed_percentage > 0.0);
        assert!(report.snapshot.boundary_version > 1);
        assert!(!report.quit);
        assert!(report.render().contains("Claims:\n    1. level 1"));
    }

    #[test]
    fn quit_is_ignored_while_playing() {
        let report = play(&[
            Step::Confirm,
            Step::Quit,
            Step::Idle { frames: 3 },
            Step::Confirm,
            Step::Quit,
            Step::Idle { frames: 3 },
        ]);
        assert!(report.quit);
        assert_eq!(report.frames, 3);
        assert_eq!(report.snapshot.phase, Phase::Paused);
    }

    #[test]
    fn moves_before_start_are_not_counted() {
        let report = play(&[Step::Move {
            direction: Direction::Right,
            frames: 5,
        }]);
        assert_eq!(report.frames, 5);
        assert_eq!(report.moves, MoveTally::default());
        assert_eq!(report.snapshot.phase, Phase::Start);
        assert_eq!(report.render().lines().nth(2), Some("Lives: -"));
    }

    #[test]
    fn demo_starts_a_level() {
        let report = play(&demo());
        assert_ne!(report.snapshot.phase, Phase::Start);
        assert!(report.moves.slid > 0);
    }
}
