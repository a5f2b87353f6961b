//! End-to-end incursion scenarios on a 100x100 field.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use stakeline_field::{
    Command, Direction, EdgeCrawler, Field, FieldRect, LevelConfig, MoveOutcome, Phase, Player,
    PlayerConfig, Point, Session,
    boundary::{EDGE_TOLERANCE, VERTEX_TOLERANCE},
};

const HOSTILE: Point = Point::new(90.0, 90.0);

fn field() -> Field {
    Field::new(FieldRect::new(0.0, 0.0, 100.0, 100.0).unwrap()).unwrap()
}

fn at(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn step(player: &mut Player, field: &mut Field, direction: Direction) -> MoveOutcome {
    player.move_by(Some(direction), field, Some(HOSTILE), at(10))
}

/// Vertex count >= 3, no coincident neighbours, everything inside the
/// field rectangle.
fn assert_closed(field: &Field) {
    let vertices = field.boundary().vertices();
    assert!(vertices.len() >= 3, "boundary collapsed: {vertices:?}");
    for (i, v) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        assert!(!v.coincides(next, VERTEX_TOLERANCE), "duplicate vertex {v:?}");
        assert!(
            field.rect().contains(*v),
            "vertex {v:?} outside {:?}",
            field.rect()
        );
    }
}

#[test]
fn first_move_off_a_straight_edge() {
    let mut f = field();
    let mut player = Player::new(Point::new(0.0, 0.0), PlayerConfig::default(), &f);
    assert!(player.start_push(&mut f, Duration::ZERO));

    let parallel = step(&mut player, &mut f, Direction::Right);
    assert_eq!(parallel, MoveOutcome::Rejected);
    assert_eq!(f.incursion().len(), 1);

    let perpendicular = step(&mut player, &mut f, Direction::Down);
    assert_eq!(perpendicular, MoveOutcome::Extended);
    assert_eq!(f.incursion().len(), 2);
}

#[test]
fn reversal_block_then_turn_unlock() {
    let mut f = field();
    let mut player = Player::new(Point::new(0.0, 0.0), PlayerConfig::default(), &f);
    assert!(player.start_push(&mut f, Duration::ZERO));

    assert!(step(&mut player, &mut f, Direction::Down).accepted());
    let before = player.position();
    assert!(!step(&mut player, &mut f, Direction::Up).accepted());
    assert_eq!(player.position(), before);
    assert!(step(&mut player, &mut f, Direction::Right).accepted());
    assert!(!step(&mut player, &mut f, Direction::Left).accepted());
    assert!(step(&mut player, &mut f, Direction::Down).accepted());
}

#[test]
fn direction_lock_holds_until_a_turn() {
    let mut f = field();
    let mut player = Player::new(Point::new(0.0, 50.0), PlayerConfig::default(), &f);
    assert!(player.start_push(&mut f, Duration::ZERO));
    assert!(step(&mut player, &mut f, Direction::Right).accepted());
    for _ in 0..3 {
        assert_eq!(step(&mut player, &mut f, Direction::Left), MoveOutcome::Rejected);
        assert_eq!(player.position(), Point::new(3.0, 50.0));
    }
    assert!(step(&mut player, &mut f, Direction::Down).accepted());
    // Left is no longer the reverse of the lock; it closes a tiny box.
    assert!(matches!(
        step(&mut player, &mut f, Direction::Left),
        MoveOutcome::Completed(_)
    ));
}

#[test]
fn creeping_along_the_edge_is_rejected() {
    let mut f = field();
    let mut player = Player::new(Point::new(100.0, 50.0), PlayerConfig::default(), &f);
    assert!(player.start_push(&mut f, Duration::ZERO));
    assert_eq!(step(&mut player, &mut f, Direction::Up), MoveOutcome::Rejected);
    assert_eq!(step(&mut player, &mut f, Direction::Down), MoveOutcome::Rejected);
    assert_eq!(step(&mut player, &mut f, Direction::Left), MoveOutcome::Extended);
}

#[test]
fn idle_timeout_fails_exactly_once() {
    let mut f = field();
    let config = PlayerConfig::default();
    let timeout = config.idle_timeout;
    let mut player = Player::new(Point::new(0.0, 0.0), config, &f);
    let pushed_at = at(250);
    assert!(player.start_push(&mut f, pushed_at));

    assert!(!player.check_push_idle(&mut f, pushed_at + timeout - at(1)));
    assert_eq!(player.lives(), 3);
    assert!(player.check_push_idle(&mut f, pushed_at + timeout));
    assert_eq!(player.lives(), 2);
    assert!(!player.is_pushing());
    assert!(!player.check_push_idle(&mut f, pushed_at + timeout * 2));
    assert_eq!(player.lives(), 2);
}

#[test]
fn full_claim_cycle() {
    let mut f = field();
    let config = PlayerConfig {
        speed: 5.0,
        ..PlayerConfig::default()
    };
    let mut player = Player::new(Point::new(0.0, 0.0), config, &f);

    for _ in 0..10 {
        assert_eq!(step(&mut player, &mut f, Direction::Right), MoveOutcome::Slid);
    }
    assert_eq!(player.position(), Point::new(50.0, 0.0));
    assert!(player.start_push(&mut f, at(5)));

    for _ in 0..10 {
        assert_eq!(step(&mut player, &mut f, Direction::Down), MoveOutcome::Extended);
    }
    for _ in 0..9 {
        assert_eq!(step(&mut player, &mut f, Direction::Right), MoveOutcome::Extended);
    }
    let before = f.claimed_percentage();
    let MoveOutcome::Completed(report) = step(&mut player, &mut f, Direction::Right) else {
        panic!("incursion should complete on the right edge");
    };

    let pct = f.claimed_percentage();
    assert!(pct > before);
    assert!(pct > 20.0 && pct < 35.0, "claimed {pct}%");
    assert!((report.claimed_percentage - pct).abs() < f64::EPSILON);
    assert!(f.is_point_claimed(Point::new(75.0, 25.0)));
    assert!(!f.is_point_claimed(Point::new(25.0, 75.0)));
    assert!(!f.is_point_claimed(HOSTILE));
    assert!(!player.is_pushing());
    assert_eq!(player.position(), Point::new(100.0, 50.0));
    assert_eq!(player.lives(), 3);
    assert_eq!(f.grid().claimed_area(), f.grid().claimed().count());
    assert_eq!(f.boundary().version(), 2);
    assert_closed(&f);
}

#[test]
fn crawler_re_anchors_after_a_claim() {
    let mut f = field();
    // Patrolling the top edge inside the soon-to-be-claimed pocket.
    let mut crawler = EdgeCrawler::new(Point::new(80.0, 0.0), true, 1.4, f.boundary());
    crawler.update(f.boundary());

    f.start_incursion(Point::new(50.0, 0.0));
    f.add_to_incursion(Point::new(50.0, 50.0));
    f.add_to_incursion(Point::new(100.0, 50.0));
    f.complete_incursion(Some(HOSTILE)).unwrap();

    for _ in 0..500 {
        crawler.update(f.boundary());
        assert_eq!(crawler.anchored_version(), Some(f.boundary().version()));
        assert!(f.boundary().is_on_edge(crawler.position(), EDGE_TOLERANCE));
    }
}

#[test]
fn failed_claim_leaves_field_untouched() {
    let mut f = field();
    f.start_incursion(Point::new(50.0, 0.0));
    f.add_to_incursion(Point::new(50.0, 50.0));
    f.add_to_incursion(Point::new(100.0, 50.0));
    // The reference sits on the trace itself.
    assert!(f.complete_incursion(Some(Point::new(50.0, 25.0))).is_err());
    assert_eq!(f.grid().claimed_area(), 0);
    assert_eq!(f.boundary().version(), 1);
    assert_eq!(f.boundary().vertices().len(), 4);
    assert!(!f.is_incursion_active());
}

#[test]
fn wanderer_touching_the_trace_cancels_the_push() {
    // Stationary hostiles: the wanderer waits at (75, 75), the patroller
    // in the bottom-right corner.
    let config = LevelConfig {
        field: FieldRect::new(0.0, 0.0, 100.0, 100.0).unwrap(),
        wanderer_speed: 0.0,
        crawler_speed: 0.0,
        player: PlayerConfig {
            speed: 5.0,
            ..PlayerConfig::default()
        },
        ..LevelConfig::for_level(1)
    };
    let mut session = Session::new(config).unwrap();
    session.command(Command::Confirm, Duration::ZERO).unwrap();

    let mut frame = 0;
    for _ in 0..15 {
        frame += 16;
        assert_eq!(
            session.tick(Some(Direction::Right), at(frame)),
            Some(MoveOutcome::Slid)
        );
    }
    let start = session.snapshot().player.unwrap();
    assert!(start.coincides(Point::new(75.0, 0.0), 1e-9));
    session.command(Command::StartPush, at(frame)).unwrap();
    assert!(session.snapshot().pushing);

    // Heading straight at the wanderer; contact comes once the player is
    // inside its 15-unit radius.
    let mut extended = 0;
    while session.snapshot().pushing {
        assert!(extended < 14, "push was never cancelled");
        frame += 16;
        session.tick(Some(Direction::Down), at(frame));
        extended += 1;
    }

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert!(!snapshot.pushing);
    assert!(snapshot.player.unwrap().coincides(start, 1e-9));
    assert_eq!(snapshot.lives, Some(2));
    assert!(session.field().unwrap().incursion().is_empty());
    assert!(snapshot.claimed_percentage < f64::EPSILON);
}
