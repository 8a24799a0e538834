mod common;

use std::thread;
use std::time::Duration;

use pacman_engine::{Direction, LevelRunner, LevelState};

fn runner() -> LevelRunner {
    let level = common::level(&[
        "#########", //
        "#P......#",
        "#.#####.#",
        "#.......#",
        "#########",
    ]);
    LevelRunner::new(level, Duration::from_millis(2))
}

#[test]
fn no_tick_runs_once_stop_returns() {
    let runner = runner();
    runner.start().unwrap();
    thread::sleep(Duration::from_millis(30));
    runner.stop();

    let ticks = runner.with_level(|level| level.ticks());
    assert!(ticks > 0);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(runner.with_level(|level| level.ticks()), ticks);
    assert!(!runner.is_ticking());
    assert_eq!(runner.with_level(|level| level.state()), LevelState::Paused);
}

#[test]
fn stop_from_many_threads_at_once() {
    let runner = runner();
    runner.start().unwrap();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| runner.stop());
        }
    });
    runner.stop();
    assert!(!runner.is_ticking());
    assert_eq!(runner.with_level(|level| level.state()), LevelState::Paused);
}

#[test]
fn resumed_level_keeps_its_progress() {
    let runner = runner();
    runner.start().unwrap();
    assert!(runner.move_player(Direction::Right));
    runner.stop();
    let score = runner.with_level(|level| level.current_score());
    assert_eq!(score, 10);

    assert!(!runner.move_player(Direction::Right));
    runner.start().unwrap();
    assert!(runner.is_ticking());
    assert_eq!(runner.with_level(|level| level.current_score()), score);
    runner.stop();
}
