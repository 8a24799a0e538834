mod common;

use pacman_engine::{Direction, GhostKind, LevelEvent, LevelState};
use proptest::prelude::*;

#[test]
fn factory_hands_out_ghosts_round_robin() {
    let mut factory = common::factory();
    let kinds: Vec<GhostKind> = (0..5).map(|_| factory.create_ghost().kind()).collect();
    assert_eq!(
        kinds,
        [
            GhostKind::Blinky,
            GhostKind::Inky,
            GhostKind::Pinky,
            GhostKind::Clyde,
            GhostKind::Blinky,
        ]
    );
}

#[test]
fn level_keeps_ghosts_in_creation_order() {
    let level = common::level(&[
        "#######", //
        "#GGGGG#",
        "#  P  #",
        "#######",
    ]);
    let kinds: Vec<GhostKind> = level.ghosts().map(|(_, ghost)| ghost.kind()).collect();
    assert_eq!(
        kinds,
        [
            GhostKind::Blinky,
            GhostKind::Inky,
            GhostKind::Pinky,
            GhostKind::Clyde,
            GhostKind::Blinky,
        ]
    );
}

#[test]
fn pellet_under_the_player_is_eaten_on_the_first_tick() {
    let mut level = common::level_with_pellets_under_player(
        &[
            "#####", //
            "# P #",
            "#####",
        ],
        true,
    );
    let events = common::record(&mut level);
    level.start();
    assert_eq!(level.remaining_pellet_count(), 1);

    level.tick();
    assert_eq!(level.current_score(), 10);
    assert_eq!(level.remaining_pellet_count(), 0);
    assert_eq!(level.state(), LevelState::Won);
    let square = level.player_square().unwrap();
    assert_eq!(level.occupants(square), [level.player_id().unwrap()]);

    let events = events.lock().unwrap();
    assert!(events.contains(&LevelEvent::ScoreChanged(10)));
    assert_eq!(events.last(), Some(&LevelEvent::Won));
}

#[test]
fn adjacent_ghost_catches_the_player_and_play_ends() {
    let mut level = common::level(&[
        "######", //
        "#.PG #",
        "######",
    ]);
    level.start();
    level.tick();
    assert_eq!(level.state(), LevelState::Lost);
    assert!(!level.player().unwrap().is_alive());

    let ticks = level.ticks();
    level.tick();
    level.tick();
    assert_eq!(level.ticks(), ticks);
    assert!(!level.move_player(Direction::Left));
    assert_eq!(level.remaining_pellet_count(), 1);
}

#[test]
fn moving_into_a_wall_changes_nothing() {
    let mut level = common::level(&[
        "#####", //
        "#P..#",
        "#####",
    ]);
    level.start();
    let events = common::record(&mut level);
    let before = level.player_square();

    assert!(!level.move_player(Direction::Left));
    assert!(!level.move_player(Direction::Up));
    assert_eq!(level.player_square(), before);
    assert_eq!(level.current_score(), 0);
    assert_eq!(level.state(), LevelState::InProgress);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn gate_keeps_the_player_out() {
    let mut level = common::level(&[
        "#####", //
        "#P=.#",
        "#####",
    ]);
    level.start();
    assert!(!level.move_player(Direction::Right));
    assert_eq!(level.current_score(), 0);
}

#[test]
fn stopping_twice_is_the_same_as_stopping_once() {
    let mut level = common::level(&[
        "#####", //
        "#P..#",
        "#####",
    ]);
    let events = common::record(&mut level);
    level.start();
    level.stop();
    let after_one = events.lock().unwrap().clone();
    level.stop();
    assert_eq!(*events.lock().unwrap(), after_one);
    assert_eq!(level.state(), LevelState::Paused);
    assert_eq!(after_one.iter().filter(|e| **e == LevelEvent::Stopped).count(), 1);
}

#[test]
fn eating_every_pellet_by_walking_wins() {
    let mut level = common::level(&[
        "######", //
        "#P...#",
        "######",
    ]);
    level.start();
    for _ in 0..3 {
        assert!(level.move_player(Direction::Right));
    }
    assert_eq!(level.current_score(), 30);
    assert_eq!(level.state(), LevelState::Won);
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn occupancy_stays_consistent(
        steps in prop::collection::vec(prop::option::of(direction()), 1..120)
    ) {
        let mut level = common::level(&[
            "###########",
            "#G.......G#",
            "#.##.#.##.#",
            "#....P....#",
            "#.##.#.##.#",
            "#G.......G#",
            "###########",
        ]);
        level.start();
        for step in steps {
            match step {
                Some(dir) => {
                    level.move_player(dir);
                }
                None => level.tick(),
            }
            prop_assert!(level.is_consistent());
            for (id, unit) in level.units().iter() {
                let square = unit.square().unwrap();
                prop_assert_eq!(level.occupants(square).iter().filter(|o| **o == id).count(), 1);
            }
        }
    }
}
