use crate::board::Direction;
use crate::ghost::Ghost;
use crate::pellet::Pellet;
use crate::player::Player;

pub const GHOST_BOUNTY: i32 = 200;

/// Scoring rules, kept apart from collision handling so a level can be
/// built with different rules without touching the engine.
pub trait PointCalculator: Send + Sync {
    fn consumed_a_pellet(&self, player: &Player, pellet: &Pellet) -> i32;

    /// Player ran into a ghost while unpowered.
    fn collided_with_a_ghost(&self, player: &Player, ghost: &Ghost) -> i32;

    /// Player ate a ghost while powered.
    fn ate_a_ghost(&self, player: &Player, ghost: &Ghost) -> i32;

    fn player_moved(&self, player: &Player, dir: Direction) -> i32;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPointCalculator;

impl PointCalculator for DefaultPointCalculator {
    fn consumed_a_pellet(&self, _player: &Player, pellet: &Pellet) -> i32 {
        i32::try_from(pellet.value()).unwrap_or(i32::MAX)
    }

    fn collided_with_a_ghost(&self, _player: &Player, _ghost: &Ghost) -> i32 {
        0
    }

    fn ate_a_ghost(&self, _player: &Player, _ghost: &Ghost) -> i32 {
        GHOST_BOUNTY
    }

    fn player_moved(&self, _player: &Player, _dir: Direction) -> i32 {
        0
    }
}
