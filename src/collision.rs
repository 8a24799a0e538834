use std::sync::Arc;

use crate::board::Direction;
use crate::player::Player;
use crate::points::PointCalculator;
use crate::unit::{Unit, UnitBody, UnitId};

/// What a collision does to the level. The level applies these; collision
/// maps never touch occupancy themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionEffect {
    Score { player: UnitId, delta: i32 },
    RemoveUnit(UnitId),
    KillPlayer { player: UnitId, killer: UnitId },
    Empower { player: UnitId, ticks: u32 },
}

#[derive(Clone, Copy, Debug)]
pub struct Collider<'a> {
    pub id: UnitId,
    pub unit: &'a Unit,
}

impl<'a> Collider<'a> {
    pub fn new(id: UnitId, unit: &'a Unit) -> Self {
        Self { id, unit }
    }
}

/// Called once per pair of units that newly share a square, with the unit
/// that moved first. Implementations must produce the same effects whichever
/// unit is passed as the mover.
pub trait CollisionMap: Send {
    fn collide(&self, mover: Collider<'_>, collided: Collider<'_>) -> Vec<CollisionEffect>;

    fn unit_moved(&self, _unit: Collider<'_>, _dir: Direction) -> Vec<CollisionEffect> {
        Vec::new()
    }
}

/// Everything revolves around the player: pellets are eaten, ghosts kill or
/// get eaten. Ghost-ghost and ghost-pellet meetings do nothing.
pub struct PlayerCollisions {
    points: Arc<dyn PointCalculator>,
}

impl PlayerCollisions {
    pub fn new(points: Arc<dyn PointCalculator>) -> Self {
        Self { points }
    }

    fn player_meets(
        &self,
        player_id: UnitId,
        player: &Player,
        other: Collider<'_>,
    ) -> Vec<CollisionEffect> {
        if !player.is_alive() {
            return Vec::new();
        }
        match other.unit.body() {
            UnitBody::Ghost(ghost) if player.is_powered() => vec![
                CollisionEffect::RemoveUnit(other.id),
                CollisionEffect::Score {
                    player: player_id,
                    delta: self.points.ate_a_ghost(player, ghost),
                },
            ],
            UnitBody::Ghost(ghost) => vec![
                CollisionEffect::Score {
                    player: player_id,
                    delta: self.points.collided_with_a_ghost(player, ghost),
                },
                CollisionEffect::KillPlayer {
                    player: player_id,
                    killer: other.id,
                },
            ],
            UnitBody::Pellet(pellet) => {
                let mut effects = vec![
                    CollisionEffect::RemoveUnit(other.id),
                    CollisionEffect::Score {
                        player: player_id,
                        delta: self.points.consumed_a_pellet(player, pellet),
                    },
                ];
                if pellet.is_power() {
                    effects.push(CollisionEffect::Empower {
                        player: player_id,
                        ticks: pellet.power_ticks(),
                    });
                }
                effects
            }
            UnitBody::Player(_) => Vec::new(),
        }
    }
}

impl CollisionMap for PlayerCollisions {
    fn collide(&self, mover: Collider<'_>, collided: Collider<'_>) -> Vec<CollisionEffect> {
        match (mover.unit.body(), collided.unit.body()) {
            (UnitBody::Player(player), _) => self.player_meets(mover.id, player, collided),
            (_, UnitBody::Player(player)) => self.player_meets(collided.id, player, mover),
            _ => Vec::new(),
        }
    }

    fn unit_moved(&self, unit: Collider<'_>, dir: Direction) -> Vec<CollisionEffect> {
        match unit.unit.body() {
            UnitBody::Player(player) => vec![CollisionEffect::Score {
                player: unit.id,
                delta: self.points.player_moved(player, dir),
            }],
            _ => Vec::new(),
        }
    }
}
