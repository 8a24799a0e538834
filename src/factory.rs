use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::board::{Board, SquareId};
use crate::collision::PlayerCollisions;
use crate::error::LevelError;
use crate::ghost::{ai, Ghost, GhostKind};
use crate::level::Level;
use crate::pellet::Pellet;
use crate::player::Player;
use crate::points::PointCalculator;
use crate::sprite::{DirectionalSprite, Sprite, SpriteStore};

pub const GHOSTS: usize = 4;
pub const PELLET_VALUE: u32 = 10;
pub const POWER_PELLET_VALUE: u32 = 50;
pub const POWER_TICKS: u32 = 90;

/// Order in which `create_ghost` hands out ghosts.
pub const DEFAULT_ROSTER: [GhostKind; GHOSTS] =
    [GhostKind::Blinky, GhostKind::Inky, GhostKind::Pinky, GhostKind::Clyde];

const ALL_KINDS: [GhostKind; 5] = [
    GhostKind::Blinky,
    GhostKind::Inky,
    GhostKind::Pinky,
    GhostKind::Clyde,
    GhostKind::Random,
];

pub struct GhostFactory {
    sprites: HashMap<GhostKind, DirectionalSprite>,
}

impl GhostFactory {
    pub fn new(store: &dyn SpriteStore) -> Self {
        let sprites = ALL_KINDS
            .into_iter()
            .map(|kind| (kind, store.ghost_sprite(kind)))
            .collect();
        Self { sprites }
    }

    pub fn create(&self, kind: GhostKind) -> Ghost {
        let sprite = self.sprites[&kind];
        Ghost::new(kind, ai::for_kind(kind), sprite)
    }

    pub fn create_blinky(&self) -> Ghost {
        self.create(GhostKind::Blinky)
    }

    pub fn create_inky(&self) -> Ghost {
        self.create(GhostKind::Inky)
    }

    pub fn create_pinky(&self) -> Ghost {
        self.create(GhostKind::Pinky)
    }

    pub fn create_clyde(&self) -> Ghost {
        self.create(GhostKind::Clyde)
    }

    /// A ghost with no strategy of its own; it only wanders.
    pub fn create_random(&self) -> Ghost {
        self.create(GhostKind::Random)
    }
}

/// Builds levels and the units that populate them. Sprites are looked up
/// once, when the factory is built.
pub struct LevelFactory {
    ghosts: GhostFactory,
    roster: Vec<GhostKind>,
    next_ghost: usize,
    points: Arc<dyn PointCalculator>,
    player_sprite: DirectionalSprite,
    pellet_sprite: Sprite,
    power_pellet_sprite: Sprite,
    seed: u64,
    levels_built: u64,
}

impl LevelFactory {
    pub fn new(
        store: &dyn SpriteStore,
        ghosts: GhostFactory,
        points: Arc<dyn PointCalculator>,
    ) -> Self {
        Self {
            ghosts,
            roster: DEFAULT_ROSTER.to_vec(),
            next_ghost: 0,
            points,
            player_sprite: store.player_sprite(),
            pellet_sprite: store.pellet_sprite(),
            power_pellet_sprite: store.power_pellet_sprite(),
            seed: 0,
            levels_built: 0,
        }
    }

    /// Replaces the ghost rotation. Slots the roster doesn't fill, out of
    /// the four, become random ghosts.
    pub fn with_roster(mut self, roster: Vec<GhostKind>) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn create_ghost(&mut self) -> Ghost {
        let index = self.next_ghost;
        self.next_ghost = (self.next_ghost + 1) % GHOSTS;
        match self.roster.get(index) {
            Some(&kind) => self.ghosts.create(kind),
            None => {
                warn!("no ghost configured for slot {index}, falling back to a random ghost");
                self.ghosts.create_random()
            }
        }
    }

    pub fn create_pellet(&self) -> Pellet {
        Pellet::new(PELLET_VALUE, self.pellet_sprite)
    }

    pub fn create_power_pellet(&self) -> Pellet {
        Pellet::power(POWER_PELLET_VALUE, POWER_TICKS, self.power_pellet_sprite)
    }

    pub fn create_player(&self) -> Player {
        Player::new(self.player_sprite)
    }

    /// Wires a fresh collision map around the shared point calculator and
    /// returns a level that has not started yet.
    pub fn create_level(
        &mut self,
        board: Board,
        ghosts: Vec<(Ghost, SquareId)>,
        pellets: Vec<(Pellet, SquareId)>,
        start_positions: Vec<SquareId>,
    ) -> Result<Level, LevelError> {
        let collisions = Box::new(PlayerCollisions::new(Arc::clone(&self.points)));
        let seed = self.seed.wrapping_add(self.levels_built);
        let level =
            Level::new(board, ghosts, pellets, start_positions, collisions)?.with_seed(seed);
        self.levels_built += 1;
        Ok(level)
    }
}
