pub mod ai;

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Direction, SquareId, Traveller};
use crate::sprite::DirectionalSprite;
use crate::unit::{UnitBody, UnitId, Units};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Blinky,
    Inky,
    Pinky,
    Clyde,
    Random,
}

impl GhostKind {
    /// Ticks between moves before variation.
    pub fn move_interval(self) -> u32 {
        match self {
            GhostKind::Blinky => 3,
            GhostKind::Inky => 4,
            GhostKind::Pinky => 3,
            GhostKind::Clyde => 4,
            GhostKind::Random => 3,
        }
    }

    pub fn interval_variation(self) -> u32 {
        1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSighting {
    pub unit: UnitId,
    pub square: SquareId,
    pub facing: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostSighting {
    pub unit: UnitId,
    pub kind: GhostKind,
    pub square: SquareId,
    pub facing: Direction,
}

/// Read-only snapshot of the level taken before any ghost moves in a tick,
/// so every ghost decides against the same positions.
#[derive(Clone, Debug)]
pub struct LevelView<'a> {
    board: &'a Board,
    player: Option<PlayerSighting>,
    player_powered: bool,
    ghosts: Vec<GhostSighting>,
}

impl<'a> LevelView<'a> {
    pub fn new(board: &'a Board, units: &Units) -> Self {
        let mut player = None;
        let mut player_powered = false;
        let mut ghosts = Vec::new();
        for (id, unit) in units.iter() {
            let Some(square) = unit.square() else {
                continue;
            };
            match unit.body() {
                UnitBody::Player(p) if p.is_alive() => {
                    player = Some(PlayerSighting {
                        unit: id,
                        square,
                        facing: unit.facing(),
                    });
                    player_powered = p.is_powered();
                }
                UnitBody::Ghost(g) => ghosts.push(GhostSighting {
                    unit: id,
                    kind: g.kind(),
                    square,
                    facing: unit.facing(),
                }),
                _ => {}
            }
        }
        Self {
            board,
            player,
            player_powered,
            ghosts,
        }
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    pub fn player(&self) -> Option<&PlayerSighting> {
        self.player.as_ref()
    }

    pub fn player_powered(&self) -> bool {
        self.player_powered
    }

    pub fn ghosts(&self) -> &[GhostSighting] {
        &self.ghosts
    }

    pub fn ghost(&self, unit: UnitId) -> Option<&GhostSighting> {
        self.ghosts.iter().find(|g| g.unit == unit)
    }

    pub fn first_of_kind(&self, kind: GhostKind) -> Option<&GhostSighting> {
        self.ghosts.iter().find(|g| g.kind == kind)
    }
}

/// Ghost decision strategy. `None` means "no opinion"; the ghost then
/// wanders instead.
pub trait GhostAi: Send {
    fn decide(&mut self, view: &LevelView<'_>, me: &GhostSighting) -> Option<Direction>;
}

pub struct Ghost {
    kind: GhostKind,
    ai: Box<dyn GhostAi>,
    move_interval: u32,
    interval_variation: u32,
    cooldown: u32,
    sprite: DirectionalSprite,
}

impl Ghost {
    pub fn new(kind: GhostKind, ai: Box<dyn GhostAi>, sprite: DirectionalSprite) -> Self {
        Self {
            kind,
            ai,
            move_interval: kind.move_interval().max(1),
            interval_variation: kind.interval_variation(),
            cooldown: 0,
            sprite,
        }
    }

    pub fn with_interval(mut self, move_interval: u32, interval_variation: u32) -> Self {
        self.move_interval = move_interval.max(1);
        self.interval_variation = interval_variation;
        self
    }

    /// Holds the ghost back for `ticks` ticks before its first move.
    pub fn with_release_delay(mut self, ticks: u32) -> Self {
        self.cooldown = ticks;
        self
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn sprite(&self) -> &DirectionalSprite {
        &self.sprite
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Counts the cooldown down by one tick; true once the ghost may move.
    pub fn tick_cooldown(&mut self) -> bool {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            false
        } else {
            true
        }
    }

    pub fn rearm(&mut self, rng: &mut impl Rng) {
        let extra = if self.interval_variation > 0 {
            rng.gen_range(0..=self.interval_variation)
        } else {
            0
        };
        self.cooldown = self.move_interval - 1 + extra;
    }

    pub fn next_move(
        &mut self,
        view: &LevelView<'_>,
        me: &GhostSighting,
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        self.ai
            .decide(view, me)
            .or_else(|| random_move(view.board(), me.square, rng))
    }
}

impl fmt::Debug for Ghost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ghost")
            .field("kind", &self.kind)
            .field("move_interval", &self.move_interval)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

fn random_move(board: &Board, from: SquareId, rng: &mut impl Rng) -> Option<Direction> {
    let options: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|dir| board.is_accessible(board.neighbor(from, *dir), Traveller::Ghost))
        .collect();
    options.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Terrain};
    use crate::sprite::{SpriteStore, TerminalSprites};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ghost(kind: GhostKind) -> Ghost {
        Ghost::new(kind, ai::for_kind(kind), TerminalSprites.ghost_sprite(kind))
    }

    #[test]
    fn cooldown_gates_moves() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut g = ghost(GhostKind::Blinky).with_interval(3, 0);
        assert!(g.tick_cooldown());
        g.rearm(&mut rng);
        assert!(!g.tick_cooldown());
        assert!(!g.tick_cooldown());
        assert!(g.tick_cooldown());
    }

    #[test]
    fn release_delay_holds_first_move() {
        let mut g = ghost(GhostKind::Pinky).with_release_delay(2);
        assert!(!g.tick_cooldown());
        assert!(!g.tick_cooldown());
        assert!(g.tick_cooldown());
    }

    #[test]
    fn random_ghost_wanders_only_through_open_squares() {
        // ###
        // #.#
        // #.#
        let board = Board::from_fn(3, 3, |c| {
            if c.x == 1 && c.y > 0 {
                Terrain::Floor
            } else {
                Terrain::Wall
            }
        })
        .unwrap();
        let sq = board.square_at(Coord::new(1, 1)).unwrap();
        let mut units = Units::new(board.len());
        let id = units.insert(UnitBody::Ghost(ghost(GhostKind::Random)), Direction::Up);
        units.occupy(id, sq);
        let view = LevelView::new(&board, &units);
        let me = *view.ghost(id).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let mut g = ghost(GhostKind::Random);
        for _ in 0..20 {
            assert_eq!(g.next_move(&view, &me, &mut rng), Some(Direction::Down));
        }
    }

    #[test]
    fn boxed_in_ghost_stays_put() {
        let board = Board::from_fn(3, 3, |c| {
            if c == Coord::new(1, 1) {
                Terrain::Floor
            } else {
                Terrain::Wall
            }
        })
        .unwrap();
        let sq = board.square_at(Coord::new(1, 1)).unwrap();
        let mut units = Units::new(board.len());
        let id = units.insert(UnitBody::Ghost(ghost(GhostKind::Random)), Direction::Up);
        units.occupy(id, sq);
        let view = LevelView::new(&board, &units);
        let me = *view.ghost(id).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(ghost(GhostKind::Random).next_move(&view, &me, &mut rng), None);
    }
}
