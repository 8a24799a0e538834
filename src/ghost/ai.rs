//! Target-selection strategies for the four arcade ghosts, plus the
//! wanderer that never commits to a direction.

use crate::board::{Direction, Traveller};
use crate::ghost::{GhostAi, GhostKind, GhostSighting, LevelView};
use crate::navigation::{first_step_to, first_step_towards, path_length};

const AMBUSH_LEAD: usize = 4;
const FLANK_LEAD: usize = 2;
const SHY_RADIUS: u32 = 8;

pub fn for_kind(kind: GhostKind) -> Box<dyn GhostAi> {
    match kind {
        GhostKind::Blinky => Box::new(Pursuit),
        GhostKind::Inky => Box::new(Flank),
        GhostKind::Pinky => Box::new(Ambush),
        GhostKind::Clyde => Box::new(Shy),
        GhostKind::Random => Box::new(Wander),
    }
}

/// Heads straight for the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pursuit;

impl GhostAi for Pursuit {
    fn decide(&mut self, view: &LevelView<'_>, me: &GhostSighting) -> Option<Direction> {
        let player = view.player()?;
        first_step_to(view.board(), me.square, player.square, Traveller::Ghost)
    }
}

/// Aims a few squares ahead of where the player is facing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ambush;

impl GhostAi for Ambush {
    fn decide(&mut self, view: &LevelView<'_>, me: &GhostSighting) -> Option<Direction> {
        let player = view.player()?;
        let board = view.board();
        let target = board.ahead(player.square, player.facing, AMBUSH_LEAD);
        first_step_to(board, me.square, target, Traveller::Ghost)
    }
}

/// Mirrors Blinky through a point just ahead of the player, so the two
/// close in from opposite sides.
#[derive(Clone, Copy, Debug, Default)]
pub struct Flank;

impl GhostAi for Flank {
    fn decide(&mut self, view: &LevelView<'_>, me: &GhostSighting) -> Option<Direction> {
        let player = view.player()?;
        let board = view.board();
        let Some(blinky) = view.first_of_kind(GhostKind::Blinky) else {
            return Pursuit.decide(view, me);
        };
        let pivot = board.coord(board.ahead(player.square, player.facing, FLANK_LEAD));
        let from = board.coord(blinky.square);
        let target = (
            2 * pivot.x as isize - from.x as isize,
            2 * pivot.y as isize - from.y as isize,
        );
        first_step_towards(board, me.square, target, Traveller::Ghost)
    }
}

/// Chases from afar, backs off once it gets close.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shy;

impl GhostAi for Shy {
    fn decide(&mut self, view: &LevelView<'_>, me: &GhostSighting) -> Option<Direction> {
        let player = view.player()?;
        let board = view.board();
        let distance = path_length(board, me.square, player.square, Traveller::Ghost)?;
        let toward = first_step_to(board, me.square, player.square, Traveller::Ghost)?;
        if distance > SHY_RADIUS {
            return Some(toward);
        }
        let away = toward.opposite();
        board
            .is_accessible(board.neighbor(me.square, away), Traveller::Ghost)
            .then_some(away)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Wander;

impl GhostAi for Wander {
    fn decide(&mut self, _view: &LevelView<'_>, _me: &GhostSighting) -> Option<Direction> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Coord, SquareId, Terrain};
    use crate::ghost::Ghost;
    use crate::player::Player;
    use crate::sprite::{SpriteStore, TerminalSprites};
    use crate::unit::{UnitBody, UnitId, Units};

    struct Scene {
        board: Board,
        units: Units,
    }

    impl Scene {
        // Open floor with a solid wall border.
        fn open(width: usize, height: usize) -> Self {
            let board = Board::from_fn(width, height, |c| {
                if c.x == 0 || c.y == 0 || c.x == width - 1 || c.y == height - 1 {
                    Terrain::Wall
                } else {
                    Terrain::Floor
                }
            })
            .unwrap();
            let units = Units::new(board.len());
            Self { board, units }
        }

        fn at(&self, x: usize, y: usize) -> SquareId {
            self.board.square_at(Coord::new(x, y)).unwrap()
        }

        fn player(&mut self, x: usize, y: usize, facing: Direction) -> UnitId {
            let sq = self.at(x, y);
            let id = self
                .units
                .insert(UnitBody::Player(Player::new(TerminalSprites.player_sprite())), facing);
            self.units.occupy(id, sq);
            id
        }

        fn ghost(&mut self, kind: GhostKind, x: usize, y: usize) -> UnitId {
            let sq = self.at(x, y);
            let ghost = Ghost::new(kind, for_kind(kind), TerminalSprites.ghost_sprite(kind));
            let id = self.units.insert(UnitBody::Ghost(ghost), Direction::Up);
            self.units.occupy(id, sq);
            id
        }

        fn decide(&self, ai: &mut dyn GhostAi, ghost: UnitId) -> Option<Direction> {
            let view = LevelView::new(&self.board, &self.units);
            let me = *view.ghost(ghost).unwrap();
            ai.decide(&view, &me)
        }
    }

    #[test]
    fn pursuit_closes_in_on_player() {
        let mut scene = Scene::open(9, 9);
        scene.player(6, 2, Direction::Left);
        let ghost = scene.ghost(GhostKind::Blinky, 2, 2);
        assert_eq!(scene.decide(&mut Pursuit, ghost), Some(Direction::Right));
    }

    #[test]
    fn ambush_targets_ahead_of_player() {
        let mut scene = Scene::open(12, 9);
        // Player at (5, 6) facing up: the ambush square is (5, 2).
        scene.player(5, 6, Direction::Up);
        let ghost = scene.ghost(GhostKind::Pinky, 5, 1);
        assert_eq!(scene.decide(&mut Ambush, ghost), Some(Direction::Down));
        // Pursuit would go left from here; the ambush square pulls it up.
        let side = scene.ghost(GhostKind::Pinky, 9, 6);
        assert_eq!(scene.decide(&mut Ambush, side), Some(Direction::Up));
        assert_eq!(scene.decide(&mut Pursuit, side), Some(Direction::Left));
    }

    #[test]
    fn flank_without_blinky_falls_back_to_pursuit() {
        let mut scene = Scene::open(9, 9);
        scene.player(2, 6, Direction::Right);
        let inky = scene.ghost(GhostKind::Inky, 2, 2);
        assert_eq!(scene.decide(&mut Flank, inky), Some(Direction::Down));
    }

    #[test]
    fn flank_mirrors_blinky_through_the_pivot() {
        let mut scene = Scene::open(15, 9);
        // Pivot is (6, 4); blinky at (4, 3) puts the target at (8, 5).
        scene.player(4, 4, Direction::Right);
        scene.ghost(GhostKind::Blinky, 4, 3);
        let inky = scene.ghost(GhostKind::Inky, 12, 4);
        assert_eq!(scene.decide(&mut Flank, inky), Some(Direction::Left));
    }

    #[test]
    fn shy_backs_away_when_close() {
        let mut scene = Scene::open(20, 5);
        scene.player(3, 2, Direction::Left);
        let near = scene.ghost(GhostKind::Clyde, 6, 2);
        assert_eq!(scene.decide(&mut Shy, near), Some(Direction::Right));
        let far = scene.ghost(GhostKind::Clyde, 17, 2);
        assert_eq!(scene.decide(&mut Shy, far), Some(Direction::Left));
    }

    #[test]
    fn no_player_means_no_opinion() {
        let mut scene = Scene::open(5, 5);
        let ghost = scene.ghost(GhostKind::Blinky, 2, 2);
        assert_eq!(scene.decide(&mut Pursuit, ghost), None);
        assert_eq!(scene.decide(&mut Wander, ghost), None);
    }
}
