use std::collections::HashSet;
use std::fmt;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, Direction, SquareId, Traveller};
use crate::collision::{CollisionEffect, CollisionMap, Collider};
use crate::error::LevelError;
use crate::ghost::{Ghost, LevelView};
use crate::pellet::Pellet;
use crate::player::Player;
use crate::unit::{Unit, UnitBody, UnitId, Units};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelState {
    NotStarted,
    InProgress,
    /// Suspended in the middle of play; `start` resumes.
    Paused,
    Won,
    Lost,
}

impl LevelState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LevelState::Won | LevelState::Lost)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelEvent {
    Started,
    Stopped,
    Won,
    Lost,
    ScoreChanged(u32),
    UnitMoved {
        unit: UnitId,
        from: Option<SquareId>,
        to: SquareId,
    },
    UnitRemoved {
        unit: UnitId,
        square: Option<SquareId>,
    },
}

pub trait LevelObserver: Send {
    fn level_changed(&mut self, event: &LevelEvent);
}

impl<F> LevelObserver for F
where
    F: FnMut(&LevelEvent) + Send,
{
    fn level_changed(&mut self, event: &LevelEvent) {
        self(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// One game on one board: the units on it, the rules for their collisions
/// and the start/stop/win/lose lifecycle.
///
/// `Level` itself is single-threaded. [`crate::runner::LevelRunner`] wraps it
/// in a mutex and drives [`Level::tick`] from a scheduler thread.
pub struct Level {
    board: Board,
    units: Units,
    ghosts: Vec<UnitId>,
    pellets: Vec<UnitId>,
    placements: Vec<(UnitId, SquareId)>,
    start_squares: Vec<SquareId>,
    next_start: usize,
    player: Option<UnitId>,
    collisions: Box<dyn CollisionMap>,
    observers: Vec<(ObserverId, Box<dyn LevelObserver>)>,
    next_observer: u64,
    state: LevelState,
    arrivals: Vec<UnitId>,
    rng: StdRng,
    ticks: u64,
}

impl Level {
    pub fn new(
        board: Board,
        ghosts: Vec<(Ghost, SquareId)>,
        pellets: Vec<(Pellet, SquareId)>,
        start_squares: Vec<SquareId>,
        collisions: Box<dyn CollisionMap>,
    ) -> Result<Self, LevelError> {
        if start_squares.is_empty() {
            return Err(LevelError::NoStartPositions);
        }
        for &sq in &start_squares {
            if !board.contains(sq) {
                return Err(LevelError::UnknownSquare(sq));
            }
            if !board.is_accessible(sq, Traveller::Player) {
                return Err(LevelError::InaccessibleStart(sq));
            }
        }
        for &sq in ghosts.iter().map(|(_, sq)| sq).chain(pellets.iter().map(|(_, sq)| sq)) {
            if !board.contains(sq) {
                return Err(LevelError::UnknownSquare(sq));
            }
            if !board.is_accessible(sq, Traveller::Ghost) {
                return Err(LevelError::BlockedPlacement(sq));
            }
        }

        let mut units = Units::new(board.len());
        let mut placements = Vec::with_capacity(ghosts.len() + pellets.len() + 1);
        let ghost_ids = ghosts
            .into_iter()
            .map(|(ghost, sq)| {
                let id = units.insert(UnitBody::Ghost(ghost), Direction::Up);
                placements.push((id, sq));
                id
            })
            .collect();
        let pellet_ids = pellets
            .into_iter()
            .map(|(pellet, sq)| {
                let id = units.insert(UnitBody::Pellet(pellet), Direction::Up);
                placements.push((id, sq));
                id
            })
            .collect();

        Ok(Self {
            board,
            units,
            ghosts: ghost_ids,
            pellets: pellet_ids,
            placements,
            start_squares,
            next_start: 0,
            player: None,
            collisions,
            observers: Vec::new(),
            next_observer: 0,
            state: LevelState::NotStarted,
            arrivals: Vec::new(),
            rng: StdRng::seed_from_u64(0),
            ticks: 0,
        })
    }

    /// Reseeds the generator behind ghost wandering and move-interval jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Assigns the player the next start square. The player goes on the board
    /// with everything else at `start`, or right away if play has begun.
    pub fn register_player(&mut self, player: Player) -> Result<UnitId, LevelError> {
        if self.player.is_some() {
            return Err(LevelError::PlayerAlreadyRegistered);
        }
        let square = self.start_squares[self.next_start % self.start_squares.len()];
        self.next_start += 1;
        let id = self.units.insert(UnitBody::Player(player), Direction::Left);
        self.player = Some(id);
        if self.state == LevelState::NotStarted {
            self.placements.push((id, square));
        } else {
            self.place(id, square);
        }
        Ok(id)
    }

    pub fn add_observer(&mut self, observer: impl LevelObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    pub fn start(&mut self) {
        match self.state {
            LevelState::NotStarted => {
                if self.player.is_none() {
                    debug!("start ignored: no player registered");
                    return;
                }
                for (id, square) in std::mem::take(&mut self.placements) {
                    self.place(id, square);
                }
                info!(
                    "level started: {} ghosts, {} pellets",
                    self.ghosts.len(),
                    self.pellets.len()
                );
            }
            LevelState::Paused => info!("level resumed at tick {}", self.ticks),
            state => {
                debug!("start ignored in state {state:?}");
                return;
            }
        }
        self.state = LevelState::InProgress;
        self.emit(LevelEvent::Started);
    }

    /// Pauses play. Positions and score are kept; calling it again is a no-op.
    pub fn stop(&mut self) {
        if self.state != LevelState::InProgress {
            return;
        }
        self.state = LevelState::Paused;
        info!("level stopped at tick {}", self.ticks);
        self.emit(LevelEvent::Stopped);
    }

    /// Moves the player one square. Returns false, with nothing changed, if
    /// the level isn't in progress or the square is not open to the player.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        if self.state != LevelState::InProgress {
            debug!("player move {dir:?} ignored in state {:?}", self.state);
            return false;
        }
        let Some(id) = self.player else {
            return false;
        };
        let Some(from) = self
            .units
            .get(id)
            .filter(|unit| unit.as_player().is_some_and(Player::is_alive))
            .and_then(Unit::square)
        else {
            return false;
        };
        let to = self.board.neighbor(from, dir);
        if !self.board.is_accessible(to, Traveller::Player) {
            debug!("player move {dir:?} blocked at {:?}", self.board.coord(to));
            return false;
        }

        self.step(id, dir, to);
        if let Some(unit) = self.units.get(id) {
            let effects = self.collisions.unit_moved(Collider::new(id, unit), dir);
            self.apply(effects);
        }
        self.resolve_collisions();
        self.check_end();
        true
    }

    /// Advances the ghosts by one tick: every ready ghost decides against the
    /// same snapshot, then all moves are committed, then collisions resolve.
    pub fn tick(&mut self) {
        if self.state != LevelState::InProgress {
            return;
        }
        self.ticks += 1;
        if let Some(id) = self.player {
            if let Some(player) = self.player_mut(id) {
                player.tick_power();
            }
        }

        let view = LevelView::new(&self.board, &self.units);
        let mut moves = Vec::new();
        for &id in &self.ghosts {
            let Some(me) = view.ghost(id).copied() else {
                continue;
            };
            let Some(UnitBody::Ghost(ghost)) = self.units.get_mut(id).map(Unit::body_mut) else {
                continue;
            };
            if !ghost.tick_cooldown() {
                continue;
            }
            let decision = ghost.next_move(&view, &me, &mut self.rng);
            ghost.rearm(&mut self.rng);
            let Some(dir) = decision else {
                continue;
            };
            let to = self.board.neighbor(me.square, dir);
            if self.board.is_accessible(to, Traveller::Ghost) {
                moves.push((id, dir, to));
            }
        }
        drop(view);

        for (id, dir, to) in moves {
            self.step(id, dir, to);
        }
        self.resolve_collisions();
        self.check_end();
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == LevelState::InProgress
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn occupants(&self, square: SquareId) -> &[UnitId] {
        self.units.occupants(square)
    }

    pub fn player_id(&self) -> Option<UnitId> {
        self.player
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.and_then(|id| self.units.get(id)).and_then(Unit::as_player)
    }

    pub fn player_square(&self) -> Option<SquareId> {
        self.player.and_then(|id| self.units.get(id)).and_then(Unit::square)
    }

    pub fn current_score(&self) -> u32 {
        self.player().map_or(0, Player::score)
    }

    pub fn remaining_pellet_count(&self) -> usize {
        self.pellets.len()
    }

    pub fn ghost_ids(&self) -> &[UnitId] {
        &self.ghosts
    }

    pub fn ghosts(&self) -> impl Iterator<Item = (UnitId, &Ghost)> {
        self.ghosts
            .iter()
            .filter_map(|id| self.units.get(*id).and_then(Unit::as_ghost).map(|g| (*id, g)))
    }

    pub fn is_consistent(&self) -> bool {
        self.units.is_consistent()
    }

    fn player_mut(&mut self, id: UnitId) -> Option<&mut Player> {
        match self.units.get_mut(id).map(Unit::body_mut) {
            Some(UnitBody::Player(player)) => Some(player),
            _ => None,
        }
    }

    fn place(&mut self, id: UnitId, square: SquareId) {
        self.units.occupy(id, square);
        self.arrivals.push(id);
        self.emit(LevelEvent::UnitMoved {
            unit: id,
            from: None,
            to: square,
        });
    }

    fn step(&mut self, id: UnitId, dir: Direction, to: SquareId) {
        let from = self.units.occupy(id, to);
        if let Some(unit) = self.units.get_mut(id) {
            unit.set_facing(dir);
        }
        self.arrivals.push(id);
        self.emit(LevelEvent::UnitMoved { unit: id, from, to });
    }

    /// Runs the collision map over every pair formed by this round's
    /// arrivals, in arrival order, visiting each pair once.
    fn resolve_collisions(&mut self) {
        let arrivals = std::mem::take(&mut self.arrivals);
        let mut visited = HashSet::new();
        for mover in arrivals {
            let Some(square) = self.units.get(mover).and_then(Unit::square) else {
                continue;
            };
            let others: Vec<UnitId> = self
                .units
                .occupants(square)
                .iter()
                .copied()
                .filter(|other| *other != mover)
                .collect();
            for other in others {
                if !visited.insert((mover.min(other), mover.max(other))) {
                    continue;
                }
                let (Some(a), Some(b)) = (self.units.get(mover), self.units.get(other)) else {
                    continue;
                };
                if a.square() != Some(square) || b.square() != Some(square) {
                    continue;
                }
                let effects =
                    self.collisions.collide(Collider::new(mover, a), Collider::new(other, b));
                self.apply(effects);
            }
        }
    }

    fn apply(&mut self, effects: Vec<CollisionEffect>) {
        for effect in effects {
            match effect {
                CollisionEffect::Score { player, delta } => {
                    if delta == 0 {
                        continue;
                    }
                    let Some(p) = self.player_mut(player) else {
                        continue;
                    };
                    p.add_points(delta);
                    let score = p.score();
                    self.emit(LevelEvent::ScoreChanged(score));
                }
                CollisionEffect::RemoveUnit(id) => {
                    let Some(unit) = self.units.remove(id) else {
                        continue;
                    };
                    debug!("unit {id:?} removed");
                    self.ghosts.retain(|other| *other != id);
                    self.pellets.retain(|other| *other != id);
                    self.emit(LevelEvent::UnitRemoved {
                        unit: id,
                        square: unit.square(),
                    });
                }
                CollisionEffect::KillPlayer { player, killer } => {
                    if let Some(p) = self.player_mut(player) {
                        p.kill();
                        info!("player {player:?} caught by {killer:?}");
                    }
                }
                CollisionEffect::Empower { player, ticks } => {
                    if let Some(p) = self.player_mut(player) {
                        p.empower(ticks);
                    }
                }
            }
        }
    }

    /// A dead player loses the level even if the last pellet went too.
    fn check_end(&mut self) {
        if self.state != LevelState::InProgress {
            return;
        }
        if !self.player().is_some_and(Player::is_alive) {
            self.state = LevelState::Lost;
            info!("level lost with score {}", self.current_score());
            self.emit(LevelEvent::Lost);
        } else if self.pellets.is_empty() {
            self.state = LevelState::Won;
            info!("level won with score {}", self.current_score());
            self.emit(LevelEvent::Won);
        }
    }

    fn emit(&mut self, event: LevelEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer.level_changed(&event);
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("state", &self.state)
            .field("ticks", &self.ticks)
            .field("ghosts", &self.ghosts.len())
            .field("pellets", &self.pellets.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
