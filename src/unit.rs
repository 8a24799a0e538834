use crate::board::{Direction, SquareId, Traveller};
use crate::ghost::Ghost;
use crate::pellet::Pellet;
use crate::player::Player;
use crate::sprite::Sprite;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(usize);

impl UnitId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub enum UnitBody {
    Player(Player),
    Ghost(Ghost),
    Pellet(Pellet),
}

/// Anything that can stand on a square. The square is only a record of
/// where the unit is; [`Units::occupy`] is the one place it changes.
#[derive(Debug)]
pub struct Unit {
    square: Option<SquareId>,
    facing: Direction,
    body: UnitBody,
}

impl Unit {
    pub fn square(&self) -> Option<SquareId> {
        self.square
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn set_facing(&mut self, dir: Direction) {
        self.facing = dir;
    }

    pub fn body(&self) -> &UnitBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut UnitBody {
        &mut self.body
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.body {
            UnitBody::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_ghost(&self) -> Option<&Ghost> {
        match &self.body {
            UnitBody::Ghost(ghost) => Some(ghost),
            _ => None,
        }
    }

    pub fn as_pellet(&self) -> Option<&Pellet> {
        match &self.body {
            UnitBody::Pellet(pellet) => Some(pellet),
            _ => None,
        }
    }

    /// Pellets never move, so they have no traveller class.
    pub fn traveller(&self) -> Option<Traveller> {
        match self.body {
            UnitBody::Player(_) => Some(Traveller::Player),
            UnitBody::Ghost(_) => Some(Traveller::Ghost),
            UnitBody::Pellet(_) => None,
        }
    }

    pub fn sprite(&self) -> Sprite {
        match &self.body {
            UnitBody::Player(player) => player.sprite().facing(self.facing),
            UnitBody::Ghost(ghost) => ghost.sprite().facing(self.facing),
            UnitBody::Pellet(pellet) => pellet.sprite(),
        }
    }
}

/// Unit arena plus the per-square occupant lists. Occupant lists keep
/// arrival order.
#[derive(Debug, Default)]
pub struct Units {
    slots: Vec<Option<Unit>>,
    occupants: Vec<Vec<UnitId>>,
}

impl Units {
    pub fn new(square_count: usize) -> Self {
        Self {
            slots: Vec::new(),
            occupants: vec![Vec::new(); square_count],
        }
    }

    pub fn insert(&mut self, body: UnitBody, facing: Direction) -> UnitId {
        let id = UnitId(self.slots.len());
        self.slots.push(Some(Unit {
            square: None,
            facing,
            body,
        }));
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|unit| (UnitId(idx), unit)))
    }

    pub fn occupants(&self, square: SquareId) -> &[UnitId] {
        self.occupants
            .get(square.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Moves a unit onto `to`, leaving its previous square in the same step.
    /// Returns the square it left, if it was placed before.
    pub fn occupy(&mut self, id: UnitId, to: SquareId) -> Option<SquareId> {
        let from = self.leave(id);
        if let Some(unit) = self.get_mut(id) {
            unit.square = Some(to);
            self.occupants[to.index()].push(id);
        }
        from
    }

    /// Takes a unit off the board without removing it from the arena.
    pub fn leave(&mut self, id: UnitId) -> Option<SquareId> {
        let unit = self.slots.get_mut(id.0).and_then(Option::as_mut)?;
        let from = unit.square.take()?;
        self.occupants[from.index()].retain(|other| *other != id);
        Some(from)
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.leave(id);
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Every placed unit is listed exactly once, on its own square.
    pub fn is_consistent(&self) -> bool {
        let mut listed = vec![0usize; self.slots.len()];
        for (sq, ids) in self.occupants.iter().enumerate() {
            for id in ids {
                match self.get(*id) {
                    Some(unit) if unit.square.map(SquareId::index) == Some(sq) => listed[id.0] += 1,
                    _ => return false,
                }
            }
        }
        self.iter()
            .all(|(id, unit)| listed[id.0] == usize::from(unit.square.is_some()))
    }
}
