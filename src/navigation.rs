//! Breadth-first searches over a [`Board`].

use std::collections::VecDeque;

use crate::board::{Board, Direction, SquareId, Traveller};

/// Expansion order; the first direction wins when two paths tie.
const PREFERENCE: [Direction; 4] =
    [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

/// Step counts from `start` to every square, `None` where unreachable.
pub fn distances(board: &Board, start: SquareId, traveller: Traveller) -> Vec<Option<u32>> {
    let mut dist = vec![None; board.len()];
    let mut q = VecDeque::new();
    dist[start.index()] = Some(0);
    q.push_back(start);

    while let Some(sq) = q.pop_front() {
        let base = dist[sq.index()].unwrap_or(0);
        for dir in PREFERENCE {
            let next = board.neighbor(sq, dir);
            if !board.is_accessible(next, traveller) || dist[next.index()].is_some() {
                continue;
            }
            dist[next.index()] = Some(base + 1);
            q.push_back(next);
        }
    }
    dist
}

pub fn path_length(
    board: &Board,
    from: SquareId,
    to: SquareId,
    traveller: Traveller,
) -> Option<u32> {
    distances(board, from, traveller)[to.index()]
}

/// First direction along a shortest path from `from` to the reachable square
/// nearest (Manhattan) to `target`. The target may lie on a wall or off the
/// board. Returns `None` when `from` already is the nearest square.
pub fn first_step_towards(
    board: &Board,
    from: SquareId,
    target: (isize, isize),
    traveller: Traveller,
) -> Option<Direction> {
    let mut first: Vec<Option<Option<Direction>>> = vec![None; board.len()];
    let mut q = VecDeque::new();
    first[from.index()] = Some(None);
    q.push_back(from);

    let mut best = (manhattan(board, from, target), None);
    while let Some(sq) = q.pop_front() {
        let via = first[sq.index()].flatten();
        let d = manhattan(board, sq, target);
        if d < best.0 {
            best = (d, via);
        }
        for dir in PREFERENCE {
            let next = board.neighbor(sq, dir);
            if !board.is_accessible(next, traveller) || first[next.index()].is_some() {
                continue;
            }
            first[next.index()] = Some(via.or(Some(dir)));
            q.push_back(next);
        }
    }
    best.1
}

pub fn first_step_to(
    board: &Board,
    from: SquareId,
    to: SquareId,
    traveller: Traveller,
) -> Option<Direction> {
    let c = board.coord(to);
    first_step_towards(board, from, (c.x as isize, c.y as isize), traveller)
}

fn manhattan(board: &Board, sq: SquareId, target: (isize, isize)) -> usize {
    let c = board.coord(sq);
    ((c.x as isize - target.0).abs() + (c.y as isize - target.1).abs()) as usize
}
