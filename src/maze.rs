//! Random maze boards for the terminal game. Stands in for a level loader:
//! it hands the engine a finished board plus where everything starts.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Coord, Direction, SquareId, Terrain};
use crate::error::BoardError;

const PEN_W: usize = 9;
const PEN_H: usize = 5;
const BRAID_CHANCE: f32 = 0.45;
const EXTRA_OPENINGS: f32 = 0.08;
const GHOST_SPAWNS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PenBounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl PenBounds {
    fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    fn interior(&self, x: usize, y: usize) -> bool {
        x > self.x0 && x < self.x1 && y > self.y0 && y < self.y1
    }
}

#[derive(Clone, Debug)]
pub struct Maze {
    pub board: Board,
    pub ghost_spawns: Vec<SquareId>,
    pub pellets: Vec<SquareId>,
    pub power_pellets: Vec<SquareId>,
    pub player_starts: Vec<SquareId>,
}

struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Terrain>,
}

impl Grid {
    fn get(&self, x: usize, y: usize) -> Terrain {
        self.tiles[y * self.width + x]
    }

    fn set(&mut self, x: usize, y: usize, terrain: Terrain) {
        self.tiles[y * self.width + x] = terrain;
    }

    fn carve_cell(&mut self, cx: usize, cy: usize) {
        self.set(cx * 2 + 1, cy * 2 + 1, Terrain::Floor);
    }

    fn wall_between(cx: usize, cy: usize, nx: usize, ny: usize) -> (usize, usize) {
        (cx + nx + 1, cy + ny + 1)
    }

    fn carve_between(&mut self, cx: usize, cy: usize, nx: usize, ny: usize) {
        let (wx, wy) = Self::wall_between(cx, cy, nx, ny);
        self.set(wx, wy, Terrain::Floor);
    }

    fn open_between(&self, cx: usize, cy: usize, nx: usize, ny: usize) -> bool {
        let (wx, wy) = Self::wall_between(cx, cy, nx, ny);
        self.get(wx, wy) != Terrain::Wall
    }
}

/// Cell-space neighbours of `(cx, cy)`, each with the direction taken.
fn cell_neighbors(
    cx: usize,
    cy: usize,
    cells_w: usize,
    cells_h: usize,
) -> Vec<(Direction, usize, usize)> {
    Direction::ALL
        .into_iter()
        .filter_map(|dir| {
            let (dx, dy) = dir.delta();
            let nx = cx.checked_add_signed(dx)?;
            let ny = cy.checked_add_signed(dy)?;
            (nx < cells_w && ny < cells_h).then_some((dir, nx, ny))
        })
        .collect()
}

/// Width and height are rounded up to odd values of at least 11x9.
pub fn generate(rng: &mut impl Rng, width: usize, height: usize) -> Result<Maze, BoardError> {
    let width = (width.max(11)) | 1;
    let height = (height.max(9)) | 1;
    let mut grid = Grid {
        width,
        height,
        tiles: vec![Terrain::Wall; width * height],
    };
    let cells_w = (width - 1) / 2;
    let cells_h = (height - 1) / 2;

    carve_spanning_tree(&mut grid, cells_w, cells_h, rng);
    braid(&mut grid, cells_w, cells_h, rng);
    let pen = carve_pen(&mut grid);

    let board = Board::new(width, height, grid.tiles.clone())?;
    let corners = [
        Coord::new(1, 1),
        Coord::new(width - 2, 1),
        Coord::new(1, height - 2),
        Coord::new(width - 2, height - 2),
    ];
    let mut power_pellets = Vec::new();
    for corner in corners {
        let sq = board.square_at(corner)?;
        if board.terrain(sq) == Terrain::Floor {
            power_pellets.push(sq);
        }
    }

    let mut pellets = Vec::new();
    let mut ghost_spawns = Vec::new();
    for square in board.squares() {
        let Coord { x, y } = square.coord();
        if square.terrain() != Terrain::Floor {
            continue;
        }
        if pen.interior(x, y) {
            if ghost_spawns.len() < GHOST_SPAWNS {
                ghost_spawns.push(square.id());
            }
        } else if !pen.contains(x, y) && !power_pellets.contains(&square.id()) {
            pellets.push(square.id());
        }
    }

    let mut player_starts = pellets.clone();
    player_starts.shuffle(rng);
    player_starts.truncate(1);

    Ok(Maze {
        board,
        ghost_spawns,
        pellets,
        power_pellets,
        player_starts,
    })
}

// Randomised Prim over the odd-coordinate cells.
fn carve_spanning_tree(grid: &mut Grid, cells_w: usize, cells_h: usize, rng: &mut impl Rng) {
    let mut in_maze = vec![false; cells_w * cells_h];
    let mut frontier = Vec::new();

    let start = (rng.gen_range(0..cells_w), rng.gen_range(0..cells_h));
    in_maze[start.1 * cells_w + start.0] = true;
    grid.carve_cell(start.0, start.1);
    frontier.extend(
        cell_neighbors(start.0, start.1, cells_w, cells_h)
            .into_iter()
            .map(|(_, x, y)| (x, y)),
    );

    while !frontier.is_empty() {
        let (cx, cy) = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        if in_maze[cy * cells_w + cx] {
            continue;
        }
        let (inside, outside): (Vec<_>, Vec<_>) = cell_neighbors(cx, cy, cells_w, cells_h)
            .into_iter()
            .partition(|(_, x, y)| in_maze[y * cells_w + x]);
        let Some(&(_, nx, ny)) = inside.choose(rng) else {
            continue;
        };
        in_maze[cy * cells_w + cx] = true;
        grid.carve_cell(cx, cy);
        grid.carve_between(cx, cy, nx, ny);
        frontier.extend(outside.into_iter().map(|(_, x, y)| (x, y)));
    }
}

// Knocks extra holes so most dead ends become loops.
fn braid(grid: &mut Grid, cells_w: usize, cells_h: usize, rng: &mut impl Rng) {
    for cy in 0..cells_h {
        for cx in 0..cells_w {
            let (open, closed): (Vec<_>, Vec<_>) = cell_neighbors(cx, cy, cells_w, cells_h)
                .into_iter()
                .partition(|(_, nx, ny)| grid.open_between(cx, cy, *nx, *ny));
            if closed.is_empty() {
                continue;
            }
            let dead_end = open.len() == 1;
            if (dead_end && rng.gen::<f32>() < BRAID_CHANCE) || rng.gen::<f32>() < EXTRA_OPENINGS {
                if let Some(&(_, nx, ny)) = closed.choose(rng) {
                    grid.carve_between(cx, cy, nx, ny);
                }
            }
        }
    }
}

// Walled pen in the middle with a gate on top and an open ring around it,
// so cutting the pen out never splits the maze.
fn carve_pen(grid: &mut Grid) -> PenBounds {
    let pen_w = (PEN_W.min(grid.width - 4) - 1) | 1;
    let pen_h = (PEN_H.min(grid.height - 4) - 1) | 1;
    let x0 = (grid.width - pen_w) / 2;
    let y0 = (grid.height - pen_h) / 2;
    let pen = PenBounds {
        x0,
        y0,
        x1: x0 + pen_w - 1,
        y1: y0 + pen_h - 1,
    };

    for y in pen.y0 - 1..=pen.y1 + 1 {
        for x in pen.x0 - 1..=pen.x1 + 1 {
            let terrain = if pen.interior(x, y) || !pen.contains(x, y) {
                Terrain::Floor
            } else {
                Terrain::Wall
            };
            grid.set(x, y, terrain);
        }
    }
    grid.set((pen.x0 + pen.x1) / 2, pen.y0, Terrain::Gate);
    pen
}
