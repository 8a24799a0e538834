#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use pacman_engine::{
    Board, Coord, DefaultPointCalculator, GhostFactory, Level, LevelEvent, LevelFactory, SquareId,
    Terrain, TerminalSprites,
};

/// A board drawn in ASCII: `#` wall, `=` gate, `.` pellet, `P` player start,
/// `G` ghost. Every other character is open floor.
pub struct Layout {
    pub board: Board,
    pub pellets: Vec<SquareId>,
    pub ghosts: Vec<SquareId>,
    pub starts: Vec<SquareId>,
}

pub fn parse(rows: &[&str]) -> Layout {
    let height = rows.len();
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    let cells: Vec<Vec<char>> = rows.iter().map(|row| row.chars().collect()).collect();
    let glyph = |x: usize, y: usize| cells[y].get(x).copied().unwrap_or(' ');

    let board = Board::from_fn(width, height, |c| match glyph(c.x, c.y) {
        '#' => Terrain::Wall,
        '=' => Terrain::Gate,
        _ => Terrain::Floor,
    })
    .unwrap();

    let mut layout = Layout {
        pellets: Vec::new(),
        ghosts: Vec::new(),
        starts: Vec::new(),
        board,
    };
    for y in 0..height {
        for x in 0..width {
            let sq = layout.board.square_at(Coord::new(x, y)).unwrap();
            match glyph(x, y) {
                '.' => layout.pellets.push(sq),
                'G' => layout.ghosts.push(sq),
                'P' => layout.starts.push(sq),
                _ => {}
            }
        }
    }
    layout
}

pub fn factory() -> LevelFactory {
    let store = TerminalSprites;
    let points = Arc::new(DefaultPointCalculator);
    LevelFactory::new(&store, GhostFactory::new(&store), points).with_seed(7)
}

/// Builds a level with factory-made units and a registered player.
pub fn level(rows: &[&str]) -> Level {
    level_with_pellets_under_player(rows, false)
}

/// Same as [`level`], optionally with a pellet on every start square.
pub fn level_with_pellets_under_player(rows: &[&str], under_player: bool) -> Level {
    let layout = parse(rows);
    let mut factory = factory();
    let ghosts = layout.ghosts.iter().map(|sq| (factory.create_ghost(), *sq)).collect();
    let mut pellet_squares = layout.pellets.clone();
    if under_player {
        pellet_squares.extend(&layout.starts);
    }
    let pellets = pellet_squares.iter().map(|sq| (factory.create_pellet(), *sq)).collect();
    let mut level = factory.create_level(layout.board, ghosts, pellets, layout.starts).unwrap();
    level.register_player(factory.create_player()).unwrap();
    level
}

pub fn record(level: &mut Level) -> Arc<Mutex<Vec<LevelEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    level.add_observer(move |event: &LevelEvent| sink.lock().unwrap().push(*event));
    events
}
