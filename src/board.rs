use crate::error::BoardError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Position in [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Handle into a [`Board`]'s square arena. Only meaningful for the board
/// that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareId(usize);

impl SquareId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terrain {
    Floor,
    Wall,
    /// Pen door: ghosts pass, players don't.
    Gate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traveller {
    Player,
    Ghost,
}

impl Terrain {
    pub fn admits(self, traveller: Traveller) -> bool {
        match self {
            Terrain::Floor => true,
            Terrain::Wall => false,
            Terrain::Gate => traveller == Traveller::Ghost,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Square {
    id: SquareId,
    coord: Coord,
    terrain: Terrain,
    neighbors: [SquareId; 4],
}

impl Square {
    pub fn id(&self) -> SquareId {
        self.id
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn neighbor(&self, dir: Direction) -> SquareId {
        self.neighbors[dir.index()]
    }
}

/// Immutable grid topology. Squares live in a row-major arena and every
/// square has exactly one neighbour per direction; the edges wrap around.
#[derive(Clone, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    squares: Vec<Square>,
}

impl Board {
    pub fn new(width: usize, height: usize, terrain: Vec<Terrain>) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::Empty { width, height });
        }
        let expected = width * height;
        if terrain.len() != expected {
            return Err(BoardError::TerrainMismatch {
                expected,
                actual: terrain.len(),
            });
        }

        let squares = terrain
            .into_iter()
            .enumerate()
            .map(|(idx, terrain)| {
                let coord = Coord::new(idx % width, idx / width);
                let mut neighbors = [SquareId(idx); 4];
                for dir in Direction::ALL {
                    let (dx, dy) = dir.delta();
                    let nx = (coord.x as isize + dx).rem_euclid(width as isize) as usize;
                    let ny = (coord.y as isize + dy).rem_euclid(height as isize) as usize;
                    neighbors[dir.index()] = SquareId(ny * width + nx);
                }
                Square {
                    id: SquareId(idx),
                    coord,
                    terrain,
                    neighbors,
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            squares,
        })
    }

    pub fn from_fn(
        width: usize,
        height: usize,
        mut terrain_at: impl FnMut(Coord) -> Terrain,
    ) -> Result<Self, BoardError> {
        let mut terrain = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                terrain.push(terrain_at(Coord::new(x, y)));
            }
        }
        Self::new(width, height, terrain)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn contains(&self, id: SquareId) -> bool {
        id.0 < self.squares.len()
    }

    pub fn square_at(&self, coord: Coord) -> Result<SquareId, BoardError> {
        if coord.x >= self.width || coord.y >= self.height {
            return Err(BoardError::OutOfRange {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(SquareId(coord.y * self.width + coord.x))
    }

    pub fn square(&self, id: SquareId) -> &Square {
        &self.squares[id.0]
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    pub fn coord(&self, id: SquareId) -> Coord {
        self.square(id).coord
    }

    pub fn terrain(&self, id: SquareId) -> Terrain {
        self.square(id).terrain
    }

    pub fn neighbor(&self, id: SquareId, dir: Direction) -> SquareId {
        self.square(id).neighbor(dir)
    }

    pub fn is_accessible(&self, id: SquareId, traveller: Traveller) -> bool {
        self.terrain(id).admits(traveller)
    }

    /// Follows neighbours `steps` times in one direction, ignoring terrain.
    pub fn ahead(&self, id: SquareId, dir: Direction, steps: usize) -> SquareId {
        (0..steps).fold(id, |sq, _| self.neighbor(sq, dir))
    }
}
