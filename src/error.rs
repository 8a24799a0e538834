use thiserror::Error;

use crate::board::SquareId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    Empty { width: usize, height: usize },
    #[error("expected {expected} terrain cells for the board, got {actual}")]
    TerrainMismatch { expected: usize, actual: usize },
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("a level needs at least one player start position")]
    NoStartPositions,
    #[error("square {0:?} does not belong to this board")]
    UnknownSquare(SquareId),
    #[error("start square {0:?} is not accessible to the player")]
    InaccessibleStart(SquareId),
    #[error("square {0:?} is a wall and cannot hold a unit")]
    BlockedPlacement(SquareId),
    #[error("a player is already registered on this level")]
    PlayerAlreadyRegistered,
    #[error(transparent)]
    Board(#[from] BoardError),
}
