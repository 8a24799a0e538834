//! Grid Pac-Man engine: board topology, units and their occupancy, ghost
//! decision strategies, pluggable collision scoring, and the level state
//! machine with its tick scheduler.

pub mod board;
pub mod collision;
pub mod config;
pub mod error;
pub mod factory;
pub mod ghost;
pub mod level;
pub mod maze;
pub mod navigation;
pub mod pellet;
pub mod player;
pub mod points;
pub mod runner;
pub mod sprite;
pub mod unit;

pub use board::{Board, Coord, Direction, Square, SquareId, Terrain, Traveller};
pub use collision::{CollisionEffect, CollisionMap, Collider, PlayerCollisions};
pub use config::Settings;
pub use error::{BoardError, LevelError};
pub use factory::{GhostFactory, LevelFactory};
pub use ghost::{Ghost, GhostAi, GhostKind, LevelView};
pub use level::{Level, LevelEvent, LevelObserver, LevelState, ObserverId};
pub use pellet::Pellet;
pub use player::Player;
pub use points::{DefaultPointCalculator, PointCalculator};
pub use runner::LevelRunner;
pub use sprite::{DirectionalSprite, Sprite, SpriteStore, TerminalSprites};
pub use unit::{Unit, UnitBody, UnitId, Units};
