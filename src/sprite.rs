use crossterm::style::Color;

use crate::board::{Direction, Terrain};
use crate::ghost::GhostKind;

/// A terminal glyph, at most two columns wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub glyph: &'static str,
    pub color: Color,
}

impl Sprite {
    pub const fn new(glyph: &'static str, color: Color) -> Self {
        Self { glyph, color }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalSprite([Sprite; 4]);

impl DirectionalSprite {
    pub fn uniform(sprite: Sprite) -> Self {
        Self([sprite; 4])
    }

    pub fn from_fn(mut f: impl FnMut(Direction) -> Sprite) -> Self {
        Self(Direction::ALL.map(|dir| f(dir)))
    }

    pub fn facing(&self, dir: Direction) -> Sprite {
        self.0[dir.index()]
    }
}

/// Asset lookup consulted by the factories when they are built.
pub trait SpriteStore {
    fn player_sprite(&self) -> DirectionalSprite;
    fn ghost_sprite(&self, kind: GhostKind) -> DirectionalSprite;
    fn frightened_ghost_sprite(&self) -> Sprite;
    fn pellet_sprite(&self) -> Sprite;
    fn power_pellet_sprite(&self) -> Sprite;
    fn terrain_sprite(&self, terrain: Terrain) -> Sprite;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalSprites;

impl SpriteStore for TerminalSprites {
    fn player_sprite(&self) -> DirectionalSprite {
        DirectionalSprite::from_fn(|dir| {
            let glyph = match dir {
                Direction::Up => "ᗢ",
                Direction::Down => "ᗣ",
                Direction::Left => "ᗤ",
                Direction::Right => "ᗧ",
            };
            Sprite::new(glyph, Color::Yellow)
        })
    }

    fn ghost_sprite(&self, kind: GhostKind) -> DirectionalSprite {
        let color = match kind {
            GhostKind::Blinky | GhostKind::Random => Color::Red,
            GhostKind::Inky => Color::Cyan,
            GhostKind::Pinky => Color::Magenta,
            GhostKind::Clyde => Color::DarkYellow,
        };
        DirectionalSprite::uniform(Sprite::new("👻", color))
    }

    fn frightened_ghost_sprite(&self) -> Sprite {
        Sprite::new("😱", Color::Blue)
    }

    fn pellet_sprite(&self) -> Sprite {
        Sprite::new("· ", Color::White)
    }

    fn power_pellet_sprite(&self) -> Sprite {
        Sprite::new("● ", Color::Magenta)
    }

    fn terrain_sprite(&self, terrain: Terrain) -> Sprite {
        match terrain {
            Terrain::Wall => Sprite::new("██", Color::Blue),
            Terrain::Gate => Sprite::new("==", Color::Cyan),
            Terrain::Floor => Sprite::new("  ", Color::Reset),
        }
    }
}
