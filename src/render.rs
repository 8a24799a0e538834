use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use pacman_engine::{Level, LevelState, Sprite, SpriteStore, TerminalSprites, UnitBody};

const CELL_W: usize = 2;

/// Everything needed to draw one frame, captured while the level is locked.
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Sprite>,
    hud: String,
}

impl Frame {
    pub fn capture(level: &Level, sprites: &TerminalSprites) -> Self {
        let board = level.board();
        let powered = level.player().is_some_and(|p| p.is_powered());
        let cells = board
            .squares()
            .map(|square| {
                let mut top: Option<(u8, Sprite)> = None;
                for id in level.occupants(square.id()) {
                    let Some(unit) = level.unit(*id) else {
                        continue;
                    };
                    let candidate = match unit.body() {
                        UnitBody::Player(_) => (3, unit.sprite()),
                        UnitBody::Ghost(_) if powered => (2, sprites.frightened_ghost_sprite()),
                        UnitBody::Ghost(_) => (2, unit.sprite()),
                        UnitBody::Pellet(_) => (1, unit.sprite()),
                    };
                    if top.map_or(true, |(rank, _)| candidate.0 > rank) {
                        top = Some(candidate);
                    }
                }
                top.map_or_else(|| sprites.terrain_sprite(square.terrain()), |(_, sprite)| sprite)
            })
            .collect();

        let state = match level.state() {
            LevelState::NotStarted => "ready",
            LevelState::InProgress => "playing",
            LevelState::Paused => "paused",
            LevelState::Won => "cleared",
            LevelState::Lost => "caught",
        };
        let hud = format!(
            "Score: {}  Pellets: {}  Power: {}  [{}]  (p pause, q quit)",
            level.current_score(),
            level.remaining_pellet_count(),
            level.player().map_or(0, |p| p.power_ticks()),
            state
        );
        Self {
            width: board.width(),
            height: board.height(),
            cells,
            hud,
        }
    }

    /// Cells that differ from `previous` as `(x, y, sprite)`. Without a
    /// previous frame of the same size, every cell counts as changed.
    fn changes<'a>(
        &'a self,
        previous: Option<&'a Frame>,
    ) -> impl Iterator<Item = (usize, usize, Sprite)> + 'a {
        let previous = previous.filter(|p| (p.width, p.height) == (self.width, self.height));
        self.cells
            .iter()
            .enumerate()
            .filter(move |(idx, cell)| previous.map_or(true, |p| p.cells[*idx] != **cell))
            .map(move |(idx, cell)| (idx % self.width, idx / self.width, *cell))
    }

    fn hud_changed(&self, previous: Option<&Frame>) -> bool {
        previous.map_or(true, |p| p.hud != self.hud)
    }
}

/// Draws frames centred in the terminal, touching only what changed since
/// the last frame it drew.
#[derive(Default)]
pub struct Renderer {
    last: Option<Frame>,
    origin: (u16, u16),
}

impl Renderer {
    pub fn draw(&mut self, stdout: &mut Stdout, frame: Frame) -> io::Result<()> {
        let needed = ((frame.width * CELL_W) as u16, (frame.height + 2) as u16);
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed.0 || term_h < needed.1 {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Print(format!(
                "Terminal too small: need {}x{}, have {}x{}.",
                needed.0, needed.1, term_w, term_h
            )))?;
            self.last = None;
            return stdout.flush();
        }

        let origin = ((term_w - needed.0) / 2, (term_h - needed.1) / 2 + 1);
        if origin != self.origin {
            self.origin = origin;
            self.last = None;
        }
        let previous = self.last.as_ref();
        if previous.is_none() {
            stdout.queue(Clear(ClearType::All))?;
        }
        if frame.hud_changed(previous) {
            stdout.queue(MoveTo(self.origin.0, self.origin.1 - 1))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            self.print(stdout, &frame.hud, Color::White)?;
        }
        for (x, y, sprite) in frame.changes(previous) {
            let col = self.origin.0 + (x * CELL_W) as u16;
            stdout.queue(MoveTo(col, self.origin.1 + y as u16))?;
            let pad = CELL_W.saturating_sub(sprite.glyph.width());
            self.print(stdout, &format!("{}{:pad$}", sprite.glyph, ""), sprite.color)?;
        }
        self.last = Some(frame);
        stdout.flush()
    }

    /// Prints `text` on the row under the last drawn board.
    pub fn draw_banner(&mut self, stdout: &mut Stdout, text: &str) -> io::Result<()> {
        let height = self.last.as_ref().map_or(0, |frame| frame.height);
        stdout.queue(MoveTo(self.origin.0, self.origin.1 + height as u16))?;
        self.print(stdout, text, Color::White)?;
        stdout.flush()
    }

    fn print(&self, stdout: &mut Stdout, text: &str, color: Color) -> io::Result<()> {
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(text))?;
        stdout.queue(ResetColor)?;
        Ok(())
    }
}
