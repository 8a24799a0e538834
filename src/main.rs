mod render;

use std::error::Error;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pacman_engine::{
    maze, DefaultPointCalculator, Direction, GhostFactory, Level, LevelEvent, LevelFactory,
    LevelRunner, Settings, TerminalSprites,
};

use render::{Frame, Renderer};

const GHOST_RELEASE_INTERVAL: u32 = 30;
const INPUT_HOLD_MS: u64 = 160;

fn main() -> io::Result<()> {
    env_logger::init();
    let settings = Settings::from_env();
    log::info!("seed {} grid {}x{}", settings.seed, settings.grid_w, settings.grid_h);
    let runner = build_runner(&settings)?;
    let (tx, rx) = mpsc::channel();
    runner.with_level_mut(|level| {
        level.add_observer(move |event: &LevelEvent| {
            let _ = tx.send(*event);
        })
    });

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &runner, &rx, &settings);
    runner.stop();

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn build_runner(settings: &Settings) -> io::Result<LevelRunner> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let maze =
        maze::generate(&mut rng, settings.grid_w, settings.grid_h).map_err(setup_error)?;

    let sprites = TerminalSprites;
    let points = Arc::new(DefaultPointCalculator);
    let mut factory =
        LevelFactory::new(&sprites, GhostFactory::new(&sprites), points).with_seed(settings.seed);
    let ghosts = maze
        .ghost_spawns
        .iter()
        .zip(0u32..)
        .map(|(sq, i)| {
            let ghost = factory.create_ghost();
            (ghost.with_release_delay(i * GHOST_RELEASE_INTERVAL), *sq)
        })
        .collect();
    let pellets = maze
        .pellets
        .iter()
        .map(|sq| (factory.create_pellet(), *sq))
        .chain(maze.power_pellets.iter().map(|sq| (factory.create_power_pellet(), *sq)))
        .collect();

    let mut level = factory
        .create_level(maze.board, ghosts, pellets, maze.player_starts)
        .map_err(setup_error)?;
    level.register_player(factory.create_player()).map_err(setup_error)?;
    Ok(LevelRunner::new(level, settings.tick))
}

fn setup_error(err: impl Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

fn run(
    stdout: &mut Stdout,
    runner: &LevelRunner,
    events: &Receiver<LevelEvent>,
    settings: &Settings,
) -> io::Result<()> {
    let sprites = TerminalSprites;
    let mut renderer = Renderer::default();
    let mut last_seen: [Option<Instant>; 4] = [None; 4];
    let mut last_pressed: Option<Direction> = None;
    let mut last_step = Instant::now();
    let frame_time = settings.frame_time();

    runner.start()?;
    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('p') => {
                    if runner.with_level(Level::is_in_progress) {
                        runner.stop();
                    } else {
                        runner.start()?;
                    }
                }
                code => {
                    if let Some(dir) = dir_for_key(code) {
                        last_seen[dir.index()] = Some(Instant::now());
                        last_pressed = Some(dir);
                    }
                }
            }
        }

        if last_step.elapsed() >= settings.tick {
            last_step = Instant::now();
            if let Some(dir) = active_dir_recent(&last_seen, last_pressed) {
                runner.move_player(dir);
            }
        }

        let banner = events.try_iter().find_map(|event| match event {
            LevelEvent::Won => Some("LEVEL CLEARED"),
            LevelEvent::Lost => Some("GAME OVER"),
            _ => None,
        });
        let frame = runner.with_level(|level| Frame::capture(level, &sprites));
        renderer.draw(stdout, frame)?;
        if let Some(banner) = banner {
            let score = runner.with_level(Level::current_score);
            let text = format!("{banner} - Final Score: {score} (press q to quit)");
            renderer.draw_banner(stdout, &text)?;
            return wait_for_quit();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn wait_for_quit() -> io::Result<()> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc);
                if key.kind == KeyEventKind::Press && quit {
                    return Ok(());
                }
            }
        }
    }
}

fn dir_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('k') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('h') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

// A direction stays active for a short while after its key was last seen,
// since terminals only report key repeats, not key holds.
fn active_dir_recent(
    last_seen: &[Option<Instant>; 4],
    last_pressed: Option<Direction>,
) -> Option<Direction> {
    let now = Instant::now();
    let hold = Duration::from_millis(INPUT_HOLD_MS);
    let fresh =
        |dir: Direction| last_seen[dir.index()].filter(|t| now.duration_since(*t) <= hold);

    if let Some(dir) = last_pressed.filter(|dir| fresh(*dir).is_some()) {
        return Some(dir);
    }
    Direction::ALL
        .into_iter()
        .filter_map(|dir| fresh(dir).map(|t| (dir, t)))
        .max_by_key(|(_, t)| *t)
        .map(|(dir, _)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_pressed_wins_while_fresh() {
        let now = Instant::now();
        let seen = [Some(now), None, Some(now), None];
        assert_eq!(active_dir_recent(&seen, Some(Direction::Left)), Some(Direction::Left));
    }

    #[test]
    fn stale_keys_release_the_player() {
        let old = Instant::now().checked_sub(Duration::from_secs(1));
        let seen = [old, None, None, None];
        assert_eq!(active_dir_recent(&seen, Some(Direction::Up)), None);
    }

    #[test]
    fn vim_and_arrow_keys_map_to_directions() {
        assert_eq!(dir_for_key(KeyCode::Char('h')), Some(Direction::Left));
        assert_eq!(dir_for_key(KeyCode::Down), Some(Direction::Down));
        assert_eq!(dir_for_key(KeyCode::Char('x')), None);
    }
}
