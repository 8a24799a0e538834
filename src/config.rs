use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::warn;

pub const DEFAULT_TICK_MS: u64 = 70;
pub const DEFAULT_RENDER_FPS: u64 = 120;
pub const DEFAULT_GRID_W: usize = 31;
pub const DEFAULT_GRID_H: usize = 21;
const MIN_GRID_W: usize = 15;
const MIN_GRID_H: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub tick: Duration,
    pub render_fps: u64,
    pub seed: u64,
    pub grid_w: usize,
    pub grid_h: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            render_fps: DEFAULT_RENDER_FPS,
            seed: 0,
            grid_w: DEFAULT_GRID_W,
            grid_h: DEFAULT_GRID_H,
        }
    }
}

impl Settings {
    /// Reads `PACMAN_TICK_MS`, `PACMAN_FPS`, `PACMAN_SEED`, `PACMAN_GRID_W`
    /// and `PACMAN_GRID_H`. Anything missing or unusable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tick_ms = positive(&lookup, "PACMAN_TICK_MS").unwrap_or(DEFAULT_TICK_MS);
        let render_fps = positive(&lookup, "PACMAN_FPS").unwrap_or(DEFAULT_RENDER_FPS);
        let seed = match lookup("PACMAN_SEED") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!("ignoring PACMAN_SEED={raw:?}, not an integer");
                clock_seed()
            }),
            None => clock_seed(),
        };
        let grid_w = positive(&lookup, "PACMAN_GRID_W")
            .map_or(DEFAULT_GRID_W, |w| odd_at_least(w as usize, MIN_GRID_W));
        let grid_h = positive(&lookup, "PACMAN_GRID_H")
            .map_or(DEFAULT_GRID_H, |h| odd_at_least(h as usize, MIN_GRID_H));
        Self {
            tick: Duration::from_millis(tick_ms),
            render_fps,
            seed,
            grid_w,
            grid_h,
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            warn!("ignoring {key}={raw:?}, expected a positive integer");
            None
        }
    }
}

// The maze carves on odd coordinates.
fn odd_at_least(v: usize, min: usize) -> usize {
    let v = v.max(min);
    if v % 2 == 0 {
        v + 1
    } else {
        v
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
