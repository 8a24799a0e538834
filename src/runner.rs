//! Fixed-period tick scheduler around a [`Level`].

use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::board::Direction;
use crate::level::Level;

struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn is_live(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    fn retire(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.handle.thread().unpark();
    }
}

/// The level plus who currently holds its lock. Observers run with the lock
/// held, so a pause asked for from inside one is parked in `pause_requested`
/// and applied when the holder lets go.
struct Shared {
    level: Mutex<Level>,
    holder: Mutex<Option<ThreadId>>,
    pause_requested: AtomicBool,
}

impl Shared {
    fn lock(&self) -> LevelGuard<'_> {
        let guard = lock(&self.level);
        *lock(&self.holder) = Some(thread::current().id());
        LevelGuard {
            shared: self,
            guard,
        }
    }

    fn held_here(&self) -> bool {
        *lock(&self.holder) == Some(thread::current().id())
    }
}

struct LevelGuard<'a> {
    shared: &'a Shared,
    guard: MutexGuard<'a, Level>,
}

impl Deref for LevelGuard<'_> {
    type Target = Level;

    fn deref(&self) -> &Level {
        &self.guard
    }
}

impl DerefMut for LevelGuard<'_> {
    fn deref_mut(&mut self) -> &mut Level {
        &mut self.guard
    }
}

impl Drop for LevelGuard<'_> {
    fn drop(&mut self) {
        // Stopping notifies observers, which may ask to stop again.
        while self.shared.pause_requested.swap(false, Ordering::SeqCst) {
            self.guard.stop();
        }
        *lock(&self.shared.holder) = None;
    }
}

/// Owns a level behind a mutex and ticks it from a background thread.
/// Player moves take the same lock as the tick, so the two never overlap.
pub struct LevelRunner {
    shared: Arc<Shared>,
    period: Duration,
    worker: Mutex<Option<Worker>>,
}

impl LevelRunner {
    pub fn new(level: Level, period: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                level: Mutex::new(level),
                holder: Mutex::new(None),
                pause_requested: AtomicBool::new(false),
            }),
            period: period.max(Duration::from_millis(1)),
            worker: Mutex::new(None),
        }
    }

    /// Starts or resumes the level and its ticker. No-op if already ticking
    /// or if the level refuses to start. Ignored when called from a level
    /// observer.
    pub fn start(&self) -> io::Result<()> {
        if self.shared.held_here() {
            debug!("start ignored from inside a level observer");
            return Ok(());
        }
        let in_progress = self.shared.lock().is_in_progress();
        let previous = {
            let mut worker = lock(&self.worker);
            if in_progress && worker.as_ref().is_some_and(Worker::is_live) {
                return Ok(());
            }
            worker.take()
        };
        if let Some(previous) = previous {
            previous.retire();
            join(previous);
        }

        self.shared.lock().start();
        if !self.shared.lock().is_in_progress() {
            return Ok(());
        }

        let mut worker = lock(&self.worker);
        if worker.as_ref().is_some_and(Worker::is_live) {
            return Ok(());
        }
        let running = Arc::new(AtomicBool::new(true));
        let handle = {
            let shared = Arc::clone(&self.shared);
            let running = Arc::clone(&running);
            let period = self.period;
            thread::Builder::new()
                .name("level-ticker".into())
                .spawn(move || tick_loop(&shared, &running, period))?
        };
        *worker = Some(Worker { running, handle });
        Ok(())
    }

    /// Halts ticking and pauses the level. Safe from any thread, observers
    /// included, and idempotent; once it returns no further tick runs.
    pub fn stop(&self) {
        let held = self.shared.held_here();
        let worker = lock(&self.worker).take();
        if let Some(worker) = worker {
            worker.retire();
            if held || worker.handle.thread().id() == thread::current().id() {
                // The ticker is parked on the lock we hold, or is us. It
                // sees `running` cleared and exits without another tick.
                debug!("ticker detached from inside a level observer");
            } else {
                join(worker);
            }
        }
        if held {
            self.shared.pause_requested.store(true, Ordering::SeqCst);
        } else {
            self.shared.lock().stop();
        }
    }

    pub fn is_ticking(&self) -> bool {
        lock(&self.worker).as_ref().is_some_and(Worker::is_live)
    }

    pub fn move_player(&self, dir: Direction) -> bool {
        self.shared.lock().move_player(dir)
    }

    pub fn with_level<R>(&self, f: impl FnOnce(&Level) -> R) -> R {
        f(&self.shared.lock())
    }

    pub fn with_level_mut<R>(&self, f: impl FnOnce(&mut Level) -> R) -> R {
        f(&mut self.shared.lock())
    }
}

impl Drop for LevelRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick_loop(shared: &Shared, running: &AtomicBool, period: Duration) {
    let mut next = Instant::now() + period;
    loop {
        let now = Instant::now();
        if now < next {
            thread::park_timeout(next - now);
        }
        if !running.load(Ordering::SeqCst) {
            break;
        }
        if Instant::now() < next {
            continue;
        }
        next += period;

        let mut level = shared.lock();
        if !running.load(Ordering::SeqCst) {
            break;
        }
        level.tick();
        if !level.is_in_progress() {
            debug!("ticker exiting, level is {:?}", level.state());
            break;
        }
    }
}

fn join(worker: Worker) {
    if worker.handle.join().is_err() {
        warn!("level ticker panicked");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
