//! Simulated cleaning runs.
//!
//! There is no cleaning engine behind this prototype: a run invents result
//! rows from the enabled options, sleeping between rows to imitate disk I/O.
//! Runs happen on a worker thread that only talks to its owner through a
//! channel, so the UI keeps sole ownership of its result list.

use std::fmt;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::ScourError;
use crate::options::OptionTree;
use crate::results::{ResultAction, ResultRow};
use crate::whitelist::Whitelist;

const MAX_FILE_NUMBER: u32 = 100;
const MAX_FILE_SIZE: u64 = 10_000;
const ERROR_RATE: f64 = 0.05;
const DELETED_RATE: f64 = 0.15;
const MIN_DELAY_SECS: f64 = 0.01;
const MAX_DELAY_SECS: f64 = 0.2;
const PREVIEW_SPEEDUP: f64 = 10.0;
/// Largest accepted `delay_scale`.
pub const MAX_DELAY_SCALE: f64 = 100.0;
/// Sleeps are cut into slices this long so an abort is noticed quickly.
const ABORT_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Preview,
    Clean,
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::Preview => write!(f, "preview"),
            RunKind::Clean => write!(f, "clean"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub min_files: usize,
    pub max_files: usize,
    pub delay_scale: f64,
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            min_files: 5,
            max_files: 50,
            delay_scale: 1.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub kind: RunKind,
    pub rows: usize,
    pub bytes: u64,
    pub aborted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Row(ResultRow),
    Finished(RunSummary),
}

/// Produces fake result rows for the enabled options of a tree.
#[derive(Debug, Clone)]
pub struct Generator {
    settings: GeneratorSettings,
    home: PathBuf,
    options: Vec<(String, String)>,
    whitelist: Whitelist,
}

impl Generator {
    /// Snapshot the enabled options and whitelist; later changes to either do
    /// not affect this generator.
    pub fn new(
        settings: GeneratorSettings,
        tree: &OptionTree,
        whitelist: &Whitelist,
        home: impl Into<PathBuf>,
    ) -> Self {
        let options = tree
            .enabled_items()
            .into_iter()
            .map(|(cleaner, option)| (cleaner.to_string(), option.to_string()))
            .collect();
        Self {
            settings,
            home: home.into(),
            options,
            whitelist: whitelist.clone(),
        }
    }

    /// Like [`Generator::new`], rooted at the current user's home directory.
    pub fn for_current_user(
        settings: GeneratorSettings,
        tree: &OptionTree,
        whitelist: &Whitelist,
    ) -> Result<Self, ScourError> {
        let home = Config::home_dir()?;
        Ok(Self::new(settings, tree, whitelist, home))
    }

    fn rng(&self) -> StdRng {
        match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn make_row(&self, rng: &mut StdRng, kind: RunKind) -> Option<ResultRow> {
        let (cleaner, option) = self.options.choose(rng)?;
        let number = rng.gen_range(0..=MAX_FILE_NUMBER).to_string();
        let filename = if option == "Cache" {
            self.home.join(".cache").join(cleaner).join(number)
        } else {
            self.home
                .join(".config")
                .join(cleaner)
                .join(option)
                .join(number)
        };
        let size = rng.gen_range(0..=MAX_FILE_SIZE);
        let roll: f64 = rng.gen_range(0.0..1.0);
        let action = match kind {
            RunKind::Preview => ResultAction::None,
            RunKind::Clean if roll < ERROR_RATE => ResultAction::Error,
            RunKind::Clean if roll < DELETED_RATE => ResultAction::Deleted,
            RunKind::Clean => ResultAction::Shred,
        };
        Some(ResultRow {
            cleaner: cleaner.clone(),
            option: option.clone(),
            filename,
            size,
            action,
        })
    }

    fn delay(&self, rng: &mut StdRng, kind: RunKind) -> Duration {
        let mut secs = rng.gen_range(MIN_DELAY_SECS..MAX_DELAY_SECS);
        if kind == RunKind::Preview {
            secs /= PREVIEW_SPEEDUP;
        }
        let scale = self.settings.delay_scale.min(MAX_DELAY_SCALE);
        Duration::try_from_secs_f64(secs * scale).unwrap_or(Duration::ZERO)
    }

    /// Run to completion on the current thread, handing each row to `sink`.
    ///
    /// Stops early when `abort` is set or `sink` breaks.
    pub fn run<F>(&self, kind: RunKind, abort: &AtomicBool, mut sink: F) -> RunSummary
    where
        F: FnMut(ResultRow) -> ControlFlow<()>,
    {
        let mut rng = self.rng();
        let mut summary = RunSummary {
            kind,
            rows: 0,
            bytes: 0,
            aborted: false,
        };

        if self.options.is_empty() {
            tracing::info!(%kind, "no options enabled, nothing to do");
            return summary;
        }

        let low = self.settings.min_files.min(self.settings.max_files);
        let high = self.settings.min_files.max(self.settings.max_files);
        let count = rng.gen_range(low..=high);
        tracing::info!(%kind, count, "run started");

        for _ in 0..count {
            if abort.load(Ordering::Relaxed) {
                summary.aborted = true;
                break;
            }
            let delay = self.delay(&mut rng, kind);
            let Some(row) = self.make_row(&mut rng, kind) else {
                break;
            };
            if !pause(delay, abort) {
                summary.aborted = true;
                break;
            }
            if self.whitelist.contains(&row.filename) {
                tracing::debug!(path = %row.filename.display(), "skipping whitelisted file");
                continue;
            }
            summary.rows += 1;
            summary.bytes += row.size;
            if sink(row).is_break() {
                summary.aborted = true;
                break;
            }
        }

        if summary.aborted {
            tracing::warn!(%kind, rows = summary.rows, "run aborted");
        } else {
            tracing::info!(%kind, rows = summary.rows, bytes = summary.bytes, "run finished");
        }
        summary
    }

    /// Start a run on a worker thread.
    pub fn spawn(self, kind: RunKind) -> Result<RunHandle, ScourError> {
        let (tx, rx) = mpsc::channel();
        let abort = Arc::new(AtomicBool::new(false));
        let worker_abort = Arc::clone(&abort);

        let thread = thread::Builder::new()
            .name(format!("scour-{kind}"))
            .spawn(move || {
                let summary = self.run(kind, &worker_abort, |row| {
                    match tx.send(WorkerEvent::Row(row)) {
                        Ok(()) => ControlFlow::Continue(()),
                        Err(_) => ControlFlow::Break(()),
                    }
                });
                let _ = tx.send(WorkerEvent::Finished(summary));
            })?;

        Ok(RunHandle {
            kind,
            rx,
            abort,
            thread: Some(thread),
            rows: 0,
            bytes: 0,
            finished: false,
        })
    }
}

/// Sleep for `delay`, waking early when `abort` is set. Returns false if the
/// run was aborted.
fn pause(delay: Duration, abort: &AtomicBool) -> bool {
    let mut left = delay;
    while !left.is_zero() {
        if abort.load(Ordering::Relaxed) {
            return false;
        }
        let slice = left.min(ABORT_POLL);
        thread::sleep(slice);
        left -= slice;
    }
    !abort.load(Ordering::Relaxed)
}

/// Owner side of a running worker.
///
/// Dropping the handle aborts the run.
pub struct RunHandle {
    kind: RunKind,
    rx: Receiver<WorkerEvent>,
    abort: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    rows: usize,
    bytes: u64,
    finished: bool,
}

impl RunHandle {
    pub fn kind(&self) -> RunKind {
        self.kind
    }

    /// Ask the worker to stop before its next row.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn is_aborting(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Events that arrived since the last call, without blocking.
    ///
    /// A worker that died without reporting is treated as an aborted run, so
    /// the returned events always end in `Finished` once the worker is gone.
    pub fn drain(&mut self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        while !self.finished {
            match self.rx.try_recv() {
                Ok(event) => {
                    match &event {
                        WorkerEvent::Row(row) => {
                            self.rows += 1;
                            self.bytes += row.size;
                        }
                        WorkerEvent::Finished(_) => self.finished = true,
                    }
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!(kind = %self.kind, "worker exited without finishing");
                    self.finished = true;
                    events.push(WorkerEvent::Finished(RunSummary {
                        kind: self.kind,
                        rows: self.rows,
                        bytes: self.bytes,
                        aborted: true,
                    }));
                }
            }
        }
        events
    }

    /// Block until the worker finishes, returning all remaining rows.
    pub fn wait(mut self) -> (Vec<ResultRow>, Option<RunSummary>) {
        let mut rows = Vec::new();
        let mut summary = None;
        for event in self.rx.iter() {
            match event {
                WorkerEvent::Row(row) => rows.push(row),
                WorkerEvent::Finished(s) => {
                    summary = Some(s);
                    break;
                }
            }
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        (rows, summary)
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.abort();
    }
}
