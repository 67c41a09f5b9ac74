//! Cooperative cancellation and progress reporting for long computations.
//!
//! Brandes' algorithm is `O(V·E)` and closeness is `O(V·(V+E))`; on a dense
//! snapshot either can run for a long time. Engines accept a [`RunControl`]
//! and call its checkpoint between BFS sources (or power-iteration rounds).
//! The checkpoint returns [`Error::Cancelled`] once the token is tripped and
//! otherwise forwards periodic progress to an optional observer.
//!
//! Neither hook is required: `RunControl::default()` never cancels and
//! reports nothing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Shared flag that asks running engines to stop.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Engines stop at their next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Which engine is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Closeness,
    Betweenness,
    Eigenvector,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closeness => "closeness",
            Self::Betweenness => "betweenness",
            Self::Eigenvector => "eigenvector",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer for engine progress.
///
/// `done` counts BFS sources (closeness, betweenness) or iterations
/// (eigenvector); `total` is the number of sources or the iteration cap.
/// Implementations must be cheap; they run on the engine's thread.
pub trait Progress: Sync {
    fn on_progress(&self, stage: Stage, done: usize, total: usize);
}

impl<F> Progress for F
where
    F: Fn(Stage, usize, usize) + Sync,
{
    fn on_progress(&self, stage: Stage, done: usize, total: usize) {
        self(stage, done, total);
    }
}

/// Optional hooks threaded through an engine run.
#[derive(Clone, Copy)]
pub struct RunControl<'a> {
    cancel: Option<&'a CancellationToken>,
    progress: Option<&'a dyn Progress>,
    progress_every: usize,
}

impl Default for RunControl<'_> {
    fn default() -> Self {
        Self {
            cancel: None,
            progress: None,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

impl fmt::Debug for RunControl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunControl")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .field("progress_every", &self.progress_every)
            .finish()
    }
}

/// Default reporting interval, in sources or iterations.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

impl<'a> RunControl<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_cancel(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report every `every` steps and once at completion. `0` is treated as 1.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn Progress, every: usize) -> Self {
        self.progress = Some(progress);
        self.progress_every = every.max(1);
        self
    }

    /// Same hooks, different reporting interval.
    #[must_use]
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Fail fast if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] when the token has been tripped.
    pub fn check(&self, stage: Stage) -> Result<()> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled {
                stage: stage.as_str(),
            });
        }
        Ok(())
    }

    /// Report `done` of `total` steps if due, then check for cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] when the token has been tripped.
    pub fn checkpoint(&self, stage: Stage, done: usize, total: usize) -> Result<()> {
        if let Some(progress) = self.progress {
            if done % self.progress_every == 0 || done == total {
                progress.on_progress(stage, done, total);
            }
        }
        self.check(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn default_control_never_cancels() {
        let control = RunControl::default();
        assert!(control.check(Stage::Closeness).is_ok());
        assert!(control.checkpoint(Stage::Betweenness, 5, 10).is_ok());
    }

    #[test]
    fn tripped_token_cancels_every_clone() {
        let token = CancellationToken::new();
        let clone = token.clone();
        let control = RunControl::new().with_cancel(&clone);

        assert!(control.check(Stage::Eigenvector).is_ok());
        token.cancel();
        let err = control.check(Stage::Eigenvector).expect_err("cancelled");
        assert!(matches!(err, Error::Cancelled { stage: "eigenvector" }));
    }

    #[test]
    fn progress_fires_on_interval_and_completion() {
        let calls = Mutex::new(Vec::new());
        let observer = |stage: Stage, done: usize, total: usize| {
            calls.lock().expect("lock").push((stage, done, total));
        };
        let control = RunControl::new().with_progress(&observer, 4);

        for done in 1..=10 {
            control
                .checkpoint(Stage::Betweenness, done, 10)
                .expect("not cancelled");
        }

        let calls = calls.into_inner().expect("lock");
        let dones: Vec<usize> = calls.iter().map(|(_, d, _)| *d).collect();
        assert_eq!(dones, vec![4, 8, 10]);
        assert!(calls.iter().all(|(s, _, t)| *s == Stage::Betweenness && *t == 10));
    }

    #[test]
    fn zero_interval_reports_every_step() {
        let count = Mutex::new(0usize);
        let observer = |_: Stage, _: usize, _: usize| {
            *count.lock().expect("lock") += 1;
        };
        let control = RunControl::new().with_progress(&observer, 0);
        for done in 1..=3 {
            control
                .checkpoint(Stage::Closeness, done, 3)
                .expect("not cancelled");
        }
        assert_eq!(count.into_inner().expect("lock"), 3);
    }

    #[test]
    fn changing_interval_keeps_the_token() {
        let token = CancellationToken::new();
        token.cancel();
        let control = RunControl::new().with_cancel(&token).with_progress_every(10);
        assert!(control.check(Stage::Closeness).is_err());
    }
}
