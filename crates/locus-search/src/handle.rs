//! Shared search control block and cross-thread handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use locus_core::Solution;

use crate::context::BestSolution;
use crate::status::SearchStatus;

/// State shared between a running search and external threads.
///
/// Status transitions happen under the status lock so that `stop`, `dispose`
/// and status queries observe them atomically.
pub(crate) struct SearchControl {
    status: Mutex<SearchStatus>,
    stop_requested: AtomicBool,
    dispose_requested: AtomicBool,
}

impl SearchControl {
    pub(crate) fn new() -> Self {
        Self {
            status: Mutex::new(SearchStatus::Idle),
            stop_requested: AtomicBool::new(false),
            dispose_requested: AtomicBool::new(false),
        }
    }

    pub(crate) fn status(&self) -> SearchStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_status(&self, status: SearchStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Attempts the `Idle -> Initializing` transition, clearing any stale
    /// stop request from a previous run.
    pub(crate) fn try_activate(&self) -> Result<(), SearchStatus> {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        match *status {
            SearchStatus::Idle => {
                *status = SearchStatus::Initializing;
                self.stop_requested.store(false, Ordering::SeqCst);
                Ok(())
            }
            other => Err(other),
        }
    }

    pub(crate) fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Requests disposal. An idle search is disposed immediately; an active
    /// one winds down cooperatively and ends up `Disposed` instead of `Idle`.
    pub(crate) fn request_dispose(&self) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        self.dispose_requested.store(true, Ordering::SeqCst);
        self.stop_requested.store(true, Ordering::SeqCst);
        if matches!(*status, SearchStatus::Idle | SearchStatus::Disposed) {
            *status = SearchStatus::Disposed;
        }
    }

    pub(crate) fn dispose_requested(&self) -> bool {
        self.dispose_requested.load(Ordering::SeqCst)
    }
}

/// Cloneable handle for observing and controlling a search from other
/// threads.
///
/// The four operations — [`stop`](SearchHandle::stop),
/// [`dispose`](SearchHandle::dispose), [`status`](SearchHandle::status) and
/// [`best`](SearchHandle::best) — are safe to call at any time; stop and
/// dispose requests are cooperative and take effect at the next step
/// boundary.
pub struct SearchHandle<S: Solution> {
    name: Arc<str>,
    control: Arc<SearchControl>,
    best: Arc<Mutex<Option<BestSolution<S>>>>,
}

impl<S: Solution> Clone for SearchHandle<S> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            control: Arc::clone(&self.control),
            best: Arc::clone(&self.best),
        }
    }
}

impl<S: Solution> SearchHandle<S> {
    pub(crate) fn new(
        name: Arc<str>,
        control: Arc<SearchControl>,
        best: Arc<Mutex<Option<BestSolution<S>>>>,
    ) -> Self {
        Self {
            name,
            control,
            best,
        }
    }

    /// Returns the name of the search this handle observes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current search status.
    pub fn status(&self) -> SearchStatus {
        self.control.status()
    }

    /// Requests a cooperative stop.
    pub fn stop(&self) {
        self.control.request_stop();
    }

    /// Requests disposal; idempotent and terminal.
    pub fn dispose(&self) {
        self.control.request_dispose();
    }

    /// Returns a snapshot of the best solution found so far.
    pub fn best(&self) -> Option<BestSolution<S>> {
        self.best
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the best solution found so far.
    pub fn best_solution(&self) -> Option<S> {
        self.best().map(|best| best.solution)
    }
}
