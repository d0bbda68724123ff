// packages/agent/src/host/page.rs
//! The page surface the agent attaches to
//!
//! A [`Page`] is the agent's view of one document lifecycle. The platform
//! binding forwards native signals through the `dispatch_*` / `complete_*`
//! methods and updates ready state and the performance timeline; capture
//! strategies attach listeners through the `on_*` methods.
//!
//! Listeners only ever receive a shared borrow of a signal and return
//! nothing, so no listener can alter what the host page itself sees.

use crate::host::listeners::{ListenerId, ListenerSet};
use crate::host::signals::{ErrorSignal, ReadyState, RejectionSignal, RequestCompletion, ResourceSignal};
use crate::host::timing::PerformanceTimeline;
use parking_lot::{Mutex, RwLock};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

type LoadCallback = Box<dyn FnOnce() + Send>;

/// Handle to one document lifecycle; clones share state
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

struct PageInner {
    location: RwLock<String>,
    lifecycle: Mutex<Lifecycle>,
    performance: RwLock<PerformanceTimeline>,
    errors: ListenerSet<ErrorSignal>,
    rejections: ListenerSet<RejectionSignal>,
    requests: ListenerSet<RequestCompletion>,
    resources: ListenerSet<ResourceSignal>,
}

/// Ready state and pending load callbacks, changed together
#[derive(Default)]
struct Lifecycle {
    ready_state: ReadyState,
    load_callbacks: Vec<LoadCallback>,
}

/// Number of listeners attached per channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerCounts {
    pub errors: usize,
    pub rejections: usize,
    pub requests: usize,
    pub resources: usize,
}

impl ListenerCounts {
    pub fn total(&self) -> usize {
        self.errors + self.rejections + self.requests + self.resources
    }
}

impl Page {
    /// Create a page at `location` in the `loading` state
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PageInner {
                location: RwLock::new(location.into()),
                lifecycle: Mutex::new(Lifecycle::default()),
                performance: RwLock::new(PerformanceTimeline::default()),
                errors: ListenerSet::new(),
                rejections: ListenerSet::new(),
                requests: ListenerSet::new(),
                resources: ListenerSet::new(),
            }),
        }
    }

    pub fn location(&self) -> String {
        self.inner.location.read().clone()
    }

    /// In-page navigation (history API); the lifecycle continues
    pub fn set_location(&self, location: impl Into<String>) {
        *self.inner.location.write() = location.into();
    }

    pub fn ready_state(&self) -> ReadyState {
        self.inner.lifecycle.lock().ready_state
    }

    /// Advance the ready state. Reaching `complete` fires the load signal.
    pub fn set_ready_state(&self, state: ReadyState) {
        if state == ReadyState::Complete {
            self.fire_load();
        } else {
            self.inner.lifecycle.lock().ready_state = state;
        }
    }

    /// Queue a one-shot callback for the load signal.
    ///
    /// Like a `load` listener added after the fact, a callback queued once
    /// the page is already complete never runs; see
    /// [`on_load_or_now`](Self::on_load_or_now).
    pub fn on_load<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lifecycle.lock().load_callbacks.push(Box::new(callback));
    }

    /// Run `callback` now if the page is complete, otherwise queue it for
    /// the load signal. Returns `true` when it ran immediately.
    ///
    /// The state check and the enqueue happen under one lock, so a load
    /// signal fired concurrently cannot slip between them.
    pub fn on_load_or_now<F>(&self, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.ready_state != ReadyState::Complete {
                lifecycle.load_callbacks.push(Box::new(callback));
                return false;
            }
        }

        if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
            warn!("Load callback panicked");
        }
        true
    }

    pub fn pending_load_callbacks(&self) -> usize {
        self.inner.lifecycle.lock().load_callbacks.len()
    }

    /// Mark the document complete and run queued load callbacks.
    ///
    /// Callbacks are drained, so a repeated load signal runs nothing twice.
    pub fn fire_load(&self) -> usize {
        let callbacks = {
            let mut lifecycle = self.inner.lifecycle.lock();
            lifecycle.ready_state = ReadyState::Complete;
            std::mem::take(&mut lifecycle.load_callbacks)
        };
        let count = callbacks.len();
        debug!("Load signal fired with {} callbacks", count);

        for callback in callbacks {
            if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                warn!("Load callback panicked");
            }
        }

        count
    }

    pub fn performance(&self) -> PerformanceTimeline {
        self.inner.performance.read().clone()
    }

    pub fn update_performance<F>(&self, update: F)
    where
        F: FnOnce(&mut PerformanceTimeline),
    {
        update(&mut self.inner.performance.write());
    }

    pub fn on_error<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ErrorSignal) + Send + Sync + 'static,
    {
        self.inner.errors.add(listener)
    }

    pub fn on_rejection<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&RejectionSignal) + Send + Sync + 'static,
    {
        self.inner.rejections.add(listener)
    }

    /// Observe completions of XHR and fetch calls
    pub fn on_request<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&RequestCompletion) + Send + Sync + 'static,
    {
        self.inner.requests.add(listener)
    }

    pub fn on_resource<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ResourceSignal) + Send + Sync + 'static,
    {
        self.inner.resources.add(listener)
    }

    /// Detach a listener from whichever channel it was attached to
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.errors.remove(id)
            || self.inner.rejections.remove(id)
            || self.inner.requests.remove(id)
            || self.inner.resources.remove(id)
    }

    pub fn listener_counts(&self) -> ListenerCounts {
        ListenerCounts {
            errors: self.inner.errors.len(),
            rejections: self.inner.rejections.len(),
            requests: self.inner.requests.len(),
            resources: self.inner.resources.len(),
        }
    }

    /// Uncaught script error reached the global handler
    pub fn dispatch_error(&self, signal: &ErrorSignal) -> usize {
        self.inner.errors.dispatch(signal)
    }

    /// Unhandled promise rejection reached the global handler
    pub fn dispatch_rejection(&self, signal: &RejectionSignal) -> usize {
        self.inner.rejections.dispatch(signal)
    }

    /// An XHR or fetch call settled. The host keeps its own result untouched.
    pub fn complete_request(&self, completion: &RequestCompletion) -> usize {
        self.inner.requests.dispatch(completion)
    }

    /// A sub-resource finished loading (or failed to)
    pub fn dispatch_resource(&self, signal: &ResourceSignal) -> usize {
        self.inner.resources.dispatch(signal)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new("/")
    }
}
