// packages/agent/src/host/framework.rs
//! Framework error hook
//!
//! UI frameworks expose a single error-handler slot (Vue's
//! `config.errorHandler`, for example). [`FrameworkHook`] models that slot:
//! the application may install its own handler, the framework calls
//! [`FrameworkHook::emit`] when a component throws, and the agent wraps
//! whatever handler is already there instead of replacing it.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Error raised inside a framework component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkError {
    pub message: String,

    /// Name of the component that threw
    pub component: Option<String>,

    /// Framework-specific info, e.g. the lifecycle hook that failed
    pub info: Option<String>,

    pub stack: Option<String>,
}

impl FrameworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Handler stored in a [`FrameworkHook`]
pub type FrameworkErrorHandler = Arc<dyn Fn(&FrameworkError) + Send + Sync>;

/// Shared error-handler slot of a framework instance
#[derive(Clone, Default)]
pub struct FrameworkHook {
    slot: Arc<Mutex<Option<FrameworkErrorHandler>>>,
}

impl FrameworkHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler`, replacing whatever was there
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(&FrameworkError) + Send + Sync + 'static,
    {
        *self.slot.lock() = Some(Arc::new(handler));
    }

    pub fn handler(&self) -> Option<FrameworkErrorHandler> {
        self.slot.lock().clone()
    }

    /// Swap the slot contents, returning the previous handler
    pub fn replace_handler(&self, handler: Option<FrameworkErrorHandler>) -> Option<FrameworkErrorHandler> {
        std::mem::replace(&mut *self.slot.lock(), handler)
    }

    pub fn has_handler(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Framework side: hand a component error to the installed handler.
    /// Returns `false` when no handler is installed.
    pub fn emit(&self, error: &FrameworkError) -> bool {
        // Clone out of the lock so the handler may touch the slot
        let handler = self.handler();
        match handler {
            Some(handler) => {
                handler(error);
                true
            }
            None => false,
        }
    }

    /// Whether both values refer to the same slot
    pub fn same_hook(&self, other: &FrameworkHook) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for FrameworkHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkHook")
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

/// Pointer identity of two handlers
pub(crate) fn same_handler(a: &FrameworkErrorHandler, b: &FrameworkErrorHandler) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
