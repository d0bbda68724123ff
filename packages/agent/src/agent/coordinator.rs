// packages/agent/src/agent/coordinator.rs
//! Agent coordinator
//!
//! Owns the merged configuration and the capture strategies of one page.
//! `register` can be called any number of times: each call merges its
//! options over the current configuration, activates strategies whose flag
//! is now on and makes sure the performance recorder runs once.

use crate::capture::{
    AjaxErrorStrategy, CaptureContext, CaptureStrategy, FrameworkErrorStrategy, JsErrorStrategy,
    PromiseErrorStrategy, ResourceErrorStrategy, SharedDestination,
};
use crate::host::page::Page;
use crate::host::signals::ReadyState;
use crate::performance::PerformanceRecorder;
use crate::reporting::{Reporter, ReporterStats};
use crate::utils::config::{AgentConfig, AgentOptions};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Registration state of an [`Agent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Default configuration, no hooks installed
    Unregistered,

    /// Configuration merged, hooks installed
    Registered,
}

/// Browser RUM agent bound to one page
///
/// Cheap to clone; clones share configuration, strategies and reporter.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

struct AgentInner {
    page: Page,
    reporter: Reporter,
    destination: SharedDestination,
    recorder: PerformanceRecorder,
    registry: Mutex<Registry>,
}

struct Registry {
    config: AgentConfig,
    state: AgentState,
    strategies: Strategies,
    perf_scheduled: bool,
}

struct Strategies {
    js: JsErrorStrategy,
    promise: PromiseErrorStrategy,
    ajax: AjaxErrorStrategy,
    resource: ResourceErrorStrategy,

    /// One per distinct framework hook seen in configuration
    framework: Vec<FrameworkErrorStrategy>,
}

impl Strategies {
    fn new() -> Self {
        Self {
            js: JsErrorStrategy::new(),
            promise: PromiseErrorStrategy::new(),
            ajax: AjaxErrorStrategy::new(),
            resource: ResourceErrorStrategy::new(false),
            framework: Vec::new(),
        }
    }

    fn activate_enabled(&mut self, config: &AgentConfig, ctx: &CaptureContext) {
        self.resource.set_trace_resource(config.trace_resource);

        if config.js_errors {
            self.js.activate(ctx);
        }
        if config.promise_errors {
            self.promise.activate(ctx);
        }
        if config.api_errors {
            self.ajax.activate(ctx);
        }
        if config.resource_errors {
            self.resource.activate(ctx);
        }

        if let Some(hook) = &config.vue_errors {
            if !self.framework.iter().any(|s| s.hook().same_hook(hook)) {
                self.framework.push(FrameworkErrorStrategy::new(hook.clone()));
            }
            for strategy in self.framework.iter_mut().filter(|s| s.hook().same_hook(hook)) {
                strategy.activate(ctx);
            }
        }
    }

    fn deactivate_all(&mut self) {
        self.js.deactivate();
        self.promise.deactivate();
        self.ajax.deactivate();
        self.resource.deactivate();
        for strategy in &mut self.framework {
            strategy.deactivate();
        }
    }

    fn active(&self) -> Vec<&'static str> {
        let fixed: [&dyn CaptureStrategy; 4] = [&self.js, &self.promise, &self.ajax, &self.resource];

        let mut names: Vec<&'static str> = fixed
            .into_iter()
            .filter(|s| s.is_active())
            .map(|s| s.name())
            .collect();

        if self.framework.iter().any(|s| s.is_active()) {
            names.push(FrameworkErrorStrategy::NAME);
        }
        names
    }
}

impl Agent {
    pub fn new(page: Page, reporter: Reporter) -> Self {
        let config = AgentConfig::default();
        let destination = Arc::new(RwLock::new(config.destination()));

        Self {
            inner: Arc::new(AgentInner {
                recorder: PerformanceRecorder::new(page.clone(), reporter.clone()),
                page,
                reporter,
                destination,
                registry: Mutex::new(Registry {
                    config,
                    state: AgentState::Unregistered,
                    strategies: Strategies::new(),
                    perf_scheduled: false,
                }),
            }),
        }
    }

    /// Merge `options`, activate enabled strategies, schedule performance
    /// recording. Returns the configuration after the merge.
    ///
    /// Never fails: missing `service_name` / `report_url` are logged and
    /// events without a report URL are dropped by the reporter. Use
    /// [`AgentConfig::validate`] for an eager check.
    pub fn register(&self, options: AgentOptions) -> AgentConfig {
        let inner = &self.inner;
        let mut registry = inner.registry.lock();

        registry.config.merge(options);
        let config = registry.config.clone();

        if config.service_name.is_empty() {
            warn!("Registering without a service name");
        }
        if config.report_url.is_empty() {
            warn!("Registering without a report URL; events will be dropped");
        }

        *inner.destination.write() = config.destination();

        let ctx = CaptureContext::new(
            inner.page.clone(),
            inner.reporter.clone(),
            Arc::clone(&inner.destination),
        );
        registry.strategies.activate_enabled(&config, &ctx);
        registry.state = AgentState::Registered;

        info!(
            "Agent registered for {} (strategies: {:?})",
            config.service_name,
            registry.strategies.active()
        );

        let first_schedule = !std::mem::replace(&mut registry.perf_scheduled, true);
        // The callback may run right away and takes the registry lock itself
        drop(registry);

        if first_schedule {
            let weak = Arc::downgrade(inner);
            if !inner.page.on_load_or_now(move || Self::record_on_load(weak)) {
                debug!("Performance recording deferred until load");
            }
        } else if inner.page.ready_state() == ReadyState::Complete {
            inner.recorder.record_once(&config);
        }

        config
    }

    fn record_on_load(weak: Weak<AgentInner>) {
        let Some(inner) = weak.upgrade() else {
            debug!("Agent dropped before load; skipping performance recording");
            return;
        };

        // Configuration current at load time, not at scheduling time
        let config = {
            let registry = inner.registry.lock();
            if registry.state != AgentState::Registered {
                debug!("Agent shut down before load; skipping performance recording");
                return;
            }
            registry.config.clone()
        };

        inner.recorder.record_once(&config);
    }

    /// Deactivate every strategy and return to [`AgentState::Unregistered`].
    ///
    /// The merged configuration is kept. Performance already recorded for
    /// this page is not recorded again after a later `register`.
    pub fn shutdown(&self) {
        let mut registry = self.inner.registry.lock();
        if registry.state == AgentState::Unregistered {
            return;
        }

        registry.strategies.deactivate_all();
        registry.state = AgentState::Unregistered;
        info!("Agent shut down");
    }

    pub fn config(&self) -> AgentConfig {
        self.inner.registry.lock().config.clone()
    }

    pub fn state(&self) -> AgentState {
        self.inner.registry.lock().state
    }

    /// Names of the strategies currently installed
    pub fn active_strategies(&self) -> Vec<&'static str> {
        self.inner.registry.lock().strategies.active()
    }

    pub fn reporter_stats(&self) -> ReporterStats {
        self.inner.reporter.stats()
    }

    pub fn page(&self) -> &Page {
        &self.inner.page
    }

    pub fn performance_recorded(&self) -> bool {
        self.inner.recorder.has_recorded()
    }
}
