// packages/agent/src/utils/config.rs
//! Agent configuration
//!
//! Two shapes:
//!
//! - [`AgentOptions`]: what a caller passes to `register`. Every key is
//!   optional; unset keys leave the stored value alone.
//! - [`AgentConfig`]: the resolved configuration the agent keeps between
//!   registrations. Starts from [`AgentConfig::default`] and absorbs each
//!   `AgentOptions` with last-write-wins per key.
//!
//! Options can come from code, from a JSON record handed over by the page
//! binding, or from a file plus `RUM_AGENT_*` environment variables.

use crate::event::Destination;
use crate::host::FrameworkHook;
use crate::utils::errors::{AgentError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Environment variable prefix used by [`AgentOptions::load`]
pub const ENV_PREFIX: &str = "RUM_AGENT";

/// Caller-supplied registration options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentOptions {
    /// Logical identity of the monitored application
    #[serde(alias = "serviceName")]
    pub service_name: Option<String>,

    /// Release identifier of the monitored application
    #[serde(alias = "serviceVersion")]
    pub service_version: Option<String>,

    /// Collector endpoint
    #[serde(alias = "reportUrl")]
    pub report_url: Option<String>,

    #[serde(alias = "jsErrors")]
    pub js_errors: Option<bool>,

    #[serde(alias = "promiseErrors")]
    pub promise_errors: Option<bool>,

    /// Failed XHR / fetch completions
    #[serde(alias = "apiErrors")]
    pub api_errors: Option<bool>,

    #[serde(alias = "resourceErrors")]
    pub resource_errors: Option<bool>,

    /// Framework error hook to wrap. Only settable from code.
    #[serde(skip)]
    pub vue_errors: Option<FrameworkHook>,

    #[serde(alias = "autoTracePerf")]
    pub auto_trace_perf: Option<bool>,

    /// Also report timing of successfully loaded resources
    #[serde(alias = "traceResource")]
    pub trace_resource: Option<bool>,

    /// Compute first-meaningful-paint
    #[serde(alias = "useFmp")]
    pub use_fmp: Option<bool>,
}

impl AgentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an option record produced by the page (camelCase or snake_case keys)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from an optional config file layered under
    /// `RUM_AGENT_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            debug!("Loading agent options from {:?}", path);
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let options = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<AgentOptions>()?;

        Ok(options)
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = Some(url.into());
        self
    }

    pub fn js_errors(mut self, enabled: bool) -> Self {
        self.js_errors = Some(enabled);
        self
    }

    pub fn promise_errors(mut self, enabled: bool) -> Self {
        self.promise_errors = Some(enabled);
        self
    }

    pub fn api_errors(mut self, enabled: bool) -> Self {
        self.api_errors = Some(enabled);
        self
    }

    pub fn resource_errors(mut self, enabled: bool) -> Self {
        self.resource_errors = Some(enabled);
        self
    }

    pub fn vue_errors(mut self, hook: FrameworkHook) -> Self {
        self.vue_errors = Some(hook);
        self
    }

    pub fn auto_trace_perf(mut self, enabled: bool) -> Self {
        self.auto_trace_perf = Some(enabled);
        self
    }

    pub fn trace_resource(mut self, enabled: bool) -> Self {
        self.trace_resource = Some(enabled);
        self
    }

    pub fn use_fmp(mut self, enabled: bool) -> Self {
        self.use_fmp = Some(enabled);
        self
    }
}

/// Resolved agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub service_name: String,
    pub service_version: String,
    pub report_url: String,
    pub js_errors: bool,
    pub promise_errors: bool,
    pub api_errors: bool,
    pub resource_errors: bool,
    pub vue_errors: Option<FrameworkHook>,
    pub auto_trace_perf: bool,
    pub trace_resource: bool,
    pub use_fmp: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            service_version: String::new(),
            report_url: String::new(),
            js_errors: true,
            promise_errors: true,
            api_errors: true,
            resource_errors: true,
            vue_errors: None,
            auto_trace_perf: true,
            trace_resource: false,
            use_fmp: false,
        }
    }
}

impl AgentConfig {
    /// Shallow merge: every key set in `options` replaces the stored value
    pub fn merge(&mut self, options: AgentOptions) {
        let AgentOptions {
            service_name,
            service_version,
            report_url,
            js_errors,
            promise_errors,
            api_errors,
            resource_errors,
            vue_errors,
            auto_trace_perf,
            trace_resource,
            use_fmp,
        } = options;

        overwrite(&mut self.service_name, service_name);
        overwrite(&mut self.service_version, service_version);
        overwrite(&mut self.report_url, report_url);
        overwrite(&mut self.js_errors, js_errors);
        overwrite(&mut self.promise_errors, promise_errors);
        overwrite(&mut self.api_errors, api_errors);
        overwrite(&mut self.resource_errors, resource_errors);
        overwrite(&mut self.auto_trace_perf, auto_trace_perf);
        overwrite(&mut self.trace_resource, trace_resource);
        overwrite(&mut self.use_fmp, use_fmp);

        if vue_errors.is_some() {
            self.vue_errors = vue_errors;
        }
    }

    /// Builder-style [`merge`](Self::merge)
    pub fn merged(mut self, options: AgentOptions) -> Self {
        self.merge(options);
        self
    }

    /// Eager check for the two keys every event needs
    pub fn validate(&self) -> Result<()> {
        if self.service_name.is_empty() {
            return Err(AgentError::MissingServiceName);
        }
        if self.report_url.is_empty() {
            return Err(AgentError::MissingReportUrl);
        }
        Ok(())
    }

    /// Where events are sent and who they are attributed to
    pub fn destination(&self) -> Destination {
        Destination {
            service_name: self.service_name.clone(),
            service_version: self.service_version.clone(),
            report_url: self.report_url.clone(),
        }
    }
}

fn overwrite<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
