// packages/agent/src/reporting/transport.rs
//! One-way transports for serialized events
//!
//! A transport takes ownership of a body and a destination and returns as
//! soon as the send is handed off. It never waits for the network and never
//! reports delivery outcomes back to the caller.
//!
//! - [`HttpTransport`]: POSTs the body with reqwest (rustls), spawned on tokio
//! - [`ChannelTransport`]: pushes the body onto a crossbeam channel for a
//!   platform binding that owns the real send (e.g. `navigator.sendBeacon`)

use crate::utils::errors::{AgentError, Result};
use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// A serialized event on its way out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub url: String,
    pub body: Bytes,
}

/// Best-effort one-way transmit
pub trait Transport: Send + Sync {
    /// Hand `outbound` off for delivery. Must not block on network I/O.
    fn transmit(&self, outbound: Outbound) -> Result<()>;
}

/// Configuration for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Upper bound for one delivery attempt (milliseconds)
    pub timeout_ms: u64,

    /// `Content-Type` of the POST body
    pub content_type: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            content_type: "application/json".to_string(),
        }
    }
}

/// Fire-and-forget HTTP(S) POST
pub struct HttpTransport {
    config: HttpTransportConfig,
    client: Client,
    runtime: Option<Handle>,
}

impl HttpTransport {
    /// Create a transport bound to the current tokio runtime, if any
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        Self::build(config, Handle::try_current().ok())
    }

    /// Create a transport that spawns deliveries on `runtime`
    pub fn with_runtime(config: HttpTransportConfig, runtime: Handle) -> Result<Self> {
        Self::build(config, Some(runtime))
    }

    fn build(config: HttpTransportConfig, runtime: Option<Handle>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AgentError::TransportFailed(format!("HTTP client build error: {}", e)))?;

        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|e| AgentError::InvalidReportUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(AgentError::InvalidReportUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

impl Transport for HttpTransport {
    fn transmit(&self, outbound: Outbound) -> Result<()> {
        let url = Self::parse_url(&outbound.url)?;

        let runtime = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
            .ok_or_else(|| AgentError::TransportFailed("no async runtime available".to_string()))?;

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, self.config.content_type.as_str())
            .body(outbound.body);
        let url = outbound.url;

        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Delivered event to {}", url);
                }
                Ok(response) => {
                    debug!("Collector at {} answered {}", url, response.status());
                }
                Err(e) if e.is_timeout() => {
                    debug!("Delivery to {} timed out", url);
                }
                Err(e) => {
                    debug!("Delivery to {} failed: {}", url, e);
                }
            }
        });

        Ok(())
    }
}

/// Transport backed by a crossbeam channel
#[derive(Clone)]
pub struct ChannelTransport {
    sender: Sender<Outbound>,
}

impl ChannelTransport {
    pub fn unbounded() -> (Self, Receiver<Outbound>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    /// Bounded channel; sends beyond `capacity` are refused, not queued
    pub fn bounded(capacity: usize) -> (Self, Receiver<Outbound>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn transmit(&self, outbound: Outbound) -> Result<()> {
        self.sender.try_send(outbound).map_err(|e| match e {
            TrySendError::Full(_) => AgentError::TransportFull,
            TrySendError::Disconnected(_) => AgentError::TransportClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Incoming;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Request, Response};
    use hyper_util::rt::TokioIo;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    fn outbound(url: &str) -> Outbound {
        Outbound {
            url: url.to_string(),
            body: Bytes::from_static(br#"{"kind":"js_error"}"#),
        }
    }

    #[test]
    fn test_config_default() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.content_type, "application/json");
    }

    #[test]
    fn test_channel_transport() {
        let (transport, receiver) = ChannelTransport::unbounded();
        transport.transmit(outbound("http://collector/report")).unwrap();

        let received = receiver.try_recv().unwrap();
        assert_eq!(received.url, "http://collector/report");
        assert_eq!(&received.body[..], br#"{"kind":"js_error"}"#);
    }

    #[test]
    fn test_channel_transport_full_and_closed() {
        let (transport, receiver) = ChannelTransport::bounded(1);
        transport.transmit(outbound("http://a")).unwrap();

        assert!(matches!(
            transport.transmit(outbound("http://a")),
            Err(AgentError::TransportFull)
        ));

        drop(receiver);
        assert!(matches!(
            transport.transmit(outbound("http://a")),
            Err(AgentError::TransportClosed)
        ));
    }

    #[test]
    fn test_http_transport_rejects_bad_urls() {
        let transport = HttpTransport::new(HttpTransportConfig::default()).unwrap();

        assert!(matches!(
            transport.transmit(outbound("not a url")),
            Err(AgentError::InvalidReportUrl { .. })
        ));
        assert!(matches!(
            transport.transmit(outbound("ftp://collector/report")),
            Err(AgentError::InvalidReportUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_transport_accepts_https() {
        let transport = HttpTransport::new(HttpTransportConfig::default()).unwrap();

        assert!(transport.transmit(outbound("https://x/report")).is_ok());
        assert!(transport
            .transmit(outbound("https://collector.example:8443/browser?v=1"))
            .is_ok());
    }

    #[tokio::test]
    async fn test_https_report_url_is_sent_not_failed() {
        use crate::reporting::Reporter;
        use crate::{Agent, AgentOptions, Page};

        let page = Page::new("/");
        page.fire_load();
        let transport = HttpTransport::new(HttpTransportConfig::default()).unwrap();
        let agent = Agent::new(page.clone(), Reporter::new(transport));

        agent.register(AgentOptions::new().service_name("svc").report_url("https://x/report"));
        page.dispatch_error(&crate::host::ErrorSignal::new("boom"));

        let stats = agent.reporter_stats();
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_http_transport_without_runtime() {
        let transport = HttpTransport::new(HttpTransportConfig::default()).unwrap();

        assert!(matches!(
            transport.transmit(outbound("http://127.0.0.1:9/report")),
            Err(AgentError::TransportFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_http_transport_posts_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel::<(String, String, Bytes)>();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let service = service_fn(move |req: Request<Incoming>| {
                let tx = tx.clone();
                async move {
                    let method = req.method().to_string();
                    let content_type = req
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let body = req.into_body().collect().await?.to_bytes();
                    let _ = tx.send((method, content_type, body));
                    Ok::<_, hyper::Error>(Response::new(Full::new(Bytes::new())))
                }
            });
            let _ = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await;
        });

        let transport = HttpTransport::new(HttpTransportConfig::default()).unwrap();
        transport
            .transmit(outbound(&format!("http://{}/report", addr)))
            .unwrap();

        let (method, content_type, body) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(method, "POST");
        assert_eq!(content_type, "application/json");
        assert_eq!(&body[..], br#"{"kind":"js_error"}"#);
    }
}
