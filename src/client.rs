//! Async client.
//!
//! Every endpoint method follows the same steps: check inputs locally, build
//! and sign the parameter map with a fresh nonce and timestamp, POST it once,
//! and unwrap the response envelope. Nothing is retried.

use crate::blocking;
use crate::config::ClientConfig;
use crate::credential::Credentials;
use crate::endpoint::{Endpoint, TranslationType};
use crate::image::ImageResult;
use crate::logging::{self, DebugLog, LogRecord, LogSink};
use crate::request::{ApiCall, SignedRequest};
use crate::response;
use crate::sign::RequestContext;
use crate::transport::{HttpReply, HttpTransport};
use crate::{Error, ErrorKind, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn, Level};

/// State shared by the async and blocking clients. Immutable after construction.
#[derive(Debug, Clone)]
pub(crate) struct ClientCore {
    credentials: Credentials,
    base_url: String,
    nonce_len: usize,
    log: DebugLog,
}

impl ClientCore {
    pub(crate) fn new(config: &ClientConfig, sink: Arc<dyn LogSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            credentials: config.credentials(),
            base_url: config.base_url.clone(),
            nonce_len: config.nonce_len,
            log: DebugLog::new(config.debug, sink),
        })
    }

    pub(crate) fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn debug(&self) -> bool {
        self.log.enabled()
    }

    /// Validate and sign. A new context is drawn for every request.
    pub(crate) fn prepare(&self, call: &ApiCall<'_>) -> Result<SignedRequest> {
        let context = RequestContext::generate(self.nonce_len);
        self.prepare_with_context(call, &context)
    }

    pub(crate) fn prepare_with_context(
        &self,
        call: &ApiCall<'_>,
        context: &RequestContext,
    ) -> Result<SignedRequest> {
        let req = SignedRequest::new(call, &self.credentials, context, &self.base_url).map_err(
            |e| {
                self.log.emit(|| LogRecord::failure(call.endpoint(), &e));
                e
            },
        )?;
        self.log
            .emit(|| LogRecord::request(req.endpoint, &req.url, &req.params));
        Ok(req)
    }

    /// Check the HTTP status, then unwrap the envelope.
    pub(crate) fn finish(
        &self,
        req: &SignedRequest,
        reply: Result<HttpReply>,
        start: Instant,
    ) -> Result<String> {
        let result = reply.and_then(|reply| {
            debug!(
                endpoint = req.endpoint.path(),
                http_status = reply.status,
                duration_ms = start.elapsed().as_millis(),
                "tencent-ai response received"
            );
            self.log
                .emit(|| LogRecord::response(req.endpoint, reply.status, &reply.body));
            let body = reply.into_body(req)?;
            response::extract(req.endpoint, &body)
        });
        if let Err(e) = &result {
            if failure_level(e) == Level::WARN {
                warn!(
                    endpoint = req.endpoint.path(),
                    http_status = e.status(),
                    error = %e,
                    "tencent-ai request submission failed"
                );
            } else {
                info!(
                    endpoint = req.endpoint.path(),
                    ret = e.code(),
                    error = %e,
                    "tencent-ai request failed"
                );
            }
            self.log.emit(|| LogRecord::failure(req.endpoint, e));
        }
        result
    }
}

/// Undeliverable requests and non-200 replies are warnings; service-side
/// rejections are the caller's business and stay at `info`.
fn failure_level(err: &Error) -> Level {
    match err.kind() {
        ErrorKind::Transport => Level::WARN,
        _ => Level::INFO,
    }
}

/// Async client for the image-effect and translation endpoints.
///
/// Cheap to clone; clones share the underlying connection handle.
#[derive(Debug, Clone)]
pub struct Client {
    core: ClientCore,
    transport: HttpTransport,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Client from a config, logging to `tracing` when `debug` is set.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// Client configured entirely from `TENCENT_AI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn app_id(&self) -> &str {
        self.core.app_id()
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    pub fn debug(&self) -> bool {
        self.core.debug()
    }

    /// Run any call and return the raw payload string.
    pub async fn call(&self, call: ApiCall<'_>) -> Result<String> {
        let req = self.core.prepare(&call)?;
        self.dispatch(&req).await
    }

    /// Run a call with an explicit nonce and timestamp.
    pub async fn call_with_context(
        &self,
        call: ApiCall<'_>,
        context: &RequestContext,
    ) -> Result<String> {
        let req = self.core.prepare_with_context(&call, context)?;
        self.dispatch(&req).await
    }

    async fn dispatch(&self, req: &SignedRequest) -> Result<String> {
        let start = Instant::now();
        let reply = self.transport.post_form(req).await;
        self.core.finish(req, reply, start)
    }

    async fn effect(&self, endpoint: Endpoint, template: &str, image: &str) -> Result<ImageResult> {
        self.call(ApiCall::Effect {
            endpoint,
            template,
            image,
        })
        .await
        .map(ImageResult::new)
    }

    /// Merge the face in `image` into catalog template `model`.
    pub async fn face_merge(&self, model: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceMerge, model, image).await
    }

    /// Apply a makeup template.
    pub async fn face_cosmetic(&self, cosmetic: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceCosmetic, cosmetic, image).await
    }

    /// Apply a costume/decoration template.
    pub async fn face_decoration(&self, decoration: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceDecoration, decoration, image).await
    }

    pub async fn img_filter(&self, filter: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::ImgFilter, filter, image).await
    }

    pub async fn face_sticker(&self, sticker: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceSticker, sticker, image).await
    }

    /// Age estimate, rendered onto the image.
    pub async fn face_age(&self, image: &str) -> Result<ImageResult> {
        self.call(ApiCall::FaceAge { image })
            .await
            .map(ImageResult::new)
    }

    pub async fn text_trans(&self, text: &str, kind: TranslationType) -> Result<String> {
        self.call(ApiCall::TextTrans { text, kind }).await
    }
}

/// Builder for [`Client`] and [`blocking::Client`].
pub struct ClientBuilder {
    config: ClientConfig,
    sink: Arc<dyn LogSink>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            sink: logging::tracing_sink(),
        }
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.config.app_id = app_id.into();
        self
    }

    pub fn app_key(mut self, app_key: impl Into<String>) -> Self {
        self.config.app_key = app_key.into();
        self
    }

    /// Report requests and responses to the log sink.
    pub fn debug(mut self, enable: bool) -> Self {
        self.config.debug = enable;
        self
    }

    /// Inject a log sink. Default forwards to `tracing`. Only used when `debug` is on.
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Override the service base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn nonce_len(mut self, len: usize) -> Self {
        self.config.nonce_len = len;
        self
    }

    /// Disable TLS certificate and hostname verification.
    ///
    /// Only for testing against local endpoints. Never enable in production.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.danger_accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<Client> {
        let core = ClientCore::new(&self.config, self.sink)?;
        let transport = HttpTransport::new(&self.config)?;
        Ok(Client { core, transport })
    }

    pub fn build_blocking(self) -> Result<blocking::Client> {
        blocking::Client::from_parts(&self.config, self.sink)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::logging::{InMemoryLogSink, LogEvent};

    fn core(debug: bool, sink: Arc<dyn LogSink>) -> ClientCore {
        let mut cfg = ClientConfig::new("10000", "key");
        cfg.debug = debug;
        ClientCore::new(&cfg, sink).unwrap()
    }

    #[test]
    fn each_prepare_draws_a_fresh_nonce() {
        let core = core(false, logging::tracing_sink());
        let call = ApiCall::TextTrans {
            text: "hello",
            kind: TranslationType::AutoDetect,
        };
        let a = core.prepare(&call).unwrap();
        let b = core.prepare(&call).unwrap();
        assert_ne!(a.params["nonce_str"], b.params["nonce_str"]);
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = ClientCore::new(&ClientConfig::new("", ""), logging::tracing_sink()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn debug_sink_sees_validation_failures() {
        let sink = Arc::new(InMemoryLogSink::new());
        let core = core(true, sink.clone());
        let err = core.prepare(&ApiCall::FaceAge { image: "" }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].event, LogEvent::Failure { .. }));
    }

    #[test]
    fn finish_unwraps_and_logs() {
        let sink = Arc::new(InMemoryLogSink::new());
        let core = core(true, sink.clone());
        let req = core
            .prepare(&ApiCall::FaceAge { image: "QUJD" })
            .unwrap();
        let reply = HttpReply {
            status: 200,
            body: r#"{"ret":0,"msg":"ok","data":{"image":"xyz"}}"#.into(),
        };
        let out = core.finish(&req, Ok(reply), Instant::now()).unwrap();
        assert_eq!(out, "xyz");
        let kinds: Vec<_> = sink
            .records()
            .into_iter()
            .map(|r| match r.event {
                LogEvent::Request { .. } => "request",
                LogEvent::Response { .. } => "response",
                LogEvent::Failure { .. } => "failure",
            })
            .collect();
        assert_eq!(kinds, vec!["request", "response"]);
    }

    #[test]
    fn non_200_is_logged_as_warning_and_service_errors_as_info() {
        let sink = Arc::new(InMemoryLogSink::new());
        let core = core(true, sink.clone());
        let req = core
            .prepare(&ApiCall::FaceAge { image: "QUJD" })
            .unwrap();

        let reply = HttpReply {
            status: 502,
            body: String::new(),
        };
        let err = core.finish(&req, Ok(reply), Instant::now()).unwrap_err();
        assert_eq!(failure_level(&err), Level::WARN);

        let reply = HttpReply {
            status: 200,
            body: r#"{"ret":1001,"msg":"invalid image"}"#.into(),
        };
        let err = core.finish(&req, Ok(reply), Instant::now()).unwrap_err();
        assert_eq!(failure_level(&err), Level::INFO);

        let failures = sink
            .records()
            .into_iter()
            .filter(|r| matches!(r.event, LogEvent::Failure { .. }))
            .count();
        assert_eq!(failures, 2);
    }
}
