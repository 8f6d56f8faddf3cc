//! Blocking client.
//!
//! Same method set and semantics as the async [`crate::Client`]; each call
//! blocks the current thread for one HTTP round trip. Do not use it from
//! inside an async runtime.

use crate::client::{ClientBuilder, ClientCore};
use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, TranslationType};
use crate::image::ImageResult;
use crate::logging::LogSink;
use crate::request::{ApiCall, SignedRequest};
use crate::sign::RequestContext;
use crate::transport::BlockingHttpTransport;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// Blocking client for the image-effect and translation endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    core: ClientCore,
    transport: BlockingHttpTransport,
}

impl Client {
    /// Returns the shared builder; finish with [`ClientBuilder::build_blocking`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build_blocking()
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub(crate) fn from_parts(config: &ClientConfig, sink: Arc<dyn LogSink>) -> Result<Self> {
        let core = ClientCore::new(config, sink)?;
        let transport = BlockingHttpTransport::new(config)?;
        Ok(Self { core, transport })
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

    pub fn call(&self, call: ApiCall<'_>) -> Result<String> {
        let req = self.core.prepare(&call)?;
        self.dispatch(&req)
    }

    pub fn call_with_context(&self, call: ApiCall<'_>, context: &RequestContext) -> Result<String> {
        let req = self.core.prepare_with_context(&call, context)?;
        self.dispatch(&req)
    }

    fn dispatch(&self, req: &SignedRequest) -> Result<String> {
        let start = Instant::now();
        let reply = self.transport.post_form(req);
        self.core.finish(req, reply, start)
    }

    fn effect(&self, endpoint: Endpoint, template: &str, image: &str) -> Result<ImageResult> {
        self.call(ApiCall::Effect {
            endpoint,
            template,
            image,
        })
        .map(ImageResult::new)
    }

    pub fn face_merge(&self, model: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceMerge, model, image)
    }

    pub fn face_cosmetic(&self, cosmetic: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceCosmetic, cosmetic, image)
    }

    pub fn face_decoration(&self, decoration: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceDecoration, decoration, image)
    }

    pub fn img_filter(&self, filter: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::ImgFilter, filter, image)
    }

    pub fn face_sticker(&self, sticker: &str, image: &str) -> Result<ImageResult> {
        self.effect(Endpoint::FaceSticker, sticker, image)
    }

    pub fn face_age(&self, image: &str) -> Result<ImageResult> {
        self.call(ApiCall::FaceAge { image }).map(ImageResult::new)
    }

    pub fn text_trans(&self, text: &str, kind: TranslationType) -> Result<String> {
        self.call(ApiCall::TextTrans { text, kind })
    }
}
