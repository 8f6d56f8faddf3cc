use crate::config::ClientConfig;
use crate::request::SignedRequest;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw status and body of one POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    /// Anything but 200 is a failed submission; the body is not decoded.
    pub fn into_body(self, req: &SignedRequest) -> Result<String> {
        if self.status == 200 {
            return Ok(self.body);
        }
        Err(Error::transport(
            req.endpoint,
            Some(self.status),
            format!("HTTP {}", self.status),
        ))
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("tencent-ai-rust/", env!("CARGO_PKG_VERSION"))),
    );
    headers
}

fn send_error(req: &SignedRequest, e: reqwest::Error) -> Error {
    let details = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "transport failure"
    };
    Error::Transport {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
        context: ErrorContext::at(req.endpoint).and_details(details),
    }
}

fn build_error(e: reqwest::Error) -> Error {
    Error::configuration(format!("Failed to create HTTP client: {}", e))
}

/// Async form-POST transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers())
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()
            .map_err(build_error)?;
        Ok(Self { client })
    }

    pub async fn post_form(&self, req: &SignedRequest) -> Result<HttpReply> {
        let response = self
            .client
            .post(&req.url)
            .body(req.body())
            .send()
            .await
            .map_err(|e| send_error(req, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| send_error(req, e))?;
        Ok(HttpReply { status, body })
    }
}

/// Blocking form-POST transport.
#[derive(Debug, Clone)]
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
}

impl BlockingHttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers())
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()
            .map_err(build_error)?;
        Ok(Self { client })
    }

    pub fn post_form(&self, req: &SignedRequest) -> Result<HttpReply> {
        let response = self
            .client
            .post(&req.url)
            .body(req.body())
            .send()
            .map_err(|e| send_error(req, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| send_error(req, e))?;
        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credentials;
    use crate::endpoint::{Endpoint, TranslationType, DEFAULT_BASE_URL};
    use crate::request::ApiCall;
    use crate::sign::RequestContext;

    fn request() -> SignedRequest {
        SignedRequest::new(
            &ApiCall::TextTrans {
                text: "hello",
                kind: TranslationType::AutoDetect,
            },
            &Credentials::new("1", "k"),
            &RequestContext::fixed("n", 1),
            DEFAULT_BASE_URL,
        )
        .unwrap()
    }

    #[test]
    fn ok_status_yields_body() {
        let reply = HttpReply {
            status: 200,
            body: "{}".into(),
        };
        assert_eq!(reply.into_body(&request()).unwrap(), "{}");
    }

    #[test]
    fn non_200_is_transport_error() {
        for status in [201, 302, 404, 500] {
            let reply = HttpReply {
                status,
                body: r#"{"ret":0,"data":{"trans_text":"x"}}"#.into(),
            };
            let err = reply.into_body(&request()).unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(
                err.context().and_then(|c| c.endpoint),
                Some(Endpoint::TextTrans)
            );
        }
    }
}
