//! # tencent-ai
//!
//! 腾讯 AI 开放平台客户端：图片特效与文本翻译接口的签名与调用。
//!
//! Client for the Tencent AI open platform image-effect and text-translation
//! endpoints.
//!
//! ## Overview
//!
//! Each call builds a parameter map from the app credentials, a fresh nonce and
//! timestamp, and the endpoint's own fields; signs it with the platform's MD5
//! scheme; POSTs it as a form; and unwraps the `{ret, msg, data}` envelope.
//!
//! Failures come back as [`Error`] values in three classes:
//!
//! - **validation**: a required input is missing, nothing was sent
//! - **transport**: the POST failed or the status was not 200
//! - **domain**: the envelope carried a positive `ret`, or was unusable
//!
//! Nothing is retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tencent_ai::{blocking, TranslationType};
//!
//! fn main() -> tencent_ai::Result<()> {
//!     let client = blocking::Client::builder()
//!         .app_id("10000")
//!         .app_key("your-app-key")
//!         .build_blocking()?;
//!
//!     let text = client.text_trans("hello", TranslationType::AutoDetect)?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Async client and the shared builder |
//! | [`blocking`] | Blocking client |
//! | [`sign`] | Nonce generation and request signing |
//! | [`request`] | Input validation and signed request assembly |
//! | [`response`] | Envelope decoding |
//! | [`endpoint`] | Endpoint paths and translation types |
//! | [`image`] | Base64 image helpers |
//! | [`logging`] | Debug log sinks |
//! | [`config`] | Configuration from code, environment or YAML |

pub mod blocking;
pub mod client;
pub mod config;
pub mod credential;
pub mod endpoint;
pub mod image;
pub mod logging;
pub mod request;
pub mod response;
pub mod sign;
pub mod transport;

/// Error type for the library
pub mod error;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use credential::Credentials;
pub use endpoint::{Endpoint, TranslationType};
pub use error::{Error, ErrorContext, ErrorKind};
pub use image::ImageResult;
pub use logging::{LogRecord, LogSink};
pub use request::ApiCall;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

// Clients are shared across threads and tasks.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<blocking::Client>;
    let _ = assert_send_sync::<Error>;
};
