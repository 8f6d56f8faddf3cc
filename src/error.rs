use crate::endpoint::Endpoint;
use std::fmt;
use thiserror::Error;

/// Where a failure happened: which request field, which endpoint, and any
/// extra detail (size limits, transport failure class).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Request or config field at fault, e.g. `image`, `sticker`, `nonce_len`.
    pub field: Option<String>,
    pub endpoint: Option<Endpoint>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    pub fn at(endpoint: Endpoint) -> Self {
        Self {
            endpoint: Some(endpoint),
            ..Self::default()
        }
    }

    pub fn and_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.field.is_none() && self.endpoint.is_none() && self.details.is_none()
    }
}

/// Renders as ` (field: image, endpoint: /ptu/ptu_faceage)`, or nothing when empty.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::with_capacity(3);
        if let Some(field) = &self.field {
            parts.push(format!("field: {}", field));
        }
        if let Some(endpoint) = self.endpoint {
            parts.push(format!("endpoint: {}", endpoint.path()));
        }
        if let Some(details) = &self.details {
            parts.push(details.clone());
        }
        write!(f, " ({})", parts.join(", "))
    }
}

/// Coarse error class, for callers that only need to branch on where a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local precondition failed; nothing was sent.
    Validation,
    /// The request could not be delivered or the service answered with a non-200 status.
    Transport,
    /// The service answered, but the envelope reported a failure or was unusable.
    Domain,
    /// The client could not be constructed from the supplied configuration.
    Configuration,
}

/// Unified error type for the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Request submission failed: {message}{context}")]
    Transport {
        status: Option<u16>,
        message: String,
        context: ErrorContext,
    },

    #[error("Service error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Invalid service response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Validation error for a single request field.
    pub fn validation(field: &str, msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::for_field(field),
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn transport(endpoint: Endpoint, status: Option<u16>, msg: impl Into<String>) -> Self {
        Error::Transport {
            status,
            message: msg.into(),
            context: ErrorContext::at(endpoint),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Api { .. } | Error::InvalidResponse(_) => ErrorKind::Domain,
            Error::Configuration { .. } | Error::Io(_) | Error::Yaml(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Service `ret` code, when the failure came from the response envelope.
    pub fn code(&self) -> Option<i64> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// HTTP status, when the service answered with something other than 200.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::Transport { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Request or config field at fault, if the error names one.
    pub fn field(&self) -> Option<&str> {
        self.context().and_then(|c| c.field.as_deref())
    }
}
