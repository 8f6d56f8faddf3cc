//! Static application credentials issued by the AI open platform.

use std::fmt;

/// App id and app key pair. The key never appears on the wire; it only salts
/// the request signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_app_key() {
        let creds = Credentials::new("10000", "secret-key");
        let out = format!("{:?}", creds);
        assert!(out.contains("10000"));
        assert!(!out.contains("secret-key"));
    }
}
