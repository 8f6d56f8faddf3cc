//! Request assembly: validate inputs, build the parameter map, sign it.
//!
//! Everything here is pure. The clients generate a [`RequestContext`] per
//! call, hand it to [`SignedRequest::new`], and only then touch the network.

use crate::credential::Credentials;
use crate::endpoint::{Endpoint, TranslationType};
use crate::sign::{self, ParameterMap, RequestContext};
use crate::{image, Error, Result};

/// Inputs for one endpoint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall<'a> {
    /// An image effect driven by a catalog template.
    Effect {
        endpoint: Endpoint,
        template: &'a str,
        image: &'a str,
    },
    FaceAge {
        image: &'a str,
    },
    TextTrans {
        text: &'a str,
        kind: TranslationType,
    },
}

impl<'a> ApiCall<'a> {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiCall::Effect { endpoint, .. } => *endpoint,
            ApiCall::FaceAge { .. } => Endpoint::FaceAge,
            ApiCall::TextTrans { .. } => Endpoint::TextTrans,
        }
    }

    /// Endpoint-specific parameters, after local precondition checks.
    pub fn fields(&self) -> Result<Vec<(&'static str, String)>> {
        match *self {
            ApiCall::Effect {
                endpoint,
                template,
                image,
            } => {
                let param = endpoint.template_param().ok_or_else(|| {
                    Error::validation("endpoint", format!("{} takes no template", endpoint))
                })?;
                let template = template.trim();
                // "0" is the catalog's "no template" value.
                if template.is_empty() || template == "0" {
                    return Err(Error::validation(
                        param,
                        format!("no {} template selected", param),
                    ));
                }
                let image = image::validate(image)?;
                Ok(vec![(param, template.to_string()), ("image", image.to_string())])
            }
            ApiCall::FaceAge { image } => {
                let image = image::validate(image)?;
                Ok(vec![("image", image.to_string())])
            }
            ApiCall::TextTrans { text, kind } => {
                // The service treats "0" as no input, same as for templates.
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed == "0" {
                    return Err(Error::validation("text", "no text to translate"));
                }
                Ok(vec![("text", text.to_string()), ("type", kind.code().to_string())])
            }
        }
    }
}

/// A fully signed request, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub endpoint: Endpoint,
    pub url: String,
    pub params: ParameterMap,
}

impl SignedRequest {
    pub fn new(
        call: &ApiCall<'_>,
        credentials: &Credentials,
        context: &RequestContext,
        base_url: &str,
    ) -> Result<Self> {
        let endpoint = call.endpoint();
        let mut params = ParameterMap::new();
        params.insert("app_id".to_string(), credentials.app_id.clone());
        params.insert("nonce_str".to_string(), context.nonce.clone());
        params.insert("time_stamp".to_string(), context.timestamp.to_string());
        for (key, value) in call.fields()? {
            params.insert(key.to_string(), value);
        }
        sign::sign(&mut params, &credentials.app_key);
        Ok(Self {
            endpoint,
            url: endpoint.url(base_url),
            params,
        })
    }

    pub fn signature(&self) -> Option<&str> {
        self.params.get(sign::SIGN_KEY).map(String::as_str)
    }

    /// The form-encoded POST body.
    pub fn body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::DEFAULT_BASE_URL;
    use crate::error::ErrorKind;

    fn creds() -> Credentials {
        Credentials::new("10000", "a95eceb1ac8c24ee28b70f7dbba912bf")
    }

    fn ctx() -> RequestContext {
        RequestContext::fixed("fa577ce340859f9fe", 1493449657)
    }

    #[test]
    fn every_request_carries_identity_fields() {
        let call = ApiCall::TextTrans {
            text: "hello",
            kind: TranslationType::AutoDetect,
        };
        let req = SignedRequest::new(&call, &creds(), &ctx(), DEFAULT_BASE_URL).unwrap();
        assert_eq!(req.url, "https://api.ai.qq.com/fcgi-bin/nlp/nlp_texttrans");
        assert_eq!(req.params["app_id"], "10000");
        assert_eq!(req.params["nonce_str"], "fa577ce340859f9fe");
        assert_eq!(req.params["time_stamp"], "1493449657");
        assert_eq!(req.params["text"], "hello");
        assert_eq!(req.params["type"], "0");
        assert!(!req.params.contains_key("app_key"));
    }

    #[test]
    fn signature_covers_final_parameter_set() {
        let call = ApiCall::Effect {
            endpoint: Endpoint::FaceSticker,
            template: "2",
            image: "QUJD",
        };
        let req = SignedRequest::new(&call, &creds(), &ctx(), DEFAULT_BASE_URL).unwrap();
        let expected = sign::signature(&req.params, &creds().app_key);
        assert_eq!(req.signature(), Some(expected.as_str()));
        assert_eq!(req.params["sticker"], "2");
    }

    #[test]
    fn body_is_form_encoded_in_key_order() {
        let call = ApiCall::FaceAge {
            image: "data:image/jpeg;base64,ab+/=",
        };
        let req = SignedRequest::new(&call, &creds(), &ctx(), DEFAULT_BASE_URL).unwrap();
        let body = req.body();
        assert!(body.starts_with("app_id=10000&image=ab%2B%2F%3D&nonce_str="));
        assert!(body.contains("&sign="));
    }

    #[test]
    fn template_must_be_present() {
        for template in ["", "  ", "0"] {
            let call = ApiCall::Effect {
                endpoint: Endpoint::FaceCosmetic,
                template,
                image: "QUJD",
            };
            let err = call.fields().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(err.field(), Some("cosmetic"));
        }
    }

    #[test]
    fn effect_without_template_param_is_rejected() {
        let call = ApiCall::Effect {
            endpoint: Endpoint::TextTrans,
            template: "1",
            image: "QUJD",
        };
        assert!(call.fields().is_err());
    }

    #[test]
    fn empty_text_is_rejected() {
        for text in ["", " ", "0", " 0 "] {
            let call = ApiCall::TextTrans {
                text,
                kind: TranslationType::ZhToEn,
            };
            let err = SignedRequest::new(&call, &creds(), &ctx(), DEFAULT_BASE_URL).unwrap_err();
            assert_eq!(err.field(), Some("text"), "text: {text:?}");
        }
        let call = ApiCall::TextTrans {
            text: "10",
            kind: TranslationType::ZhToEn,
        };
        assert!(call.fields().is_ok());
    }
}
