//! Response envelope: `{"ret": <int>, "msg": <string>, "data": {...}}`.

use crate::endpoint::Endpoint;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient_ret")]
    pub ret: i64,
    #[serde(default, deserialize_with = "lenient_msg")]
    pub msg: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Decode a response body. Non-JSON, non-object and empty-object bodies
    /// are all rejected.
    pub fn parse(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| Error::InvalidResponse(format!("body is not JSON: {}", e)))?;
        match value.as_object() {
            Some(obj) if !obj.is_empty() => {}
            _ => return Err(Error::InvalidResponse("empty response envelope".to_string())),
        }
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidResponse(format!("malformed envelope: {}", e)))
    }

    /// Positive `ret` values are service-side failures.
    pub fn is_error(&self) -> bool {
        self.ret > 0
    }

    pub fn into_result(self) -> Result<serde_json::Value> {
        if self.is_error() {
            return Err(Error::Api {
                code: self.ret,
                message: self.msg,
            });
        }
        Ok(self.data)
    }
}

/// `ret` as an integer, a float, or a numeric string such as `"1001"`.
/// Anything without a leading number reads as 0.
fn lenient_ret<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<i64, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(&s),
        Value::Bool(b) => i64::from(b),
        _ => 0,
    })
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let digits_end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..digits_end].parse().unwrap_or(0)
}

/// `msg` may be missing, null or not a string at all.
fn lenient_msg<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Unwrap the envelope and return the endpoint's payload string.
pub fn extract(endpoint: Endpoint, body: &str) -> Result<String> {
    let data = Envelope::parse(body)?.into_result()?;
    let field = endpoint.payload_field();
    data.get(field)
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| Error::InvalidResponse(format!("missing data.{}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn success_returns_image_payload() {
        let body = r#"{"ret":0,"msg":"ok","data":{"image":"xyz"}}"#;
        assert_eq!(extract(Endpoint::FaceMerge, body).unwrap(), "xyz");
    }

    #[test]
    fn success_returns_translation_payload() {
        let body = r#"{"ret":0,"data":{"trans_text":"你好"}}"#;
        assert_eq!(extract(Endpoint::TextTrans, body).unwrap(), "你好");
    }

    #[test]
    fn positive_ret_is_api_error() {
        let body = r#"{"ret":1001,"msg":"invalid image"}"#;
        match extract(Endpoint::FaceAge, body).unwrap_err() {
            Error::Api { code, message } => {
                assert_eq!(code, 1001);
                assert_eq!(message, "invalid image");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_or_garbage_body_is_domain_error() {
        for body in ["", "{}", "[]", "null", "<html>", "42"] {
            let err = extract(Endpoint::ImgFilter, body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Domain, "body: {body:?}");
            assert!(matches!(err, Error::InvalidResponse(_)));
        }
    }

    #[test]
    fn missing_payload_field_is_invalid_response() {
        let body = r#"{"ret":0,"msg":"ok","data":{"trans_text":"x"}}"#;
        let err = extract(Endpoint::FaceMerge, body).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(ref m) if m == "missing data.image"));
    }

    #[test]
    fn null_msg_still_reports_the_code() {
        let err = extract(Endpoint::FaceAge, r#"{"ret":1001,"msg":null}"#).unwrap_err();
        match err {
            Error::Api { code, message } => {
                assert_eq!(code, 1001);
                assert_eq!(message, "");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn numeric_string_ret_is_api_error() {
        let err = extract(Endpoint::FaceAge, r#"{"ret":"1001","msg":"bad"}"#).unwrap_err();
        assert!(matches!(err, Error::Api { code: 1001, ref message } if message == "bad"));

        let err = extract(Endpoint::TextTrans, r#"{"ret":" 16389 ","msg":{"why":"quota"}}"#)
            .unwrap_err();
        match err {
            Error::Api { code, message } => {
                assert_eq!(code, 16389);
                assert_eq!(message, r#"{"why":"quota"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_ret_reads_as_success() {
        let body = r#"{"ret":"ok","msg":"","data":{"image":"xyz"}}"#;
        assert_eq!(extract(Endpoint::FaceMerge, body).unwrap(), "xyz");
        assert_eq!(leading_int("42abc"), 42);
        assert_eq!(leading_int("-3"), -3);
        assert_eq!(leading_int(""), 0);
    }

    #[test]
    fn non_positive_ret_is_not_an_error() {
        let env = Envelope::parse(r#"{"ret":-1,"msg":"","data":{}}"#).unwrap();
        assert!(!env.is_error());
    }
}
