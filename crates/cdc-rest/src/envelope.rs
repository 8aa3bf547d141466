//! Response envelope interpretation
//!
//! Every response body is a JSON object wrapping a status code, an optional
//! human-readable message and the payload:
//!
//! - v2: `{"code": 0, "message": "...", "details": "...", "result": {...}}`
//! - v1: `{"code": "0", "msg": "suc", "data": {...}}`
//!
//! Codes may be numbers or numeric strings.

use cdc_types::ExchangeApiError;
use serde::de::Unexpected;
use serde::Deserialize;
use serde_json::Value;

use crate::protocol::ProtocolVariant;

/// v1 success message
const V1_SUCCESS_MSG: &str = "suc";

#[derive(Debug, Default, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    msg: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

/// Decoded response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Status code as sent (number or string), if present
    pub code: Option<Value>,
    /// Most specific message available
    pub message: Option<String>,
    /// Payload (`result` or `data`), `Null` when absent
    pub payload: Value,
    success: bool,
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Numeric value of a code, accepting numeric strings
pub fn code_as_i64(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Envelope {
    /// Parse a response body
    pub fn parse(variant: ProtocolVariant, body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawEnvelope = match serde_json::from_str::<Value>(body)? {
            object @ Value::Object(_) => serde_json::from_value(object)?,
            other => {
                return Err(serde::de::Error::invalid_type(
                    unexpected(&other),
                    &"a response object",
                ))
            }
        };

        let message = raw
            .details
            .as_ref()
            .or(raw.message.as_ref())
            .or(raw.msg.as_ref())
            .map(text);

        let success = match &raw.code {
            None => true,
            Some(code) => {
                code_as_i64(code) == Some(0)
                    || (variant == ProtocolVariant::V1
                        && raw.msg.as_ref().and_then(Value::as_str) == Some(V1_SUCCESS_MSG))
            }
        };

        let payload = match variant {
            ProtocolVariant::V1 => raw.data,
            ProtocolVariant::V2 => raw.result,
        }
        .unwrap_or(Value::Null);

        Ok(Self {
            code: raw.code,
            message,
            payload,
            success,
        })
    }

    /// Returns true if the envelope reports success
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Message for a failed envelope: details, message, msg, then the code
    pub fn error_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.code.as_ref().map(text))
            .unwrap_or_default()
    }

    /// Structured exchange error for a failed envelope
    pub fn to_api_error(&self) -> ExchangeApiError {
        let code = self.code.as_ref().and_then(code_as_i64).unwrap_or(0);
        ExchangeApiError::new(code, self.error_message())
    }

    /// Consume the envelope and return its payload
    pub fn into_payload(self) -> Value {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v2_success() {
        let env = Envelope::parse(
            ProtocolVariant::V2,
            r#"{"id":0,"method":"public/get-ticker","code":0,"result":{"data":[]}}"#,
        )
        .unwrap();
        assert!(env.is_success());
        assert_eq!(env.into_payload(), json!({"data": []}));
    }

    #[test]
    fn test_v2_error_message_priority() {
        let env = Envelope::parse(
            ProtocolVariant::V2,
            r#"{"code":10001,"message":"SYS_ERROR","details":"instrument missing"}"#,
        )
        .unwrap();
        assert!(!env.is_success());
        assert_eq!(env.error_message(), "instrument missing");

        let env = Envelope::parse(ProtocolVariant::V2, r#"{"code":10001,"message":"INVALID_PARAM"}"#)
            .unwrap();
        assert_eq!(env.error_message(), "INVALID_PARAM");
        assert_eq!(env.to_api_error().code, 10001);

        let env = Envelope::parse(ProtocolVariant::V2, r#"{"code":40101}"#).unwrap();
        assert_eq!(env.error_message(), "40101");
    }

    #[test]
    fn test_v1_string_codes() {
        let ok = Envelope::parse(
            ProtocolVariant::V1,
            r#"{"code":"0","msg":"suc","data":{"order_id":7}}"#,
        )
        .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.payload["order_id"], 7);

        let err = Envelope::parse(
            ProtocolVariant::V1,
            r#"{"code":"100004","msg":"request parameter illegal","data":null}"#,
        )
        .unwrap();
        assert!(!err.is_success());
        assert_eq!(err.error_message(), "request parameter illegal");
        assert_eq!(err.to_api_error().code, 100004);
        assert_eq!(err.payload, Value::Null);
    }

    #[test]
    fn test_missing_code_is_success() {
        let env = Envelope::parse(ProtocolVariant::V2, r#"{"result":{"x":1}}"#).unwrap();
        assert!(env.is_success());
    }

    #[test]
    fn test_malformed_body() {
        assert!(Envelope::parse(ProtocolVariant::V2, "<html>").is_err());
        assert!(Envelope::parse(ProtocolVariant::V2, "[1,2]").is_err());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        for body in ["[]", "[0, \"suc\", {}]", "null", "0", "\"ok\""] {
            assert!(Envelope::parse(ProtocolVariant::V2, body).is_err(), "{body}");
            assert!(Envelope::parse(ProtocolVariant::V1, body).is_err(), "{body}");
        }
        let err = Envelope::parse(ProtocolVariant::V2, "[]").unwrap_err();
        assert!(err.to_string().contains("a response object"));
    }
}
