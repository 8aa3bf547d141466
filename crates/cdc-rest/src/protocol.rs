//! Protocol variants
//!
//! Both API generations share one pipeline. Everything that differs between
//! them (base URL, how a signed request is put on the wire, what a
//! successful envelope looks like) is answered by [`ProtocolVariant`].

use cdc_auth::{SignedRequest, SigningScheme};
use serde::Serialize;

use crate::error::{RestError, RestResult};
use crate::transport::{CONTENT_TYPE_FORM, CONTENT_TYPE_JSON};

/// v1 REST base URL
pub const V1_BASE_URL: &str = "https://api.crypto.com/v1/";
/// v2 REST base URL
pub const V2_BASE_URL: &str = "https://api.crypto.com/v2/";

/// How a signed request body is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/x-www-form-urlencoded`
    Form,
    /// `application/json`
    Json,
}

/// API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVariant {
    /// Legacy API: form bodies, SHA256 with secret suffix, `{code, msg, data}`
    V1,
    /// Current API: JSON bodies, HMAC-SHA256, `{code, message, result}`
    V2,
}

/// JSON request body used by v2
#[derive(Serialize)]
struct JsonRequest<'a> {
    id: u64,
    method: &'a str,
    api_key: &'a str,
    params: &'a cdc_auth::Params,
    sig: &'a str,
    nonce: u64,
}

impl ProtocolVariant {
    /// Default base URL, always ending in `/`
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::V1 => V1_BASE_URL,
            Self::V2 => V2_BASE_URL,
        }
    }

    /// Signing scheme
    pub fn signing_scheme(&self) -> SigningScheme {
        match self {
            Self::V1 => SigningScheme::Sha256SecretSuffix,
            Self::V2 => SigningScheme::HmacSha256,
        }
    }

    /// Body encoding for signed requests
    pub fn body_format(&self) -> BodyFormat {
        match self {
            Self::V1 => BodyFormat::Form,
            Self::V2 => BodyFormat::Json,
        }
    }

    /// Name of the nonce / timestamp field
    pub fn nonce_field(&self) -> &'static str {
        match self {
            Self::V1 => cdc_auth::V1_TIME_FIELD,
            Self::V2 => "nonce",
        }
    }

    /// Name of the signature field
    pub fn signature_field(&self) -> &'static str {
        match self {
            Self::V1 => "sign",
            Self::V2 => "sig",
        }
    }

    /// Name of the envelope field holding the payload
    pub fn payload_field(&self) -> &'static str {
        match self {
            Self::V1 => "data",
            Self::V2 => "result",
        }
    }

    /// Encode a signed request into a body and its content type
    pub fn encode_body(&self, signed: &SignedRequest) -> RestResult<(String, &'static str)> {
        match self.body_format() {
            BodyFormat::Json => {
                let body = serde_json::to_string(&JsonRequest {
                    id: signed.id,
                    method: &signed.path,
                    api_key: &signed.api_key,
                    params: &signed.params,
                    sig: &signed.signature,
                    nonce: signed.nonce,
                })
                .map_err(|e| RestError::InvalidParameter(e.to_string()))?;
                Ok((body, CONTENT_TYPE_JSON))
            }
            BodyFormat::Form => {
                let params = signed
                    .params
                    .clone()
                    .with(self.signature_field(), signed.signature.as_str());
                Ok((params.to_urlencoded()?, CONTENT_TYPE_FORM))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdc_auth::{Credentials, Params, RequestSigner};

    const NONCE: u64 = 1587846358253;

    #[test]
    fn test_v2_json_body() {
        let creds = Credentials::new("key", "secret").unwrap();
        let signer = RequestSigner::new(&creds, ProtocolVariant::V2.signing_scheme());
        let signed = signer.sign(
            "private/get-order-detail",
            Params::new().with("order_id", "1234"),
            NONCE,
        );

        let (body, content_type) = ProtocolVariant::V2.encode_body(&signed).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(content_type, CONTENT_TYPE_JSON);
        assert_eq!(json["id"], 0);
        assert_eq!(json["method"], "private/get-order-detail");
        assert_eq!(json["api_key"], "key");
        assert_eq!(json["params"]["order_id"], "1234");
        assert_eq!(json["nonce"], NONCE);
        assert_eq!(json["sig"], signed.signature.as_str());
    }

    #[test]
    fn test_v2_body_refuses_inexact_decimal() {
        let creds = Credentials::new("key", "secret").unwrap();
        let signer = RequestSigner::new(&creds, ProtocolVariant::V2.signing_scheme());
        let signed = signer.sign(
            "private/create-order",
            Params::new().with("price", rust_decimal::Decimal::new(123456789012345678, 10)),
            NONCE,
        );

        let err = ProtocolVariant::V2.encode_body(&signed).unwrap_err();
        assert!(matches!(err, RestError::InvalidParameter(_)));
    }

    #[test]
    fn test_v1_form_body() {
        let creds = Credentials::new("key", "secret").unwrap();
        let signer = RequestSigner::new(&creds, ProtocolVariant::V1.signing_scheme());
        let signed = signer.sign("showOrder", Params::new().with("symbol", "ethbtc"), NONCE);

        let (body, content_type) = ProtocolVariant::V1.encode_body(&signed).unwrap();

        assert_eq!(content_type, CONTENT_TYPE_FORM);
        assert_eq!(
            body,
            format!(
                "api_key=key&sign={}&symbol=ethbtc&time={}",
                signed.signature, NONCE
            )
        );
    }

    #[test]
    fn test_variant_fields() {
        assert_eq!(ProtocolVariant::V1.nonce_field(), "time");
        assert_eq!(ProtocolVariant::V2.signature_field(), "sig");
        assert_eq!(ProtocolVariant::V1.payload_field(), "data");
        assert!(ProtocolVariant::V2.base_url().ends_with('/'));
    }
}
