//! Request signing
//!
//! Two schemes are in use across the exchange's API generations:
//!
//! - **HMAC-SHA256** (v2): the canonical string is
//!   `method + id + api_key + Σ(name + value) + nonce`, signed with
//!   HMAC-SHA256 keyed by the secret.
//! - **SHA256 with secret suffix** (v1): the API key and timestamp travel as
//!   ordinary parameters (`api_key`, `time`); the canonical string is
//!   `Σ(name + value)` and the signature is `SHA256(canonical + secret)`.
//!
//! Both produce lowercase hex. Signing is a pure function of its inputs; the
//! nonce is passed in so tests can fix it.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::params::Params;

type HmacSha256 = Hmac<Sha256>;

/// Request id sent with every v2 call
pub const REQUEST_ID: u64 = 0;
/// v1 parameter carrying the API key
pub const V1_API_KEY_FIELD: &str = "api_key";
/// v1 parameter carrying the millisecond timestamp
pub const V1_TIME_FIELD: &str = "time";

/// Signature algorithm and field composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// v2: HMAC-SHA256 over method, id, key, parameters and nonce
    HmacSha256,
    /// v1: SHA256 over parameters (key and time included) followed by the secret
    Sha256SecretSuffix,
}

/// A signed request, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    /// Endpoint path, doubling as the v2 method name
    pub path: String,
    /// Request id (v2)
    pub id: u64,
    /// Parameters as they must be transmitted
    ///
    /// For the v1 scheme this includes `api_key` and `time`.
    pub params: Params,
    /// API key
    pub api_key: String,
    /// Millisecond nonce / timestamp
    pub nonce: u64,
    /// Lowercase hex signature
    pub signature: String,
}

/// Build the canonical string that gets signed
///
/// For [`SigningScheme::Sha256SecretSuffix`] `params` must already contain the
/// key and time fields; `api_key` and `nonce` are not appended separately.
pub fn canonical_string(
    scheme: SigningScheme,
    path: &str,
    id: u64,
    api_key: &str,
    params: &Params,
    nonce: u64,
) -> String {
    match scheme {
        SigningScheme::HmacSha256 => {
            let mut out = String::with_capacity(path.len() + api_key.len() + 64);
            out.push_str(path);
            out.push_str(&id.to_string());
            out.push_str(api_key);
            out.push_str(&params.canonical_concat());
            out.push_str(&nonce.to_string());
            out
        }
        SigningScheme::Sha256SecretSuffix => params.canonical_concat(),
    }
}

/// Request signer bound to a set of credentials
#[derive(Debug, Clone, Copy)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    scheme: SigningScheme,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    pub fn new(credentials: &'a Credentials, scheme: SigningScheme) -> Self {
        Self {
            credentials,
            scheme,
        }
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Signing scheme in use
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Sign a request for `path` with the given parameters and nonce
    pub fn sign(&self, path: &str, mut params: Params, nonce: u64) -> SignedRequest {
        let api_key = self.credentials.api_key().to_string();

        if self.scheme == SigningScheme::Sha256SecretSuffix {
            params.insert(V1_API_KEY_FIELD, api_key.as_str());
            params.insert(V1_TIME_FIELD, nonce);
        }

        let canonical = canonical_string(self.scheme, path, REQUEST_ID, &api_key, &params, nonce);
        let signature = self.digest(&canonical);

        tracing::trace!(path, nonce, "signed request");

        SignedRequest {
            path: path.to_string(),
            id: REQUEST_ID,
            params,
            api_key,
            nonce,
            signature,
        }
    }

    fn digest(&self, canonical: &str) -> String {
        let secret = self.credentials.secret();
        match self.scheme {
            SigningScheme::HmacSha256 => {
                let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                    .expect("HMAC can take key of any size");
                mac.update(canonical.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            SigningScheme::Sha256SecretSuffix => {
                let mut hasher = Sha256::new();
                hasher.update(canonical.as_bytes());
                hasher.update(secret.as_bytes());
                hex::encode(hasher.finalize())
            }
        }
    }
}
