//! Request dispatcher
//!
//! Composes pacer, signer, transport and envelope interpretation. One logical
//! call loops over attempts:
//!
//! 1. take the attempt slot (attempts from one dispatcher never overlap)
//! 2. let the pacer wait
//! 3. sign POST requests with a fresh nonce
//! 4. send; the pacer records the attempt when it ends, success or not
//! 5. on HTTP 429 enter cooldown and go back to 1
//! 6. otherwise interpret the envelope
//!
//! Retrying is only ever done for 429. POST requests are not idempotent:
//! an order whose 429 response was produced after the exchange accepted it
//! will be placed again by the retry. Set
//! [`ClientConfig::with_max_rate_limit_retries`] to bound the loop.

use cdc_auth::{generate_nonce, Credentials, Params, RequestSigner};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{RestError, RestResult};
use crate::pacer::{AdaptivePacer, Pacer};
use crate::protocol::ProtocolVariant;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// HTTP status signalling a rate-limit rejection
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Calls `after_request` when an attempt goes out of scope
struct AttemptGuard<'a>(&'a dyn Pacer);

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.0.after_request();
    }
}

/// Request dispatcher for one protocol variant
pub struct Dispatcher {
    variant: ProtocolVariant,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    pacer: Arc<dyn Pacer>,
    credentials: Option<Credentials>,
    max_rate_limit_retries: Option<u32>,
    attempt_slot: tokio::sync::Mutex<()>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("variant", &self.variant)
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .finish()
    }
}

fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

impl Dispatcher {
    /// Create a dispatcher with a `reqwest` transport and an [`AdaptivePacer`]
    pub fn new(variant: ProtocolVariant, config: ClientConfig) -> RestResult<Self> {
        let transport = ReqwestTransport::new(config.timeout(), config.user_agent())?;
        Ok(Self::with_transport(variant, config, Arc::new(transport)))
    }

    /// Create a dispatcher with a custom transport
    pub fn with_transport(
        variant: ProtocolVariant,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let pacer = Arc::new(AdaptivePacer::with_hooks(
            config.rate_budget,
            config.pacer_hooks.clone(),
        ));
        Self::from_parts(variant, config, transport, pacer)
    }

    /// Create a dispatcher from explicit transport and pacer
    ///
    /// The rate budget and hooks in `config` are ignored; the pacer owns them.
    pub fn from_parts(
        variant: ProtocolVariant,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        let base_url = normalize_base_url(config.base_url.as_deref().unwrap_or(variant.base_url()));
        Self {
            variant,
            base_url,
            transport,
            pacer,
            credentials: config.credentials,
            max_rate_limit_retries: config.max_rate_limit_retries,
            attempt_slot: tokio::sync::Mutex::new(()),
        }
    }

    /// Protocol variant
    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }

    /// Base URL, ending in `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the dispatcher has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Public, unsigned GET at the normal rate
    pub async fn get(&self, path: &str, params: Params) -> RestResult<Value> {
        self.call(HttpMethod::Get, path, params, 0.0).await
    }

    /// Signed POST at `rate` requests per second (0 for the normal rate)
    pub async fn post(&self, path: &str, params: Params, rate: f64) -> RestResult<Value> {
        self.call(HttpMethod::Post, path, params, rate).await
    }

    /// Dispatch a call and return the envelope payload
    #[instrument(skip(self, params))]
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        params: Params,
        requested_rate: f64,
    ) -> RestResult<Value> {
        let credentials = match method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(self.credentials.as_ref().ok_or(RestError::AuthRequired)?),
        };

        let target = match method {
            HttpMethod::Get => {
                let query = params.to_urlencoded()?;
                if query.is_empty() {
                    path.to_string()
                } else {
                    format!("{}?{}", path, query)
                }
            }
            HttpMethod::Post => path.to_string(),
        };
        let url = format!("{}{}", self.base_url, target);

        let mut rejections: u32 = 0;
        loop {
            let response = {
                let _slot = self.attempt_slot.lock().await;
                self.pacer.before_request(method, path, requested_rate).await?;
                let _attempt = AttemptGuard(self.pacer.as_ref());

                let request = self.build_request(method, &url, path, &params, credentials)?;
                debug!(url = %request.url, "sending request");
                self.transport.send(request).await?
            };

            if response.status == TOO_MANY_REQUESTS {
                rejections += 1;
                self.pacer.on_rate_limit_rejection(method, path);
                warn!(rejections, "rate limited, retrying");

                if let Some(max) = self.max_rate_limit_retries {
                    if rejections > max {
                        return Err(RestError::RateLimitRetriesExhausted {
                            method,
                            path: path.to_string(),
                            attempts: rejections,
                        });
                    }
                }
                continue;
            }

            return self.interpret(method, target, response);
        }
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: &str,
        path: &str,
        params: &Params,
        credentials: Option<&Credentials>,
    ) -> RestResult<HttpRequest> {
        match (method, credentials) {
            (HttpMethod::Get, _) => Ok(HttpRequest::get(url)),
            (HttpMethod::Post, Some(credentials)) => {
                let signer = RequestSigner::new(credentials, self.variant.signing_scheme());
                let signed = signer.sign(path, params.clone(), generate_nonce());
                let (body, content_type) = self.variant.encode_body(&signed)?;
                Ok(HttpRequest::post(url, body, content_type))
            }
            (HttpMethod::Post, None) => Err(RestError::AuthRequired),
        }
    }

    fn interpret(
        &self,
        method: HttpMethod,
        target: String,
        response: HttpResponse,
    ) -> RestResult<Value> {
        match Envelope::parse(self.variant, &response.body) {
            Ok(envelope) if !envelope.is_success() => {
                let error = envelope.to_api_error();
                warn!(%method, %target, code = error.code, message = %error.message, "exchange error");
                Err(RestError::Api {
                    method,
                    target,
                    error,
                })
            }
            Ok(envelope) if response.is_success() => Ok(envelope.into_payload()),
            Err(e) if response.is_success() => Err(RestError::Decode(e)),
            _ => Err(RestError::HttpStatus {
                method,
                target,
                status: response.status,
            }),
        }
    }
}

/// Deserialize a payload; a missing payload decodes like an empty object
pub fn decode<T: DeserializeOwned>(payload: Value) -> RestResult<T> {
    let payload = match payload {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    Ok(serde_json::from_value(payload)?)
}
