//! Integration tests for the request pipeline
//!
//! Pacer, signer, transport and envelope interpretation driven through the
//! public dispatcher API against a scripted transport.

mod common;

use cdc_rest::{
    AdaptivePacer, ClientConfig, Dispatcher, HttpMethod, PacerHooks, Params, ProtocolVariant,
    RestError, TransportError, WaitInfo,
};
use cdc_types::RateBudget;
use common::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn dispatcher(variant: ProtocolVariant, config: ClientConfig) -> (Dispatcher, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::new();
    (Dispatcher::with_transport(variant, config, transport.clone()), transport)
}

fn recording_hooks() -> (PacerHooks, Arc<Mutex<Vec<WaitInfo>>>, Arc<AtomicUsize>) {
    let waits = Arc::new(Mutex::new(Vec::new()));
    let cooldowns = Arc::new(AtomicUsize::new(0));
    let hooks = {
        let waits = waits.clone();
        let cooldowns = cooldowns.clone();
        PacerHooks::new()
            .on_wait(move |info| {
                waits.lock().push(info.clone());
                Ok(())
            })
            .on_cooldown(move |_, _| {
                cooldowns.fetch_add(1, Ordering::SeqCst);
            })
    };
    (hooks, waits, cooldowns)
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limit_rejection_is_retried_after_cooldown() {
    let (hooks, waits, cooldowns) = recording_hooks();
    let config = config()
        .with_rate_budget(RateBudget::defaults())
        .with_pacer_hooks(hooks);
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config);
    transport
        .respond(429, "")
        .ok(v2_ok(r#"{"accounts":[{"currency":"CRO","balance":"1"}]}"#));

    let start = Instant::now();
    let payload = dispatcher
        .post("private/get-account-summary", Params::new(), 0.0)
        .await
        .unwrap();

    assert_eq!(payload["accounts"][0]["currency"], "CRO");
    assert_eq!(cooldowns.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() >= Duration::from_secs(60));

    let waits = waits.lock();
    assert_eq!(waits.len(), 1);
    assert!(waits[0].cooldown);

    // every attempt is signed with its own nonce
    let first = transport.json_body(0);
    let second = transport.json_body(1);
    assert_ne!(first["nonce"], second["nonce"]);
    assert_ne!(first["sig"], second["sig"]);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_applies_to_one_request() {
    let (hooks, waits, _) = recording_hooks();
    let config = config()
        .with_rate_budget(RateBudget::new(10.0, 0.5))
        .with_pacer_hooks(hooks);
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config);
    transport
        .respond(429, "")
        .ok(v2_ok("{}"))
        .ok(v2_ok("{}"));

    dispatcher.get("public/get-ticker", Params::new()).await.unwrap();
    dispatcher.get("public/get-ticker", Params::new()).await.unwrap();

    let waits = waits.lock();
    assert_eq!(waits.len(), 2);
    assert!(waits[0].cooldown);
    assert_eq!(waits[0].rate, 0.5);
    assert_eq!(waits[0].delay, Duration::from_secs(2));
    assert!(!waits[1].cooldown);
    assert_eq!(waits[1].rate, 10.0);
    assert_eq!(waits[1].delay, Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_requests_are_spaced_by_requested_rate() {
    let config = config().with_rate_budget(RateBudget::defaults());
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config);
    transport.ok(v2_ok("{}")).ok(v2_ok("{}"));

    let start = Instant::now();
    dispatcher
        .post("private/get-trades", Params::new(), 2.0)
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(500));

    dispatcher
        .post("private/get-trades", Params::new(), 2.0)
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_shared_pacer_spaces_concurrent_calls() {
    let pacer = Arc::new(AdaptivePacer::new(RateBudget::new(4.0, 1.0)));
    let transport = ScriptedTransport::new();
    for _ in 0..3 {
        transport.ok(v2_ok("{}"));
    }
    let dispatcher = Arc::new(Dispatcher::from_parts(
        ProtocolVariant::V2,
        config(),
        transport.clone(),
        pacer,
    ));

    let start = Instant::now();
    let calls = (0..3).map(|_| {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.get("public/get-instruments", Params::new()).await })
    });
    for call in calls.collect::<Vec<_>>() {
        call.await.unwrap().unwrap();
    }

    assert_eq!(transport.requests().len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_dispatchers_sharing_a_pacer_keep_spacing() {
    let pacer = Arc::new(AdaptivePacer::new(RateBudget::new(2.0, 1.0)));
    let transport = ScriptedTransport::new();
    for _ in 0..3 {
        transport.ok(v2_ok("{}"));
    }
    let first = Dispatcher::from_parts(
        ProtocolVariant::V2,
        config(),
        transport.clone(),
        pacer.clone(),
    );
    let second = Dispatcher::from_parts(ProtocolVariant::V2, config(), transport.clone(), pacer);

    first
        .get("public/get-instruments", Params::new())
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        first.get("public/get-instruments", Params::new()),
        second.get("public/get-instruments", Params::new()),
    );
    a.unwrap();
    b.unwrap();

    let gaps = transport.send_gaps();
    assert_eq!(gaps.len(), 2);
    for gap in &gaps {
        assert!(*gap >= Duration::from_millis(500), "{gaps:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_retry_ceiling() {
    let config = config().with_max_rate_limit_retries(2);
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V1, config);
    for _ in 0..3 {
        transport.respond(429, "");
    }

    let err = dispatcher
        .post("openOrders", Params::new(), 0.0)
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert!(matches!(
        err,
        RestError::RateLimitRetriesExhausted { attempts: 3, .. }
    ));
    assert_eq!(transport.requests().len(), 3);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_application_error_names_the_call() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport.ok(r#"{"code":10001,"message":"INVALID_PARAM"}"#);

    let params = Params::new().with("instrument_name", "ETH_BTC");
    let err = dispatcher.get("public/get-book", params).await.unwrap_err();

    let text = err.to_string();
    assert!(text.contains("INVALID_PARAM"));
    assert!(text.contains("public/get-book"));
    assert_eq!(text, "GET public/get-book?instrument_name=ETH_BTC INVALID_PARAM");
}

#[tokio::test]
async fn test_details_take_priority_over_message() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport.respond(
        400,
        r#"{"code":213,"message":"INVALID_ORDERID","details":"order 42 not found"}"#,
    );

    let err = dispatcher
        .post("private/get-order-detail", Params::new(), 0.0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "POST private/get-order-detail order 42 not found");
}

#[tokio::test]
async fn test_v1_failure_message() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V1, config());
    transport.ok(r#"{"code":"100004","msg":"request parameter illegal","data":null}"#);

    let err = dispatcher
        .post("order", Params::new().with("symbol", "ethbtc"), 0.0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "POST order request parameter illegal");
}

#[tokio::test]
async fn test_non_success_status_without_envelope() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport.respond(502, "<html>bad gateway</html>");

    let err = dispatcher
        .get("public/get-instruments", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::HttpStatus { status: 502, .. }));
    assert_eq!(err.to_string(), "GET public/get-instruments 502");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport.ok("{not json");

    let err = dispatcher
        .get("public/get-instruments", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Decode(_)));
}

#[tokio::test]
async fn test_array_success_body_is_a_decode_error() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport.ok("[]").ok("[1,2]");

    for _ in 0..2 {
        let err = dispatcher
            .get("public/get-instruments", Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::Decode(_)));
    }
}

#[tokio::test]
async fn test_transport_errors_are_not_retried() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport
        .fail(TransportError::Timeout(Duration::from_secs(30)))
        .ok(v2_ok("{}"));

    let err = dispatcher
        .get("public/get-instruments", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Transport(TransportError::Timeout(_))));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.unused(), 1);
}

#[tokio::test]
async fn test_private_call_without_credentials() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, ClientConfig::new());
    let err = dispatcher
        .post("private/get-account-summary", Params::new(), 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::AuthRequired));
    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_wait_hook_can_veto() {
    let hooks = PacerHooks::new().on_wait(|info| {
        if info.cooldown {
            Err("no cooldown waits".to_string())
        } else {
            Ok(())
        }
    });
    let config = config()
        .with_rate_budget(RateBudget::defaults())
        .with_pacer_hooks(hooks);
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config);
    transport.respond(429, "").ok(v2_ok("{}"));

    let err = dispatcher
        .post("private/create-order", Params::new(), 150.0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RestError::Vetoed {
            method: HttpMethod::Post,
            ..
        }
    ));
    assert_eq!(transport.requests().len(), 1);
}

// =============================================================================
// Wire format
// =============================================================================

#[tokio::test]
async fn test_v2_signed_body() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config());
    transport.ok(v2_ok("{}"));

    let params = Params::new()
        .with("instrument_name", "ETH_BTC")
        .with("client_oid", "");
    dispatcher
        .post("private/get-open-orders", params, 30.0)
        .await
        .unwrap();

    let request = transport.request(0);
    assert_eq!(request.url, "https://api.crypto.com/v2/private/get-open-orders");
    assert_eq!(request.content_type, Some("application/json"));

    let body = transport.json_body(0);
    assert_eq!(body["method"], "private/get-open-orders");
    assert_eq!(body["api_key"], "key");
    assert_eq!(body["params"]["instrument_name"], "ETH_BTC");
    assert_eq!(body["sig"].as_str().unwrap().len(), 64);
    assert!(body["nonce"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_v1_signed_form() {
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V1, config());
    transport.ok(v1_ok("{}"));

    dispatcher
        .post("account", Params::new(), 30.0)
        .await
        .unwrap();

    let request = transport.request(0);
    assert_eq!(request.url, "https://api.crypto.com/v1/account");
    assert_eq!(request.content_type, Some("application/x-www-form-urlencoded"));

    let form = transport.form_body(0);
    assert_eq!(field(&form, "api_key"), Some("key"));
    assert!(field(&form, "time").is_some());
    assert_eq!(field(&form, "sign").map(str::len), Some(64));
}

#[tokio::test]
async fn test_custom_base_url() {
    let config = config().with_base_url("http://localhost:8080/v2");
    let (dispatcher, transport) = dispatcher(ProtocolVariant::V2, config);
    transport.ok(v2_ok("{}"));

    dispatcher
        .get("public/get-ticker", Params::new().with("instrument_name", "CRO_USDT"))
        .await
        .unwrap();
    assert_eq!(
        transport.request(0).url,
        "http://localhost:8080/v2/public/get-ticker?instrument_name=CRO_USDT"
    );
}
