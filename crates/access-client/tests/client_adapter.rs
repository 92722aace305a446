//! Behaviour of `ClientAdapter` against scripted collaborators.
//!
//! Time is paused in the async tests so the 3000 ms authorization deadline
//! runs instantly.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use access_client::{
    authorize_if_enabled, AccessContext, AccessError, AccessTypeAdapter, AdapterConfig,
    ClientAdapter, ConfigError, Credentials, FetchInit, Page, Transport, TransportError,
    AUTHORIZATION_TIMEOUT, PINGBACK_CONTENT_TYPE,
};
use serde_json::{json, Value};

/// URL builder that records every call and answers with a fixed URL.
#[derive(Default)]
struct RecordingContext {
    calls: Mutex<Vec<(String, bool)>>,
    url: Option<String>,
    delay: Duration,
    fail: bool,
}

impl RecordingContext {
    fn returning(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AccessContext for RecordingContext {
    async fn build_url(&self, template: &str, use_auth_data: bool) -> Result<String, AccessError> {
        self.calls
            .lock()
            .unwrap()
            .push((template.to_string(), use_auth_data));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AccessError::UrlBuild("unknown variable".to_string()));
        }
        Ok(self.url.clone().unwrap_or_else(|| template.to_string()))
    }
}

/// Transport answering from a script of per-call delays.
struct ScriptedTransport {
    response: Value,
    delays: Mutex<VecDeque<Duration>>,
    fetches: Mutex<Vec<(String, FetchInit)>>,
    signals: Mutex<Vec<(String, FetchInit)>>,
    completed: AtomicUsize,
    origin_declared: bool,
    signal_delay: Duration,
}

impl ScriptedTransport {
    fn answering(response: Value) -> Self {
        Self {
            response,
            delays: Mutex::new(VecDeque::new()),
            fetches: Mutex::new(Vec::new()),
            signals: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
            origin_declared: true,
            signal_delay: Duration::ZERO,
        }
    }

    fn with_delays(self, delays: &[u64]) -> Self {
        *self.delays.lock().unwrap() = delays.iter().map(|ms| Duration::from_millis(*ms)).collect();
        self
    }

    fn next_delay(&self) -> Duration {
        self.delays.lock().unwrap().pop_front().unwrap_or_default()
    }

    fn check_origin(&self) -> Result<(), AccessError> {
        if self.origin_declared {
            Ok(())
        } else {
            Err(TransportError::SourceOriginMismatch {
                expected: "https://news.example".to_string(),
                actual: None,
            }
            .into())
        }
    }
}

impl Transport for ScriptedTransport {
    async fn fetch_json(&self, url: &str, init: &FetchInit) -> Result<Value, AccessError> {
        self.fetches
            .lock()
            .unwrap()
            .push((url.to_string(), init.clone()));
        let delay = self.next_delay();
        tokio::time::sleep(delay).await;
        self.check_origin()?;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }

    async fn send_signal(&self, url: &str, init: &FetchInit) -> Result<(), AccessError> {
        self.signals
            .lock()
            .unwrap()
            .push((url.to_string(), init.clone()));
        tokio::time::sleep(self.signal_delay).await;
        self.check_origin()
    }
}

fn page() -> Page {
    Page::parse("https://news.example/story").unwrap()
}

fn config() -> Value {
    json!({
        "authorization": "https://a.example/auth",
        "pingback": "https://a.example/ping",
    })
}

fn adapter(
    context: RecordingContext,
    transport: ScriptedTransport,
) -> (
    ClientAdapter<Arc<RecordingContext>, Arc<ScriptedTransport>>,
    Arc<RecordingContext>,
    Arc<ScriptedTransport>,
) {
    let context = Arc::new(context);
    let transport = Arc::new(transport);
    let adapter = ClientAdapter::new(&page(), &config(), context.clone(), transport.clone())
        .expect("valid config");
    (adapter, context, transport)
}

// ── Construction ──────────────────────────────────────────────────────

#[test]
fn construction_requires_both_urls() {
    let missing_auth = ClientAdapter::new(
        &page(),
        &json!({"pingback": "https://a.example/ping"}),
        RecordingContext::default(),
        ScriptedTransport::answering(json!({})),
    );
    assert!(matches!(
        missing_auth,
        Err(AccessError::Config(ConfigError::MissingUrl("authorization")))
    ));

    let missing_ping = ClientAdapter::new(
        &page(),
        &json!({"authorization": "https://a.example/auth"}),
        RecordingContext::default(),
        ScriptedTransport::answering(json!({})),
    );
    assert!(matches!(
        missing_ping,
        Err(AccessError::Config(ConfigError::MissingUrl("pingback")))
    ));
}

#[test]
fn construction_rejects_plain_http() {
    let result = ClientAdapter::new(
        &page(),
        &json!({"authorization": "https://a.example/auth", "pingback": "http://a.example/ping"}),
        RecordingContext::default(),
        ScriptedTransport::answering(json!({})),
    );
    assert!(matches!(
        result,
        Err(AccessError::Config(ConfigError::NotHttps { field: "pingback", .. }))
    ));
}

#[test]
fn construction_performs_no_io() {
    let (_adapter, context, transport) =
        adapter(RecordingContext::default(), ScriptedTransport::answering(json!({})));
    assert!(context.calls().is_empty());
    assert!(transport.fetches.lock().unwrap().is_empty());
    assert!(transport.signals.lock().unwrap().is_empty());
}

#[test]
fn get_config_returns_urls_verbatim() {
    let (adapter, _, _) =
        adapter(RecordingContext::default(), ScriptedTransport::answering(json!({})));

    let mut snapshot = adapter.get_config();
    assert_eq!(
        snapshot,
        AdapterConfig {
            authorization_url: "https://a.example/auth".to_string(),
            pingback_url: "https://a.example/ping".to_string(),
        }
    );

    snapshot.authorization_url = "https://evil.example/".to_string();
    assert_eq!(adapter.get_config().authorization_url, "https://a.example/auth");

    assert_eq!(
        adapter.config_json(),
        json!({
            "authorizationUrl": "https://a.example/auth",
            "pingbackUrl": "https://a.example/ping",
        })
    );
}

#[test]
fn authorization_is_always_enabled() {
    let (adapter, _, _) =
        adapter(RecordingContext::default(), ScriptedTransport::answering(json!({})));
    assert!(adapter.is_authorization_enabled());
    assert!(AccessTypeAdapter::is_authorization_enabled(&adapter));
}

// ── authorize ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn end_to_end_authorization() {
    let (adapter, _, transport) = adapter(
        RecordingContext::returning("https://a.example/auth?rid=1"),
        ScriptedTransport::answering(json!({"entitled": true})),
    );

    let entitlement = adapter.authorize().await.unwrap();
    assert_eq!(entitlement, json!({"entitled": true}));

    let fetches = transport.fetches.lock().unwrap();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].0, "https://a.example/auth?rid=1");
}

#[tokio::test(start_paused = true)]
async fn authorize_builds_url_without_auth_data() {
    let (adapter, context, _) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({})),
    );
    adapter.authorize().await.unwrap();
    assert_eq!(
        context.calls(),
        vec![("https://a.example/auth".to_string(), false)]
    );
}

#[tokio::test(start_paused = true)]
async fn authorize_requests_credentials_and_origin_check() {
    let (adapter, _, transport) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({})),
    );
    adapter.authorize().await.unwrap();

    let fetches = transport.fetches.lock().unwrap();
    let init = &fetches[0].1;
    assert_eq!(init.method, reqwest::Method::GET);
    assert_eq!(init.credentials, Credentials::Include);
    assert!(init.require_source_origin);
}

#[tokio::test(start_paused = true)]
async fn origin_check_failure_rejects() {
    let mut transport = ScriptedTransport::answering(json!({"entitled": true}));
    transport.origin_declared = false;
    let (adapter, _, _) = adapter(RecordingContext::default(), transport);

    let err = adapter.authorize().await.unwrap_err();
    assert!(matches!(
        err,
        AccessError::Transport(TransportError::SourceOriginMismatch { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn authorize_times_out_and_ignores_late_result() {
    let (adapter, _, transport) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({"entitled": true})).with_delays(&[10_000]),
    );

    let err = adapter.authorize().await.unwrap_err();
    assert!(matches!(err, AccessError::Timeout(d) if d == AUTHORIZATION_TIMEOUT));

    // The abandoned fetch never completes.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(transport.completed.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn fetch_just_under_deadline_succeeds() {
    let (adapter, _, _) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({"entitled": false})).with_delays(&[2_999]),
    );
    assert_eq!(adapter.authorize().await.unwrap(), json!({"entitled": false}));
}

#[tokio::test(start_paused = true)]
async fn url_building_time_is_not_counted() {
    let context = RecordingContext {
        delay: Duration::from_millis(2_500),
        ..RecordingContext::default()
    };
    let (adapter, _, _) = adapter(
        context,
        ScriptedTransport::answering(json!({"entitled": true})).with_delays(&[2_500]),
    );
    assert_eq!(adapter.authorize().await.unwrap(), json!({"entitled": true}));
}

#[tokio::test(start_paused = true)]
async fn url_build_failure_propagates_without_fetch() {
    let context = RecordingContext {
        fail: true,
        ..RecordingContext::default()
    };
    let (adapter, _, transport) = adapter(context, ScriptedTransport::answering(json!({})));

    assert!(matches!(
        adapter.authorize().await,
        Err(AccessError::UrlBuild(_))
    ));
    assert!(matches!(adapter.pingback().await, Err(AccessError::UrlBuild(_))));
    assert!(transport.fetches.lock().unwrap().is_empty());
    assert!(transport.signals.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn concurrent_authorizations_are_independent() {
    let (adapter, context, transport) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({"entitled": true})).with_delays(&[1_000, 5_000]),
    );

    let (first, second) = tokio::join!(adapter.authorize(), adapter.authorize());

    assert_eq!(first.unwrap(), json!({"entitled": true}));
    assert!(second.unwrap_err().is_timeout());
    assert_eq!(context.calls().len(), 2);
    assert_eq!(transport.fetches.lock().unwrap().len(), 2);
    assert_eq!(transport.completed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn host_helper_runs_enabled_authorization() {
    let (adapter, _, _) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({"entitled": true})),
    );
    assert_eq!(
        authorize_if_enabled(&adapter).await.unwrap(),
        Some(json!({"entitled": true}))
    );
}

// ── pingback ──────────────────────────────────────────────────────────

#[tokio::test]
async fn pingback_builds_url_with_auth_data() {
    let (adapter, context, _) = adapter(
        RecordingContext::default(),
        ScriptedTransport::answering(json!({})),
    );
    adapter.pingback().await.unwrap();
    assert_eq!(
        context.calls(),
        vec![("https://a.example/ping".to_string(), true)]
    );
}

#[tokio::test]
async fn pingback_sends_empty_form_post() {
    let (adapter, _, transport) = adapter(
        RecordingContext::returning("https://a.example/ping?rid=1&grant=full"),
        ScriptedTransport::answering(json!({})),
    );
    adapter.pingback().await.unwrap();

    let signals = transport.signals.lock().unwrap();
    assert_eq!(signals.len(), 1);
    let (url, init) = &signals[0];
    assert_eq!(url, "https://a.example/ping?rid=1&grant=full");
    assert_eq!(init.method, reqwest::Method::POST);
    assert_eq!(init.credentials, Credentials::Include);
    assert!(init.require_source_origin);
    assert_eq!(init.header("Content-Type"), Some(PINGBACK_CONTENT_TYPE));
    assert_eq!(init.body.as_deref(), Some(""));
    assert!(transport.fetches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn pingback_surfaces_origin_failure() {
    let mut transport = ScriptedTransport::answering(json!({}));
    transport.origin_declared = false;
    let (adapter, _, _) = adapter(RecordingContext::default(), transport);
    assert!(matches!(
        adapter.pingback().await,
        Err(AccessError::Transport(TransportError::SourceOriginMismatch { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn pingback_is_not_bounded_by_the_authorization_timeout() {
    let mut transport = ScriptedTransport::answering(json!({}));
    transport.signal_delay = Duration::from_secs(60);
    let (adapter, _, transport) = adapter(RecordingContext::default(), transport);

    let started = tokio::time::Instant::now();
    adapter.pingback().await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(60));
    assert!(started.elapsed() > AUTHORIZATION_TIMEOUT);
    assert_eq!(transport.signals.lock().unwrap().len(), 1);
}
