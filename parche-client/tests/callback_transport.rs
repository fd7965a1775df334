// parche-client/tests/callback_transport.rs
// Callback-style transport behaviour against scripted script loaders

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use parche_client::{CallbackTransport, ClientError, ClientResult, ScriptLoader, Transport, Url};
use serde_json::json;

/// Answers like the real backend: `<callback>(<payload>);`
#[derive(Debug, Default)]
struct EchoLoader {
    payload: serde_json::Value,
    requested: Mutex<Vec<Url>>,
}

#[async_trait]
impl ScriptLoader for EchoLoader {
    async fn load(&self, src: &Url) -> ClientResult<String> {
        self.requested.lock().unwrap().push(src.clone());
        let callback = src
            .query_pairs()
            .find(|(k, _)| k == "callback")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        Ok(format!("{}({});", callback, self.payload))
    }
}

#[derive(Debug)]
struct HangingLoader;

#[async_trait]
impl ScriptLoader for HangingLoader {
    async fn load(&self, _src: &Url) -> ClientResult<String> {
        std::future::pending::<ClientResult<String>>().await
    }
}

#[derive(Debug)]
struct BrokenLoader;

#[async_trait]
impl ScriptLoader for BrokenLoader {
    async fn load(&self, _src: &Url) -> ClientResult<String> {
        Err(ClientError::ScriptLoad("HTTP 404 Not Found".into()))
    }
}

#[derive(Debug)]
struct WrongCallbackLoader;

#[async_trait]
impl ScriptLoader for WrongCallbackLoader {
    async fn load(&self, _src: &Url) -> ClientResult<String> {
        Ok(r#"cb_0_other({"success":true})"#.to_string())
    }
}

fn api_url() -> Url {
    Url::parse("https://script.example.test/macros/s/abc/exec?action=getSedes").unwrap()
}

#[tokio::test]
async fn test_callback_fires_and_cleans_up() {
    let loader = Arc::new(EchoLoader {
        payload: json!({"success": true, "sedes": []}),
        ..Default::default()
    });
    let transport = CallbackTransport::new(loader.clone(), Duration::from_secs(2));

    let value = transport.call(&api_url()).await.unwrap();
    assert_eq!(value, json!({"success": true, "sedes": []}));
    assert_eq!(transport.pending_callbacks(), 0);
    assert_eq!(transport.injected_scripts(), 0);

    let requested = loader.requested.lock().unwrap();
    assert_eq!(requested.len(), 1);
    let query = requested[0].query().unwrap();
    assert!(query.starts_with("action=getSedes&callback=cb_"));
}

#[tokio::test]
async fn test_timeout_rejects_without_residue() {
    let transport = CallbackTransport::new(Arc::new(HangingLoader), Duration::from_millis(50));

    let err = transport.call(&api_url()).await.unwrap_err();
    assert!(matches!(err, ClientError::CallbackTimeout(d) if d == Duration::from_millis(50)));
    assert_eq!(transport.pending_callbacks(), 0);
    assert_eq!(transport.injected_scripts(), 0);
}

#[tokio::test]
async fn test_load_error_rejects_without_residue() {
    let transport = CallbackTransport::new(Arc::new(BrokenLoader), Duration::from_secs(2));

    let err = transport.call(&api_url()).await.unwrap_err();
    assert!(matches!(err, ClientError::ScriptLoad(_)));
    assert_eq!(transport.pending_callbacks(), 0);
    assert_eq!(transport.injected_scripts(), 0);
}

#[tokio::test]
async fn test_script_calling_another_function_is_a_failure() {
    let transport = CallbackTransport::new(Arc::new(WrongCallbackLoader), Duration::from_secs(2));

    let err = transport.call(&api_url()).await.unwrap_err();
    assert!(matches!(err, ClientError::ScriptLoad(_)));
    assert!(transport.registry().is_empty());
    assert_eq!(transport.injected_scripts(), 0);
}

#[tokio::test]
async fn test_cancelled_call_leaves_no_residue() {
    let transport = CallbackTransport::new(Arc::new(HangingLoader), Duration::from_secs(30));

    let cancelled =
        tokio::time::timeout(Duration::from_millis(20), transport.call(&api_url())).await;
    assert!(cancelled.is_err());
    assert_eq!(transport.pending_callbacks(), 0);
    assert_eq!(transport.injected_scripts(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_get_their_own_callbacks() {
    let loader = Arc::new(EchoLoader {
        payload: json!({"success": true}),
        ..Default::default()
    });
    let transport = CallbackTransport::new(loader.clone(), Duration::from_secs(2));

    let (url_a, url_b) = (api_url(), api_url());
    let (a, b) = tokio::join!(transport.call(&url_a), transport.call(&url_b));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(transport.pending_callbacks(), 0);

    let requested = loader.requested.lock().unwrap();
    let names: Vec<String> = requested
        .iter()
        .filter_map(|u| u.query_pairs().find(|(k, _)| k == "callback").map(|(_, v)| v.into_owned()))
        .collect();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
}
