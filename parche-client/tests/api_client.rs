// parche-client/tests/api_client.rs
// ApiClient request building and envelope handling over a scripted transport

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parche_client::{
    ApiClient, ClientError, ClientResult, Rating, RatingSubmission, TablePolicy, Transport, Url,
};
use serde_json::{Value, json};

const BASE: &str = "https://script.example.test/macros/s/abc/exec";

/// Answers by `action` and records every URL it saw
#[derive(Debug, Default)]
struct ScriptedTransport {
    answers: HashMap<String, Value>,
    seen: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    fn with(mut self, action: &str, answer: Value) -> Self {
        self.answers.insert(action.to_string(), answer);
        self
    }

    fn last_query(&self) -> HashMap<String, String> {
        self.seen
            .lock()
            .unwrap()
            .last()
            .map(|u| u.query_pairs().into_owned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn call(&self, url: &Url) -> ClientResult<Value> {
        self.seen.lock().unwrap().push(url.clone());
        let action = url
            .query_pairs()
            .find(|(k, _)| k == "action")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        self.answers
            .get(&action)
            .cloned()
            .ok_or(ClientError::Unreachable)
    }
}

fn client(transport: Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::with_transport(BASE, transport).unwrap()
}

fn submission() -> RatingSubmission {
    RatingSubmission {
        codigo_pv: "STORE_A".into(),
        numero_factura: "FE-0042".into(),
        numero_mesa: "12".into(),
        servicio: Rating::new(5).unwrap(),
        comida: Rating::new(4).unwrap(),
        infraestructura: Rating::new(3).unwrap(),
        musica: Rating::new(5).unwrap(),
        comentario: "Excelente atención & música".into(),
    }
}

#[tokio::test]
async fn test_fetch_config_decodes_policy() {
    let transport = Arc::new(ScriptedTransport::default().with(
        "getConfig",
        json!({
            "success": true,
            "config": {
                "nombre_marca": "Acme",
                "nombre_pv": "Centro",
                "solicitar_mesa": "OBLIGATORIO",
                "solicitar_factura": false
            }
        }),
    ));
    let api = client(transport.clone());

    let config = api.fetch_config("STORE_A").await.unwrap();
    assert_eq!(config.nombre_marca.as_deref(), Some("Acme"));
    assert_eq!(config.nombre_pv.as_deref(), Some("Centro"));
    assert_eq!(config.solicitar_mesa, TablePolicy::Required);
    assert!(!config.solicitar_factura);

    let query = transport.last_query();
    assert_eq!(query["action"], "getConfig");
    assert_eq!(query["codigo_pv"], "STORE_A");
}

#[tokio::test]
async fn test_fetch_config_failure_carries_backend_error() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .with("getConfig", json!({"success": false, "error": "Sede no encontrada"})),
    );
    let err = client(transport).fetch_config("NOPE").await.unwrap_err();
    assert!(err.is_api());
    assert_eq!(err.to_string(), "Sede no encontrada");
}

#[tokio::test]
async fn test_fetch_config_failure_without_message() {
    let transport =
        Arc::new(ScriptedTransport::default().with("getConfig", json!({"success": false})));
    let err = client(transport).fetch_config("NOPE").await.unwrap_err();
    assert_eq!(err.to_string(), "Error desconocido");
}

#[tokio::test]
async fn test_fetch_sites() {
    let transport = Arc::new(ScriptedTransport::default().with(
        "getSedes",
        json!({
            "success": true,
            "sedes": [
                {"codigo_pv": "PV01", "nombre_pv": "Centro", "nombre_marca": "Acme"},
                {"codigo_pv": "PV02", "nombre_pv": "Norte", "nombre_marca": "Acme"}
            ]
        }),
    ));
    let sites = client(transport).fetch_sites().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[1].codigo_pv, "PV02");
    assert_eq!(sites[0].label(), "Centro - Acme");
}

#[tokio::test]
async fn test_sheet_typed_values_decode() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .with(
                "getSedes",
                json!({
                    "success": true,
                    "sedes": [
                        {"codigo_pv": 101, "nombre_pv": null, "nombre_marca": "Acme"},
                        {"codigo_pv": "PV02", "nombre_pv": "Norte", "nombre_marca": 3}
                    ]
                }),
            )
            .with(
                "getConfig",
                json!({
                    "success": true,
                    "config": {
                        "nombre_marca": null,
                        "nombre_pv": 12,
                        "prefijo_factura": 2024,
                        "solicitar_mesa": null
                    }
                }),
            ),
    );
    let api = client(transport);

    let sites = api.fetch_sites().await.unwrap();
    assert_eq!(sites[0].codigo_pv, "101");
    assert_eq!(sites[0].nombre_pv, "");
    assert_eq!(sites[1].nombre_marca, "3");

    let config = api.fetch_config("101").await.unwrap();
    assert!(config.nombre_marca.is_none());
    assert_eq!(config.nombre_pv.as_deref(), Some("12"));
    assert_eq!(config.invoice_prefix(), "2024");
    assert_eq!(config.solicitar_mesa, TablePolicy::NotRequested);
}

#[tokio::test]
async fn test_save_rating_sends_every_field() {
    let transport = Arc::new(
        ScriptedTransport::default().with("saveRating", json!({"success": true, "row": 17})),
    );
    let api = client(transport.clone());

    let envelope = api.save_rating(&submission()).await.unwrap();
    assert_eq!(envelope.payload["row"], json!(17));

    let query = transport.last_query();
    assert_eq!(query["action"], "saveRating");
    assert_eq!(query["codigo_pv"], "STORE_A");
    assert_eq!(query["numero_factura"], "FE-0042");
    assert_eq!(query["numero_mesa"], "12");
    assert_eq!(query["servicio"], "5");
    assert_eq!(query["comida"], "4");
    assert_eq!(query["infraestructura"], "3");
    assert_eq!(query["musica"], "5");
    assert_eq!(query["comentario"], "Excelente atención & música");
}

#[tokio::test]
async fn test_save_rating_failure_surfaces_message() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .with("saveRating", json!({"success": false, "error": "cupo excedido"})),
    );
    let err = client(transport).save_rating(&submission()).await.unwrap_err();
    assert!(matches!(&err, ClientError::Api(msg) if msg == "cupo excedido"));
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let transport = Arc::new(ScriptedTransport::default());
    let err = client(transport).fetch_sites().await.unwrap_err();
    assert!(matches!(err, ClientError::Unreachable));
}

#[tokio::test]
async fn test_non_object_response_is_invalid() {
    let transport = Arc::new(ScriptedTransport::default().with("getSedes", json!([1, 2, 3])));
    let err = client(transport).fetch_sites().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[test]
fn test_invalid_base_url() {
    let err = ApiClient::with_transport("not a url", Arc::new(ScriptedTransport::default()))
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidUrl(_)));
}
