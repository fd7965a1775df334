//! API response envelope
//!
//! Every answer from the ratings API follows this shape:
//! ```json
//! { "success": true, "config": { ... } }
//! { "success": false, "error": "cupo excedido" }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized `{success, error, ...}` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Missing `success` counts as a failure
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Remaining fields (`config`, `sedes`, ...)
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ApiEnvelope {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Error message carried by a failed envelope, falling back to `default`
    /// when the backend sent none (or an empty one).
    pub fn error_message(&self, default: &str) -> String {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    /// Ok(self) when `success` is true, otherwise the error message
    pub fn into_result(self, default_error: &str) -> Result<Self, String> {
        if self.success {
            Ok(self)
        } else {
            Err(self.error_message(default_error))
        }
    }

    /// Take and decode one payload field
    pub fn take<T: DeserializeOwned>(&mut self, field: &str) -> Result<T, serde_json::Error> {
        let value = self.payload.remove(field).unwrap_or(Value::Null);
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_keeps_payload() {
        let mut envelope = ApiEnvelope::from_value(json!({
            "success": true,
            "sedes": [{"codigo_pv": "PV01"}]
        }))
        .unwrap()
        .into_result("Error desconocido")
        .unwrap();

        let sedes: Vec<Value> = envelope.take("sedes").unwrap();
        assert_eq!(sedes.len(), 1);
        assert!(!envelope.payload.contains_key("sedes"));
    }

    #[test]
    fn test_failure_uses_backend_message() {
        let envelope =
            ApiEnvelope::from_value(json!({"success": false, "error": "cupo excedido"})).unwrap();
        assert_eq!(envelope.into_result("Error al guardar").unwrap_err(), "cupo excedido");
    }

    #[test]
    fn test_failure_without_message_uses_default() {
        let envelope = ApiEnvelope::from_value(json!({"success": false, "error": ""})).unwrap();
        assert_eq!(envelope.into_result("Error al guardar").unwrap_err(), "Error al guardar");

        let envelope = ApiEnvelope::from_value(json!({"config": {}})).unwrap();
        assert_eq!(
            envelope.into_result("Error desconocido").unwrap_err(),
            "Error desconocido"
        );
    }
}
