//! Site (sede) models
//!
//! Field names follow the spreadsheet columns exposed by the ratings API.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How the table number field behaves for a site (`solicitar_mesa`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePolicy {
    /// Field hidden
    #[default]
    NotRequested,
    /// Field shown, may stay empty
    Optional,
    /// Field shown, submission blocked while empty
    Required,
}

impl TablePolicy {
    /// Parse the sheet value. `SI` is accepted as a synonym of `OPCIONAL`;
    /// anything unrecognised hides the field.
    pub fn from_sheet_value(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "OBLIGATORIO" => Self::Required,
            "OPCIONAL" | "SI" => Self::Optional,
            _ => Self::NotRequested,
        }
    }

    pub fn as_sheet_value(&self) -> &'static str {
        match self {
            Self::NotRequested => "NO",
            Self::Optional => "OPCIONAL",
            Self::Required => "OBLIGATORIO",
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::NotRequested)
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

impl Serialize for TablePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_sheet_value())
    }
}

impl<'de> Deserialize<'de> for TablePolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = scalar_text(serde_json::Value::deserialize(deserializer)?);
        Ok(raw
            .as_deref()
            .map(Self::from_sheet_value)
            .unwrap_or_default())
    }
}

/// Sheet cells arrive as strings, numbers or booleans depending on how the
/// cell is formatted; all of them are read as text.
fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text cell, `null` becomes the empty string
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

/// Optional text cell, `null` becomes `None`
fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_text(value))
}

/// Only a JSON `true` enables the invoice step; strings such as `"TRUE"` do not.
fn strict_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

/// Branding and survey policy of one site, as returned by `getConfig`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub nombre_marca: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub nombre_pv: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub color_primario: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub color_secundario: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub prefijo_factura: Option<String>,
    #[serde(default)]
    pub solicitar_mesa: TablePolicy,
    #[serde(default, deserialize_with = "strict_true")]
    pub solicitar_factura: bool,
}

impl SiteConfig {
    /// Invoice prefix, empty when not configured
    pub fn invoice_prefix(&self) -> &str {
        self.prefijo_factura.as_deref().unwrap_or("")
    }

    pub fn requires_invoice_step(&self) -> bool {
        self.solicitar_factura
    }
}

/// One entry of the `getSedes` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub codigo_pv: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nombre_pv: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nombre_marca: String,
}

impl SiteSummary {
    /// Label shown in the site dropdown
    pub fn label(&self) -> String {
        format!("{} - {}", self.nombre_pv, self.nombre_marca)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_policy_parsing() {
        assert_eq!(TablePolicy::from_sheet_value("OBLIGATORIO"), TablePolicy::Required);
        assert_eq!(TablePolicy::from_sheet_value("obligatorio"), TablePolicy::Required);
        assert_eq!(TablePolicy::from_sheet_value("OPCIONAL"), TablePolicy::Optional);
        assert_eq!(TablePolicy::from_sheet_value("SI"), TablePolicy::Optional);
        assert_eq!(TablePolicy::from_sheet_value("NO"), TablePolicy::NotRequested);
        assert_eq!(TablePolicy::from_sheet_value("quizas"), TablePolicy::NotRequested);
    }

    #[test]
    fn test_site_config_minimal_payload() {
        let config: SiteConfig = serde_json::from_value(json!({
            "nombre_marca": "Acme",
            "nombre_pv": "Centro",
            "solicitar_mesa": "OBLIGATORIO",
            "solicitar_factura": false
        }))
        .unwrap();

        assert_eq!(config.nombre_marca.as_deref(), Some("Acme"));
        assert_eq!(config.solicitar_mesa, TablePolicy::Required);
        assert!(!config.requires_invoice_step());
        assert_eq!(config.invoice_prefix(), "");
        assert!(config.logo_url.is_none());
    }

    #[test]
    fn test_site_config_missing_and_null_policy() {
        let config: SiteConfig = serde_json::from_value(json!({ "solicitar_mesa": null })).unwrap();
        assert_eq!(config.solicitar_mesa, TablePolicy::NotRequested);

        let config: SiteConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.solicitar_mesa, TablePolicy::NotRequested);

        let config: SiteConfig = serde_json::from_value(json!({ "solicitar_mesa": 1 })).unwrap();
        assert_eq!(config.solicitar_mesa, TablePolicy::NotRequested);
        assert!(!config.solicitar_factura);
    }

    #[test]
    fn test_invoice_flag_requires_json_true() {
        let config: SiteConfig =
            serde_json::from_value(json!({ "solicitar_factura": "TRUE" })).unwrap();
        assert!(!config.solicitar_factura);

        let config: SiteConfig =
            serde_json::from_value(json!({ "solicitar_factura": true })).unwrap();
        assert!(config.solicitar_factura);
    }

    #[test]
    fn test_site_summary_label() {
        let site = SiteSummary {
            codigo_pv: "PV01".into(),
            nombre_pv: "Centro".into(),
            nombre_marca: "Acme".into(),
        };
        assert_eq!(site.label(), "Centro - Acme");
    }

    #[test]
    fn test_site_summary_numeric_code_and_null_name() {
        let sites: Vec<SiteSummary> = serde_json::from_value(json!([
            { "codigo_pv": 101, "nombre_pv": null, "nombre_marca": "Acme" },
            { "codigo_pv": "PV02", "nombre_pv": 7 }
        ]))
        .unwrap();

        assert_eq!(sites[0].codigo_pv, "101");
        assert_eq!(sites[0].nombre_pv, "");
        assert_eq!(sites[0].label(), " - Acme");
        assert_eq!(sites[1].nombre_pv, "7");
        assert_eq!(sites[1].nombre_marca, "");
    }

    #[test]
    fn test_site_config_accepts_sheet_scalars() {
        let config: SiteConfig = serde_json::from_value(json!({
            "nombre_marca": null,
            "nombre_pv": 12,
            "prefijo_factura": 2024,
            "color_primario": "#ff8040"
        }))
        .unwrap();

        assert!(config.nombre_marca.is_none());
        assert_eq!(config.nombre_pv.as_deref(), Some("12"));
        assert_eq!(config.invoice_prefix(), "2024");
        assert_eq!(config.color_primario.as_deref(), Some("#ff8040"));
    }
}
