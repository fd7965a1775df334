//! Branding render model
//!
//! Everything the screens show that depends on the active site, derived once
//! per config fetch.

use shared::{DEFAULT_BRAND_NAME, SiteConfig, TablePolicy};

use super::form::{TABLE_OPTIONAL_HINT, TABLE_REQUIRED_HINT};

/// Percentage used for the darker primary shade
const PRIMARY_DARK_SHIFT: i32 = -20;

/// Parse `#rrggbb` (or `rrggbb`) into its channels
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return None;
    }
    let num = u32::from_str_radix(digits, 16).ok()?;
    Some(((num >> 16) as u8, (num >> 8) as u8, num as u8))
}

/// Shift every channel by `percent` of 255, clamped to 0..=255.
/// Returns lowercase `#rrggbb`, or `None` when `hex` is not a colour.
pub fn adjust_color(hex: &str, percent: i32) -> Option<String> {
    let (r, g, b) = parse_hex(hex)?;
    let amount = (2.55 * percent as f64).round() as i32;
    let shift = |channel: u8| (channel as i32 + amount).clamp(0, 255);
    Some(format!("#{:02x}{:02x}{:02x}", shift(r), shift(g), shift(b)))
}

/// How the table number field is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFieldView {
    pub visible: bool,
    pub required: bool,
    pub label: &'static str,
    pub hint: &'static str,
}

impl TableFieldView {
    pub fn for_policy(policy: TablePolicy) -> Self {
        match policy {
            TablePolicy::Required => Self {
                visible: true,
                required: true,
                label: "Número de Mesa *",
                hint: TABLE_REQUIRED_HINT,
            },
            TablePolicy::Optional => Self {
                visible: true,
                required: false,
                label: "Número de Mesa",
                hint: TABLE_OPTIONAL_HINT,
            },
            TablePolicy::NotRequested => Self {
                visible: false,
                required: false,
                label: "Número de Mesa",
                hint: "",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub title: String,
    pub store: String,
    pub welcome_title: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub primary_dark: Option<String>,
    pub background_color: Option<String>,
    pub invoice_prefix: Option<String>,
    pub table: TableFieldView,
}

impl Branding {
    pub fn from_config(config: &SiteConfig) -> Self {
        let title = non_empty(&config.nombre_marca).unwrap_or(DEFAULT_BRAND_NAME).to_string();
        let store = non_empty(&config.nombre_pv).unwrap_or("").to_string();
        let primary_color = non_empty(&config.color_primario).map(str::to_string);
        let primary_dark = primary_color
            .as_deref()
            .and_then(|hex| adjust_color(hex, PRIMARY_DARK_SHIFT));

        Self {
            welcome_title: format!("¿Cómo estuvo tu experiencia en {title} {store}?"),
            title,
            store,
            logo_url: non_empty(&config.logo_url).map(str::to_string),
            primary_color,
            primary_dark,
            background_color: non_empty(&config.color_secundario).map(str::to_string),
            invoice_prefix: non_empty(&config.prefijo_factura).map(str::to_string),
            table: TableFieldView::for_policy(config.solicitar_mesa),
        }
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_color_darkens_and_clamps() {
        // -20% of 255 rounds to 51
        assert_eq!(adjust_color("#ff8040", -20).as_deref(), Some("#cc4d0d"));
        assert_eq!(adjust_color("#102030", -20).as_deref(), Some("#000000"));
        assert_eq!(adjust_color("#f0f0f0", 20).as_deref(), Some("#ffffff"));
        assert_eq!(adjust_color("ABCDEF", 0).as_deref(), Some("#abcdef"));
    }

    #[test]
    fn test_adjust_color_rejects_garbage() {
        assert_eq!(adjust_color("rojo", -20), None);
        assert_eq!(adjust_color("#fff", -20), None);
    }

    #[test]
    fn test_defaults_without_config() {
        let branding = Branding::default();
        assert_eq!(branding.title, "El Parche del Gato");
        assert_eq!(branding.store, "");
        assert!(branding.primary_color.is_none());
        assert!(!branding.table.visible);
    }

    #[test]
    fn test_branding_from_config() {
        let config = SiteConfig {
            nombre_marca: Some("Acme".into()),
            nombre_pv: Some("Centro".into()),
            color_primario: Some("#336699".into()),
            color_secundario: Some("#fafafa".into()),
            prefijo_factura: Some("FE-".into()),
            solicitar_mesa: TablePolicy::Required,
            ..Default::default()
        };
        let branding = Branding::from_config(&config);

        assert_eq!(branding.welcome_title, "¿Cómo estuvo tu experiencia en Acme Centro?");
        assert_eq!(branding.primary_dark.as_deref(), Some("#003366"));
        assert_eq!(branding.background_color.as_deref(), Some("#fafafa"));
        assert_eq!(branding.invoice_prefix.as_deref(), Some("FE-"));
        assert_eq!(branding.table.label, "Número de Mesa *");
        assert_eq!(branding.table.hint, "Este campo es obligatorio");
        assert!(branding.table.required);
    }

    #[test]
    fn test_optional_table_field() {
        let view = TableFieldView::for_policy(TablePolicy::Optional);
        assert!(view.visible);
        assert!(!view.required);
        assert_eq!(view.label, "Número de Mesa");
        assert_eq!(view.hint, "Opcional");
    }
}
