//! Parche Kiosk - satisfaction survey kiosk
//!
//! Two entry points:
//! - `core::Kiosk`: UI-independent state, driven by tests or any front end
//! - `tui`: the terminal kiosk shipped as the `parche-kiosk` binary

use std::sync::Arc;

pub mod config;
pub mod core;
pub mod logging;
pub mod tui;

pub use parche_client;
pub use shared;

pub use config::KioskConfig;
pub use crate::core::{Kiosk, KioskError, KioskResult, KioskSettings};

use crate::core::{FileStore, SiteStore, SystemClock};

/// Build the kiosk from configuration and run the terminal UI until quit
pub async fn run(config: KioskConfig) -> anyhow::Result<()> {
    config.validate()?;

    let _guard = logging::init_logging(&config.log_dir(), config.debug)?;
    tracing::info!(
        api_url = %config.api_url,
        data_dir = %config.data_dir.display(),
        "Parche kiosk starting..."
    );

    let api = config.client_config().build_api_client()?;
    let store = SiteStore::new(FileStore::in_dir(&config.data_dir)?);
    let kiosk = Kiosk::new(config.settings(), api, store, Arc::new(SystemClock));

    tui::run(kiosk).await
}
