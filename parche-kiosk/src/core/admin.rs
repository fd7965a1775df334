//! Admin / setup flow
//!
//! Unlocked by a keyboard chord or by tapping the logo/footer five times in
//! quick succession. A PIN gates the site selection dropdown.

use std::time::{Duration, Instant};

use shared::SiteSummary;

/// Maximum gap between two taps of the unlock gesture
pub const TAP_WINDOW: Duration = Duration::from_secs(2);
/// Taps needed to unlock
pub const TAPS_TO_UNLOCK: u32 = 5;

pub const SITE_PLACEHOLDER: &str = "Seleccione una sede...";
pub const SITE_RETRYING: &str = "Reintentando...";

/// Logo/footer tap counter
///
/// A tap arriving less than [`TAP_WINDOW`] after the previous one extends
/// the streak; anything later starts a new streak at 1. The streak unlocks
/// setup on its [`TAPS_TO_UNLOCK`]th tap and then starts over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TapGesture {
    count: u32,
    last_tap: Option<Instant>,
}

impl TapGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap at `now`; true when the gesture completes
    pub fn register(&mut self, now: Instant) -> bool {
        let within_window = self
            .last_tap
            .is_some_and(|last| now.saturating_duration_since(last) < TAP_WINDOW);

        self.count = if within_window { self.count + 1 } else { 1 };

        if self.count >= TAPS_TO_UNLOCK {
            self.reset();
            return true;
        }

        self.last_tap = Some(now);
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_tap = None;
    }
}

/// Keyboard shortcut that opens setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub key: char,
}

impl KeyChord {
    /// Ctrl+Shift+S
    pub const ADMIN: KeyChord = KeyChord {
        ctrl: true,
        shift: true,
        key: 'S',
    };

    pub fn matches(&self, ctrl: bool, shift: bool, key: char) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(&key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminStage {
    #[default]
    Pin,
    SiteSelect,
}

/// State of the site dropdown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteList {
    #[default]
    Idle,
    Loading {
        retry: bool,
    },
    Loaded(Vec<SiteSummary>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AdminFlow {
    admin_pin: String,
    stage: AdminStage,
    pin_input: String,
    pin_error: bool,
    sites: SiteList,
    selected: Option<String>,
}

impl AdminFlow {
    pub fn new(admin_pin: impl Into<String>) -> Self {
        Self {
            admin_pin: admin_pin.into(),
            stage: AdminStage::Pin,
            pin_input: String::new(),
            pin_error: false,
            sites: SiteList::Idle,
            selected: None,
        }
    }

    /// Back to the PIN prompt with an empty input
    pub fn open(&mut self) {
        self.stage = AdminStage::Pin;
        self.pin_input.clear();
        self.pin_error = false;
        self.sites = SiteList::Idle;
        self.selected = None;
    }

    pub fn stage(&self) -> AdminStage {
        self.stage
    }

    // ========== PIN ==========

    pub fn set_pin_input(&mut self, value: &str) {
        self.pin_input = value.to_string();
    }

    pub fn pin_input(&self) -> &str {
        &self.pin_input
    }

    pub fn pin_error(&self) -> bool {
        self.pin_error
    }

    /// Compare the typed PIN. A match moves to site selection; a mismatch
    /// shows the inline error and clears the input.
    pub fn verify_pin(&mut self) -> bool {
        if self.pin_input == self.admin_pin {
            self.pin_error = false;
            self.stage = AdminStage::SiteSelect;
            true
        } else {
            tracing::info!("Wrong admin PIN");
            self.pin_error = true;
            self.pin_input.clear();
            false
        }
    }

    // ========== Site list ==========

    pub fn sites(&self) -> &SiteList {
        &self.sites
    }

    pub fn begin_loading(&mut self) {
        let retry = matches!(self.sites, SiteList::Failed(_));
        self.sites = SiteList::Loading { retry };
    }

    /// Store the fetched list; `saved` is preselected when it is listed
    pub fn sites_loaded(&mut self, sites: Vec<SiteSummary>, saved: Option<&str>) {
        self.selected = saved
            .filter(|id| sites.iter().any(|s| s.codigo_pv == *id))
            .map(str::to_string);
        self.sites = SiteList::Loaded(sites);
    }

    pub fn sites_failed(&mut self, message: impl Into<String>) {
        self.selected = None;
        self.sites = SiteList::Failed(message.into());
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.sites, SiteList::Failed(_))
    }

    /// Text of the dropdown's first entry
    pub fn placeholder(&self) -> String {
        match &self.sites {
            SiteList::Failed(message) => format!("Error: {message} - toca para reintentar"),
            SiteList::Loading { retry: true } => SITE_RETRYING.to_string(),
            _ => SITE_PLACEHOLDER.to_string(),
        }
    }

    /// Select a listed site; `None` or an unlisted id clears the selection
    pub fn select(&mut self, site_id: Option<&str>) -> bool {
        self.selected = match (&self.sites, site_id) {
            (SiteList::Loaded(sites), Some(id)) if sites.iter().any(|s| s.codigo_pv == id) => {
                Some(id.to_string())
            }
            _ => None,
        };
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Index of the selected site in the loaded list
    pub fn selected_index(&self) -> Option<usize> {
        match (&self.sites, &self.selected) {
            (SiteList::Loaded(sites), Some(id)) => sites.iter().position(|s| &s.codigo_pv == id),
            _ => None,
        }
    }

    /// The save action is enabled only with a site selected
    pub fn can_save(&self) -> bool {
        self.selected.is_some()
    }
}
