//! Kiosk state
//!
//! [`Kiosk`] owns every piece of runtime state and is the only place that
//! switches screens. The UI loop holds it by value and drives it through
//! `&mut self`; network calls are the only suspension points.

use std::sync::Arc;

use parche_client::{ApiClient, ApiEnvelope, ClientResult};
use shared::{Category, Rating, RatingSubmission, SiteConfig, TablePolicy};

use super::admin::{AdminFlow, KeyChord, TapGesture};
use super::branding::Branding;
use super::clock::Clock;
use super::countdown::{Countdown, DEFAULT_RESET_SECONDS, Tick};
use super::error::{KioskError, KioskResult};
use super::form::{FormField, SurveyForm};
use super::screen::{Screen, ScreenController};
use super::store::SiteStore;

/// Runtime knobs of the kiosk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskSettings {
    pub admin_pin: String,
    /// Seconds on the thanks screen before the survey restarts
    pub reset_seconds: u32,
    /// Start on the welcome screen instead of going straight to the survey
    pub show_welcome: bool,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            admin_pin: "1234".to_string(),
            reset_seconds: DEFAULT_RESET_SECONDS,
            show_welcome: false,
        }
    }
}

/// Display fullscreen capability
pub trait FullscreenControl: std::fmt::Debug {
    fn is_fullscreen(&self) -> bool;
    fn enter(&mut self) -> KioskResult<()>;
    fn exit(&mut self) -> KioskResult<()>;
}

/// Display without a real fullscreen mode; only remembers the flag
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDisplay {
    fullscreen: bool,
}

impl FullscreenControl for HeadlessDisplay {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn enter(&mut self) -> KioskResult<()> {
        self.fullscreen = true;
        Ok(())
    }

    fn exit(&mut self) -> KioskResult<()> {
        self.fullscreen = false;
        Ok(())
    }
}

#[derive(Debug)]
pub struct Kiosk {
    settings: KioskSettings,
    api: ApiClient,
    store: SiteStore,
    clock: Arc<dyn Clock>,
    screens: ScreenController,

    site_id: Option<String>,
    site_config: Option<SiteConfig>,
    branding: Branding,

    form: SurveyForm,
    admin: AdminFlow,
    taps: TapGesture,
    countdown: Countdown,

    /// Message of the error screen
    error_message: Option<String>,
    /// Blocking notice (submission failures)
    notice: Option<String>,
    submitting: bool,
}

impl Kiosk {
    pub fn new(
        settings: KioskSettings,
        api: ApiClient,
        store: SiteStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let admin = AdminFlow::new(settings.admin_pin.clone());
        Self {
            settings,
            api,
            store,
            clock,
            screens: ScreenController::new(),
            site_id: None,
            site_config: None,
            branding: Branding::default(),
            form: SurveyForm::new(),
            admin,
            taps: TapGesture::new(),
            countdown: Countdown::new(),
            error_message: None,
            notice: None,
            submitting: false,
        }
    }

    // ========== Accessors ==========

    pub fn screen(&self) -> Screen {
        self.screens.current()
    }

    pub fn settings(&self) -> &KioskSettings {
        &self.settings
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &SiteStore {
        &self.store
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    pub fn site_config(&self) -> Option<&SiteConfig> {
        self.site_config.as_ref()
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    pub fn form(&self) -> &SurveyForm {
        &self.form
    }

    pub fn admin(&self) -> &AdminFlow {
        &self.admin
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Table policy of the active site
    pub fn table_policy(&self) -> TablePolicy {
        self.site_config
            .as_ref()
            .map(|c| c.solicitar_mesa)
            .unwrap_or_default()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.submitting && self.form.submit_enabled(self.table_policy())
    }

    // ========== Startup ==========

    /// Load the saved site and enter the survey; without a usable site, go to setup
    pub async fn init(&mut self) -> KioskResult<()> {
        tracing::info!("Initializing kiosk");
        self.screens.show(Screen::Loading);

        let Some(site_id) = self.store.get() else {
            tracing::info!("No saved site");
            self.open_setup();
            return Ok(());
        };

        tracing::info!(site_id = %site_id, "Saved site");
        self.site_id = Some(site_id.clone());

        match self.api.fetch_config(&site_id).await {
            Ok(config) => {
                self.apply_config(config);
                if self.settings.show_welcome {
                    self.form.reset();
                    self.screens.show(Screen::Welcome);
                } else {
                    self.enter_rating_flow();
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    site_id = %site_id,
                    error = %e,
                    "Failed to load saved site, back to setup"
                );
                self.site_id = None;
                self.store.clear()?;
                self.open_setup();
                Ok(())
            }
        }
    }

    fn apply_config(&mut self, config: SiteConfig) {
        self.branding = Branding::from_config(&config);
        tracing::debug!(
            title = %self.branding.title,
            store = %self.branding.store,
            "Branding applied"
        );
        self.site_config = Some(config);
    }

    // ========== Guest flow ==========

    /// Fresh draft; invoice entry first when the site asks for it
    pub fn enter_rating_flow(&mut self) {
        self.countdown.cancel();
        self.form.reset();

        let wants_invoice = self
            .site_config
            .as_ref()
            .is_some_and(SiteConfig::requires_invoice_step);
        if wants_invoice {
            self.form.focus_on(FormField::Invoice);
            self.screens.show(Screen::Invoice);
        } else {
            self.screens.show(Screen::Rating);
        }
    }

    pub fn start_from_welcome(&mut self) {
        self.enter_rating_flow();
    }

    pub fn set_invoice_input(&mut self, raw: &str) {
        self.form.set_invoice_input(raw);
    }

    pub fn skip_invoice(&mut self) {
        self.form.skip_invoice();
        self.screens.show(Screen::Rating);
    }

    pub fn continue_invoice(&mut self) {
        let prefix = self
            .site_config
            .as_ref()
            .map(SiteConfig::invoice_prefix)
            .unwrap_or("")
            .to_string();
        self.form.apply_invoice(&prefix);
        self.screens.show(Screen::Rating);
    }

    pub fn set_rating(&mut self, category: Category, value: u8) -> KioskResult<Rating> {
        Ok(self.form.set_rating(category, value)?)
    }

    pub fn set_table_number(&mut self, raw: &str) {
        self.form.set_table_number(raw);
    }

    pub fn set_comment(&mut self, text: &str) {
        self.form.set_comment(text);
    }

    pub fn focus_field(&mut self, field: FormField) {
        self.form.focus_on(field);
    }

    // ========== Submission ==========

    /// Validate the draft and switch to the submitting screen.
    ///
    /// Fails without side effects on the screen when a submission is
    /// already running or the draft is incomplete.
    pub fn begin_submission(&mut self) -> KioskResult<RatingSubmission> {
        if self.submitting {
            return Err(KioskError::SubmissionInFlight);
        }
        let site_id = self.site_id.clone().ok_or(KioskError::NoSiteSelected)?;
        let policy = self.table_policy();

        let submission = self.form.build_submission(&site_id, policy).inspect_err(|e| {
            tracing::debug!(error = %e, "Submission rejected locally");
        })?;

        self.submitting = true;
        self.screens.show(Screen::Submitting);
        Ok(submission)
    }

    /// Apply the outcome of `saveRating`
    pub fn finish_submission(&mut self, result: ClientResult<ApiEnvelope>) -> KioskResult<()> {
        self.submitting = false;
        match result {
            Ok(_) => {
                tracing::info!("Rating saved");
                self.screens.show(Screen::Thanks);
                self.countdown.start(self.settings.reset_seconds);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Submit error");
                self.notice = Some(e.to_string());
                self.screens.show(Screen::Rating);
                Err(e.into())
            }
        }
    }

    /// Send a submission obtained from [`Kiosk::begin_submission`]
    pub async fn complete_submission(&mut self, submission: &RatingSubmission) -> KioskResult<()> {
        let result = self.api.save_rating(submission).await;
        self.finish_submission(result)
    }

    pub async fn submit(&mut self) -> KioskResult<()> {
        let submission = self.begin_submission()?;
        self.complete_submission(&submission).await
    }

    /// One second elapsed; drives the thanks countdown
    pub fn tick(&mut self) -> Tick {
        if !self.screens.is(Screen::Thanks) {
            return Tick::Idle;
        }
        let tick = self.countdown.tick();
        if tick == Tick::Elapsed {
            tracing::debug!("Countdown elapsed");
            self.enter_rating_flow();
        }
        tick
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ========== Admin ==========

    pub fn open_setup(&mut self) {
        self.countdown.cancel();
        self.taps.reset();
        self.admin.open();
        self.screens.show(Screen::Setup);
    }

    /// Keyboard shortcut; true when it opened setup
    pub fn handle_chord(&mut self, ctrl: bool, shift: bool, key: char) -> bool {
        if KeyChord::ADMIN.matches(ctrl, shift, key) {
            self.open_setup();
            true
        } else {
            false
        }
    }

    /// Tap on the logo or footer; true when the gesture opened setup
    pub fn logo_tap(&mut self) -> bool {
        let now = self.clock.now();
        if self.taps.register(now) {
            tracing::info!("Setup unlocked by tap gesture");
            self.open_setup();
            true
        } else {
            false
        }
    }

    pub fn set_pin_input(&mut self, value: &str) {
        self.admin.set_pin_input(value);
    }

    /// Check the PIN and, when correct, load the site list
    pub async fn verify_pin(&mut self) -> bool {
        if !self.admin.verify_pin() {
            return false;
        }
        self.load_sites().await;
        true
    }

    pub async fn load_sites(&mut self) {
        self.admin.begin_loading();
        match self.api.fetch_sites().await {
            Ok(sites) => {
                tracing::debug!(count = sites.len(), "Sites loaded");
                let saved = self.store.get();
                self.admin.sites_loaded(sites, saved.as_deref());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error loading sites");
                self.admin.sites_failed(e.to_string());
            }
        }
    }

    /// Re-issue the site list fetch after a failure; false when there is nothing to retry
    pub async fn retry_sites(&mut self) -> bool {
        if !self.admin.can_retry() {
            return false;
        }
        self.load_sites().await;
        true
    }

    pub fn select_site(&mut self, site_id: Option<&str>) -> bool {
        self.admin.select(site_id)
    }

    /// Persist the selected site, load its config and start the survey.
    /// A failure lands on the error screen with the failure message.
    pub async fn save_site(&mut self) -> KioskResult<()> {
        let site_id = self
            .admin
            .selected()
            .map(str::to_string)
            .ok_or(KioskError::NoSiteSelected)?;

        self.screens.show(Screen::Loading);
        if let Err(e) = self.store.set(&site_id) {
            self.show_error(e.to_string());
            return Err(e.into());
        }
        self.site_id = Some(site_id.clone());

        match self.api.fetch_config(&site_id).await {
            Ok(config) => {
                self.apply_config(config);
                self.enter_rating_flow();
                Ok(())
            }
            Err(e) => {
                tracing::error!(site_id = %site_id, error = %e, "Config error");
                self.show_error(e.to_string());
                Err(e.into())
            }
        }
    }

    fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.screens.show(Screen::Error);
    }

    // ========== Fullscreen ==========

    /// Flip fullscreen and remember the choice; returns the new mode
    pub fn toggle_fullscreen(&mut self, display: &mut dyn FullscreenControl) -> KioskResult<bool> {
        let enable = !display.is_fullscreen();
        if enable {
            display.enter()?;
        } else {
            display.exit()?;
        }
        self.store.set_fullscreen_preference(enable)?;
        tracing::debug!(fullscreen = enable, "Fullscreen toggled");
        Ok(enable)
    }

    /// Any click or key: restore fullscreen if the operator asked for it
    pub fn on_user_interaction(&mut self, display: &mut dyn FullscreenControl) -> KioskResult<()> {
        if self.store.fullscreen_preference() && !display.is_fullscreen() {
            display.enter()?;
        }
        Ok(())
    }
}
