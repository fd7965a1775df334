//! Core kiosk state
//!
//! 包含核心组件:
//! - Kiosk: owned application state, the only caller of screen transitions
//! - ScreenController: single active screen
//! - SurveyForm: in-progress draft and its validation
//! - AdminFlow / TapGesture: hidden setup entry and site selection
//! - SiteStore: persisted site id and fullscreen preference

pub mod admin;
pub mod branding;
pub mod clock;
pub mod countdown;
pub mod error;
pub mod form;
pub mod kiosk;
pub mod screen;
pub mod store;

pub use admin::{AdminFlow, AdminStage, KeyChord, SiteList, TapGesture};
pub use branding::{Branding, TableFieldView, adjust_color, parse_hex};
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{Countdown, DEFAULT_RESET_SECONDS, Tick};
pub use error::{KioskError, KioskResult};
pub use form::{COMMENT_MAX_CHARS, FormError, FormField, SurveyForm};
pub use kiosk::{FullscreenControl, HeadlessDisplay, Kiosk, KioskSettings};
pub use screen::{Screen, ScreenController};
pub use store::{FileStore, KeyValueStore, MemoryStore, SiteStore, StoreError};
