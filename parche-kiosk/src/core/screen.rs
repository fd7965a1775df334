//! Screen controller
//!
//! Exactly one screen is active at any time. The UI renders
//! [`ScreenController::current`]; it never decides which screen is shown.

use std::fmt;
use std::str::FromStr;

use super::error::KioskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Loading,
    Error,
    Setup,
    Welcome,
    Invoice,
    Rating,
    Submitting,
    Thanks,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Loading,
        Screen::Error,
        Screen::Setup,
        Screen::Welcome,
        Screen::Invoice,
        Screen::Rating,
        Screen::Submitting,
        Screen::Thanks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error => "error",
            Self::Setup => "setup",
            Self::Welcome => "welcome",
            Self::Invoice => "invoice-entry",
            Self::Rating => "rating",
            Self::Submitting => "submitting",
            Self::Thanks => "thanks",
        }
    }

    /// Screens a guest interacts with (as opposed to admin or transient ones)
    pub fn is_guest_flow(&self) -> bool {
        matches!(
            self,
            Self::Welcome | Self::Invoice | Self::Rating | Self::Submitting | Self::Thanks
        )
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = KioskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| KioskError::UnknownScreen(s.to_string()))
    }
}

/// Single-active-screen state machine
#[derive(Debug, Clone, Default)]
pub struct ScreenController {
    current: Screen,
    previous: Option<Screen>,
}

impl ScreenController {
    /// Starts on [`Screen::Loading`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn previous(&self) -> Option<Screen> {
        self.previous
    }

    pub fn is(&self, screen: Screen) -> bool {
        self.current == screen
    }

    /// Deactivate every screen and activate `screen`
    pub fn show(&mut self, screen: Screen) {
        if self.current != screen {
            self.previous = Some(self.current);
        }
        self.current = screen;
        tracing::debug!(screen = %screen, "Screen");
    }

    /// Activate a screen by name; unknown names leave the current screen untouched
    pub fn show_named(&mut self, name: &str) -> Result<(), KioskError> {
        let screen = name.parse::<Screen>()?;
        self.show(screen);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_screen_is_loading() {
        let screens = ScreenController::new();
        assert_eq!(screens.current(), Screen::Loading);
        assert!(screens.previous().is_none());
    }

    #[test]
    fn test_show_activates_exactly_one() {
        let mut screens = ScreenController::new();
        screens.show(Screen::Setup);
        screens.show(Screen::Rating);

        let active: Vec<Screen> = Screen::ALL.into_iter().filter(|s| screens.is(*s)).collect();
        assert_eq!(active, vec![Screen::Rating]);
        assert_eq!(screens.previous(), Some(Screen::Setup));
    }

    #[test]
    fn test_show_named() {
        let mut screens = ScreenController::new();
        screens.show_named("invoice-entry").unwrap();
        assert_eq!(screens.current(), Screen::Invoice);
    }

    #[test]
    fn test_unknown_screen_fails_loudly() {
        let mut screens = ScreenController::new();
        screens.show(Screen::Rating);
        let err = screens.show_named("survey-screen").unwrap_err();
        assert!(matches!(err, KioskError::UnknownScreen(name) if name == "survey-screen"));
        assert_eq!(screens.current(), Screen::Rating);
    }

    #[test]
    fn test_names_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(screen.as_str().parse::<Screen>().unwrap(), screen);
        }
    }
}
