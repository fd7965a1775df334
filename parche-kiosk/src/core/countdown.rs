//! Auto-reset countdown shown on the thanks screen

/// Default seconds before the kiosk returns to the survey
pub const DEFAULT_RESET_SECONDS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; carries the value to display
    Remaining(u32),
    Elapsed,
    /// No countdown running
    Idle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) from `seconds`
    pub fn start(&mut self, seconds: u32) {
        self.remaining = Some(seconds);
    }

    /// One second passed. At zero the countdown stops and reports `Elapsed` once.
    pub fn tick(&mut self) -> Tick {
        match self.remaining {
            None => Tick::Idle,
            Some(left) if left <= 1 => {
                self.remaining = None;
                Tick::Elapsed
            }
            Some(left) => {
                self.remaining = Some(left - 1);
                Tick::Remaining(left - 1)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_elapsed() {
        let mut countdown = Countdown::new();
        countdown.start(3);
        assert_eq!(countdown.remaining(), Some(3));
        assert_eq!(countdown.tick(), Tick::Remaining(2));
        assert_eq!(countdown.tick(), Tick::Remaining(1));
        assert_eq!(countdown.tick(), Tick::Elapsed);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), Tick::Idle);
    }

    #[test]
    fn test_default_reset_takes_fifteen_ticks() {
        let mut countdown = Countdown::new();
        countdown.start(DEFAULT_RESET_SECONDS);
        let ticks: Vec<Tick> = (0..DEFAULT_RESET_SECONDS).map(|_| countdown.tick()).collect();
        assert_eq!(ticks[13], Tick::Remaining(1));
        assert_eq!(ticks[14], Tick::Elapsed);
    }

    #[test]
    fn test_zero_elapses_on_first_tick() {
        let mut countdown = Countdown::new();
        countdown.start(0);
        assert_eq!(countdown.tick(), Tick::Elapsed);
    }

    #[test]
    fn test_cancel_and_restart() {
        let mut countdown = Countdown::new();
        countdown.start(15);
        countdown.tick();
        countdown.cancel();
        assert_eq!(countdown.tick(), Tick::Idle);

        countdown.start(15);
        assert_eq!(countdown.remaining(), Some(15));
    }
}
