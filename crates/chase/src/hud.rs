//! Match HUD surface.
//!
//! The core never draws anything: it pushes text and counters to a
//! [`MatchPresenter`]. `LogPresenter` writes them to the log for headless
//! runs, `HudState` keeps the last values for inspection.

/// Receives match state for display.
pub trait MatchPresenter {
    /// Running survival time, already formatted as `MM:SS`.
    fn survival_time(&mut self, text: &str);
    /// Match over; `final_seconds` is truncated to whole seconds.
    fn match_ended(&mut self, final_seconds: u64);
    fn counters(&mut self, coins: u32, experience: u32, level: u32);
    fn set_cursor_captured(&mut self, captured: bool);
}

/// Format seconds as MM:SS. Minutes are not wrapped at one hour.
pub fn format_survival_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    format!("{:02}:{:02}", mins, secs)
}

/// Headless presenter: logs changes only.
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_time: String,
}

impl MatchPresenter for LogPresenter {
    fn survival_time(&mut self, text: &str) {
        if self.last_time != text {
            log::debug!("SURVIVAL TIME: {}", text);
            self.last_time.clear();
            self.last_time.push_str(text);
        }
    }

    fn match_ended(&mut self, final_seconds: u64) {
        log::info!("GAME OVER! SURVIVED: {} seconds", final_seconds);
    }

    fn counters(&mut self, coins: u32, experience: u32, level: u32) {
        log::info!("Coins: {} | EXP: {} | Level: {}", coins, experience, level);
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        log::debug!("Cursor {}", if captured { "captured" } else { "released" });
    }
}

/// Last values pushed to the HUD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudState {
    pub survival_text: String,
    pub final_seconds: Option<u64>,
    pub coins: u32,
    pub experience: u32,
    pub level: u32,
    pub cursor_captured: bool,
    /// Number of `match_ended` calls received.
    pub end_notifications: u32,
}

impl MatchPresenter for HudState {
    fn survival_time(&mut self, text: &str) {
        self.survival_text.clear();
        self.survival_text.push_str(text);
    }

    fn match_ended(&mut self, final_seconds: u64) {
        self.final_seconds = Some(final_seconds);
        self.end_notifications += 1;
    }

    fn counters(&mut self, coins: u32, experience: u32, level: u32) {
        self.coins = coins;
        self.experience = experience;
        self.level = level;
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
    }
}
