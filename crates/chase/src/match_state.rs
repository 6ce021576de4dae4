//! Match lifecycle: Active until the player is caught, then Ended until reset.

use engine_core::Time;

use crate::config::MatchRules;
use crate::hud::{format_survival_time, MatchPresenter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchState {
    #[default]
    Active,
    Ended,
}

/// Seconds of active, scaled simulation time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurvivalClock {
    seconds: f64,
    stopped: bool,
}

impl SurvivalClock {
    pub fn advance(&mut self, dt: f64) {
        if !self.stopped {
            self.seconds += dt.max(0.0);
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Truncated, never rounded.
    pub fn whole_seconds(&self) -> u64 {
        self.seconds as u64
    }
}

/// Coins, experience and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    pub coins: u32,
    pub experience: u32,
    experience_per_level: u32,
}

impl Scoreboard {
    pub fn new(experience_per_level: u32) -> Self {
        Self {
            coins: 0,
            experience: 0,
            experience_per_level: experience_per_level.max(1),
        }
    }

    pub fn level(&self) -> u32 {
        1 + self.experience / self.experience_per_level
    }

    pub fn add(&mut self, coins: u32, experience: u32) {
        self.coins = self.coins.saturating_add(coins);
        self.experience = self.experience.saturating_add(experience);
    }
}

/// Final numbers of an ended match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub survived_seconds: f64,
    /// What the HUD shows.
    pub final_seconds: u64,
    pub score: Scoreboard,
}

pub struct MatchStateMachine {
    state: MatchState,
    clock: SurvivalClock,
    score: Scoreboard,
}

impl MatchStateMachine {
    pub fn new(rules: &MatchRules) -> Self {
        Self {
            state: MatchState::Active,
            clock: SurvivalClock::default(),
            score: Scoreboard::new(rules.experience_per_level),
        }
    }

    /// Enter play: unfreeze simulation time and capture the cursor.
    pub fn begin(&mut self, time: &mut Time, presenter: &mut dyn MatchPresenter) {
        time.set_time_scale(1.0);
        presenter.set_cursor_captured(true);
        presenter.survival_time(&format_survival_time(self.clock.seconds()));
        presenter.counters(self.score.coins, self.score.experience, self.score.level());
    }

    /// Advance the survival clock by scaled `dt` while Active.
    pub fn tick(&mut self, dt: f64, presenter: &mut dyn MatchPresenter) {
        if self.state != MatchState::Active {
            return;
        }
        self.clock.advance(dt);
        presenter.survival_time(&format_survival_time(self.clock.seconds()));
    }

    /// Active -> Ended. Freezes simulation time and releases the cursor.
    ///
    /// Returns `None` if the match already ended; nothing is touched then.
    pub fn on_player_contact(&mut self, time: &mut Time, presenter: &mut dyn MatchPresenter) -> Option<MatchOutcome> {
        if self.state == MatchState::Ended {
            return None;
        }
        self.state = MatchState::Ended;
        self.clock.stop();
        time.set_time_scale(0.0);

        let outcome = MatchOutcome {
            survived_seconds: self.clock.seconds(),
            final_seconds: self.clock.whole_seconds(),
            score: self.score,
        };
        log::info!("Game Over! Survived for: {:.2} seconds", outcome.survived_seconds);
        presenter.match_ended(outcome.final_seconds);
        presenter.set_cursor_captured(false);
        Some(outcome)
    }

    /// Credit a pickup. Ignored once the match has ended.
    pub fn award_pickup(&mut self, coins: u32, experience: u32, presenter: &mut dyn MatchPresenter) -> bool {
        if self.state != MatchState::Active {
            return false;
        }
        self.score.add(coins, experience);
        presenter.counters(self.score.coins, self.score.experience, self.score.level());
        true
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == MatchState::Active
    }

    pub fn survival_seconds(&self) -> f64 {
        self.clock.seconds()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::HudState;

    fn running() -> (MatchStateMachine, Time, HudState) {
        let mut machine = MatchStateMachine::new(&MatchRules::default());
        let mut time = Time::new();
        let mut hud = HudState::default();
        machine.begin(&mut time, &mut hud);
        (machine, time, hud)
    }

    #[test]
    fn capture_freezes_time_and_reports_whole_seconds() {
        let (mut machine, mut time, mut hud) = running();
        assert!(hud.cursor_captured);
        machine.tick(42.7, &mut hud);
        assert_eq!(hud.survival_text, "00:42");

        let outcome = machine.on_player_contact(&mut time, &mut hud).unwrap();
        assert_eq!(machine.state(), MatchState::Ended);
        assert_eq!(time.time_scale(), 0.0);
        assert_eq!(outcome.final_seconds, 42);
        assert_eq!(hud.final_seconds, Some(42));
        assert!(!hud.cursor_captured);
    }

    #[test]
    fn second_capture_is_ignored() {
        let (mut machine, mut time, mut hud) = running();
        machine.tick(10.0, &mut hud);
        assert!(machine.on_player_contact(&mut time, &mut hud).is_some());
        let snapshot = hud.clone();

        // Someone unfreezes time behind our back; a late contact must not touch it.
        time.set_time_scale(0.5);
        assert!(machine.on_player_contact(&mut time, &mut hud).is_none());
        assert_eq!(hud, snapshot);
        assert_eq!(time.time_scale(), 0.5);
        assert_eq!(hud.end_notifications, 1);
    }

    #[test]
    fn clock_is_frozen_after_the_match_ends() {
        let (mut machine, mut time, mut hud) = running();
        machine.tick(5.0, &mut hud);
        machine.on_player_contact(&mut time, &mut hud);
        machine.tick(5.0, &mut hud);
        assert_eq!(machine.survival_seconds(), 5.0);
        assert_eq!(hud.survival_text, "00:05");
    }

    #[test]
    fn pickups_level_up_every_hundred_exp() {
        let (mut machine, mut time, mut hud) = running();
        for _ in 0..20 {
            assert!(machine.award_pickup(10, 5, &mut hud));
        }
        assert_eq!((hud.coins, hud.experience, hud.level), (200, 100, 2));

        machine.on_player_contact(&mut time, &mut hud);
        assert!(!machine.award_pickup(10, 5, &mut hud));
        assert_eq!(machine.scoreboard().coins, 200);
    }
}
