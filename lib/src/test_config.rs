use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Policy for a timed, proctored test session.
///
/// Read-only: the session runner consults it, nothing here enforces it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TestConfig {
    pub fullscreen_required: bool,
    pub proctoring_enabled: bool,
    /// `None` means untimed.
    pub time_limit_minutes: Option<u32>,
    pub allow_back_navigation: bool,
    pub allow_tab_switch: bool,
    /// Tab switches tolerated before the session is flagged.
    pub max_tab_switches: u32,
    pub shuffle_questions: bool,
    pub show_results: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            fullscreen_required: true,
            proctoring_enabled: false,
            time_limit_minutes: None,
            allow_back_navigation: true,
            allow_tab_switch: false,
            max_tab_switches: 3,
            shuffle_questions: false,
            show_results: false,
        }
    }
}

impl TestConfig {
    pub fn from_json(raw_data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw_data)
    }

    pub fn fullscreen_required(&self) -> bool {
        self.fullscreen_required
    }

    pub fn proctoring_enabled(&self) -> bool {
        self.proctoring_enabled
    }

    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    pub fn show_results(&self) -> bool {
        self.show_results
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(u64::from(minutes) * 60))
    }

    /// Time left after `elapsed`, `None` for an untimed session.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.time_limit()
            .map(|limit| limit.saturating_sub(elapsed))
    }

    pub fn is_expired(&self, elapsed: Duration) -> bool {
        self.remaining(elapsed) == Some(Duration::ZERO)
    }

    /// Whether `count` tab switches breach the policy.
    pub fn tab_switch_exceeded(&self, count: u32) -> bool {
        if self.allow_tab_switch {
            return false;
        }

        count > self.max_tab_switches
    }

    /// Whether a candidate on question `current` may jump to `target`.
    pub fn can_navigate_to(&self, current: usize, target: usize) -> bool {
        target >= current || self.allow_back_navigation
    }
}
