use std::time::Duration;

use crate::pursuit::{DEFAULT_CAPTURE_RADIUS, DEFAULT_TRIGGER_CHANCE};

const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_SCORE_MS: u64 = 1000;
const DEFAULT_RENDER_FPS: u64 = 60;
/// Update periods a single frame may replay after a stall.
const MAX_CATCH_UP_TICKS: u32 = 4;

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub update_interval: Duration,
    pub score_interval: Duration,
    pub score_per_interval: u32,
    pub player_speed: f32,
    pub pursuer_speed: f32,
    pub chase_trigger_chance: f64,
    pub capture_radius: f32,
    pub render_fps: u64,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(DEFAULT_TICK_MS),
            score_interval: Duration::from_millis(DEFAULT_SCORE_MS),
            score_per_interval: 10,
            player_speed: 0.1,
            pursuer_speed: 0.08,
            chase_trigger_chance: DEFAULT_TRIGGER_CHANCE,
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `OFFICE_ESCAPE_*` environment variables. Values
    /// that do not parse or are out of range are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let tick_ms = lookup("OFFICE_ESCAPE_TICK_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TICK_MS);
        let render_fps = lookup("OFFICE_ESCAPE_FPS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RENDER_FPS);
        let seed = lookup("OFFICE_ESCAPE_SEED").and_then(|v| v.parse::<u64>().ok());
        let chase_trigger_chance = lookup("OFFICE_ESCAPE_CHASE_CHANCE")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| (0.0..=1.0).contains(v))
            .unwrap_or(defaults.chase_trigger_chance);
        Self {
            update_interval: Duration::from_millis(tick_ms),
            render_fps,
            seed,
            chase_trigger_chance,
            ..defaults
        }
    }

    /// Longest stretch of wall-clock time one frame hands to the session.
    pub fn catch_up_limit(&self) -> Duration {
        self.update_interval * MAX_CATCH_UP_TICKS
    }
}
