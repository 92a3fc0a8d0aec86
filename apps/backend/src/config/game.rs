use time::Duration;

use super::{env_lookup, parse_var};
use crate::domain::rules::{MAX_PLAYERS, MIN_PLAYERS};
use crate::domain::state::RulesConfig;
use crate::error::AppError;

/// Table rules shared by every room in this process.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Seconds the discard stays claimable after a discard. 0 disables it.
    pub discard_window_secs: f64,
    /// Seconds the flipped card stays claimable at round start. 0 disables it.
    pub first_draw_window_secs: f64,
    pub warning_limit: u8,
    pub one_turn_bonus: bool,
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            discard_window_secs: 5.0,
            first_draw_window_secs: 5.0,
            warning_limit: 2,
            one_turn_bonus: true,
            max_players: MAX_PLAYERS,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let d = Self::default();
        let cfg = Self {
            discard_window_secs: parse_var(&lookup, "DISCARD_WINDOW_SECS", d.discard_window_secs)?,
            first_draw_window_secs: parse_var(
                &lookup,
                "FIRST_DRAW_WINDOW_SECS",
                d.first_draw_window_secs,
            )?,
            warning_limit: parse_var(&lookup, "WARNING_LIMIT", d.warning_limit)?,
            one_turn_bonus: parse_var(&lookup, "ONE_TURN_BONUS", d.one_turn_bonus)?,
            max_players: parse_var(&lookup, "MAX_PLAYERS", d.max_players)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), AppError> {
        for (name, secs) in [
            ("DISCARD_WINDOW_SECS", self.discard_window_secs),
            ("FIRST_DRAW_WINDOW_SECS", self.first_draw_window_secs),
        ] {
            if !secs.is_finite() || !(0.0..=600.0).contains(&secs) {
                return Err(AppError::config(format!(
                    "{name} must be between 0 and 600 seconds, got {secs}"
                )));
            }
        }
        if self.warning_limit == 0 {
            return Err(AppError::config("WARNING_LIMIT must be at least 1"));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(AppError::config(format!(
                "MAX_PLAYERS must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
                self.max_players
            )));
        }
        Ok(())
    }

    pub fn rules(&self) -> RulesConfig {
        RulesConfig {
            discard_window: Duration::seconds_f64(self.discard_window_secs),
            first_draw_window: Duration::seconds_f64(self.first_draw_window_secs),
            warning_limit: self.warning_limit,
            one_turn_bonus: self.one_turn_bonus,
        }
    }
}
