//! Game rules and runtime settings.
//!
//! [`Rules`] carries every constant the simulation reads. [`Config`] adds the
//! knobs that only matter to the terminal driver (seed, audio, log file).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const SEED_ENV_VAR: &str = "FLAPPY_SEED";
pub const MUTE_ENV_VAR: &str = "FLAPPY_MUTE";
pub const LOG_ENV_VAR: &str = "FLAPPY_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: i64 },
    #[error("pipe gap {gap} does not fit in a field {height} tall")]
    GapTooLarge { gap: i32, height: i32 },
    #[error("ground margin {margin} does not fit in a field {height} tall")]
    GroundTooHigh { margin: i32, height: i32 },
    #[error("initial {name} {value} is outside [0, {max}]")]
    InitialOutOfRange {
        name: &'static str,
        value: i32,
        max: i32,
    },
    #[error("{var} is not a valid seed: {value:?}")]
    BadSeed { var: &'static str, value: String },
}

/// Constants fixed for the lifetime of a session, in world pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub game_height: i32,
    pub game_width: i32,
    pub gravity_step: i32,
    pub jump_delta: i32,
    pub pipe_width: i32,
    pub pipe_gap: i32,
    pub pipe_speed: i32,
    pub bird_size: i32,
    pub ground_margin: i32,
    pub tick_interval_ms: u64,
    /// Horizontal band (inclusive) the pipe's left edge must sit in to hit the bird.
    pub collision_window: (i32, i32),
    pub initial_bird_y: i32,
    pub initial_pipe_x: i32,
    pub initial_gap_top: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            game_height: 900,
            game_width: 500,
            gravity_step: 5,
            jump_delta: 60,
            pipe_width: 50,
            pipe_gap: 190,
            pipe_speed: 4,
            bird_size: 100,
            ground_margin: 20,
            tick_interval_ms: 24,
            collision_window: (0, 50),
            initial_bird_y: 250,
            initial_pipe_x: 500,
            initial_gap_top: 200,
        }
    }
}

impl Rules {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// First `bird_y` at which the bird counts as grounded.
    pub fn ground_line(&self) -> i32 {
        self.game_height - self.ground_margin
    }

    /// Largest gap top a respawn may produce.
    pub fn max_gap_top(&self) -> i32 {
        self.game_height - self.pipe_gap
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("game_height", self.game_height as i64),
            ("game_width", self.game_width as i64),
            ("gravity_step", self.gravity_step as i64),
            ("jump_delta", self.jump_delta as i64),
            ("pipe_width", self.pipe_width as i64),
            ("pipe_gap", self.pipe_gap as i64),
            ("pipe_speed", self.pipe_speed as i64),
            ("bird_size", self.bird_size as i64),
            ("tick_interval_ms", self.tick_interval_ms as i64),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.pipe_gap >= self.game_height {
            return Err(ConfigError::GapTooLarge {
                gap: self.pipe_gap,
                height: self.game_height,
            });
        }
        if self.ground_margin < 0 || self.ground_margin >= self.game_height {
            return Err(ConfigError::GroundTooHigh {
                margin: self.ground_margin,
                height: self.game_height,
            });
        }
        check_range("bird_y", self.initial_bird_y, self.game_height)?;
        check_range("pipe_x", self.initial_pipe_x, self.game_width)?;
        check_range("gap_top", self.initial_gap_top, self.max_gap_top())?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: i32, max: i32) -> Result<(), ConfigError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InitialOutOfRange { name, value, max })
    }
}

/// Everything the binary needs to start a game.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub rules: Rules,
    pub seed: Option<u64>,
    pub mute: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed: Option<u64> = match lookup(SEED_ENV_VAR) {
            Some(raw) => Some(raw.trim().parse().map_err(|_| ConfigError::BadSeed {
                var: SEED_ENV_VAR,
                value: raw.clone(),
            })?),
            None => None,
        };
        let mute = lookup(MUTE_ENV_VAR)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let log_file = lookup(LOG_ENV_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            rules: Rules::default(),
            seed,
            mute,
            log_file,
        };
        config.rules.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_rules_are_valid() {
        let rules = Rules::default();
        assert_eq!(rules.validate(), Ok(()));
        assert_eq!(rules.ground_line(), 880);
        assert_eq!(rules.max_gap_top(), 710);
        assert_eq!(rules.tick_interval(), Duration::from_millis(24));
    }

    #[test]
    fn test_gap_must_fit() {
        let rules = Rules {
            pipe_gap: 900,
            ..Rules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(ConfigError::GapTooLarge {
                gap: 900,
                height: 900
            })
        );
    }

    #[test]
    fn test_zero_speed_rejected() {
        let rules = Rules {
            pipe_speed: 0,
            ..Rules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::NotPositive {
                name: "pipe_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_initial_gap_out_of_range() {
        let rules = Rules {
            initial_gap_top: 800,
            ..Rules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::InitialOutOfRange { name: "gap_top", .. })
        ));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.seed, None);
        assert!(!config.mute);
        assert!(config.log_file.is_none());
        assert_eq!(config.rules, Rules::default());
    }

    #[test]
    fn test_from_lookup_reads_settings() {
        let config = Config::from_lookup(lookup(&[
            (SEED_ENV_VAR, " 42 "),
            (MUTE_ENV_VAR, "TRUE"),
            (LOG_ENV_VAR, "/tmp/flappy.log"),
        ]))
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert!(config.mute);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/flappy.log")));
    }

    #[test]
    fn test_bad_seed_names_variable() {
        let err = Config::from_lookup(lookup(&[(SEED_ENV_VAR, "banana")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BadSeed {
                var: SEED_ENV_VAR,
                value: "banana".to_string()
            }
        );
        assert!(err.to_string().contains("FLAPPY_SEED"));
    }
}
