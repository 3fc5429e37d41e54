use bevy::prelude::*;

/// Thresholds for deciding an agent has stopped making progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StuckConfig {
    /// Seconds between displacement samples
    pub check_interval: f32,
    /// Manhattan pixels moved per sample below which the agent counts as stationary
    pub displacement_threshold: f32,
    /// Stationary seconds before recovery starts
    pub stuck_duration: f32,
    /// Recovery gives up after this many seconds
    pub recovery_timeout: f32,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            check_interval: 0.5,
            displacement_threshold: 10.0,
            stuck_duration: 3.0,
            recovery_timeout: 5.0,
        }
    }
}

/// What changed during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckTransition {
    None,
    /// The agent just became stuck; fires once per episode
    Entered,
    /// The agent moved again while stuck
    Resolved,
    /// Recovery ran out of time
    TimedOut,
}

/// Per-agent progress tracking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StuckDetector {
    last_check_time: Option<f32>,
    last_position: Vec2,
    stuck_timer: f32,
    recovery_timer: f32,
    is_stuck: bool,
    recovery_mode: bool,
    episodes: u32,
}

impl StuckDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stuck(&self) -> bool {
        self.is_stuck
    }

    pub fn in_recovery(&self) -> bool {
        self.recovery_mode
    }

    pub fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    pub fn recovery_timer(&self) -> f32 {
        self.recovery_timer
    }

    /// Number of stuck episodes entered so far
    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    fn clear_flags(&mut self) {
        self.is_stuck = false;
        self.recovery_mode = false;
        self.recovery_timer = 0.0;
    }

    /// Sample the agent's position; does nothing until `check_interval` has
    /// passed since the previous sample.
    pub fn update(&mut self, time: f32, position: Vec2, config: &StuckConfig) -> StuckTransition {
        let Some(last_check) = self.last_check_time else {
            self.last_check_time = Some(time);
            self.last_position = position;
            return StuckTransition::None;
        };

        if time - last_check < config.check_interval {
            return StuckTransition::None;
        }

        let displacement = (position - self.last_position).abs();
        let moved = displacement.x + displacement.y;
        self.last_check_time = Some(time);
        self.last_position = position;

        if moved >= config.displacement_threshold {
            self.stuck_timer = 0.0;
            if self.is_stuck {
                self.clear_flags();
                return StuckTransition::Resolved;
            }
            return StuckTransition::None;
        }

        self.stuck_timer += config.check_interval;

        if self.recovery_mode {
            self.recovery_timer += config.check_interval;
            if self.recovery_timer >= config.recovery_timeout {
                self.clear_flags();
                self.stuck_timer = 0.0;
                return StuckTransition::TimedOut;
            }
            return StuckTransition::None;
        }

        if self.stuck_timer >= config.stuck_duration && !self.is_stuck {
            self.is_stuck = true;
            self.recovery_mode = true;
            self.recovery_timer = 0.0;
            self.episodes += 1;
            return StuckTransition::Entered;
        }

        StuckTransition::None
    }
}
