use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A movement speed in pixels per frame, constrained to [0.1, 50.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct MovementSpeed(f32);

impl MovementSpeed {
    const MIN: f32 = 0.1;
    const MAX: f32 = 50.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl From<f32> for MovementSpeed {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// A duration in seconds constrained to [0.0, 60.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct CooldownSeconds(f32);

impl CooldownSeconds {
    const MIN: f32 = 0.0;
    const MAX: f32 = 60.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for CooldownSeconds {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl From<f32> for CooldownSeconds {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// A distance in world pixels constrained to [1.0, 10000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct PixelDistance(f32);

impl PixelDistance {
    const MIN: f32 = 1.0;
    const MAX: f32 = 10000.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for PixelDistance {
    fn default() -> Self {
        Self::new(64.0)
    }
}

impl From<f32> for PixelDistance {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// A speed multiplier constrained to [0.05, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct SpeedFactor(f32);

impl SpeedFactor {
    const MIN: f32 = 0.05;
    const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl From<f32> for SpeedFactor {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// A fraction of a tile constrained to [0.05, 4.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct TileFraction(f32);

impl TileFraction {
    const MIN: f32 = 0.05;
    const MAX: f32 = 4.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for TileFraction {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl From<f32> for TileFraction {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// Per-frame acceleration in pixels, constrained to [0.01, 10.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct Acceleration(f32);

impl Acceleration {
    const MIN: f32 = 0.01;
    const MAX: f32 = 10.0;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Acceleration {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl From<f32> for Acceleration {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}
