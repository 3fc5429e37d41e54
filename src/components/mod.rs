use crate::pathfinding::{AgentFootprint, AgentKind};
use bevy::prelude::*;
use derive_more::{Display, From};

/// Axis-aligned collider; `position` is the top-left corner in world pixels
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn footprint(&self) -> AgentFootprint {
        AgentFootprint::new(self.size.x, self.size.y)
    }
}

/// Pixels per frame at 60 Hz
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, From)]
pub struct Velocity(pub Vec2);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grounded(pub bool);

/// Marks an entity driven by the navigation controller
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{kind} navigator #{id}")]
pub struct Navigator {
    pub kind: AgentKind,
    pub id: u32,
}

/// The entity agents chase
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ChaseTarget;
