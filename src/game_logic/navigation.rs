//! Per-agent navigation: replanning, waypoint following, jumping and stuck recovery

use crate::game_logic::stuck::{StuckConfig, StuckDetector, StuckTransition};
use crate::pathfinding::{AgentFootprint, AgentKind, OccupancyOracle, Path, PathPlanner, Waypoint};
use bevy::prelude::*;

/// High-level state of an agent, set by game code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentBehavior {
    #[default]
    Chasing,
    /// Post-hurt recovery; keeps following the current path without replanning
    Recovering,
    Idle,
    Wandering,
    Attacking,
    Stunned,
}

impl AgentBehavior {
    pub fn allows_replanning(self) -> bool {
        matches!(self, AgentBehavior::Chasing)
    }

    pub fn allows_path_following(self) -> bool {
        matches!(self, AgentBehavior::Chasing | AgentBehavior::Recovering)
    }
}

/// Agent state captured at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub time: f32,
    /// Top-left corner of the collider
    pub position: Vec2,
    pub airborne: bool,
}

/// What the agent wants to do this frame, in pixels per frame
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    pub horizontal_speed: f32,
    /// Always zero for ground agents
    pub vertical_speed: f32,
    pub jump: bool,
}

impl MovementIntent {
    pub const IDLE: Self = Self {
        horizontal_speed: 0.0,
        vertical_speed: 0.0,
        jump: false,
    };

    pub fn horizontal(speed: f32) -> Self {
        Self {
            horizontal_speed: speed,
            ..Self::IDLE
        }
    }

    pub fn velocity(velocity: Vec2) -> Self {
        Self {
            horizontal_speed: velocity.x,
            vertical_speed: velocity.y,
            jump: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Result of the replanning gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanOutcome {
    Suppressed,
    NoTarget,
    TargetOutOfRange,
    CoolingDown,
    TargetSettled,
    Replanned,
    FallbackDirect,
    KeptExisting,
}

/// Tunables for the navigation controller. Distances are in pixels unless
/// noted as tile fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub max_pathfinding_distance: f32,
    pub pathfinding_cooldown: f32,
    /// Applied to the cooldown while recovering from being stuck
    pub recovery_cooldown_multiplier: f32,
    pub target_movement_threshold: f32,
    /// Flying agents keep this far from their target
    pub follow_distance: f32,
    pub waypoint_tolerance_x: f32,
    pub waypoint_tolerance_y: f32,
    pub horizontal_deadzone: f32,
    pub flying_reach_distance: f32,
    pub flying_deadband: f32,
    /// Tile fraction
    pub probe_distance: f32,
    /// Tile fraction
    pub cautious_probe_distance: f32,
    pub cautious_speed_factor: f32,
    pub jump_cooldown: f32,
    /// Tile fraction a waypoint must sit above the agent to warrant a jump
    pub jump_rise_threshold: f32,
    /// Tiles of horizontal distance within which a rising waypoint is jumped to
    pub jump_reach: f32,
    /// Tiles above an obstacle that must be free to jump it
    pub obstacle_clearance: f32,
    /// Farthest landing probe for gap jumps, in tiles
    pub max_gap_tiles: u32,
    /// Tile fraction
    pub recovery_probe_distance: f32,
    pub recovery_speed_factor: f32,
    pub recovery_alignment: f32,
    pub stuck: StuckConfig,
}

impl ControllerConfig {
    pub fn ground() -> Self {
        Self {
            max_pathfinding_distance: 400.0,
            pathfinding_cooldown: 0.5,
            recovery_cooldown_multiplier: 2.0,
            target_movement_threshold: 64.0,
            follow_distance: 50.0,
            waypoint_tolerance_x: 20.0,
            waypoint_tolerance_y: 25.0,
            horizontal_deadzone: 5.0,
            flying_reach_distance: 15.0,
            flying_deadband: 2.0,
            probe_distance: 0.5,
            cautious_probe_distance: 0.25,
            cautious_speed_factor: 0.5,
            jump_cooldown: 1.0,
            jump_rise_threshold: 0.5,
            jump_reach: 2.0,
            obstacle_clearance: 1.5,
            max_gap_tiles: 4,
            recovery_probe_distance: 0.3,
            recovery_speed_factor: 0.7,
            recovery_alignment: 10.0,
            stuck: StuckConfig::default(),
        }
    }

    pub fn flying() -> Self {
        Self {
            pathfinding_cooldown: 0.8,
            ..Self::ground()
        }
    }

    pub fn for_kind(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Ground => Self::ground(),
            AgentKind::Flying => Self::flying(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::ground()
    }
}

/// Navigation state owned by one agent
#[derive(Component, Debug, Clone)]
pub struct NavigationState {
    pub kind: AgentKind,
    pub footprint: AgentFootprint,
    /// Pixels per frame at full speed
    pub move_speed: f32,
    current_path: Option<Path>,
    current_waypoint_index: usize,
    last_pathfind_time: Option<f32>,
    last_target_position: Option<Vec2>,
    last_jump_time: Option<f32>,
    behavior: AgentBehavior,
    pub stuck: StuckDetector,
}

impl NavigationState {
    pub fn new(kind: AgentKind, footprint: AgentFootprint, move_speed: f32) -> Self {
        Self {
            kind,
            footprint,
            move_speed,
            current_path: None,
            current_waypoint_index: 0,
            last_pathfind_time: None,
            last_target_position: None,
            last_jump_time: None,
            behavior: AgentBehavior::default(),
            stuck: StuckDetector::new(),
        }
    }

    pub fn behavior(&self) -> AgentBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: AgentBehavior) {
        self.behavior = behavior;
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_ref()
    }

    pub fn waypoint_index(&self) -> usize {
        self.current_waypoint_index
    }

    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.current_path
            .as_ref()
            .and_then(|path| path.get(self.current_waypoint_index))
    }

    /// Install a path; the first waypoint is the agent's own position so
    /// following starts at index 1.
    pub fn set_path(&mut self, path: Path) {
        self.current_waypoint_index = path.len().min(1);
        self.current_path = Some(path);
    }

    pub fn clear_path(&mut self) {
        self.current_path = None;
        self.current_waypoint_index = 0;
    }

    pub fn last_pathfind_time(&self) -> Option<f32> {
        self.last_pathfind_time
    }

    pub fn last_jump_time(&self) -> Option<f32> {
        self.last_jump_time
    }

    pub fn center(&self, top_left: Vec2) -> Vec2 {
        top_left + self.footprint.size() * 0.5
    }
}

fn manhattan(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Drives one agent per call using a shared planner
pub struct NavigationController<'p, 'w, O: OccupancyOracle + ?Sized> {
    planner: &'p PathPlanner<'w, O>,
    config: &'p ControllerConfig,
}

impl<'p, 'w, O: OccupancyOracle + ?Sized> NavigationController<'p, 'w, O> {
    pub fn new(planner: &'p PathPlanner<'w, O>, config: &'p ControllerConfig) -> Self {
        Self { planner, config }
    }

    pub fn config(&self) -> &ControllerConfig {
        self.config
    }

    fn tile(&self) -> f32 {
        self.planner.mapper().tile_pixel_size()
    }

    /// Whether the agent's box would be free with its top-left at `position`
    fn box_free(&self, state: &NavigationState, position: Vec2) -> bool {
        self.planner.oracle().is_position_free(
            position.x,
            position.y,
            state.footprint.width,
            state.footprint.height,
        )
    }

    /// Advance one agent by one frame
    pub fn update(
        &self,
        state: &mut NavigationState,
        agent: AgentSnapshot,
        target: Option<Vec2>,
    ) -> MovementIntent {
        if !state.behavior.allows_path_following() {
            return MovementIntent::IDLE;
        }

        if state.kind == AgentKind::Ground {
            match state.stuck.update(agent.time, agent.position, &self.config.stuck) {
                StuckTransition::Entered => {
                    info!(
                        "Agent stuck at ({:.0}, {:.0}), entering recovery (episode {})",
                        agent.position.x,
                        agent.position.y,
                        state.stuck.episodes()
                    );
                    state.clear_path();
                }
                StuckTransition::Resolved => info!("Agent moving again, recovery finished"),
                StuckTransition::TimedOut => info!("Agent recovery timed out"),
                StuckTransition::None => {}
            }
        }

        self.update_path(state, &agent, target);

        if state.stuck.in_recovery() {
            return match target {
                Some(target) => self.recovery_movement(state, &agent, target),
                None => MovementIntent::IDLE,
            };
        }

        match state.kind {
            AgentKind::Flying => MovementIntent::velocity(self.follow_flying(state, &agent)),
            AgentKind::Ground => {
                let horizontal = self.follow_ground(state, &agent);
                let jump = self.should_jump(state, &agent, horizontal);
                if jump {
                    state.last_jump_time = Some(agent.time);
                }
                MovementIntent {
                    horizontal_speed: horizontal,
                    vertical_speed: 0.0,
                    jump,
                }
            }
        }
    }

    /// Decide whether to plan a new path this frame, and do so
    pub fn update_path(
        &self,
        state: &mut NavigationState,
        agent: &AgentSnapshot,
        target: Option<Vec2>,
    ) -> ReplanOutcome {
        if !state.behavior.allows_replanning() {
            return ReplanOutcome::Suppressed;
        }

        let Some(target) = target else {
            state.clear_path();
            return ReplanOutcome::NoTarget;
        };

        let center = state.center(agent.position);
        if manhattan(center, target) > self.config.max_pathfinding_distance {
            state.clear_path();
            return ReplanOutcome::TargetOutOfRange;
        }

        if state.stuck.is_stuck() && !state.stuck.in_recovery() {
            return ReplanOutcome::Suppressed;
        }

        let mut cooldown = self.config.pathfinding_cooldown;
        if state.stuck.in_recovery() {
            cooldown *= self.config.recovery_cooldown_multiplier;
        }
        if let Some(last) = state.last_pathfind_time {
            if agent.time - last < cooldown {
                return ReplanOutcome::CoolingDown;
            }
        }

        if state.current_path.is_some() {
            if let Some(last_target) = state.last_target_position {
                if manhattan(last_target, target) < self.config.target_movement_threshold {
                    return ReplanOutcome::TargetSettled;
                }
            }
        }

        let goal = self.goal_for(state.kind, center, target);
        state.last_pathfind_time = Some(agent.time);
        state.last_target_position = Some(target);

        match self
            .planner
            .find_path(center, goal, state.kind, state.footprint)
        {
            Some(path) if path.len() > 1 => {
                debug!(
                    "Replanned {} path with {} waypoints toward ({:.0}, {:.0})",
                    state.kind,
                    path.len(),
                    goal.x,
                    goal.y
                );
                state.set_path(path);
                ReplanOutcome::Replanned
            }
            _ if state.current_path.is_none() => {
                state.set_path(Path::direct(center, goal, self.planner.mapper()));
                ReplanOutcome::FallbackDirect
            }
            _ => ReplanOutcome::KeptExisting,
        }
    }

    /// Flying agents hold off at `follow_distance` when already close
    fn goal_for(&self, kind: AgentKind, center: Vec2, target: Vec2) -> Vec2 {
        if kind != AgentKind::Flying {
            return target;
        }
        let offset = center - target;
        if offset.length() >= self.config.follow_distance {
            return target;
        }
        let angle = offset.y.atan2(offset.x);
        target + Vec2::new(angle.cos(), angle.sin()) * self.config.follow_distance
    }

    fn follow_ground(&self, state: &mut NavigationState, agent: &AgentSnapshot) -> f32 {
        let center = state.center(agent.position);
        let speed = state.move_speed;
        let Some(path) = state.current_path.as_ref() else {
            return 0.0;
        };

        let mut index = state.current_waypoint_index;
        let mut horizontal = 0.0;

        while let Some(waypoint) = path.get(index) {
            let dx = waypoint.position.x - center.x;
            let dy = waypoint.position.y - center.y;
            let within_x = dx.abs() <= self.config.waypoint_tolerance_x;
            let within_y = dy.abs() <= self.config.waypoint_tolerance_y;

            if within_x && within_y {
                index += 1;
                continue;
            }

            if within_x {
                // Below is left to gravity and above to the jump logic, unless
                // the box has no headroom here and must line up first
                if dx.abs() > self.config.horizontal_deadzone
                    && (dy > 0.0 || !self.headroom_free(state, agent.position))
                {
                    horizontal = speed * dx.signum();
                }
            } else if dx.abs() > self.config.horizontal_deadzone {
                horizontal = self.probe_ahead(state, agent.position, dx.signum(), speed);
            }
            break;
        }

        state.current_waypoint_index = index;
        horizontal
    }

    /// Whether the box one tile straight up is free
    fn headroom_free(&self, state: &NavigationState, position: Vec2) -> bool {
        self.box_free(state, position - Vec2::new(0.0, self.tile()))
    }

    /// Full speed if half a tile ahead is free, half speed if a quarter tile is
    fn probe_ahead(&self, state: &NavigationState, position: Vec2, direction: f32, speed: f32) -> f32 {
        let tile = self.tile();
        let far = position + Vec2::new(direction * tile * self.config.probe_distance, 0.0);
        if self.box_free(state, far) {
            return speed * direction;
        }
        let near = position + Vec2::new(direction * tile * self.config.cautious_probe_distance, 0.0);
        if self.box_free(state, near) {
            return speed * direction * self.config.cautious_speed_factor;
        }
        0.0
    }

    fn follow_flying(&self, state: &mut NavigationState, agent: &AgentSnapshot) -> Vec2 {
        let center = state.center(agent.position);
        let speed = state.move_speed;
        let Some(path) = state.current_path.as_ref() else {
            return Vec2::ZERO;
        };

        let mut index = state.current_waypoint_index;
        let mut velocity = Vec2::ZERO;

        while let Some(waypoint) = path.get(index) {
            let delta = waypoint.position - center;
            if delta.length() <= self.config.flying_reach_distance {
                index += 1;
                continue;
            }
            if delta.x.abs() > self.config.flying_deadband || delta.y.abs() > self.config.flying_deadband {
                velocity = delta.normalize_or_zero() * speed;
            }
            break;
        }

        state.current_waypoint_index = index;
        velocity
    }

    fn jump_ready(&self, state: &NavigationState, agent: &AgentSnapshot) -> bool {
        if agent.airborne {
            return false;
        }
        state
            .last_jump_time
            .is_none_or(|last| agent.time - last >= self.config.jump_cooldown)
    }

    fn should_jump(&self, state: &NavigationState, agent: &AgentSnapshot, horizontal: f32) -> bool {
        if !self.jump_ready(state, agent) {
            return false;
        }

        let tile = self.tile();
        let center = state.center(agent.position);

        // A waypoint overhead and close by
        if let Some(waypoint) = state.current_waypoint() {
            let rise = center.y - waypoint.position.y;
            let reach = (waypoint.position.x - center.x).abs();
            if rise > tile * self.config.jump_rise_threshold
                && reach <= tile * self.config.jump_reach
                && horizontal.abs() < 1.0
            {
                return true;
            }
        }

        if horizontal.abs() < 1.0 {
            return false;
        }

        let direction = horizontal.signum();
        let position = agent.position;

        // Something in the way that can be cleared
        let ahead = position + Vec2::new(direction * tile, 0.0);
        let over = ahead - Vec2::new(0.0, tile * self.config.obstacle_clearance);
        if !self.box_free(state, ahead) && self.box_free(state, over) {
            return true;
        }

        // A gap with somewhere to land
        let ground_ahead = position + Vec2::new(direction * tile, tile);
        if self.box_free(state, ground_ahead) {
            return (2..=self.config.max_gap_tiles).any(|k| {
                let landing = position + Vec2::new(direction * tile * k as f32, tile);
                !self.box_free(state, landing)
            });
        }

        false
    }

    /// Edge toward the target ignoring the path; jump when blocked
    fn recovery_movement(
        &self,
        state: &mut NavigationState,
        agent: &AgentSnapshot,
        target: Vec2,
    ) -> MovementIntent {
        let center = state.center(agent.position);
        let dx = target.x - center.x;
        if dx.abs() <= self.config.recovery_alignment {
            return MovementIntent::IDLE;
        }

        let direction = dx.signum();
        let probe = agent.position
            + Vec2::new(direction * self.tile() * self.config.recovery_probe_distance, 0.0);
        if self.box_free(state, probe) {
            return MovementIntent::horizontal(
                direction * state.move_speed * self.config.recovery_speed_factor,
            );
        }

        let jump = self.jump_ready(state, agent);
        if jump {
            state.last_jump_time = Some(agent.time);
        }
        MovementIntent {
            jump,
            ..MovementIntent::IDLE
        }
    }
}
