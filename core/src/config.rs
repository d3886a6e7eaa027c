//! Tunable simulation parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Coord, Rect};

const DEFAULT_SEED: u64 = 0x5eed_d0e1_2016_0224;

/// Reasons a configuration value is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The quad tree cannot hold any entry per node.
    #[error("quad tree capacity must be at least one entry")]
    ZeroCapacity,
    /// A value that must be strictly positive was zero or negative.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f32,
    },
    /// A ratio fell outside the open unit interval.
    #[error("`{field}` must lie strictly between 0 and 1, got {value}")]
    OutsideUnitInterval {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f32,
    },
    /// A tick count that must be at least one was zero.
    #[error("`{field}` must be at least one tick")]
    ZeroTicks {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The arena bounds enclose no area.
    #[error("arena bounds must have positive area, got {width}x{height}")]
    EmptyArena {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
}

/// Subdivision policy of the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Entries a leaf holds before it subdivides.
    pub capacity: usize,
    /// Deepest level a node may reach; the root sits at depth zero.
    pub max_depth: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            max_depth: 4,
        }
    }
}

impl QuadTreeConfig {
    /// Checks that the policy can store entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Movement constants shared by every wizard.
///
/// Velocities are expressed in world units per tick and timers in ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Half width and half height of a wizard's collision box.
    pub half_extents: Coord,
    /// Top horizontal speed reachable through acceleration.
    pub max_vel_x: f32,
    /// Ticks needed to reach top speed from rest on the ground.
    pub accel_time: f32,
    /// Fraction of the ground acceleration available while airborne.
    pub air_control: f32,
    /// Vertical velocity of a standard jump; negative is upward.
    pub jump_strength: f32,
    /// Extra upward velocity per tick while the jump input is held.
    pub jump_boost: f32,
    /// Length of the held-jump window.
    pub jump_time: u32,
    /// Upward speed above which held jumps use jump gravity.
    pub jump_gravity_speed: f32,
    /// Horizontal velocity imparted by a wall jump.
    pub wall_jump_x: f32,
    /// Ticks after leaving a wall during which a wall jump is still allowed.
    pub wall_jump_grace: u32,
    /// Fastest downward speed while sliding along a wall.
    pub wall_slide_speed: f32,
    /// Gravity applied while falling or without jump input.
    pub normal_gravity: f32,
    /// Reduced gravity applied during a held jump.
    pub jump_gravity: f32,
    /// Downward speed beyond which gravity stops accelerating a wizard.
    pub terminal_velocity: f32,
    /// Horizontal velocity multiplier applied every grounded tick.
    pub friction_x: f32,
    /// Downward velocity assigned after any vertical contact.
    pub contact_epsilon: f32,
    /// Impact speed beyond which a landing is reported.
    pub hard_landing_speed: f32,
    /// Shortest respawn delay.
    pub respawn_min_ticks: u32,
    /// Random extra respawn delay added on top of the minimum.
    pub respawn_spread_ticks: u32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            half_extents: Coord::new(12.0, 12.0),
            max_vel_x: 4.0,
            accel_time: 6.0,
            air_control: 0.65,
            jump_strength: -3.0,
            jump_boost: -0.3,
            jump_time: 20,
            jump_gravity_speed: 2.0,
            wall_jump_x: 3.0,
            wall_jump_grace: 10,
            wall_slide_speed: 1.0,
            normal_gravity: 0.18,
            jump_gravity: 0.09,
            terminal_velocity: 7.0,
            friction_x: 0.87,
            contact_epsilon: 0.01,
            hard_landing_speed: 5.0,
            respawn_min_ticks: 70,
            respawn_spread_ticks: 80,
        }
    }
}

impl MovementTuning {
    /// Largest horizontal velocity change a grounded wizard may make per tick.
    #[must_use]
    pub fn ground_accel_cap(&self) -> f32 {
        self.max_vel_x / self.accel_time
    }

    /// Rejects constants that would break the movement invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("half_extents.x", self.half_extents.x)?;
        positive("half_extents.y", self.half_extents.y)?;
        positive("max_vel_x", self.max_vel_x)?;
        positive("accel_time", self.accel_time)?;
        positive("terminal_velocity", self.terminal_velocity)?;
        unit_interval("air_control", self.air_control)?;
        if self.jump_time == 0 {
            return Err(ConfigError::ZeroTicks { field: "jump_time" });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutsideUnitInterval { field, value })
    }
}

/// Dimensions of the playable arena.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Region covered by the root of the spatial index.
    pub bounds: Rect,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 1024.0, 576.0),
        }
    }
}

impl ArenaConfig {
    /// Rejects arenas without area.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.bounds.width();
        let height = self.bounds.height();
        if width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::EmptyArena { width, height })
        }
    }
}

/// Complete configuration of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for respawn timers and spawn point selection.
    pub seed: u64,
    /// Arena dimensions.
    pub arena: ArenaConfig,
    /// Spatial index policy.
    pub quad_tree: QuadTreeConfig,
    /// Movement constants.
    pub movement: MovementTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            arena: ArenaConfig::default(),
            quad_tree: QuadTreeConfig::default(),
            movement: MovementTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        self.quad_tree.validate()?;
        self.movement.validate()
    }
}
