//! # Claw rover library.
//!
//! Reactive controller for a two-motor wheeled rover with a claw. A colour marker under the
//! rover selects between manual teleoperation and autonomous obstacle avoidance on every tick.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomous control - obstacle avoidance from the touch and ultrasonic sensors
pub mod auto_ctrl;

/// Brick hardware abstraction - sensors, motors, pauses and the speaker
pub mod brick;

/// Control loop - sense, decide, act, pace
pub mod ctrl_loop;

/// Manual input flags and their sources
pub mod input;

/// Manual control - drive and claw demands from the input flags
pub mod manual_ctrl;

/// Mode selection from the colour sensor
pub mod mode;

/// Parameters for the executable
pub mod params;
