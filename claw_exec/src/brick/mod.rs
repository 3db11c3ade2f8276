//! # Brick Hardware Abstraction
//!
//! The control loop never talks to ports directly. Everything it needs from the hardware (sensor
//! sampling, motor commands, blocking pauses and audible feedback) goes through the [`Brick`]
//! trait, so the loop can run against the simulated brick or a recording brick in tests.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Simulated brick used on development hosts.
pub mod sim;

/// Brick which records every call, used by the unit tests.
#[cfg(test)]
pub(crate) mod recorder;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Capabilities the control loop requires from the robot hardware.
pub trait Brick {
    /// Read the current colour classification from the colour sensor.
    fn read_color(&mut self) -> Result<ColorLabel, BrickError>;

    /// Read the ultrasonic range.
    ///
    /// Units: millimeters
    fn read_distance_mm(&mut self) -> Result<u32, BrickError>;

    /// Returns `true` if the touch sensor is pressed.
    fn read_touch(&mut self) -> Result<bool, BrickError>;

    /// Run a motor at the given signed speed.
    ///
    /// Units: degrees/second
    fn set_motor_speed(&mut self, motor: MotorId, speed_degs: i32) -> Result<(), BrickError>;

    /// Stop a motor.
    fn stop_motor(&mut self, motor: MotorId) -> Result<(), BrickError>;

    /// Block the calling thread for the given duration.
    fn sleep(&mut self, duration: Duration);

    /// Emit an audible acknowledgment. Best effort, failures are not reported.
    fn notify(&mut self, kind: NotifyKind);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The three independently addressable motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorId {
    /// Left drive motor
    Left,
    /// Right drive motor
    Right,
    /// Gripper motor
    Claw,
}

/// Colour classifications reported by the colour sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ColorLabel {
    /// No colour could be detected
    None,
    Black,
    Blue,
    Green,
    Yellow,
    Red,
    White,
    Brown,
}

/// Sensors fitted to the brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    Color,
    Ultrasonic,
    Touch,
}

/// Kinds of audible acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Startup,
    Shutdown,
}

/// Errors raised by the brick. Both are fatal to the control loop.
#[derive(Debug, thiserror::Error)]
pub enum BrickError {
    #[error("Failed to read the {sensor:?} sensor: {reason}")]
    SensorRead { sensor: SensorId, reason: String },

    #[error("Failed to command the {motor:?} motor: {reason}")]
    ActuatorCommand { motor: MotorId, reason: String },
}

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

impl MotorId {
    /// All motors, in the order they are stopped on shutdown.
    pub const ALL: [MotorId; 3] = [MotorId::Left, MotorId::Right, MotorId::Claw];

    /// The two drive motors.
    pub const DRIVE: [MotorId; 2] = [MotorId::Left, MotorId::Right];
}

impl ColorLabel {
    /// Every label the colour sensor can report.
    pub const ALL: [ColorLabel; 8] = [
        ColorLabel::None,
        ColorLabel::Black,
        ColorLabel::Blue,
        ColorLabel::Green,
        ColorLabel::Yellow,
        ColorLabel::Red,
        ColorLabel::White,
        ColorLabel::Brown,
    ];
}
