//! # Claw Executable Parameters
//!
//! This module provides the parameters for the claw executable, loaded once at startup from
//! `params/claw_exec.toml` and read-only afterwards.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

use crate::{
    auto_ctrl::{CLOSE_OBSTACLE_BIAS, OPEN_SPACE_TURN_OFFSET},
    brick::sim::SimParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Top level parameter file for the executable.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClawExecParams {
    /// Control loop speeds, thresholds and timing
    #[serde(rename = "loop")]
    pub loop_params: LoopParams,

    /// Simulated brick scenario
    pub sim: SimParams,
}

/// Parameters for the control loop.
///
/// Speeds are given in configured units and converted to motor units by multiplying by
/// `speed_scale`, see [`LoopParams::scaled`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoopParams {
    /// Drive speed used in autonomous mode.
    pub forward_speed: i32,

    /// Pivot speed used in autonomous mode.
    pub turn_speed: i32,

    /// Drive speed used in manual mode.
    pub manual_speed: i32,

    /// Claw speed used in manual mode.
    pub claw_speed: i32,

    /// Distance above which open space is detected.
    ///
    /// Units: millimeters
    pub open_space_threshold_mm: u32,

    /// Distance at or below which an obstacle is considered close.
    ///
    /// Units: millimeters
    pub close_distance_threshold_mm: u32,

    /// Pause after every tick.
    ///
    /// Units: milliseconds
    pub tick_interval_ms: u64,

    /// Conversion from configured speed units to motor units (degrees/second).
    pub speed_scale: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Reasons a set of loop parameters is rejected.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("Speed scale must be positive, found {0}")]
    InvalidSpeedScale(i32),

    #[error("Speed {name} is too large to convert into a motor command with scale {scale}")]
    SpeedOutOfRange { name: &'static str, scale: i32 },

    #[error(
        "Close distance threshold ({close} mm) must not exceed the open space threshold ({open} mm)"
    )]
    InvalidThresholds { close: u32, open: u32 },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            forward_speed: 40,
            turn_speed: 20,
            manual_speed: 20,
            claw_speed: 15,
            open_space_threshold_mm: 700,
            close_distance_threshold_mm: 500,
            tick_interval_ms: 50,
            speed_scale: 10,
        }
    }
}

impl LoopParams {
    /// Convert a speed in configured units into a motor command.
    pub fn scaled(&self, speed: i32) -> i32 {
        speed * self.speed_scale
    }

    /// The pacing pause applied after every tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.speed_scale <= 0 {
            return Err(ParamsError::InvalidSpeedScale(self.speed_scale));
        }

        // Every speed the controllers scale, in both directions, must fit a motor command
        let speeds = [
            ("forward_speed", self.forward_speed, 0),
            ("forward_speed + bias", self.forward_speed, CLOSE_OBSTACLE_BIAS),
            ("turn_speed", self.turn_speed, 0),
            ("turn_speed - offset", self.turn_speed, -OPEN_SPACE_TURN_OFFSET),
            ("turn_speed + offset", self.turn_speed, OPEN_SPACE_TURN_OFFSET),
            ("manual_speed", self.manual_speed, 0),
            ("claw_speed", self.claw_speed, 0),
        ];

        for (name, speed, offset) in speeds.iter() {
            let cmd = speed
                .checked_add(*offset)
                .and_then(|s| s.checked_mul(self.speed_scale))
                .and_then(|s| s.checked_neg());

            if cmd.is_none() {
                return Err(ParamsError::SpeedOutOfRange {
                    name: *name,
                    scale: self.speed_scale,
                });
            }
        }

        if self.close_distance_threshold_mm > self.open_space_threshold_mm {
            return Err(ParamsError::InvalidThresholds {
                close: self.close_distance_threshold_mm,
                open: self.open_space_threshold_mm,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = LoopParams::default();

        assert_eq!(p.scaled(p.forward_speed), 400);
        assert_eq!(p.scaled(-p.manual_speed), -200);
        assert_eq!(p.tick_interval(), Duration::from_millis(50));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let p: ClawExecParams = util::params::parse(
            r#"
            [loop]
            forward_speed = 30
            open_space_threshold_mm = 900

            [sim]
            time_scale = 0.5

            [[sim.frames]]
            color = "Red"
            distance_mm = 300
            ticks = 10
            "#,
        )
        .unwrap();

        assert_eq!(p.loop_params.forward_speed, 30);
        assert_eq!(p.loop_params.open_space_threshold_mm, 900);
        assert_eq!(p.loop_params.turn_speed, 20);
        assert_eq!(p.sim.time_scale, 0.5);
        assert_eq!(p.sim.frames.len(), 1);
        assert!(!p.sim.frames[0].touch);
    }

    #[test]
    fn test_validate() {
        let mut p = LoopParams::default();
        p.speed_scale = 0;
        assert_eq!(p.validate(), Err(ParamsError::InvalidSpeedScale(0)));

        let mut p = LoopParams::default();
        p.close_distance_threshold_mm = 800;
        assert_eq!(
            p.validate(),
            Err(ParamsError::InvalidThresholds { close: 800, open: 700 })
        );
    }

    #[test]
    fn test_validate_speed_range() {
        let p = LoopParams {
            forward_speed: 300_000_000,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamsError::SpeedOutOfRange {
                name: "forward_speed",
                scale: 10
            })
        );

        // Offsets are checked before scaling
        let p = LoopParams {
            forward_speed: i32::MAX,
            speed_scale: 1,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamsError::SpeedOutOfRange {
                name: "forward_speed + bias",
                scale: 1
            })
        );

        let p = LoopParams {
            turn_speed: i32::MIN,
            speed_scale: 1,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamsError::SpeedOutOfRange {
                name: "turn_speed",
                scale: 1
            })
        );

        let p = LoopParams {
            turn_speed: i32::MIN + 10,
            speed_scale: 1,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamsError::SpeedOutOfRange {
                name: "turn_speed - offset",
                scale: 1
            })
        );

        // Largest manual speed which still fits
        let p = LoopParams {
            manual_speed: i32::MAX / 10,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.scaled(p.manual_speed), i32::MAX / 10 * 10);
    }
}
