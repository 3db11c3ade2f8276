//! # Simulated Brick
//!
//! Plays back a looping scenario of sensor frames, one frame step per tick, and keeps track of
//! the last command sent to each motor. Used to exercise the control loop on a development host
//! where no ports are available.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, trace, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::{Brick, BrickError, ColorLabel, MotorId, NotifyKind};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Largest accepted time scale, keeping every scaled pause well inside a `Duration`.
pub const MAX_TIME_SCALE: f64 = 1000.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the simulated brick.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Multiplier applied to every pause. `0.0` runs the scenario as fast as possible.
    pub time_scale: f64,

    /// Sensor frames, played in order and then repeated.
    pub frames: Vec<SimFrame>,
}

/// Sensor values held for a number of ticks.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SimFrame {
    pub color: ColorLabel,

    /// Units: millimeters
    pub distance_mm: u32,

    #[serde(default)]
    pub touch: bool,

    /// Number of ticks this frame lasts for.
    #[serde(default = "default_frame_ticks")]
    pub ticks: u32,
}

/// Simulated brick.
pub struct SimBrick {
    frames: Vec<SimFrame>,

    /// Total number of ticks in one pass over the scenario.
    scenario_ticks: u64,

    /// Number of ticks (colour reads) so far.
    num_ticks: u64,

    current: SimFrame,

    time_scale: f64,

    motor_speeds: HashMap<MotorId, i32>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors building the simulated brick.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SimError {
    #[error("The simulation scenario contains no frames")]
    EmptyScenario,

    #[error("Frame {0} of the simulation scenario lasts zero ticks")]
    ZeroTickFrame(usize),

    #[error("Time scale must be between 0 and {}, found {0}", MAX_TIME_SCALE)]
    InvalidTimeScale(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            frames: Vec::new(),
        }
    }
}

impl SimBrick {
    /// Create a new simulated brick from the given parameters.
    pub fn new(params: &SimParams) -> Result<Self, SimError> {
        if !(0.0..=MAX_TIME_SCALE).contains(&params.time_scale) {
            return Err(SimError::InvalidTimeScale(params.time_scale));
        }

        let first = *params.frames.first().ok_or(SimError::EmptyScenario)?;

        if let Some(i) = params.frames.iter().position(|f| f.ticks == 0) {
            return Err(SimError::ZeroTickFrame(i));
        }

        let scenario_ticks = params.frames.iter().map(|f| f.ticks as u64).sum();

        Ok(Self {
            frames: params.frames.clone(),
            scenario_ticks,
            num_ticks: 0,
            current: first,
            time_scale: params.time_scale,
            motor_speeds: HashMap::new(),
        })
    }

    /// The last speed commanded on the motor, zero if stopped.
    pub fn motor_speed(&self, motor: MotorId) -> i32 {
        self.motor_speeds.get(&motor).copied().unwrap_or(0)
    }

    /// Find the frame active on the given tick.
    fn frame_for(&self, tick: u64) -> SimFrame {
        let mut remaining = tick % self.scenario_ticks;

        for frame in self.frames.iter() {
            if remaining < frame.ticks as u64 {
                return *frame;
            }
            remaining -= frame.ticks as u64;
        }

        self.current
    }
}

impl Brick for SimBrick {
    fn read_color(&mut self) -> Result<ColorLabel, BrickError> {
        let frame = self.frame_for(self.num_ticks);

        if frame != self.current {
            debug!("Sim advancing to frame {:?}", frame);
        }

        self.current = frame;
        self.num_ticks += 1;

        Ok(self.current.color)
    }

    fn read_distance_mm(&mut self) -> Result<u32, BrickError> {
        Ok(self.current.distance_mm)
    }

    fn read_touch(&mut self) -> Result<bool, BrickError> {
        Ok(self.current.touch)
    }

    fn set_motor_speed(&mut self, motor: MotorId, speed_degs: i32) -> Result<(), BrickError> {
        trace!("Sim {:?} motor -> {} deg/s", motor, speed_degs);
        self.motor_speeds.insert(motor, speed_degs);
        Ok(())
    }

    fn stop_motor(&mut self, motor: MotorId) -> Result<(), BrickError> {
        trace!("Sim {:?} motor stopped", motor);
        self.motor_speeds.insert(motor, 0);
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        if self.time_scale > 0.0 {
            match Duration::try_from_secs_f64(duration.as_secs_f64() * self.time_scale) {
                Ok(d) => std::thread::sleep(d),
                Err(e) => warn!("Cannot scale pause of {:?}, skipping it: {}", duration, e),
            }
        }
    }

    fn notify(&mut self, kind: NotifyKind) {
        info!("*beep* ({:?})", kind);
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_frame_ticks() -> u32 {
    1
}
