//! # Manual Control
//!
//! Converts the manual input flags into drive and claw demands. The drive and the claw are
//! evaluated independently, each by its own first-match-wins priority order.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use crate::{
    brick::{Brick, BrickError, MotorId},
    input::ManualInputState,
    params::LoopParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands issued in a manual tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualDems {
    pub drive: DriveDem,
    pub claw: ClawDem,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Drive demand, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveDem {
    Forward,
    Reverse,
    /// Left motor backwards, right motor forwards
    PivotLeft,
    /// Left motor forwards, right motor backwards
    PivotRight,
    Stop,
}

/// Claw demand, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClawDem {
    Open,
    Close,
    Stop,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ManualDems {
    /// Select the demands for the given flags.
    pub fn select(flags: &ManualInputState) -> Self {
        Self {
            drive: DriveDem::select(flags),
            claw: ClawDem::select(flags),
        }
    }
}

impl DriveDem {
    /// Select the drive demand, the first held control in the order forward, reverse, left,
    /// right wins.
    pub fn select(flags: &ManualInputState) -> Self {
        if flags.forward {
            DriveDem::Forward
        } else if flags.reverse {
            DriveDem::Reverse
        } else if flags.left {
            DriveDem::PivotLeft
        } else if flags.right {
            DriveDem::PivotRight
        } else {
            DriveDem::Stop
        }
    }

    /// Motor commands for the (left, right) drive motors, or `None` to stop them.
    pub fn speeds(&self, params: &LoopParams) -> Option<(i32, i32)> {
        let s = params.scaled(params.manual_speed);

        match self {
            DriveDem::Forward => Some((s, s)),
            DriveDem::Reverse => Some((-s, -s)),
            DriveDem::PivotLeft => Some((-s, s)),
            DriveDem::PivotRight => Some((s, -s)),
            DriveDem::Stop => None,
        }
    }
}

impl ClawDem {
    /// Select the claw demand, opening wins over closing.
    pub fn select(flags: &ManualInputState) -> Self {
        if flags.claw_open {
            ClawDem::Open
        } else if flags.claw_close {
            ClawDem::Close
        } else {
            ClawDem::Stop
        }
    }

    /// Motor command for the claw, or `None` to stop it.
    pub fn speed(&self, params: &LoopParams) -> Option<i32> {
        let s = params.scaled(params.claw_speed);

        match self {
            ClawDem::Open => Some(s),
            ClawDem::Close => Some(-s),
            ClawDem::Stop => None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run one manual tick: select the demands for the flags and command the motors.
pub fn exec<B: Brick>(
    brick: &mut B,
    flags: &ManualInputState,
    params: &LoopParams,
) -> Result<ManualDems, BrickError> {
    let dems = ManualDems::select(flags);

    trace!("Manual demands: {:?}", dems);

    match dems.drive.speeds(params) {
        Some((left, right)) => {
            brick.set_motor_speed(MotorId::Left, left)?;
            brick.set_motor_speed(MotorId::Right, right)?;
        }
        None => {
            brick.stop_motor(MotorId::Left)?;
            brick.stop_motor(MotorId::Right)?;
        }
    }

    match dems.claw.speed(params) {
        Some(s) => brick.set_motor_speed(MotorId::Claw, s)?,
        None => brick.stop_motor(MotorId::Claw)?,
    }

    Ok(dems)
}
