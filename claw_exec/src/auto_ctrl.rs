//! # Autonomous Control
//!
//! Obstacle avoidance using the touch sensor on the right and the ultrasonic sensor on the left.
//!
//! Each tick one [`AutoBranch`] is selected (first match wins) and planned into a fixed sequence
//! of [`Step`]s, which are then executed in order. Waits block the whole loop.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, trace};
use std::time::Duration;

use crate::{
    brick::{Brick, BrickError, MotorId},
    params::LoopParams,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Pause after stopping on a bump.
const ESCAPE_STOP_MS: u64 = 200;

/// Time spent reversing away from a bump.
const ESCAPE_REVERSE_MS: u64 = 1000;

/// Time spent pivoting right after reversing.
const ESCAPE_PIVOT_MS: u64 = 1200;

/// Time spent continuing forwards once open space is seen, to clear the obstacle edge.
const OPEN_SPACE_APPROACH_MS: u64 = 700;

/// Pause after stopping before turning into open space.
const OPEN_SPACE_STOP_MS: u64 = 500;

/// Time spent turning into open space.
const OPEN_SPACE_TURN_MS: u64 = 1500;

/// Time spent driving into open space after the turn.
const OPEN_SPACE_FORWARD_MS: u64 = 2000;

/// Speed offset between the drive motors while turning into open space.
///
/// Units: configured speed units
pub(crate) const OPEN_SPACE_TURN_OFFSET: i32 = 20;

/// Time spent driving forwards when the way ahead is clear.
const SAFE_FORWARD_MS: u64 = 500;

/// Extra left motor speed biasing the rover right, away from a close obstacle.
///
/// Units: configured speed units
pub(crate) const CLOSE_OBSTACLE_BIAS: i32 = 1;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Autonomous behaviour, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoBranch {
    /// The touch sensor is pressed, back off and turn right.
    Escape,
    /// The wall on the left has opened up, turn left into the gap.
    OpenSpace,
    /// Nothing close, keep going.
    SafeForward,
    /// Close to the wall, drift right.
    CloseObstacle,
}

/// A single step of an autonomous manoeuvre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Command both drive motors.
    ///
    /// Units: degrees/second
    Drive { left: i32, right: i32 },

    /// Stop both drive motors.
    StopDrive,

    /// Block for the given number of milliseconds.
    Wait(u64),

    /// Log a notice.
    Notice(&'static str),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoBranch {
    /// Select the branch for the given sensor readings. Touch overrides any distance, distance
    /// comparisons are strict.
    pub fn select(touch_pressed: bool, distance_mm: u32, params: &LoopParams) -> Self {
        if touch_pressed {
            AutoBranch::Escape
        } else if distance_mm > params.open_space_threshold_mm {
            AutoBranch::OpenSpace
        } else if distance_mm > params.close_distance_threshold_mm {
            AutoBranch::SafeForward
        } else {
            AutoBranch::CloseObstacle
        }
    }

    /// Plan the steps of this branch.
    pub fn plan(&self, params: &LoopParams) -> Vec<Step> {
        let fwd = params.scaled(params.forward_speed);
        let turn = params.scaled(params.turn_speed);

        match self {
            AutoBranch::Escape => vec![
                Step::StopDrive,
                Step::Wait(ESCAPE_STOP_MS),
                Step::Drive {
                    left: -fwd,
                    right: -fwd,
                },
                Step::Wait(ESCAPE_REVERSE_MS),
                Step::Drive {
                    left: turn,
                    right: -turn,
                },
                Step::Wait(ESCAPE_PIVOT_MS),
                Step::Drive {
                    left: fwd,
                    right: fwd,
                },
            ],
            AutoBranch::OpenSpace => vec![
                Step::Notice("Open space detected on left, turning left"),
                Step::Wait(OPEN_SPACE_APPROACH_MS),
                Step::StopDrive,
                Step::Wait(OPEN_SPACE_STOP_MS),
                Step::Drive {
                    left: params.scaled(params.turn_speed - OPEN_SPACE_TURN_OFFSET),
                    right: params.scaled(params.turn_speed + OPEN_SPACE_TURN_OFFSET),
                },
                Step::Wait(OPEN_SPACE_TURN_MS),
                Step::Drive {
                    left: fwd,
                    right: fwd,
                },
                Step::Wait(OPEN_SPACE_FORWARD_MS),
            ],
            AutoBranch::SafeForward => vec![
                Step::Drive {
                    left: fwd,
                    right: fwd,
                },
                Step::Wait(SAFE_FORWARD_MS),
            ],
            AutoBranch::CloseObstacle => vec![Step::Drive {
                left: params.scaled(params.forward_speed + CLOSE_OBSTACLE_BIAS),
                right: fwd,
            }],
        }
    }
}

impl Step {
    /// Apply this step to the brick.
    pub fn exec<B: Brick>(&self, brick: &mut B) -> Result<(), BrickError> {
        match *self {
            Step::Drive { left, right } => {
                brick.set_motor_speed(MotorId::Left, left)?;
                brick.set_motor_speed(MotorId::Right, right)?;
            }
            Step::StopDrive => {
                for m in MotorId::DRIVE.iter() {
                    brick.stop_motor(*m)?;
                }
            }
            Step::Wait(ms) => brick.sleep(Duration::from_millis(ms)),
            Step::Notice(msg) => info!("{}", msg),
        }

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run one autonomous tick: sample the ultrasonic and touch sensors, select a branch and execute
/// its steps.
pub fn exec<B: Brick>(brick: &mut B, params: &LoopParams) -> Result<AutoBranch, BrickError> {
    let distance_mm = brick.read_distance_mm()?;
    let touch_pressed = brick.read_touch()?;

    let branch = AutoBranch::select(touch_pressed, distance_mm, params);

    trace!(
        "Auto: distance {} mm, touch {}, branch {:?}",
        distance_mm,
        touch_pressed,
        branch
    );

    for step in branch.plan(params).iter() {
        step.exec(brick)?;
    }

    Ok(branch)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::brick::{
        recorder::{BrickEvent, RecordingBrick},
        ColorLabel,
    };

    #[test]
    fn test_touch_overrides_distance() {
        let p = LoopParams::default();

        for distance_mm in [0, 50, 500, 700, 9000].iter() {
            assert_eq!(AutoBranch::select(true, *distance_mm, &p), AutoBranch::Escape);
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        let p = LoopParams::default();

        assert_eq!(AutoBranch::select(false, 701, &p), AutoBranch::OpenSpace);
        assert_eq!(AutoBranch::select(false, 700, &p), AutoBranch::SafeForward);
        assert_eq!(AutoBranch::select(false, 501, &p), AutoBranch::SafeForward);
        assert_eq!(AutoBranch::select(false, 500, &p), AutoBranch::CloseObstacle);
        assert_eq!(AutoBranch::select(false, 0, &p), AutoBranch::CloseObstacle);
    }

    #[test]
    fn test_alternate_thresholds() {
        let p = LoopParams {
            open_space_threshold_mm: 1200,
            close_distance_threshold_mm: 200,
            ..Default::default()
        };

        assert_eq!(AutoBranch::select(false, 1000, &p), AutoBranch::SafeForward);
        assert_eq!(AutoBranch::select(false, 300, &p), AutoBranch::SafeForward);
        assert_eq!(AutoBranch::select(false, 200, &p), AutoBranch::CloseObstacle);
    }

    #[test]
    fn test_escape_sequence() {
        for distance_mm in [50, 9000].iter() {
            let mut brick = RecordingBrick::new(ColorLabel::Red, *distance_mm, true);

            let branch = exec(&mut brick, &LoopParams::default()).unwrap();

            assert_eq!(branch, AutoBranch::Escape);
            assert_eq!(
                brick.events,
                vec![
                    BrickEvent::ReadDistance,
                    BrickEvent::ReadTouch,
                    BrickEvent::Stop(MotorId::Left),
                    BrickEvent::Stop(MotorId::Right),
                    BrickEvent::Sleep(200),
                    BrickEvent::SetSpeed(MotorId::Left, -400),
                    BrickEvent::SetSpeed(MotorId::Right, -400),
                    BrickEvent::Sleep(1000),
                    BrickEvent::SetSpeed(MotorId::Left, 200),
                    BrickEvent::SetSpeed(MotorId::Right, -200),
                    BrickEvent::Sleep(1200),
                    BrickEvent::SetSpeed(MotorId::Left, 400),
                    BrickEvent::SetSpeed(MotorId::Right, 400),
                ]
            );
        }
    }

    #[test]
    fn test_open_space_sequence() {
        let mut brick = RecordingBrick::new(ColorLabel::White, 701, false);

        exec(&mut brick, &LoopParams::default()).unwrap();

        assert_eq!(
            brick.events[2..],
            [
                BrickEvent::Sleep(700),
                BrickEvent::Stop(MotorId::Left),
                BrickEvent::Stop(MotorId::Right),
                BrickEvent::Sleep(500),
                BrickEvent::SetSpeed(MotorId::Left, 0),
                BrickEvent::SetSpeed(MotorId::Right, 400),
                BrickEvent::Sleep(1500),
                BrickEvent::SetSpeed(MotorId::Left, 400),
                BrickEvent::SetSpeed(MotorId::Right, 400),
                BrickEvent::Sleep(2000),
            ]
        );
    }

    #[test]
    fn test_safe_forward() {
        let mut brick = RecordingBrick::new(ColorLabel::Black, 700, false);

        assert_eq!(
            exec(&mut brick, &LoopParams::default()).unwrap(),
            AutoBranch::SafeForward
        );
        assert_eq!(
            brick.events[2..],
            [
                BrickEvent::SetSpeed(MotorId::Left, 400),
                BrickEvent::SetSpeed(MotorId::Right, 400),
                BrickEvent::Sleep(500),
            ]
        );
    }

    #[test]
    fn test_close_obstacle_drifts_right() {
        let mut brick = RecordingBrick::new(ColorLabel::Red, 300, false);

        exec(&mut brick, &LoopParams::default()).unwrap();

        assert_eq!(
            brick.events[2..],
            [
                BrickEvent::SetSpeed(MotorId::Left, 410),
                BrickEvent::SetSpeed(MotorId::Right, 400),
            ]
        );
    }

    #[test]
    fn test_sensor_failure_propagates() {
        let mut brick = RecordingBrick::new(ColorLabel::Red, 300, false);
        brick.fail_distance = true;

        assert!(matches!(
            exec(&mut brick, &LoopParams::default()),
            Err(BrickError::SensorRead { .. })
        ));
        assert!(brick.motor_events().is_empty());
    }
}
