//! Recording brick for unit tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{Brick, BrickError, ColorLabel, MotorId, NotifyKind, SensorId};

/// A single call made on the brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickEvent {
    ReadColor,
    ReadDistance,
    ReadTouch,
    SetSpeed(MotorId, i32),
    Stop(MotorId),
    Sleep(u64),
    Notify(NotifyKind),
}

/// Brick returning fixed sensor values and recording every call made on it.
pub struct RecordingBrick {
    pub color: ColorLabel,
    pub distance_mm: u32,
    pub touch: bool,

    /// If set, fail distance reads.
    pub fail_distance: bool,

    /// If set, fail every command to this motor.
    pub fail_motor: Option<MotorId>,

    /// Clear the flag once this many colour reads (ticks) have been made.
    pub cancel_after: Option<(Arc<AtomicBool>, usize)>,

    pub events: Vec<BrickEvent>,
}

impl RecordingBrick {
    pub fn new(color: ColorLabel, distance_mm: u32, touch: bool) -> Self {
        Self {
            color,
            distance_mm,
            touch,
            fail_distance: false,
            fail_motor: None,
            cancel_after: None,
            events: Vec::new(),
        }
    }

    /// Events which command a motor.
    pub fn motor_events(&self) -> Vec<BrickEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, BrickEvent::SetSpeed(..) | BrickEvent::Stop(_)))
            .copied()
            .collect()
    }

    /// Durations of every sleep, in milliseconds.
    pub fn sleeps(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BrickEvent::Sleep(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: BrickEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    fn check_motor(&self, motor: MotorId) -> Result<(), BrickError> {
        if self.fail_motor == Some(motor) {
            return Err(BrickError::ActuatorCommand {
                motor,
                reason: String::from("motor disconnected"),
            });
        }
        Ok(())
    }
}

impl Brick for RecordingBrick {
    fn read_color(&mut self) -> Result<ColorLabel, BrickError> {
        self.events.push(BrickEvent::ReadColor);

        if let Some((ref flag, n)) = self.cancel_after {
            if self.count(BrickEvent::ReadColor) >= n {
                flag.store(false, Ordering::SeqCst);
            }
        }

        Ok(self.color)
    }

    fn read_distance_mm(&mut self) -> Result<u32, BrickError> {
        self.events.push(BrickEvent::ReadDistance);
        if self.fail_distance {
            return Err(BrickError::SensorRead {
                sensor: SensorId::Ultrasonic,
                reason: String::from("sensor unplugged"),
            });
        }
        Ok(self.distance_mm)
    }

    fn read_touch(&mut self) -> Result<bool, BrickError> {
        self.events.push(BrickEvent::ReadTouch);
        Ok(self.touch)
    }

    fn set_motor_speed(&mut self, motor: MotorId, speed_degs: i32) -> Result<(), BrickError> {
        self.check_motor(motor)?;
        self.events.push(BrickEvent::SetSpeed(motor, speed_degs));
        Ok(())
    }

    fn stop_motor(&mut self, motor: MotorId) -> Result<(), BrickError> {
        self.check_motor(motor)?;
        self.events.push(BrickEvent::Stop(motor));
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        self.events.push(BrickEvent::Sleep(duration.as_millis() as u64));
    }

    fn notify(&mut self, kind: NotifyKind) {
        self.events.push(BrickEvent::Notify(kind));
    }
}
