//! # Control Loop
//!
//! The loop runs one tick at a time:
//!
//! - Sense: read the colour label
//! - Decide: select the mode from the label
//! - Act: run manual control (input flags) or autonomous control (distance and touch)
//! - Pace: pause for the tick interval
//!
//! until the running flag is cleared, after which all motors are stopped and the shutdown
//! acknowledgment is emitted. Brick errors are not retried, they end the loop.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    auto_ctrl::{self, AutoBranch},
    brick::{Brick, BrickError, MotorId, NotifyKind},
    input::InputSource,
    manual_ctrl::{self, ManualDems},
    mode::Mode,
    params::LoopParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The control loop, owning the brick and the input source for the session.
pub struct CtrlLoop<B, I>
where
    B: Brick,
    I: InputSource,
{
    brick: B,
    input: I,
    params: LoopParams,
    state: LoopState,
    num_ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Lifecycle of the loop. `Stopping` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    Manual(ManualDems),
    Auto(AutoBranch),
}

/// Errors ending the control loop.
#[derive(Debug, thiserror::Error)]
pub enum CtrlLoopError {
    #[error("Brick failure on tick {tick}: {source}")]
    Brick {
        tick: u64,
        #[source]
        source: BrickError,
    },

    #[error("The control loop has already been stopped")]
    Stopped,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<B, I> CtrlLoop<B, I>
where
    B: Brick,
    I: InputSource,
{
    /// Create a new loop in the `Running` state.
    pub fn new(brick: B, input: I, params: LoopParams) -> Self {
        Self {
            brick,
            input,
            params,
            state: LoopState::Running,
            num_ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of completed ticks.
    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    pub fn brick(&self) -> &B {
        &self.brick
    }

    /// Run ticks until `running` is cleared, then shut down.
    ///
    /// The flag is only checked at the start of each tick, a tick in progress (including its
    /// pauses) always completes.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), CtrlLoopError> {
        info!("Running robot...");

        while running.load(Ordering::SeqCst) {
            self.tick()?;
        }

        info!("Stop requested after {} ticks", self.num_ticks);

        self.shutdown()
    }

    /// Execute a single tick: sense, decide, act, pace.
    pub fn tick(&mut self) -> Result<TickAction, CtrlLoopError> {
        if self.state == LoopState::Stopping {
            return Err(CtrlLoopError::Stopped);
        }

        let tick = self.num_ticks;
        let wrap = |source| CtrlLoopError::Brick { tick, source };

        let color = self.brick.read_color().map_err(wrap)?;
        let mode = Mode::from_color(color);

        let action = match mode {
            Mode::Manual => {
                let flags = self.input.manual_flags();
                TickAction::Manual(
                    manual_ctrl::exec(&mut self.brick, &flags, &self.params).map_err(wrap)?,
                )
            }
            Mode::Autonomous => {
                TickAction::Auto(auto_ctrl::exec(&mut self.brick, &self.params).map_err(wrap)?)
            }
        };

        debug!("Tick {}: {:?} -> {:?}", tick, color, action);

        self.brick.sleep(self.params.tick_interval());
        self.num_ticks += 1;

        Ok(action)
    }

    /// Stop all motors and emit the shutdown acknowledgment. Only the first call has any effect.
    pub fn shutdown(&mut self) -> Result<(), CtrlLoopError> {
        if self.state == LoopState::Stopping {
            return Ok(());
        }
        self.state = LoopState::Stopping;

        info!("Stopping robot...");

        let tick = self.num_ticks;
        for m in MotorId::ALL.iter() {
            self.brick
                .stop_motor(*m)
                .map_err(|source| CtrlLoopError::Brick { tick, source })?;
        }

        self.brick.notify(NotifyKind::Shutdown);

        Ok(())
    }
}
