//! # Manual Input
//!
//! Manual mode is driven by six held/not-held controls. The control loop only ever reads a
//! snapshot of them through an [`InputSource`]. No physical input handler is fitted yet, so the
//! executable uses [`StubInput`]; [`SharedInput`] is the synchronised source an input task would
//! write into through its single [`InputWriter`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex, MutexGuard};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of manual control flags.
pub trait InputSource {
    /// Get a snapshot of the current flags.
    fn manual_flags(&self) -> ManualInputState;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Held state of each manual control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualInputState {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
    pub claw_open: bool,
    pub claw_close: bool,
}

/// Input source which never reports a held control.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubInput;

/// Input source shared with a separate input-handling task.
///
/// Cloning gives another reader. Only the [`InputWriter`] returned by [`SharedInput::new`] can
/// change the flags.
#[derive(Debug, Clone)]
pub struct SharedInput {
    state: Arc<Mutex<ManualInputState>>,
}

/// The single write handle for a [`SharedInput`].
#[derive(Debug)]
pub struct InputWriter {
    state: Arc<Mutex<ManualInputState>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The named manual controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Reverse,
    Left,
    Right,
    ClawOpen,
    ClawClose,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ManualInputState {
    /// Returns `true` if the control is held.
    pub fn is_held(&self, control: Control) -> bool {
        *self.flag(control)
    }

    /// Set whether a control is held.
    pub fn set(&mut self, control: Control, held: bool) {
        *self.flag_mut(control) = held;
    }

    fn flag(&self, control: Control) -> &bool {
        match control {
            Control::Forward => &self.forward,
            Control::Reverse => &self.reverse,
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::ClawOpen => &self.claw_open,
            Control::ClawClose => &self.claw_close,
        }
    }

    fn flag_mut(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Forward => &mut self.forward,
            Control::Reverse => &mut self.reverse,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::ClawOpen => &mut self.claw_open,
            Control::ClawClose => &mut self.claw_close,
        }
    }
}

impl InputSource for StubInput {
    fn manual_flags(&self) -> ManualInputState {
        ManualInputState::default()
    }
}

impl SharedInput {
    /// Create a new shared input with all controls released, returning the reader and the writer.
    pub fn new() -> (Self, InputWriter) {
        let state = Arc::new(Mutex::new(ManualInputState::default()));

        (
            Self {
                state: state.clone(),
            },
            InputWriter { state },
        )
    }
}

impl InputSource for SharedInput {
    fn manual_flags(&self) -> ManualInputState {
        *lock(&self.state)
    }
}

impl InputWriter {
    /// Set whether a single control is held.
    pub fn set(&self, control: Control, held: bool) {
        lock(&self.state).set(control, held);
    }

    /// Replace every flag at once.
    pub fn replace(&self, new_state: ManualInputState) {
        *lock(&self.state) = new_state;
    }

    /// Release every control.
    pub fn release_all(&self) {
        self.replace(ManualInputState::default());
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Lock the state, recovering the flags from a poisoned lock.
fn lock(state: &Mutex<ManualInputState>) -> MutexGuard<'_, ManualInputState> {
    match state.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}
