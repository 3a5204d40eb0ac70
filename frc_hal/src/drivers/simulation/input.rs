//! Scriptable operator console.

use std::cell::RefCell;
use std::rc::Rc;

use frc_common::hal::driver::OperatorInput;

const AXES: usize = 12;

#[derive(Debug, Default)]
struct InputState {
    axes: [f64; AXES],
    /// Bit `n` set = button `n` pressed.
    buttons: u32,
}

/// Operator input whose axes and buttons are set by a test or a script.
#[derive(Debug, Clone, Default)]
pub struct SimOperatorInput {
    state: Rc<RefCell<InputState>>,
}

impl SimOperatorInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis value, clamped to `[-1, 1]`. Unknown axes are ignored.
    pub fn set_axis(&self, id: u8, value: f64) {
        if let Some(axis) = self.state.borrow_mut().axes.get_mut(usize::from(id)) {
            *axis = value.clamp(-1.0, 1.0);
        }
    }

    pub fn set_button(&self, id: u8, pressed: bool) {
        let Some(bit) = 1u32.checked_shl(u32::from(id)) else {
            return;
        };
        let mut s = self.state.borrow_mut();
        if pressed {
            s.buttons |= bit;
        } else {
            s.buttons &= !bit;
        }
    }

    /// Center every axis and release every button.
    pub fn release_all(&self) {
        *self.state.borrow_mut() = InputState::default();
    }
}

impl OperatorInput for SimOperatorInput {
    fn axis(&self, id: u8) -> f64 {
        self.state
            .borrow()
            .axes
            .get(usize::from(id))
            .copied()
            .unwrap_or(0.0)
    }

    fn button(&self, id: u8) -> bool {
        1u32.checked_shl(u32::from(id))
            .is_some_and(|bit| self.state.borrow().buttons & bit != 0)
    }
}
