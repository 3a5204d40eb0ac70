//! Operator button → command bindings.
//!
//! Polled once per tick before the scheduler pass. A binding fires on the
//! rising edge of its button, so holding a button schedules the command once.

use frc_common::hal::driver::OperatorInput;
use tracing::debug;

use crate::command::CommandId;
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy)]
struct Binding {
    button: u8,
    command: CommandId,
    was_pressed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    bindings: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `command` each time `button` goes from released to pressed.
    pub fn when_pressed(&mut self, button: u8, command: CommandId) -> &mut Self {
        self.bindings.push(Binding {
            button,
            command,
            was_pressed: false,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Sample every bound button and schedule on rising edges.
    pub fn poll<R>(&mut self, input: &dyn OperatorInput, scheduler: &mut Scheduler<R>) {
        for binding in &mut self.bindings {
            let pressed = input.button(binding.button);
            if pressed && !binding.was_pressed {
                debug!(button = binding.button, command = %binding.command, "button pressed");
                scheduler.schedule(binding.command);
            }
            binding.was_pressed = pressed;
        }
    }

    /// Forget the last sampled state, e.g. on a mode change.
    pub fn reset(&mut self) {
        for binding in &mut self.bindings {
            binding.was_pressed = false;
        }
    }
}
