mod arbitration;
mod autonomous;
mod group_ordering;
mod lift_control;
mod match_lifecycle;

use frc_control_unit::command::Command;
use frc_control_unit::subsystem::SubsystemSet;

/// Robot stand-in that records lifecycle calls with the pass they happen in.
#[derive(Debug, Default)]
pub struct Trace {
    pub tick: u64,
    pub events: Vec<(u64, String)>,
}

impl Trace {
    pub fn push(&mut self, tag: &str, what: &str) {
        self.events.push((self.tick, format!("{tag}:{what}")));
    }

    /// Event labels without ticks.
    pub fn labels(&self) -> Vec<&str> {
        self.events.iter().map(|(_, e)| e.as_str()).collect()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.events.iter().position(|(_, e)| e == label)
    }

    pub fn count(&self, label: &str) -> usize {
        self.events.iter().filter(|(_, e)| e == label).count()
    }
}

/// Command that logs every callback into a [`Trace`].
pub struct Scripted {
    pub tag: &'static str,
    pub needs: SubsystemSet,
    pub finish_after: Option<u32>,
    pub interruptible: bool,
    executes: u32,
}

impl Scripted {
    pub fn forever(tag: &'static str, needs: SubsystemSet) -> Self {
        Self {
            tag,
            needs,
            finish_after: None,
            interruptible: true,
            executes: 0,
        }
    }

    pub fn finishing(tag: &'static str, needs: SubsystemSet, after: u32) -> Self {
        Self {
            finish_after: Some(after),
            ..Self::forever(tag, needs)
        }
    }

    pub fn stubborn(mut self) -> Self {
        self.interruptible = false;
        self
    }
}

impl Command<Trace> for Scripted {
    fn name(&self) -> &str {
        self.tag
    }

    fn requirements(&self) -> SubsystemSet {
        self.needs
    }

    fn is_interruptible(&self) -> bool {
        self.interruptible
    }

    fn initialize(&mut self, trace: &mut Trace) {
        self.executes = 0;
        trace.push(self.tag, "init");
    }

    fn execute(&mut self, trace: &mut Trace) {
        self.executes += 1;
        trace.push(self.tag, "exec");
    }

    fn is_finished(&self, _trace: &Trace) -> bool {
        self.finish_after.is_some_and(|n| self.executes >= n)
    }

    fn end(&mut self, trace: &mut Trace) {
        trace.push(self.tag, "end");
    }

    fn interrupted(&mut self, trace: &mut Trace) {
        trace.push(self.tag, "int");
    }
}
