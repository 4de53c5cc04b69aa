//! Action sink port - where the controller sends its commands.

use crate::types::AttackCommand;

/// Accepts at most one attack command per own unit per tick.
pub trait ActionSink {
    fn issue(&mut self, command: AttackCommand);
}

impl ActionSink for Vec<AttackCommand> {
    fn issue(&mut self, command: AttackCommand) {
        self.push(command);
    }
}
