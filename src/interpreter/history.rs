//! Recorded execution history for time-travel stepping
//!
//! [`History::record`] runs a machine to completion, taking a
//! [`Snapshot`](crate::snapshot::Snapshot) before the first instruction and
//! after every step. Navigation then restores those snapshots into the
//! machine, so the UI can read state through the usual [`Machine`] getters.
//!
//! Recording stops at `halt`, at the first fault, or when the snapshot memory
//! limit is reached. The fault that ended recording is kept and shown at the
//! end of the history.

use crate::interpreter::engine::{Machine, RunOptions, Status};
use crate::interpreter::errors::RuntimeError;
use crate::memory::Memory;
use crate::snapshot::{MockTerminal, Snapshot, SnapshotManager};
use log::debug;

pub struct History {
    machine: Machine,
    terminal: MockTerminal,
    snapshot_manager: SnapshotManager,
    /// Index of the snapshot currently restored into the machine
    history_position: usize,
    /// Fault that ended recording, if the run did not halt
    fault: Option<RuntimeError>,
}

impl History {
    /// Run `machine` from `memory`, recording a snapshot per step
    pub fn record(mut machine: Machine, memory: Memory, snapshot_memory_limit: usize) -> Self {
        machine.reset(memory);
        let mut history = History {
            machine,
            terminal: MockTerminal::new(),
            snapshot_manager: SnapshotManager::new(snapshot_memory_limit),
            history_position: 0,
            fault: None,
        };

        let options = RunOptions::new();
        if let Err(e) = history.take_snapshot() {
            history.fault = Some(e);
            return history;
        }

        loop {
            let result = history.machine.step(&mut history.terminal, &options);
            if let Err(e) = history.take_snapshot() {
                history.fault = Some(e);
                break;
            }
            match result {
                Ok(status) if status.is_finished() => break,
                Ok(_) => {}
                Err(e) => {
                    history.fault = Some(e);
                    break;
                }
            }
        }

        debug!(
            "recorded {} snapshots ({} bytes)",
            history.snapshot_manager.len(),
            history.snapshot_manager.memory_usage()
        );

        // Leave the machine at the final recorded state
        history.history_position = history.snapshot_manager.len().saturating_sub(1);
        history
    }

    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let snapshot = Snapshot::new(
            self.machine.state().clone(),
            self.machine.status(),
            self.terminal.len(),
        );
        self.snapshot_manager.push(snapshot)
    }

    fn restore(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .get(index)
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
            })?;
        self.machine
            .restore(snapshot.state.clone(), snapshot.status);
        self.history_position = index;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
            });
        }
        self.restore(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }
        self.restore(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let last = self.snapshot_manager.len().saturating_sub(1);
        self.restore(last)
    }

    // ========== Getter methods for UI ==========

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Output written up to the current position
    pub fn output(&self) -> &[String] {
        let count = self
            .snapshot_manager
            .get(self.history_position)
            .map_or(0, |s| s.output_len);
        self.terminal.lines_up_to(count)
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.history_position + 1 >= self.snapshot_manager.len()
    }

    pub fn fault(&self) -> Option<&RuntimeError> {
        self.fault.as_ref()
    }

    /// Final status of the recorded run
    pub fn final_status(&self) -> Status {
        self.snapshot_manager
            .last()
            .map_or(Status::Ready, |s| s.status)
    }
}
