// Snapshot management for stepping backward and forward through a run

use crate::interpreter::engine::{ExecutionState, Status};
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Address, Word};
use std::io;
use std::mem::size_of;

/// Mock terminal capturing everything the machine writes
///
/// Output is append-only, so a snapshot only needs to remember how many lines
/// existed when it was taken.
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    lines: Vec<String>,
    pending: String,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The first `count` completed lines
    pub fn lines_up_to(&self, count: usize) -> &[String] {
        &self.lines[..count.min(self.lines.len())]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl io::Write for MockTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.pending.find('\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop();
            self.lines.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Snapshot of machine state after one step
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: ExecutionState,
    pub status: Status,
    /// Number of terminal lines written so far
    pub output_len: usize,
}

impl Snapshot {
    pub fn new(state: ExecutionState, status: Status, output_len: usize) -> Self {
        Snapshot {
            state,
            status,
            output_len,
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Hash map entries carry roughly one extra word of overhead each
        let cell_size = size_of::<Address>() + size_of::<Word>() + size_of::<usize>();
        size_of::<Snapshot>() + self.state.memory.len() * cell_size
    }
}

/// Execution history bounded by an estimated memory budget
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), RuntimeError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(RuntimeError::SnapshotLimitExceeded {
                current: self.current_memory,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }
}
