// Execution trace: output log and per-statement snapshots

use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;

/// Captures the values produced by `write`, in order.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    values: Vec<Value>,
    lines: Vec<OutputLine>,
}

/// A rendered output value with the location of the `write` that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub location: SourceLocation,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one written value and its rendering
    pub fn push(&mut self, value: Value, text: String, location: SourceLocation) {
        self.values.push(value);
        self.lines.push(OutputLine { text, location });
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    /// Rendered values as strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One variable as it looked when the snapshot was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSnapshot {
    pub name: String,
    pub ty: String,
    /// Rendered cells; arrays have one entry per cell
    pub cells: Vec<String>,
}

/// One activation record (or the globals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub function: String,
    pub call_site: Option<SourceLocation>,
    pub vars: Vec<VarSnapshot>,
}

/// Snapshot of execution state before a statement runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub location: SourceLocation,
    /// Number of values written before this point
    pub output_len: usize,
    /// Globals first, then frames from `main` outwards
    pub frames: Vec<FrameSnapshot>,
    /// Set on the final snapshot of a run that faulted
    pub fault: Option<String>,
}

/// Holds the execution history, up to a fixed number of steps
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    limit: usize,
    truncated: bool,
}

impl SnapshotManager {
    pub fn new(limit: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            limit,
            truncated: false,
        }
    }

    /// Add a snapshot to history. Past the limit the snapshot is dropped
    /// and the history is marked truncated.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.snapshots.len() >= self.limit {
            self.truncated = true;
            return;
        }
        self.snapshots.push(snapshot);
    }

    /// Record the faulting state, replacing the last entry when full so the
    /// fault is always visible.
    pub fn push_fault(&mut self, snapshot: Snapshot) {
        if self.snapshots.len() >= self.limit {
            self.truncated = true;
            self.snapshots.pop();
        }
        self.snapshots.push(snapshot);
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(line: usize) -> Snapshot {
        Snapshot {
            location: SourceLocation::new(line, 1),
            output_len: 0,
            frames: Vec::new(),
            fault: None,
        }
    }

    #[test]
    fn test_limit_truncates() {
        let mut manager = SnapshotManager::new(2);
        manager.push(snapshot(1));
        manager.push(snapshot(2));
        assert!(!manager.is_truncated());
        manager.push(snapshot(3));
        assert!(manager.is_truncated());
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(1).map(|s| s.location.line), Some(2));
    }

    #[test]
    fn test_fault_snapshot_is_kept_when_full() {
        let mut manager = SnapshotManager::new(1);
        manager.push(snapshot(1));
        manager.push_fault(Snapshot {
            fault: Some("boom".to_string()),
            ..snapshot(9)
        });
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get(0).and_then(|s| s.fault.as_deref()), Some("boom"));
    }

    #[test]
    fn test_output_log() {
        let mut log = OutputLog::new();
        log.push(Value::Int(7), "7".to_string(), SourceLocation::new(2, 3));
        log.push(Value::Bool(true), "true".to_string(), SourceLocation::new(3, 3));
        assert_eq!(log.values(), &[Value::Int(7), Value::Bool(true)]);
        assert_eq!(log.get_output(), ["7", "true"]);
        assert_eq!(log.len(), 2);
    }
}
