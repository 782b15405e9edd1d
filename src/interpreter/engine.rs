// Execution engine for the Micro-C interpreter

use crate::interpreter::constants::{
    BASE_STACK_BYTES, DEFAULT_MAX_CALL_DEPTH, DEFAULT_SNAPSHOT_LIMIT, MAX_STACK_BYTES,
    STACK_BYTES_PER_CALL,
};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::io::InputSource;
use crate::memory::stack::{Stack, StackFrame};
use crate::memory::store::Store;
use crate::memory::value::{Address, ObjectId, Value};
use crate::parser::ast::SourceLocation;
use crate::semantic::Storage;
use crate::snapshot::{FrameSnapshot, OutputLog, Snapshot, SnapshotManager, VarSnapshot};
use crate::Compiled;
use std::io::Write;
use std::panic;
use std::sync::Arc;
use std::thread;

/// Execution limits and tracing options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Deepest call nesting allowed (`main` counts as one)
    pub max_call_depth: usize,
    /// Record a [`Snapshot`] before every statement
    pub record_snapshots: bool,
    /// Maximum number of snapshots kept
    pub snapshot_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            record_snapshots: false,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}

/// Where `write` output is copied as it is produced
struct Echo {
    sink: Box<dyn Write + Send>,
    delimiter: String,
}

/// The main interpreter that executes a checked Micro-C program
pub struct Interpreter {
    /// Program plus its resolution and type tables
    pub(crate) compiled: Arc<Compiled>,

    /// Source of `read` tokens
    pub(crate) input: Box<dyn InputSource>,

    pub(crate) config: RunConfig,

    /// Storage objects for every variable
    pub(crate) store: Store,

    /// Call stack
    pub(crate) stack: Stack,

    /// Global objects, indexed like `Program::globals`
    pub(crate) globals: Vec<ObjectId>,

    /// Values written so far
    pub(crate) output: OutputLog,

    echo: Option<Echo>,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,

    /// Snapshot history for the viewer
    snapshot_manager: SnapshotManager,

    /// Whether the faulting state has been captured
    fault_recorded: bool,

    /// Whether execution has finished
    finished: bool,
}

impl Interpreter {
    /// Create a new interpreter for a compiled program
    pub fn new(compiled: Arc<Compiled>, input: Box<dyn InputSource>, config: RunConfig) -> Self {
        let snapshot_limit = config.snapshot_limit;
        Interpreter {
            compiled,
            input,
            config,
            store: Store::new(),
            stack: Stack::new(),
            globals: Vec::new(),
            output: OutputLog::new(),
            echo: None,
            current_location: SourceLocation::new(1, 1),
            snapshot_manager: SnapshotManager::new(snapshot_limit),
            fault_recorded: false,
            finished: false,
        }
    }

    /// Copy every written value to `sink` as soon as it is produced,
    /// separated by `delimiter`.
    pub fn with_echo(mut self, sink: Box<dyn Write + Send>, delimiter: impl Into<String>) -> Self {
        self.echo = Some(Echo {
            sink,
            delimiter: delimiter.into(),
        });
        self
    }

    /// Run the program from start to finish.
    ///
    /// Evaluation recurses on the host stack, so it runs on a thread whose
    /// stack is sized for `max_call_depth`.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let stack_size = evaluation_stack_size(self.config.max_call_depth);
        let spawned = thread::scope(|scope| {
            thread::Builder::new()
                .name("microc-eval".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, || self.run_to_completion())
                .map(|handle| handle.join())
        });
        match spawned {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            // No thread available: run on the caller's stack
            Err(_) => self.run_to_completion(),
        }
    }

    fn run_to_completion(&mut self) -> Result<(), RuntimeError> {
        let compiled = Arc::clone(&self.compiled);

        for &symbol_id in &compiled.resolution.globals {
            let symbol = compiled.resolution.symbol(symbol_id);
            let object = self.store.allocate(&symbol.name, &symbol.ty);
            self.globals.push(object);
        }

        let result = self.call_function("main", Vec::new(), None);
        if let Err(err) = &result {
            self.record_fault(err);
        }
        let location = self.current_location;
        let flushed = self
            .echo
            .as_mut()
            .map_or(Ok(()), |echo| echo.sink.flush())
            .map_err(|err| RuntimeError::OutputFailed {
                message: err.to_string(),
                location,
            });
        self.finished = true;
        result.and(flushed)
    }

    /// Call `name` with already evaluated arguments.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: Vec<Value>,
        call_site: Option<SourceLocation>,
    ) -> Result<(), RuntimeError> {
        let location = call_site.unwrap_or(self.current_location);
        if self.stack.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
                location,
            });
        }

        let compiled = Arc::clone(&self.compiled);
        // Resolution rejects programs that call unknown functions
        let Some(info) = compiled.resolution.function(name) else {
            return Ok(());
        };
        let function = &compiled.program.functions[info.index];

        let mut frame = StackFrame::new(name.to_string(), call_site, info.slot_count);
        for (&param, value) in info.params.iter().zip(args) {
            let symbol = compiled.resolution.symbol(param);
            let object = self.store.allocate(&symbol.name, &symbol.ty);
            self.store
                .store(Value::Pointer(Address::new(object, 0)), value)
                .map_err(|reason| RuntimeError::BoundsFault { reason, location })?;
            let slot = match symbol.storage {
                Storage::Parameter(slot) | Storage::Local(slot) => slot,
                Storage::Global(_) => continue,
            };
            frame.bind(slot, param, object);
        }

        self.stack.push_frame(frame);
        let result = self.execute_block(&function.body);
        // Capture the stack as it was at the fault, before unwinding
        if let Err(err) = &result {
            self.record_fault(err);
        }
        if let Some(mut frame) = self.stack.pop_frame() {
            for object in frame.release_all() {
                self.store.release(object);
            }
        }
        result
    }

    /// Append a value to the output and echo it.
    pub(crate) fn emit(
        &mut self,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let text = self.store.describe(value);
        let first = self.output.is_empty();
        if let Some(echo) = self.echo.as_mut() {
            let separator = if first { "" } else { echo.delimiter.as_str() };
            write!(echo.sink, "{}{}", separator, text)
                .and_then(|()| echo.sink.flush())
                .map_err(|err| RuntimeError::OutputFailed {
                    message: err.to_string(),
                    location,
                })?;
        }
        self.output.push(value, text, location);
        Ok(())
    }

    // ===== Snapshots =====

    fn build_snapshot(&self, fault: Option<String>) -> Snapshot {
        let resolution = &self.compiled.resolution;
        let describe = |object: ObjectId| -> Vec<String> {
            self.store
                .object(object)
                .map(|o| o.cells.iter().map(|&v| self.store.describe(v)).collect())
                .unwrap_or_default()
        };

        let mut frames = Vec::with_capacity(self.stack.depth() + 1);
        frames.push(FrameSnapshot {
            function: "<globals>".to_string(),
            call_site: None,
            vars: resolution
                .globals
                .iter()
                .zip(&self.globals)
                .map(|(&symbol_id, &object)| {
                    let symbol = resolution.symbol(symbol_id);
                    VarSnapshot {
                        name: symbol.name.clone(),
                        ty: symbol.ty.to_string(),
                        cells: describe(object),
                    }
                })
                .collect(),
        });

        for frame in self.stack.frames() {
            frames.push(FrameSnapshot {
                function: frame.function_name.clone(),
                call_site: frame.call_site,
                vars: frame
                    .bindings()
                    .iter()
                    .map(|binding| {
                        let symbol = resolution.symbol(binding.symbol);
                        VarSnapshot {
                            name: symbol.name.clone(),
                            ty: symbol.ty.to_string(),
                            cells: describe(binding.object),
                        }
                    })
                    .collect(),
            });
        }

        Snapshot {
            location: self.current_location,
            output_len: self.output.len(),
            frames,
            fault,
        }
    }

    pub(crate) fn take_snapshot(&mut self) {
        if !self.config.record_snapshots || self.snapshot_manager.is_truncated() {
            return;
        }
        let snapshot = self.build_snapshot(None);
        self.snapshot_manager.push(snapshot);
    }

    fn record_fault(&mut self, err: &RuntimeError) {
        if !self.config.record_snapshots || self.fault_recorded {
            return;
        }
        self.fault_recorded = true;
        self.current_location = err.location();
        let snapshot = self.build_snapshot(Some(err.message()));
        self.snapshot_manager.push_fault(snapshot);
    }

    // ===== Accessors =====

    /// Values written so far, in order
    pub fn output(&self) -> &[Value] {
        self.output.values()
    }

    /// Output with rendering and source locations
    pub fn output_log(&self) -> &OutputLog {
        &self.output
    }

    /// Recorded execution history
    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshot_manager
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn compiled(&self) -> &Compiled {
        &self.compiled
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Host stack for a run allowing `max_call_depth` nested calls
fn evaluation_stack_size(max_call_depth: usize) -> usize {
    STACK_BYTES_PER_CALL
        .saturating_mul(max_call_depth)
        .saturating_add(BASE_STACK_BYTES)
        .min(MAX_STACK_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::io::QueueInput;

    fn interpreter(source: &str, input: &str) -> Interpreter {
        let compiled = crate::compile(source).unwrap();
        Interpreter::new(
            Arc::new(compiled),
            Box::new(QueueInput::from_text(input)),
            RunConfig::default(),
        )
    }

    #[test]
    fn test_assignment_target_is_evaluated_first() {
        let mut interp = interpreter(
            "void main() { int a[3]; int i; a[i = 1] = i + 5; write a[1]; write i; }",
            "",
        );
        interp.run().unwrap();
        assert_eq!(interp.output(), &[Value::Int(6), Value::Int(1)]);
    }

    #[test]
    fn test_arguments_are_evaluated_in_the_caller() {
        let mut interp = interpreter(
            "void f(int a, int b) { write a; write b; } void main() { int x; f(x = 3, x * 2); }",
            "",
        );
        interp.run().unwrap();
        assert_eq!(interp.output(), &[Value::Int(3), Value::Int(6)]);
    }

    #[test]
    fn test_frames_are_popped_after_calls() {
        let mut interp = interpreter("void f() { int y; } void main() { f(); f(); }", "");
        interp.run().unwrap();
        assert!(interp.stack.is_empty());
        assert!(interp.is_finished());
        assert_eq!(interp.store().live_count(), 0);
    }

    #[test]
    fn test_pointer_output_names_its_object() {
        let mut interp = interpreter("int g[4]; void main() { write &g[2]; write g; }", "");
        interp.run().unwrap();
        assert_eq!(interp.output_log().get_output(), ["&g[2]", "&g"]);
    }
}
