// Constants for the Micro-C interpreter

/// Deepest call nesting allowed before `CallDepthExceeded`
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Default number of snapshots recorded before recording stops
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 100_000;

/// Host stack reserved per level of call nesting; one Micro-C call recurses
/// through several evaluator frames
pub const STACK_BYTES_PER_CALL: usize = 64 * 1024;

/// Host stack reserved regardless of call depth
pub const BASE_STACK_BYTES: usize = 8 * 1024 * 1024;

/// Largest evaluation stack requested from the OS
pub const MAX_STACK_BYTES: usize = 1 << 30;
