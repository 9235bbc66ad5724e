//! Troupe Debugger - core Debug Adapter Protocol engine
//!
//! This library provides the debug engine for the Troupe test runtime:
//! - Breakpoint registry over normalized source paths
//! - Suspension state machine (continue / step-in / step-over)
//! - Per-suspension stack snapshots with lazy scopes and variables
//! - The execution/command thread rendezvous
//! - The runtime interposition contract and process-wide installer
//!
//! The DAP wire transport lives in the adapter layer; this crate only returns
//! DAP-shaped records.

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod breakpoints;
pub mod config;
pub mod engine;
pub mod frames;
pub mod hook;
pub mod paths;
pub mod protocol;
pub mod rendezvous;
pub mod repr;
pub mod stepping;

// Re-export commonly used types
pub use breakpoints::{BreakpointTable, LineBreakpoint};
pub use config::{ConfigError, DebuggerConfig};
pub use engine::Debugger;
pub use frames::{IdAllocator, StackSnapshot};
pub use hook::{install_debugger, ExecutionContext, StepHook, StepInfo, StepScope};
pub use protocol::{
    FrameId, Scope, Source, StackFrame, StoppedEventBody, StoppedReason, ThreadId, Variable,
    VariablesReference, MAIN_THREAD_ID,
};
pub use rendezvous::Rendezvous;
pub use stepping::{RunState, StepCmd, StepController};
