//! Runtime interposition contract.
//!
//! The Troupe runtime calls [`StepHook::before_step`] on its execution thread
//! immediately before running each keyword step, and [`StepHook::after_step`]
//! immediately after – failure included. The runtime owns the thread; the
//! debugger only ever blocks it inside `before_step`.
//!
//! Runtimes without a native hook point wrap their step dispatcher in a
//! [`StepScope`], which pairs the callbacks even when the step body unwinds.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::config::DebuggerConfig;
use crate::engine::Debugger;

// ── StepInfo ──────────────────────────────────────────────────────────────────

/// One step about to run, as reported by the runtime.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// Script the step comes from; `None` for non-locatable pseudo-steps.
    pub source: Option<PathBuf>,
    /// 1-based line, when known.
    pub lineno: Option<u32>,
    /// Printable keyword name.
    pub name: String,
    /// Raw representations of the call arguments. Pretty-printing is the
    /// runtime's concern; the engine only bounds the length.
    pub args: Vec<String>,
}

impl StepInfo {
    pub fn new(
        source: impl Into<PathBuf>,
        lineno: u32,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            lineno: Some(lineno),
            name: name.into(),
            args,
        }
    }

    /// A pseudo-step with no source position (suite setup, internal steps).
    pub fn non_locatable(name: impl Into<String>) -> Self {
        Self {
            source: None,
            lineno: None,
            name: name.into(),
            args: Vec::new(),
        }
    }
}

// ── ExecutionContext ──────────────────────────────────────────────────────────

/// Live execution context the runtime hands over for each step.
///
/// The engine keeps a clone of the handle for every entry in the stack-depth
/// log and drops it when the entry pops; variable reads only happen while the
/// execution thread is suspended.
pub trait ExecutionContext: Send + Sync {
    /// The variable namespace visible at this step, as `(name, value)` pairs.
    /// `Err` carries the runtime's message when reading the variable raised.
    fn variables(&self) -> Vec<(String, Result<String, String>)>;
}

// ── StepHook ──────────────────────────────────────────────────────────────────

/// Per-step callbacks the runtime's dispatcher invokes.
pub trait StepHook: Send + Sync {
    fn before_step(&self, ctx: &Arc<dyn ExecutionContext>, step: &StepInfo);
    fn after_step(&self, ctx: &Arc<dyn ExecutionContext>, step: &StepInfo);
}

// ── StepScope ─────────────────────────────────────────────────────────────────

/// Pairs a `before_step` with its `after_step` even when the step body
/// panics. The dispatcher holds one across each step execution:
///
/// ```ignore
/// let _scope = StepScope::enter(&*hook, ctx, step_info);
/// run_step_body()?;
/// ```
pub struct StepScope<'a> {
    hook: &'a dyn StepHook,
    ctx: Arc<dyn ExecutionContext>,
    step: StepInfo,
}

impl<'a> StepScope<'a> {
    /// Fires `before_step` (which may block on a suspension) and arms the
    /// matching `after_step`.
    pub fn enter(hook: &'a dyn StepHook, ctx: Arc<dyn ExecutionContext>, step: StepInfo) -> Self {
        hook.before_step(&ctx, &step);
        Self { hook, ctx, step }
    }
}

impl Drop for StepScope<'_> {
    fn drop(&mut self) {
        self.hook.after_step(&self.ctx, &self.step);
    }
}

// ── Process-wide installation ─────────────────────────────────────────────────

/// Install the debugger engine once, process-wide, and return it.
///
/// The first call creates the engine from `config`; later calls ignore their
/// argument and return the installed instance. The installed engine plus the
/// implicit installed flag is the only process-wide state the adapter keeps.
pub fn install_debugger(config: DebuggerConfig) -> Arc<Debugger> {
    static INSTALLED: OnceLock<Arc<Debugger>> = OnceLock::new();
    INSTALLED.get_or_init(|| Arc::new(Debugger::new(config))).clone()
}
