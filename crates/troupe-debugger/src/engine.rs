//! The debugger facade.
//!
//! One object receives hook notifications from the runtime's execution
//! thread and command calls from the DAP client threads. All shared state
//! sits behind a single engine lock; only `before_step` ever blocks, inside
//! [`Rendezvous::wait`], which runs with the lock released.
//!
//! Client-facing operations never fail: a request racing a resume gets an
//! empty collection or `None`, never an error.

use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::breakpoints::{BreakpointTable, LineBreakpoint};
use crate::config::DebuggerConfig;
use crate::frames::{IdAllocator, StackSnapshot};
use crate::hook::{ExecutionContext, StepHook, StepInfo};
use crate::paths::{display_name, PathCache};
use crate::protocol::{
    FrameId, Scope, Source, StackFrame, StoppedReason, ThreadId, Variable, VariablesReference,
    MAIN_THREAD_ID,
};
use crate::rendezvous::Rendezvous;
use crate::stepping::{StepCmd, StepController};

// ── Step entries ──────────────────────────────────────────────────────────────

/// One currently-executing step, owned by the stack-depth log.
struct StepEntry {
    ctx: Arc<dyn ExecutionContext>,
    step: StepInfo,
}

// ── Engine state (behind the engine lock) ─────────────────────────────────────

struct EngineState {
    breakpoints: BreakpointTable,
    controller: StepController,
    /// Currently-executing nested steps, outermost first. Only the execution
    /// thread pushes and pops; its length at suspension time is the call
    /// depth.
    depth_log: Vec<StepEntry>,
    /// Present exactly while the controller is paused.
    snapshot: Option<StackSnapshot>,
    paths: PathCache,
}

impl EngineState {
    /// Walk the depth log outermost to innermost and build the frame list.
    fn build_snapshot(&mut self, ids: &IdAllocator, max_value_length: usize) -> StackSnapshot {
        let mut snapshot = StackSnapshot::new(max_value_length);
        for entry in &self.depth_log {
            let (line, source) = match &entry.step.source {
                Some(path) => {
                    let normalized = self.paths.normalize(path);
                    (
                        entry.step.lineno.unwrap_or(0),
                        Source::new(
                            display_name(&normalized),
                            normalized.to_string_lossy().into_owned(),
                        ),
                    )
                }
                // Non-locatable pseudo-steps still occupy a frame.
                None => (entry.step.lineno.unwrap_or(0), Source::new("", "")),
            };
            snapshot.push_frame(
                ids,
                entry.step.name.clone(),
                source,
                line,
                entry.ctx.clone(),
                entry.step.args.clone(),
            );
        }
        snapshot.finish();
        snapshot
    }
}

// ── Debugger ──────────────────────────────────────────────────────────────────

/// The core debug engine.
///
/// Thread roles: the runtime's execution thread drives `before_step` /
/// `after_step`; DAP command threads drive everything else.
pub struct Debugger {
    state: Mutex<EngineState>,
    rendezvous: Rendezvous,
    ids: IdAllocator,
    max_value_length: usize,
}

impl Debugger {
    pub fn new(config: DebuggerConfig) -> Self {
        Self {
            state: Mutex::new(EngineState {
                breakpoints: BreakpointTable::new(),
                controller: StepController::new(),
                depth_log: Vec::new(),
                snapshot: None,
                paths: PathCache::new(config.fold_case()),
            }),
            rendezvous: Rendezvous::new(),
            ids: IdAllocator::new(),
            max_value_length: config.max_value_length,
        }
    }

    /// The wait/proceed primitive, exposed for instrumentation.
    pub fn rendezvous(&self) -> &Rendezvous {
        &self.rendezvous
    }

    // ── Client surface ────────────────────────────────────────────────────────

    /// Replace every breakpoint registered for `source`.
    ///
    /// Observed by any `before_step` that starts after this returns.
    pub fn set_breakpoints(&self, source: &Path, breakpoints: Vec<LineBreakpoint>) {
        let mut state = self.state.lock();
        let normalized = state.paths.normalize(source);
        debug!(source = %normalized.display(), count = breakpoints.len(), "set_breakpoints");
        state.breakpoints.set_breakpoints(normalized, breakpoints);
    }

    /// The synthetic thread while suspended; empty while running.
    pub fn get_threads(&self) -> Vec<ThreadId> {
        if self.state.lock().controller.is_paused() {
            vec![MAIN_THREAD_ID]
        } else {
            Vec::new()
        }
    }

    /// The suspended stack, innermost frame first. Empty while running or
    /// for an unknown thread id.
    pub fn get_frames(&self, thread_id: ThreadId) -> Vec<StackFrame> {
        if thread_id != MAIN_THREAD_ID {
            return Vec::new();
        }
        let state = self.state.lock();
        // A request racing a resume sees RUNNING and gets nothing, even if
        // the execution thread has not torn the snapshot down yet.
        if !state.controller.is_paused() {
            return Vec::new();
        }
        state
            .snapshot
            .as_ref()
            .map(|snapshot| snapshot.frames().to_vec())
            .unwrap_or_default()
    }

    /// The scopes of `frame_id`; `None` for unknown or stale frame ids.
    pub fn get_scopes(&self, frame_id: FrameId) -> Option<Vec<Scope>> {
        let mut state = self.state.lock();
        if !state.controller.is_paused() {
            return None;
        }
        state.snapshot.as_mut()?.get_scopes(&self.ids, frame_id)
    }

    /// The children of `reference`; `None` for unknown or stale references.
    pub fn get_variables(&self, reference: VariablesReference) -> Option<Vec<Variable>> {
        let mut state = self.state.lock();
        if !state.controller.is_paused() {
            return None;
        }
        state.snapshot.as_mut()?.get_variables(reference)
    }

    /// The reason attached to the last suspension.
    pub fn stop_reason(&self) -> Option<StoppedReason> {
        self.state.lock().controller.stop_reason()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().controller.is_paused()
    }

    /// Current depth of the stack-depth log.
    pub fn stack_depth(&self) -> usize {
        self.state.lock().depth_log.len()
    }

    /// Resume free-running until the next breakpoint.
    pub fn step_continue(&self) {
        self.resume_with(StepCmd::None);
    }

    /// Resume and suspend at the very next locatable step.
    pub fn step_in(&self) {
        self.resume_with(StepCmd::StepIn);
    }

    /// Resume and suspend once the current step's children have unwound.
    pub fn step_over(&self) {
        self.resume_with(StepCmd::StepNext);
    }

    /// Client disconnect: resume free-running so the runtime drains.
    pub fn disconnect(&self) {
        debug!("client disconnected, draining");
        self.step_continue();
    }

    fn resume_with(&self, cmd: StepCmd) {
        {
            let mut state = self.state.lock();
            debug!(?cmd, "resume");
            state.controller.resume(cmd);
        }
        self.rendezvous.proceed();
    }

    // ── Runtime surface ───────────────────────────────────────────────────────

    /// Step notification from the execution thread. May block.
    pub fn before_step(&self, ctx: &Arc<dyn ExecutionContext>, step: &StepInfo) {
        let mut state = self.state.lock();
        state.depth_log.push(StepEntry {
            ctx: ctx.clone(),
            step: step.clone(),
        });

        // Non-locatable pseudo-steps deepen the log but never suspend.
        let (source, lineno) = match (&step.source, step.lineno) {
            (Some(source), Some(lineno)) => (source, lineno),
            _ => return,
        };
        let normalized = state.paths.normalize(source);
        trace!(source = %normalized.display(), lineno, name = %step.name, "before_step");

        let depth = state.depth_log.len();
        let breakpoint_hit = state.breakpoints.is_break(&normalized, lineno);
        if let Some(reason) = state.controller.suspension_reason(breakpoint_hit, depth) {
            self.wait_suspended(state, reason);
        }
    }

    /// Matching notification after the step ran, failure included.
    pub fn after_step(&self, _ctx: &Arc<dyn ExecutionContext>, _step: &StepInfo) {
        let mut state = self.state.lock();
        if state.depth_log.pop().is_none() {
            panic!("after_step without a matching before_step: runtime interposition shim bug");
        }
    }

    // ── Suspension ────────────────────────────────────────────────────────────

    /// Park the execution thread until a command releases it. Runs on the
    /// execution thread with the engine lock held on entry and exit; the
    /// lock is dropped around each park.
    fn wait_suspended(&self, mut state: MutexGuard<'_, EngineState>, reason: StoppedReason) {
        debug!(%reason, depth = state.depth_log.len(), "suspending execution thread");
        let snapshot = state.build_snapshot(&self.ids, self.max_value_length);
        state.snapshot = Some(snapshot);
        state.controller.pause(reason);

        while state.controller.is_paused() {
            MutexGuard::unlocked(&mut state, || self.rendezvous.wait());
        }

        // The depth immediately after resume is the depth of the step being
        // stepped over; a later step at this depth or shallower suspends.
        if state.controller.step_cmd() == StepCmd::StepNext {
            let depth = state.depth_log.len();
            state.controller.record_step_next_depth(depth);
        }

        // Teardown invalidates every frame id and variables reference issued
        // for this suspension.
        state.snapshot = None;
        debug!("execution thread resumed");
    }
}

impl StepHook for Debugger {
    fn before_step(&self, ctx: &Arc<dyn ExecutionContext>, step: &StepInfo) {
        Debugger::before_step(self, ctx, step);
    }

    fn after_step(&self, ctx: &Arc<dyn ExecutionContext>, step: &StepInfo) {
        Debugger::after_step(self, ctx, step);
    }
}
