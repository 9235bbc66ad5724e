//! Per-suspension stack snapshot.
//!
//! Built eagerly when the execution thread suspends, torn down when it
//! resumes. Frames are held innermost-first (DAP convention: frame 0 is the
//! top of the stack). Scopes and variable children materialize lazily so
//! frames the client never opens cost nothing, and everything a reference
//! points at dies with the snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::hook::ExecutionContext;
use crate::protocol::{FrameId, Scope, Source, StackFrame, Variable, VariablesReference};
use crate::repr;

// ── Identifier allocation ─────────────────────────────────────────────────────

/// Issues frame ids and variables references from one monotonic counter.
///
/// Ids are unique for the engine's lifetime and never reused across
/// snapshots, so a stale id from a previous suspension can only miss.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Variable producers ────────────────────────────────────────────────────────

/// Children of one variables reference, materialized at most once.
enum VarChildren {
    /// Keyword arguments captured from the step entry.
    Args(Vec<String>),
    /// Live namespace of the runtime context, read at materialization time.
    Locals(Arc<dyn ExecutionContext>),
    /// Cached output of a producer, valid for the snapshot's lifetime.
    Materialized(Vec<Variable>),
}

fn materialize_args(args: &[String], max_value_length: usize) -> Vec<Variable> {
    args.iter()
        .enumerate()
        .map(|(i, raw)| Variable::leaf(format!("param {i}"), repr::bounded(raw, max_value_length)))
        .collect()
}

fn materialize_locals(ctx: &dyn ExecutionContext, max_value_length: usize) -> Vec<Variable> {
    ctx.variables()
        .into_iter()
        .map(|(name, value)| match value {
            Ok(raw) => Variable::leaf(name, repr::bounded(&raw, max_value_length)),
            Err(message) => {
                Variable::leaf(name, repr::introspection_error(&message, max_value_length))
            }
        })
        .collect()
}

// ── Frame bookkeeping ─────────────────────────────────────────────────────────

struct FrameInfo {
    /// Built on the first `get_scopes` call for this frame.
    scopes: Option<Vec<Scope>>,
    ctx: Arc<dyn ExecutionContext>,
    args: Vec<String>,
}

// ── StackSnapshot ─────────────────────────────────────────────────────────────

/// Frame, scope, and variable state for one suspension.
pub struct StackSnapshot {
    frames: Vec<StackFrame>,
    frame_infos: HashMap<FrameId, FrameInfo>,
    var_refs: HashMap<VariablesReference, VarChildren>,
    max_value_length: usize,
}

impl StackSnapshot {
    pub fn new(max_value_length: usize) -> Self {
        Self {
            frames: Vec::new(),
            frame_infos: HashMap::new(),
            var_refs: HashMap::new(),
            max_value_length,
        }
    }

    /// Append one frame. Callers walk the stack-depth log outermost first.
    pub fn push_frame(
        &mut self,
        ids: &IdAllocator,
        name: String,
        source: Source,
        line: u32,
        ctx: Arc<dyn ExecutionContext>,
        args: Vec<String>,
    ) -> FrameId {
        let id = ids.next_id();
        self.frames.push(StackFrame {
            id,
            name,
            line,
            column: 0,
            source,
        });
        self.frame_infos.insert(
            id,
            FrameInfo {
                scopes: None,
                ctx,
                args,
            },
        );
        id
    }

    /// Flip the frame list to DAP order (frame 0 innermost). Call once after
    /// the walk.
    pub fn finish(&mut self) {
        self.frames.reverse();
    }

    /// Frames, innermost first.
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// The scopes of `frame_id`, building them on first request.
    pub fn get_scopes(&mut self, ids: &IdAllocator, frame_id: FrameId) -> Option<Vec<Scope>> {
        let info = self.frame_infos.get(&frame_id)?;
        if let Some(scopes) = &info.scopes {
            return Some(scopes.clone());
        }
        let ctx = info.ctx.clone();
        let args = info.args.clone();

        let args_ref = ids.next_id();
        let vars_ref = ids.next_id();
        let scopes = vec![Scope::variables(vars_ref), Scope::arguments(args_ref)];
        self.var_refs.insert(args_ref, VarChildren::Args(args));
        self.var_refs.insert(vars_ref, VarChildren::Locals(ctx));
        if let Some(info) = self.frame_infos.get_mut(&frame_id) {
            info.scopes = Some(scopes.clone());
        }
        Some(scopes)
    }

    /// The children of `reference`, materializing the producer on first
    /// request and caching its output under the same reference.
    pub fn get_variables(&mut self, reference: VariablesReference) -> Option<Vec<Variable>> {
        let materialized = match self.var_refs.get(&reference)? {
            VarChildren::Materialized(variables) => return Some(variables.clone()),
            VarChildren::Args(args) => materialize_args(args, self.max_value_length),
            VarChildren::Locals(ctx) => materialize_locals(ctx.as_ref(), self.max_value_length),
        };
        self.var_refs
            .insert(reference, VarChildren::Materialized(materialized.clone()));
        Some(materialized)
    }
}
