//! Line breakpoint registry.
//!
//! Maps normalized source path → line → breakpoint. `set_breakpoints`
//! replaces the whole per-path entry atomically, so a client editing
//! breakpoints while the engine is suspended is observed on the next step
//! notification. The per-step lookup is O(1).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ── LineBreakpoint ────────────────────────────────────────────────────────────

/// A line breakpoint, keyed under a normalized absolute path.
///
/// Conditions, hit counts, and log messages are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBreakpoint {
    /// 1-based source line.
    pub line: u32,
}

impl LineBreakpoint {
    pub fn new(line: u32) -> Self {
        Self { line }
    }
}

// ── BreakpointTable ───────────────────────────────────────────────────────────

/// All registered breakpoints, keyed by normalized source path.
///
/// Callers normalize paths before touching the table; registration and lookup
/// must go through the same normalization function or lines will never match.
#[derive(Debug, Default)]
pub struct BreakpointTable {
    by_source: HashMap<PathBuf, HashMap<u32, LineBreakpoint>>,
}

impl BreakpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every breakpoint registered for `source`.
    pub fn set_breakpoints(
        &mut self,
        source: PathBuf,
        breakpoints: impl IntoIterator<Item = LineBreakpoint>,
    ) {
        let line_to_bp: HashMap<u32, LineBreakpoint> = breakpoints
            .into_iter()
            .map(|bp| (bp.line, bp))
            .collect();
        self.by_source.insert(source, line_to_bp);
    }

    /// Is there a breakpoint at `source:line`?
    pub fn is_break(&self, source: &Path, line: u32) -> bool {
        self.by_source
            .get(source)
            .is_some_and(|lines| lines.contains_key(&line))
    }

    /// All breakpoints registered for `source`, unordered.
    pub fn breakpoints_for(&self, source: &Path) -> Option<&HashMap<u32, LineBreakpoint>> {
        self.by_source.get(source)
    }

    /// True when no source has any breakpoint.
    pub fn is_empty(&self) -> bool {
        self.by_source.values().all(HashMap::is_empty)
    }
}
