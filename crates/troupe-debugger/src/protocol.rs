//! DAP-shaped records handed to the adapter transport.
//!
//! The engine is agnostic to the wire format: it returns these plain records
//! and the transport layer serializes them into Debug Adapter Protocol
//! messages. Serialized field names follow DAP casing
//! (`variablesReference`, `presentationHint`).

use serde::{Deserialize, Serialize};

// ── Primitive types ──────────────────────────────────────────────────────────

/// Session-unique identifier for a stack frame.
pub type FrameId = u32;

/// Opaque id the client passes back to fetch a variable container's children.
/// Zero means "no children" on a [`Variable`].
pub type VariablesReference = u32;

/// Identifier for an execution thread.
pub type ThreadId = u32;

/// The single synthetic thread id reported while execution is suspended.
/// Multi-threaded test execution is not modeled.
pub const MAIN_THREAD_ID: ThreadId = 1;

// ── Source ────────────────────────────────────────────────────────────────────

/// A source file reference inside a stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name (basename of `path`).
    pub name: String,
    /// Normalized absolute path.
    pub path: String,
}

impl Source {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

// ── StackFrame ────────────────────────────────────────────────────────────────

/// One frame of the suspended call stack. Frame 0 is the innermost frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Session-unique frame id; never reused across suspensions.
    pub id: FrameId,
    /// Printable keyword name.
    pub name: String,
    /// 1-based source line (0 when the step is non-locatable).
    pub line: u32,
    /// Column information is not tracked; always 0.
    pub column: u32,
    pub source: Source,
}

// ── Scope ─────────────────────────────────────────────────────────────────────

/// A named variable container inside a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub name: String,
    pub variables_reference: VariablesReference,
    /// Whether fetching children is expensive. Never true here: producers are
    /// lazy and bounded by the snapshot lifetime.
    pub expensive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_hint: Option<String>,
}

impl Scope {
    /// The frame's live variable namespace.
    pub fn variables(variables_reference: VariablesReference) -> Self {
        Self {
            name: "Variables".to_string(),
            variables_reference,
            expensive: false,
            presentation_hint: None,
        }
    }

    /// The frame's keyword arguments.
    pub fn arguments(variables_reference: VariablesReference) -> Self {
        Self {
            name: "Arguments".to_string(),
            variables_reference,
            expensive: false,
            presentation_hint: Some("locals".to_string()),
        }
    }
}

// ── Variable ──────────────────────────────────────────────────────────────────

/// A named value inside a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    /// Bounded-length rendering of the value.
    pub value: String,
    /// 0: this variable has no fetchable children.
    pub variables_reference: VariablesReference,
}

impl Variable {
    /// A variable with no children.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            variables_reference: 0,
        }
    }
}

// ── Stopped reason ────────────────────────────────────────────────────────────

/// Why the execution thread suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoppedReason {
    /// A registered breakpoint matched the step's source and line.
    Breakpoint,
    /// A step-in or step-over command completed.
    Step,
}

impl StoppedReason {
    /// The DAP `stopped` event reason string.
    pub fn as_str(self) -> &'static str {
        match self {
            StoppedReason::Breakpoint => "breakpoint",
            StoppedReason::Step => "step",
        }
    }
}

impl std::fmt::Display for StoppedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Stopped event body ────────────────────────────────────────────────────────

/// Body of the DAP `stopped` event the transport emits after a suspension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppedEventBody {
    pub reason: StoppedReason,
    pub thread_id: ThreadId,
    pub all_threads_stopped: bool,
}

impl StoppedEventBody {
    pub fn new(reason: StoppedReason) -> Self {
        Self {
            reason,
            thread_id: MAIN_THREAD_ID,
            all_threads_stopped: true,
        }
    }
}

// ── Serialization helpers ─────────────────────────────────────────────────────

/// Serialize a stack frame to JSON.
pub fn serialize_frame(frame: &StackFrame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}

/// Serialize a scope to JSON.
pub fn serialize_scope(scope: &Scope) -> Result<String, serde_json::Error> {
    serde_json::to_string(scope)
}

/// Serialize a variable to JSON.
pub fn serialize_variable(variable: &Variable) -> Result<String, serde_json::Error> {
    serde_json::to_string(variable)
}

/// Serialize a stopped-event body to JSON.
pub fn serialize_stopped_event(body: &StoppedEventBody) -> Result<String, serde_json::Error> {
    serde_json::to_string(body)
}
