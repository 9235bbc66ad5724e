//! Debugger facade lifecycle tests

use super::*;

use std::path::Path;
use std::thread;

use troupe_debugger::{LineBreakpoint, StoppedReason, MAIN_THREAD_ID};

// ── Breakpoint hit (scenario: suspend, inspect, continue) ────────────────────

#[test]
fn test_breakpoint_hit_suspends_and_reports_frame() {
    let debugger = engine();
    let rx = attach_suspend_signal(&debugger);
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![LineBreakpoint::new(7)]);

    let remote = debugger.clone();
    let exec = thread::spawn(move || {
        let ctx = ScriptContext::with_vars(&[("${greeting}", "hi")]);
        let info = step("/t/a.troupe", 7, "Log", &["hi"]);
        remote.before_step(&ctx, &info);
        remote.after_step(&ctx, &info);
    });

    await_suspension(&rx);
    assert!(debugger.is_paused());
    assert_eq!(debugger.stop_reason(), Some(StoppedReason::Breakpoint));
    assert_eq!(debugger.get_threads(), vec![MAIN_THREAD_ID]);

    let frames = debugger.get_frames(MAIN_THREAD_ID);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].line, 7);
    assert_eq!(frames[0].name, "Log");
    assert_eq!(frames[0].column, 0);
    assert_eq!(frames[0].source.path, "/t/a.troupe");
    assert_eq!(frames[0].source.name, "a.troupe");

    debugger.step_continue();
    exec.join().unwrap();
    assert!(!debugger.is_paused());
    assert_eq!(debugger.stack_depth(), 0);
    assert!(debugger.get_frames(MAIN_THREAD_ID).is_empty());
}

// ── Queries while running ────────────────────────────────────────────────────

#[test]
fn test_queries_while_running_return_empty() {
    let debugger = engine();
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![]);
    assert!(debugger.get_threads().is_empty());
    assert!(debugger.get_frames(MAIN_THREAD_ID).is_empty());
    assert!(debugger.get_scopes(1).is_none());
    assert!(debugger.get_variables(1).is_none());
    assert_eq!(debugger.stop_reason(), None);
}

#[test]
fn test_frames_for_unknown_thread_are_empty() {
    let debugger = engine();
    let rx = attach_suspend_signal(&debugger);
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![LineBreakpoint::new(1)]);

    let remote = debugger.clone();
    let exec = thread::spawn(move || {
        let ctx = ScriptContext::empty();
        let info = step("/t/a.troupe", 1, "Log", &[]);
        remote.before_step(&ctx, &info);
        remote.after_step(&ctx, &info);
    });

    await_suspension(&rx);
    assert!(debugger.get_frames(99).is_empty());
    assert_eq!(debugger.get_frames(MAIN_THREAD_ID).len(), 1);

    debugger.step_continue();
    exec.join().unwrap();
}

// ── Concurrent breakpoint edit while paused ──────────────────────────────────

#[test]
fn test_breakpoints_cleared_while_paused_are_observed() {
    let debugger = engine();
    let rx = attach_suspend_signal(&debugger);
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![LineBreakpoint::new(7)]);

    let remote = debugger.clone();
    let exec = thread::spawn(move || {
        let ctx = ScriptContext::empty();
        let first = step("/t/a.troupe", 7, "Log", &["one"]);
        let second = step("/t/a.troupe", 7, "Log", &["two"]);
        remote.before_step(&ctx, &first);
        remote.after_step(&ctx, &first);
        remote.before_step(&ctx, &second);
        remote.after_step(&ctx, &second);
    });

    await_suspension(&rx);
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![]);
    debugger.step_continue();

    // The second hit on the same line must not suspend again.
    exec.join().unwrap();
    assert!(!debugger.is_paused());
    assert_eq!(debugger.stack_depth(), 0);
}

// ── Malformed steps ──────────────────────────────────────────────────────────

#[test]
fn test_malformed_step_only_tracks_depth() {
    let debugger = engine();
    let ctx = ScriptContext::empty();
    let info = StepInfo::non_locatable("Suite Setup");
    debugger.before_step(&ctx, &info);
    assert_eq!(debugger.stack_depth(), 1);
    assert!(!debugger.is_paused());
    debugger.after_step(&ctx, &info);
    assert_eq!(debugger.stack_depth(), 0);
}

#[test]
fn test_step_without_lineno_never_suspends() {
    let debugger = engine();
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![LineBreakpoint::new(7)]);
    let ctx = ScriptContext::empty();
    let info = StepInfo {
        source: Some("/t/a.troupe".into()),
        lineno: None,
        name: "Log".to_string(),
        args: Vec::new(),
    };
    debugger.before_step(&ctx, &info);
    assert!(!debugger.is_paused());
    debugger.after_step(&ctx, &info);
}

// ── Free-running behavior ────────────────────────────────────────────────────

#[test]
fn test_run_without_breakpoints_never_suspends() {
    let debugger = engine();
    let ctx = ScriptContext::empty();
    let outer = step("/t/a.troupe", 1, "Setup", &[]);
    let inner = step("/t/a.troupe", 2, "Log", &["x"]);

    debugger.before_step(&ctx, &outer);
    assert!(!debugger.is_paused());
    debugger.before_step(&ctx, &inner);
    assert!(!debugger.is_paused());
    assert_eq!(debugger.stack_depth(), 2);
    debugger.after_step(&ctx, &inner);
    debugger.after_step(&ctx, &outer);
    assert_eq!(debugger.stack_depth(), 0);
}

#[test]
fn test_step_on_file_without_breakpoint_entry_never_suspends() {
    let debugger = engine();
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![LineBreakpoint::new(7)]);
    let ctx = ScriptContext::empty();
    let info = step("/t/other.troupe", 7, "Log", &[]);
    debugger.before_step(&ctx, &info);
    assert!(!debugger.is_paused());
    debugger.after_step(&ctx, &info);
}

// ── Disconnect drain ─────────────────────────────────────────────────────────

#[test]
fn test_disconnect_resumes_free_running() {
    let debugger = engine();
    let rx = attach_suspend_signal(&debugger);
    debugger.set_breakpoints(Path::new("/t/a.troupe"), vec![LineBreakpoint::new(7)]);

    let remote = debugger.clone();
    let exec = thread::spawn(move || {
        let ctx = ScriptContext::empty();
        let first = step("/t/a.troupe", 7, "Log", &[]);
        let second = step("/t/b.troupe", 2, "Log", &[]);
        remote.before_step(&ctx, &first);
        remote.after_step(&ctx, &first);
        // Breakpoints may still be registered; the drained run keeps going
        // only because /t/b.troupe has none.
        remote.before_step(&ctx, &second);
        remote.after_step(&ctx, &second);
    });

    await_suspension(&rx);
    debugger.disconnect();
    exec.join().unwrap();
    assert!(!debugger.is_paused());
}
