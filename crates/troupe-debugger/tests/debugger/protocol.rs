//! Wire-shape tests for the DAP-facing records

use super::*;

use serde_json::json;
use troupe_debugger::{
    Scope, Source, StackFrame, StoppedEventBody, StoppedReason, Variable, MAIN_THREAD_ID,
};

#[test]
fn test_stack_frame_wire_shape() {
    let frame = StackFrame {
        id: 3,
        name: "Log".to_string(),
        line: 7,
        column: 0,
        source: Source::new("a.troupe", "/t/a.troupe"),
    };
    assert_eq!(
        serde_json::to_value(&frame).unwrap(),
        json!({
            "id": 3,
            "name": "Log",
            "line": 7,
            "column": 0,
            "source": { "name": "a.troupe", "path": "/t/a.troupe" }
        })
    );
}

#[test]
fn test_stack_frame_round_trip() {
    let frame = StackFrame {
        id: 9,
        name: "Open Session".to_string(),
        line: 12,
        column: 0,
        source: Source::new("keywords.troupe", "/t/keywords.troupe"),
    };
    let raw = troupe_debugger::protocol::serialize_frame(&frame).unwrap();
    let parsed: StackFrame = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, frame);
}

#[test]
fn test_scope_uses_dap_field_names() {
    let scope = Scope::arguments(17);
    assert_eq!(
        serde_json::to_value(&scope).unwrap(),
        json!({
            "name": "Arguments",
            "variablesReference": 17,
            "expensive": false,
            "presentationHint": "locals"
        })
    );
}

#[test]
fn test_variables_scope_omits_presentation_hint() {
    let scope = Scope::variables(16);
    let value = serde_json::to_value(&scope).unwrap();
    assert_eq!(value["name"], "Variables");
    assert!(value.get("presentationHint").is_none());
}

#[test]
fn test_variable_wire_shape() {
    let variable = Variable::leaf("param 0", "hi");
    assert_eq!(
        serde_json::to_value(&variable).unwrap(),
        json!({
            "name": "param 0",
            "value": "hi",
            "variablesReference": 0
        })
    );
}

#[test]
fn test_stopped_reasons_serialize_to_dap_strings() {
    assert_eq!(
        serde_json::to_value(StoppedReason::Breakpoint).unwrap(),
        json!("breakpoint")
    );
    assert_eq!(
        serde_json::to_value(StoppedReason::Step).unwrap(),
        json!("step")
    );
    assert_eq!(StoppedReason::Breakpoint.as_str(), "breakpoint");
    assert_eq!(StoppedReason::Step.to_string(), "step");
}

#[test]
fn test_stopped_event_body() {
    let body = StoppedEventBody::new(StoppedReason::Breakpoint);
    assert_eq!(body.thread_id, MAIN_THREAD_ID);
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "reason": "breakpoint",
            "threadId": 1,
            "allThreadsStopped": true
        })
    );
}
