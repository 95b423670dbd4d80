//! Generate an insight report for a small recorded session

fn main() {
    let json = r#"{
        "formId": "signup",
        "metrics": [
            { "sessionId": "ffx_demo", "form": "signup", "field": "Email", "type": "field_focus", "data": { "focusCount": 1 }, "ts": 1000 },
            { "sessionId": "ffx_demo", "form": "signup", "field": "Email", "type": "hesitation", "data": { "hesitation": 6200 }, "ts": 7200 },
            { "sessionId": "ffx_demo", "form": "signup", "field": "Email", "type": "backspace", "data": { "backspaceCount": 3 }, "ts": 8000 },
            { "sessionId": "ffx_demo", "form": "signup", "field": "Email", "type": "rage_click", "data": { "count": 3 }, "ts": 8400 },
            { "sessionId": "ffx_demo", "form": "signup", "field": "Email", "type": "field_blur", "data": { "totalHoverMs": 7000, "backspaceCount": 3, "charCount": 6 }, "ts": 9000 },
            { "sessionId": "ffx_demo", "form": "signup", "field": "Sign up", "type": "form_abandon", "data": { "abandonedAt": 12000 }, "ts": 12000 }
        ]
    }"#;

    let processor = formfix::InsightsProcessor::new();
    let result = processor
        .process_request(json)
        .and_then(|insights| formfix::InsightEncoder::new().encode_to_json(insights, 6, 0));

    match result {
        Ok(report) => print!("{report}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
