use probeq::domain::response::CheckResponse;
use probeq::engine::evaluate;
use serde_json::{Value, json};

fn single(response: &CheckResponse, assertion: Value) -> (bool, String) {
    let verdict = evaluate(response, &[assertion]);
    assert_eq!(verdict.results.len(), 1);
    let result = &verdict.results[0];
    assert_eq!(verdict.passed, result.passed);
    (result.passed, result.message.clone())
}

#[test]
fn status_equality() {
    let assertion = json!({"type": "status", "compare": "eq", "target": 200});
    assert!(single(&CheckResponse::new(200), assertion.clone()).0);

    let (passed, message) = single(&CheckResponse::new(503), assertion);
    assert!(!passed);
    assert_eq!(message, "expected status to equal 200, got 503");
}

#[test]
fn header_contains_and_missing_header_is_empty() {
    let response = CheckResponse::new(200).with_header("Content-Type", "application/json");
    assert!(
        single(
            &response,
            json!({"type": "header", "key": "Content-Type", "compare": "contains", "target": "json"})
        )
        .0
    );
    assert!(
        single(
            &response,
            json!({"type": "header", "key": "content-type", "compare": "eq", "target": "application/json"})
        )
        .0
    );
    assert!(
        single(
            &response,
            json!({"type": "header", "key": "X-Request-Id", "compare": "empty"})
        )
        .0
    );
    assert!(
        !single(
            &response,
            json!({"type": "header", "key": "X-Request-Id", "compare": "not_empty"})
        )
        .0
    );
}

#[test]
fn text_body_not_contains() {
    let assertion = json!({"type": "textBody", "compare": "not_contains", "target": "error"});
    assert!(single(&CheckResponse::new(200).with_body("ok"), assertion.clone()).0);
    assert!(!single(&CheckResponse::new(500).with_body("internal error"), assertion).0);
}

#[test]
fn json_body_numeric_threshold() {
    let assertion = json!({"type": "jsonBody", "path": "data.count", "compare": "gte", "target": 5});

    let high = CheckResponse::new(200).with_body(r#"{"data":{"count":10}}"#);
    assert!(single(&high, assertion.clone()).0);

    let low = CheckResponse::new(200).with_body(r#"{"data":{"count":2}}"#);
    let (passed, message) = single(&low, assertion.clone());
    assert!(!passed);
    assert_eq!(
        message,
        "expected json body at `data.count` to be greater than or equal to 5, got 2"
    );

    let html = CheckResponse::new(200).with_body("<html></html>");
    let verdict = evaluate(&html, &[assertion]);
    assert!(!verdict.passed);
    assert_eq!(verdict.results[0].error.as_deref(), Some("invalid_json"));
    assert!(verdict.results[0].message.contains("not valid JSON"));
}

#[test]
fn json_body_path_errors_and_non_numeric_leaves() {
    let response =
        CheckResponse::new(200).with_body(r#"{"data":{"items":[{"state":"up"}],"flag":true}}"#);
    let verdict = evaluate(
        &response,
        &[
            json!({"type": "jsonBody", "path": "data.items[0].state", "compare": "eq", "target": "up"}),
            json!({"type": "jsonBody", "path": "data.items[1].state", "compare": "eq", "target": "up"}),
            json!({"type": "jsonBody", "path": "data.flag", "compare": "gt", "target": 0}),
            json!({"type": "jsonBody", "path": "data.flag", "compare": "eq", "target": true}),
        ],
    );

    let errors: Vec<Option<&str>> = verdict
        .results
        .iter()
        .map(|result| result.error.as_deref())
        .collect();
    assert_eq!(
        errors,
        vec![None, Some("path_not_found"), Some("not_numeric"), None]
    );
    assert!(verdict.results[0].passed);
    assert!(verdict.results[3].passed);
    assert_eq!(verdict.failure_count, 2);
}

#[test]
fn lexicographic_string_ordering() {
    let assertion = json!({"type": "textBody", "compare": "lt", "target": "m"});
    assert!(single(&CheckResponse::new(200).with_body("apple"), assertion.clone()).0);
    assert!(!single(&CheckResponse::new(200).with_body("zebra"), assertion).0);
}

#[test]
fn malformed_assertion_does_not_abort_the_rest() {
    let response = CheckResponse::new(200)
        .with_header("Cache-Control", "no-store")
        .with_body("healthy");
    let verdict = evaluate(
        &response,
        &[
            json!({"type": "status", "compare": "lt", "target": 300}),
            json!({"type": "certificate", "compare": "gt", "target": 30}),
            json!({"type": "header", "key": "Cache-Control", "compare": "contains", "target": "no-store"}),
            json!({"type": "textBody", "compare": "contains"}),
            json!({"type": "textBody", "compare": "eq", "target": "healthy"}),
        ],
    );

    assert!(!verdict.passed);
    assert_eq!(verdict.assertion_count, 5);
    let outcomes: Vec<bool> = verdict.results.iter().map(|result| result.passed).collect();
    assert_eq!(outcomes, vec![true, false, true, false, true]);
    assert_eq!(verdict.results[1].error.as_deref(), Some("decode_error"));
    assert_eq!(verdict.results[3].kind.as_deref(), Some("textBody"));
    assert_eq!(
        verdict.results[3].message,
        "invalid assertion: assertion is missing `target`"
    );
}

#[test]
fn evaluation_is_idempotent_and_serializes_stably() {
    let response = CheckResponse::new(201)
        .with_header("Location", "/items/9")
        .with_body(r#"{"id":9}"#);
    let assertions = [
        json!({"type": "status", "compare": "eq", "target": 201}),
        json!({"type": "jsonBody", "path": "id", "compare": "eq", "target": 9}),
        json!({"type": "header", "key": "Location", "compare": "eq", "target": "/items/9"}),
    ];

    let first = evaluate(&response, &assertions);
    let second = evaluate(&response, &assertions);
    assert_eq!(first, second);
    assert!(first.passed);

    let as_json = serde_json::to_string(&first).expect("serialize");
    assert_eq!(
        as_json,
        r#"{"passed":true,"assertion_count":3,"failure_count":0,"results":[{"index":0,"kind":"status","passed":true,"actual":"201","message":"expected status to equal 201, got 201"},{"index":1,"kind":"jsonBody","passed":true,"actual":"9","message":"expected json body at `id` to equal 9, got 9"},{"index":2,"kind":"header","passed":true,"actual":"/items/9","message":"expected header `Location` to equal \"/items/9\", got \"/items/9\""}]}"#
    );
}

#[test]
fn empty_assertion_list_passes() {
    let verdict = evaluate(&CheckResponse::new(500), &[]);
    assert!(verdict.passed);
    assert!(verdict.results.is_empty());
}
