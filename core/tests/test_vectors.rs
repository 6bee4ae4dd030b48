//! Verify path rendering and envelope mapping against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Entities are decoded as `serde_json::Value` so each case can describe its
//! own shape; comparisons are on parsed JSON, not raw strings.

use clutch_core::{
    ClientError, ErrorBody, FluentClient, HttpMethod, HttpResponse, PathSegment,
    ResponseEnvelope,
};
use serde_json::Value;

/// Build a path segment from a vector entry like `{"collection":"users"}`.
fn segment(entry: &Value) -> PathSegment {
    if let Some(name) = entry.get("collection") {
        PathSegment::collection_named(name.as_str().unwrap())
    } else if let Some(value) = entry.get("literal") {
        PathSegment::literal(value.as_str().unwrap())
    } else {
        panic!("unknown segment: {entry}")
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn path_test_vectors() {
    let raw = include_str!("../../test-vectors/paths.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let root = case["root"].as_str().unwrap();
        let client = FluentClient::<(), ErrorBody>::with_transport(root, ());

        let request = case["segments"]
            .as_array()
            .unwrap()
            .iter()
            .fold(client.request(), |request, entry| request.segment(segment(entry)));
        let result = request.build(HttpMethod::Get, None);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "PathRender" => {
                    assert!(matches!(err, ClientError::PathRender), "{name}: expected PathRender")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let req = result.unwrap();
            assert_eq!(req.url, case["expected_url"].as_str().unwrap(), "{name}: url");
            assert!(req.body.is_none(), "{name}: body should be None");
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[test]
fn envelope_test_vectors() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = ResponseEnvelope::<Value, ErrorBody>::from_response(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "Decode" => assert!(matches!(err, ClientError::Decode { .. }), "{name}: expected Decode"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let expected = &case["expected"];
        let (status, entity, error) = result.unwrap().into_parts();
        assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(entity.unwrap_or(Value::Null), expected["entity"], "{name}: entity");

        let expected_error: Option<ErrorBody> =
            serde_json::from_value(expected["error"].clone()).unwrap();
        assert_eq!(error, expected_error, "{name}: error");
        assert!(
            entity_and_error_are_exclusive(&expected["entity"], &expected["error"]),
            "{name}: vector lists both entity and error"
        );
    }
}

fn entity_and_error_are_exclusive(entity: &Value, error: &Value) -> bool {
    entity.is_null() || error.is_null()
}
