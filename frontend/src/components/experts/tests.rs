use super::*;
use crate::web::http::MockHttpClient;
use plantdoc_shared::HttpMethod;
use serde_json::json;

const BASE: &str = "http://api.test";

fn setup() -> PlantApi<MockHttpClient> {
    PlantApi::new(BASE, MockHttpClient::new())
}

fn token() -> Token {
    Token::parse("tok").unwrap()
}

fn mock_board(api: &PlantApi<MockHttpClient>) {
    api.client().mock_response(
        HttpMethod::Get,
        &format!("{}/experts", BASE),
        200,
        json!([
            {"_id": "e1", "name": "Dr. Sarah Johnson", "specialty": "Plant Pathology", "rating": 4.8},
            {"_id": "e2", "name": "Prof. Michael Chen", "specialty": "Soil Science"}
        ]),
    );
    api.client().mock_response(
        HttpMethod::Get,
        &format!("{}/reports/user", BASE),
        200,
        json!([{"_id": "r1", "title": "Tomato Plant Analysis", "date": "2025-03-28"}]),
    );
    api.client().mock_response(
        HttpMethod::Get,
        &format!("{}/expert-requests", BASE),
        200,
        json!([]),
    );
}

fn request(id: &str, status: &str) -> AdviceRequest {
    serde_json::from_value(json!({"_id": id, "status": status})).unwrap()
}

fn complete_form() -> AdviceForm {
    let mut form = AdviceForm::default();
    form.select_expert("e1");
    form.select_report("r1");
    form.message = "Spots on leaves".into();
    form
}

#[tokio::test]
async fn test_load_board() {
    let api = setup();
    mock_board(&api);

    let board = load_expert_board(&api, Some(&token())).await.unwrap();
    assert_eq!(board.experts.len(), 2);
    assert_eq!(board.reports[0].display_name(), "Tomato Plant Analysis");
    assert!(board.requests.is_empty());
    assert_eq!(api.client().request_count(), 3);
}

#[tokio::test]
async fn test_malformed_expert_does_not_fail_the_board() {
    let api = setup();
    mock_board(&api);
    api.client().mock_response(
        HttpMethod::Get,
        &format!("{}/experts", BASE),
        200,
        json!([
            {"_id": "e1", "name": null, "rating": "4.8"},
            "not an expert",
            {"id": 2, "name": "Prof. Michael Chen"}
        ]),
    );

    let board = load_expert_board(&api, Some(&token())).await.unwrap();
    let keys: Vec<_> = board.experts.iter().map(Expert::key).collect();
    assert_eq!(keys, vec!["e1", "2"]);
    assert_eq!(board.experts[0].rating, Some(4.8));
}

#[tokio::test]
async fn test_any_failure_fails_the_board() {
    let api = setup();
    mock_board(&api);
    api.client().mock_response(
        HttpMethod::Get,
        &format!("{}/reports/user", BASE),
        500,
        json!({"error": "db down"}),
    );

    let err = load_expert_board(&api, Some(&token())).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_board_needs_credential() {
    let api = setup();
    let err = load_expert_board(&api, None).await.unwrap_err();
    assert_eq!(err, ApiError::MissingCredential);
    assert_eq!(api.client().request_count(), 0);
}

#[tokio::test]
async fn test_submit_without_selection_sends_nothing() {
    let api = setup();
    let mut form = AdviceForm::default();
    form.select_expert("e1");

    let err = submit_advice(&api, &form, Some(&token()), Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Validation(MISSING_SELECTION.to_string()));
    assert_eq!(api.client().request_count(), 0);
}

#[tokio::test]
async fn test_submit_refreshes_requests() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/expert-requests", BASE),
        201,
        json!({"_id": "q1", "status": "pending"}),
    );
    api.client().mock_response(
        HttpMethod::Get,
        &format!("{}/expert-requests", BASE),
        200,
        json!([{"_id": "q0", "status": "completed"}, {"_id": "q1", "status": "pending"}]),
    );

    let submitted = submit_advice(&api, &complete_form(), Some(&token()), Vec::new())
        .await
        .unwrap();
    let keys: Vec<_> = submitted.requests.iter().map(AdviceRequest::key).collect();
    assert_eq!(keys, vec!["q0", "q1"]);

    let sent = api.client().requests.borrow();
    assert_eq!(
        sent[0].body.as_deref(),
        Some(r#"{"expertId":"e1","reportId":"r1","message":"Spots on leaves"}"#)
    );
    assert_eq!(sent[1].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_submit_keeps_created_request_when_refresh_fails() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/expert-requests", BASE),
        201,
        json!({"_id": "q2", "status": "pending"}),
    );
    api.client().mock_network_error(
        HttpMethod::Get,
        &format!("{}/expert-requests", BASE),
        "timeout",
    );

    let current = vec![request("q0", "completed")];
    let submitted = submit_advice(&api, &complete_form(), Some(&token()), current)
        .await
        .unwrap();
    let keys: Vec<_> = submitted.requests.iter().map(AdviceRequest::key).collect();
    assert_eq!(keys, vec!["q0", "q2"]);
}

#[tokio::test]
async fn test_submit_failure_is_reported() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/expert-requests", BASE),
        400,
        json!({"error": "Expert unavailable"}),
    );

    let err = submit_advice(&api, &complete_form(), Some(&token()), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
}

#[test]
fn test_group_by_status_is_stable() {
    let requests = vec![
        request("a", "completed"),
        request("b", "pending"),
        request("c", "rejected"),
        request("d", "pending"),
        request("e", "completed"),
    ];

    let grouped = group_by_status(&requests);
    let keys: Vec<_> = grouped.iter().map(AdviceRequest::key).collect();
    assert_eq!(keys, vec!["b", "d", "a", "e", "c"]);
}
