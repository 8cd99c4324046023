use super::common;
use datahopper::ResearchDeps;
use serde_json::{json, Value};
use serve::ResearchResponse;

/// **Scenario**: A question returns the answer, the raw search results and status "completed".
#[tokio::test]
async fn e2e_research_completes() {
    let server = common::spawn_server(ResearchDeps::offline()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/research", server.base_url))
        .json(&json!({"question": "Which e-reader has the best battery?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: ResearchResponse = resp.json().await.unwrap();
    assert_eq!(body.status, "completed");
    assert!(body.final_answer.starts_with("Offline mode"));
    assert_eq!(
        body.google_results.as_ref().and_then(|g| g.pointer("/organic_results/0/title")),
        Some(&json!("Google result"))
    );
    assert!(body.bing_results.is_some());
    assert!(body.reddit_results.is_some());
}

/// **Scenario**: The frontend path /api/research serves the same handler.
#[tokio::test]
async fn e2e_research_under_api_prefix() {
    let server = common::spawn_server(ResearchDeps::offline()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/research", server.base_url))
        .json(&json!({"question": "q"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

/// **Scenario**: Blank or missing question is a 400 with an error message.
#[tokio::test]
async fn e2e_blank_question_is_bad_request() {
    let server = common::spawn_server(ResearchDeps::offline()).await;
    let client = reqwest::Client::new();
    for body in [json!({"question": "   "}), json!({})] {
        let resp = client
            .post(format!("{}/research", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "{}", body);
        let err: Value = resp.json().await.unwrap();
        assert!(err["error"].as_str().unwrap().contains("empty"));
    }
}

/// **Scenario**: A malformed or non-JSON body is a 400 with the same `{"error": ...}` shape.
#[tokio::test]
async fn e2e_malformed_body_is_json_bad_request() {
    let server = common::spawn_server(ResearchDeps::offline()).await;
    let client = reqwest::Client::new();
    let requests = [
        client
            .post(format!("{}/research", server.base_url))
            .header("content-type", "application/json")
            .body("{\"question\": "),
        client
            .post(format!("{}/research", server.base_url))
            .header("content-type", "text/plain")
            .body("what is rust?"),
    ];
    for request in requests {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), 400);
        let err: Value = resp.json().await.unwrap();
        let message = err["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request body"), "{}", message);
    }
}

/// **Scenario**: A failing node gives 500 with "Research failed: ..." naming the node.
#[tokio::test]
async fn e2e_run_failure_is_internal_error() {
    let server = common::spawn_server(common::failing_llm_deps()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/research", server.base_url))
        .json(&json!({"question": "q"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let err: Value = resp.json().await.unwrap();
    let message = err["error"].as_str().unwrap();
    assert!(message.starts_with("Research failed: "), "{}", message);
    assert!(message.contains("analyze-"), "{}", message);
}
