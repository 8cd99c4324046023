use super::common;
use datahopper::ResearchDeps;
use serve::HealthResponse;

/// **Scenario**: GET /health and GET /api/health report a healthy service.
#[tokio::test]
async fn e2e_health() {
    let server = common::spawn_server(ResearchDeps::offline()).await;
    let client = reqwest::Client::new();

    for path in ["/health", "/api/health"] {
        let resp = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "{}", path);
        let body: HealthResponse = resp.json().await.unwrap();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.message, "DataHopper API is running");
    }
}
