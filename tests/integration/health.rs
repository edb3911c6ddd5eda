use crate::helpers::{body, TestApp};

#[tokio::test]
async fn liveness_always_answers_ok() {
    let app = TestApp::spawn();
    let response = app.get("/healthz").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(body(&response), "ok");
}

#[tokio::test]
async fn readiness_reports_ready_when_the_store_answers() {
    let app = TestApp::spawn();
    let response = app.get("/readyz").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(body(&response), "ready");
}

#[tokio::test]
async fn unknown_paths_render_the_not_found_page() {
    let app = TestApp::spawn();
    let response = app.get("/nowhere").await;
    assert_eq!(response.status_code(), 404);
    assert!(body(&response).contains("Sorry, that page doesn't exist!"));
}
