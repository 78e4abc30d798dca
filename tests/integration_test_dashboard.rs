mod common;

use axum::http::StatusCode;
use common::{body_text, location, TestApp};

#[tokio::test]
async fn test_dashboard_requires_session() {
    let app = TestApp::new().await;

    let response = app.get("/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_dashboard_without_record_redirects_to_form() {
    let app = TestApp::new().await;
    let session = app.login("sub-unregistered").await;

    let response = app.get("/dashboard", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/form");
}

#[tokio::test]
async fn test_dashboard_renders_record() {
    let app = TestApp::new().await;
    let session = app.login("sub-dash").await;
    app.register(&session).await;

    let tourist = app.state.tourist_repo.find_by_provider_subject("sub-dash").await.unwrap().unwrap();

    let response = app.get("/dashboard", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    assert!(page.contains("Asha Das"));
    assert!(page.contains(&tourist.tourist_id));
    assert!(page.contains(&format!("/static/{}", tourist.qr_code_path)));
    assert!(page.contains("9876543210"));
    assert!(!page.contains(&tourist.password_hash));
}

#[tokio::test]
async fn test_qr_code_is_served() {
    let app = TestApp::new().await;
    let session = app.login("sub-qr").await;
    app.register(&session).await;

    let tourist = app.state.tourist_repo.find_by_provider_subject("sub-qr").await.unwrap().unwrap();

    let response = app.get(&format!("/static/{}", tourist.qr_code_path), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
}
