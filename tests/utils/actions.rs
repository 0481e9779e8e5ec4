use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestApp;

// ============================================================================
// Request Helpers
// ============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response should carry an id")
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    // ========================================================================
    // User Flows
    // ========================================================================

    pub async fn sign_up(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/auth/sign-up",
            None,
            Some(json!({"name": "Test", "username": username, "password": password})),
        )
        .await
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/auth/sign-in",
            None,
            Some(json!({"username": username, "password": password})),
        )
        .await
    }

    /// Signs a fresh user up and in, returning their token
    pub async fn signed_in_user(&self, username: &str) -> String {
        assert_eq!(self.sign_up(username, "qwerty").await.status, StatusCode::OK);
        let response = self.sign_in(username, "qwerty").await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_list(&self, token: &str, title: &str) -> i64 {
        let response = self
            .send(
                "POST",
                "/api/lists",
                Some(token),
                Some(json!({"title": title, "description": "Description"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.id()
    }

    pub async fn create_item(&self, token: &str, list_id: i64, title: &str) -> i64 {
        let response = self
            .send(
                "POST",
                &format!("/api/lists/{}/items", list_id),
                Some(token),
                Some(json!({"title": title, "description": "Description"})),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.id()
    }
}
