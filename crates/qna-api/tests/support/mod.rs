#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use qna_api::{AppStateInner, router};
use qna_core::{ProvisionUsers, SeedUser};
use qna_db::{Database, SqliteUsers, UserRepository};

pub const ALICE: (&str, &str) = ("alice", "alice123");
pub const BOB: (&str, &str) = ("bob", "bob123");

pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// In-memory database with alice and bob provisioned.
    pub fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUsers);

        let seeds: Vec<SeedUser> = [ALICE, BOB]
            .into_iter()
            .map(|(username, password)| SeedUser {
                username: username.to_string(),
                password: password.to_string(),
            })
            .collect();
        ProvisionUsers::new(db.clone(), users, false)
            .execute(&CancellationToken::new(), &seeds)
            .unwrap();

        let state = Arc::new(AppStateInner::new(db.clone()));
        Self {
            router: router(state),
            db,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        creds: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some((user, pass)) = creds {
            let encoded = B64.encode(format!("{user}:{pass}"));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_raw(req).await
    }

    pub async fn send_raw(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, creds: (&str, &str)) -> TestResponse {
        self.send(Method::GET, path, Some(creds), None).await
    }

    pub async fn post(&self, path: &str, creds: (&str, &str), body: Value) -> TestResponse {
        self.send(Method::POST, path, Some(creds), Some(body)).await
    }

    pub async fn delete(&self, path: &str, creds: (&str, &str)) -> TestResponse {
        self.send(Method::DELETE, path, Some(creds), None).await
    }
}
