#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use audition_api::auth::jwt::JwtConfig;
use audition_api::config::{AdminSeedConfig, ServerConfig, StoragePaths};
use audition_api::rate_limit::RateLimitConfig;
use audition_api::router::build_app_router;
use audition_api::state::AppState;
use audition_core::ffmpeg::FfmpegError;
use audition_pipeline::MediaConcatenator;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` rooted in `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    let data_dir = dir.join("data");
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        merge_timeout_secs: 60,
        paths: StoragePaths {
            uploads_dir: data_dir.join("uploads"),
            data_dir,
            tmp_dir: dir.join("tmp"),
            legacy_uploads_dir: dir.join("public").join("uploads"),
        },
        ffmpeg_path: "ffmpeg".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-do-not-use".to_string(),
            expiry_hours: 1,
        },
        cookie_secure: false,
        admin: AdminSeedConfig {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            name: "Super Admin".to_string(),
        },
        public_base_url: "http://localhost:3000".to_string(),
        max_upload_bytes: 1024 * 1024,
        login_rate: RateLimitConfig {
            capacity: 5.0,
            refill_per_min: 5.0,
            trust_proxy: false,
        },
    }
}

/// Stand-in for ffmpeg: concatenates the listed files byte for byte.
pub struct FakeConcatenator;

#[async_trait]
impl MediaConcatenator for FakeConcatenator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), FfmpegError> {
        let listing = tokio::fs::read_to_string(manifest).await?;
        let mut merged = Vec::new();
        for line in listing.lines() {
            let Some(path) = line
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
            else {
                continue;
            };
            merged.extend(tokio::fs::read(path).await?);
        }
        tokio::fs::write(output, merged).await?;
        Ok(())
    }
}

/// An application over a fresh temporary data directory.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.state.store.uploads_dir().to_path_buf()
    }

    /// Write a media file directly into the upload directory.
    pub fn put_upload(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.uploads_dir().join(name), contents).unwrap();
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(|_| {}).await
}

/// [`build_test_app`] with `configure` applied to the test config first.
pub async fn build_test_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    configure(&mut config);
    let state = AppState::initialize(config.clone(), Arc::new(FakeConcatenator))
        .await
        .unwrap();
    let app = build_app_router(state.clone(), &config);
    TestApp { app, state, dir }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, Some(cookie))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body, Some(cookie))).await
}

pub async fn post_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// A multipart body with one `file` part and optional extra text parts.
pub fn multipart_request(
    uri: &str,
    file_name: &str,
    content_type: &str,
    contents: &[u8],
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> Request<Body> {
    const BOUNDARY: &str = "audition-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend(contents);
    body.extend(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::post(uri).header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// The `name=value` pair of the response's `Set-Cookie` header.
pub fn session_cookie_pair(response: &Response<Body>) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().trim().to_string()
}

/// Log in as the seeded admin and return the `Cookie` header value.
pub async fn login_admin(app: Router) -> String {
    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie_pair(&response)
}
