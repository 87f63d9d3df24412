use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;

use xlaunch_core::error::LaunchError;
use xlaunch_core::release::{GithubReleaseSource, ReleaseResolver, ReleaseSource, RepoRef};

const ASSET_SIZE: usize = 200 * 1024;

fn asset_body() -> Vec<u8> {
    (0..ASSET_SIZE).map(|i| (i % 251) as u8).collect()
}

async fn latest(State(addr): State<SocketAddr>, req: Request) -> impl IntoResponse {
    let headers = req.headers();
    if headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) != Some("xlaunch-test")
        || headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
            != Some("application/vnd.github.v3+json")
    {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let body = serde_json::json!({
        "tag_name": "v1.4.0",
        "assets": [
            {"name": "Lab-Build.zip", "url": format!("http://{addr}/assets/1"), "size": ASSET_SIZE},
            {"name": "Forest-Pack.zip", "url": format!("http://{addr}/assets/2"), "size": 10}
        ]
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

async fn asset(req: Request) -> impl IntoResponse {
    let accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok());
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if accept != Some("application/octet-stream") || auth != Some("Bearer s3cret") {
        return StatusCode::FORBIDDEN.into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        asset_body(),
    )
        .into_response()
}

async fn broken() -> impl IntoResponse {
    (StatusCode::OK, "{\"assets\": []}")
}

async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/repos/acme/lab/releases/latest", get(latest))
        .route("/repos/acme/broken/releases/latest", get(broken))
        .route("/assets/1", get(asset))
        .with_state(addr);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn source(addr: SocketAddr) -> GithubReleaseSource {
    GithubReleaseSource::new(format!("http://{addr}/"), "xlaunch-test").unwrap()
}

#[tokio::test]
async fn latest_release_is_parsed() {
    let (addr, _handle) = start_server().await;
    let release = source(addr)
        .latest_release(&RepoRef::new("acme", "lab"))
        .await
        .unwrap();

    assert_eq!(release.tag, "v1.4.0");
    assert_eq!(release.assets.len(), 2);
    assert_eq!(release.assets[0].size_bytes, ASSET_SIZE as u64);
    assert_eq!(
        ReleaseResolver::summary(&release, Some("Lab Build")),
        "v1.4.0 (200.00 KB)"
    );
}

#[tokio::test]
async fn asset_is_streamed_with_token() {
    let (addr, _handle) = start_server().await;
    let src = source(addr);
    let mut repo = RepoRef::new("acme", "lab");
    repo.token = Some("s3cret".into());

    let release = src.latest_release(&repo).await.unwrap();
    let mut stream = src.fetch_asset(&repo, &release.assets[0]).await.unwrap();
    assert_eq!(stream.content_length(), Some(ASSET_SIZE as u64));

    let mut body = Vec::new();
    while let Some(chunk) = stream.next_chunk().await.unwrap() {
        body.extend_from_slice(&chunk);
    }
    assert_eq!(body, asset_body());

    let anonymous = RepoRef::new("acme", "lab");
    let err = src
        .fetch_asset(&anonymous, &release.assets[0])
        .await
        .err()
        .unwrap();
    assert!(matches!(err, LaunchError::Network(msg) if msg.contains("403")));
}

#[tokio::test]
async fn http_errors_and_bad_bodies_are_typed() {
    let (addr, _handle) = start_server().await;
    let src = source(addr);

    let err = src
        .latest_release(&RepoRef::new("acme", "missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::Network(msg) if msg.contains("404")));

    let err = src
        .latest_release(&RepoRef::new("acme", "broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::MalformedResponse(_)));
    assert_eq!(err.kind(), xlaunch_core::FaultKind::Network);
}
