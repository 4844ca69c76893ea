// Client tests against an in-process backend

use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::json;
use std::io::Write;

use podscope_api::{ApiClient, ApiError, Credentials, PodRef};

/// "admin:secret"
const EXPECTED_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

fn backend() -> Router {
    Router::new()
        .route("/api/contexts", get(|| async { Json(json!({"contexts": ["dev", "prod"]})) }))
        .route(
            "/api/pods/{context}",
            get(|Path(context): Path<String>| async move {
                Json(json!({"pods": [{
                    "name": "web-0",
                    "namespace": "shop",
                    "status": "Running",
                    "age": "2024-01-15 10:30:00+00:00",
                    "restarts": 2,
                    "context": context,
                }]}))
            }),
        )
        .route(
            "/api/logs/{context}/{namespace}/{pod}",
            get(|Path((_, namespace, pod)): Path<(String, String, String)>| async move {
                if pod == "denied" {
                    Json(json!({"error": "Permission denied to access pod logs"}))
                } else {
                    Json(json!({"logs": format!("hello from {}/{}\n", namespace, pod)}))
                }
            }),
        )
        .route(
            "/api/describe/{context}/{namespace}/{pod}",
            get(|Path((_, namespace, pod)): Path<(String, String, String)>| async move {
                match pod.as_str() {
                    "gone" => Json(json!({"error": "pods \"gone\" not found"})),
                    "empty" => Json(json!({})),
                    _ => Json(json!({"pod_details": {
                        "events": [],
                        "manifest": {
                            "name": pod,
                            "namespace": namespace,
                            "containers": [{"name": "main", "image": "busybox"}],
                        },
                    }})),
                }
            }),
        )
}

fn broken_backend() -> Router {
    Router::new().route("/api/contexts", get(|| async { "<html>maintenance</html>" }))
}

fn guarded_backend() -> Router {
    Router::new().route(
        "/api/contexts",
        get(|headers: HeaderMap| async move {
            let authorized = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(EXPECTED_AUTH);
            if authorized {
                Json(json!({"contexts": ["secure"]})).into_response()
            } else {
                Response::builder()
                    .status(StatusCode::UNAUTHORIZED)
                    .header(header::WWW_AUTHENTICATE, "Basic")
                    .body(axum::body::Body::from("{\"detail\":\"Invalid authentication credentials\"}"))
                    .unwrap()
            }
        }),
    )
}

/// Logs endpoint that only answers clients accepting gzip, as the real backend compresses logs
fn gzip_backend() -> Router {
    Router::new().route(
        "/api/logs/{context}/{namespace}/{pod}",
        get(|headers: HeaderMap| async move {
            let accepts_gzip = headers
                .get(header::ACCEPT_ENCODING)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("gzip"));
            if !accepts_gzip {
                return StatusCode::NOT_ACCEPTABLE.into_response();
            }

            let body = json!({"logs": "line 1\nline 2\n"}).to_string();
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(body.as_bytes()).unwrap();
            let compressed = encoder.finish().unwrap();

            Response::builder()
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_ENCODING, "gzip")
                .body(axum::body::Body::from(compressed))
                .unwrap()
        }),
    )
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_contexts() {
    let url = serve(backend()).await;
    let client = ApiClient::new(&url, None).unwrap();
    assert_eq!(client.contexts().await.unwrap(), vec!["dev", "prod"]);
}

#[tokio::test]
async fn test_pods_for_context_with_slash() {
    let url = serve(backend()).await;
    let client = ApiClient::new(&url, None).unwrap();
    let context = "arn:aws:eks:eu-west-1:123:cluster/prod";

    let pods = client.pods(context).await.unwrap();
    assert_eq!(pods.len(), 1);
    assert_eq!(pods[0].name, "web-0");
    assert_eq!(pods[0].restarts, 2);
    assert_eq!(pods[0].context, context);
}

#[tokio::test]
async fn test_logs_and_backend_error() {
    let url = serve(backend()).await;
    let client = ApiClient::new(&url, None).unwrap();

    let logs = client.logs(&PodRef::new("dev", "shop", "web-0")).await.unwrap();
    assert_eq!(logs, "hello from shop/web-0\n");

    let err = client
        .logs(&PodRef::new("dev", "shop", "denied"))
        .await
        .unwrap_err();
    assert_eq!(err.backend_message(), Some("Permission denied to access pod logs"));
}

#[tokio::test]
async fn test_gzip_logs_are_decoded() {
    let url = serve(gzip_backend()).await;
    let client = ApiClient::new(&url, None).unwrap();

    let logs = client.logs(&PodRef::new("dev", "shop", "web-0")).await.unwrap();
    assert_eq!(logs, "line 1\nline 2\n");
}

#[tokio::test]
async fn test_describe() {
    let url = serve(backend()).await;
    let client = ApiClient::new(&url, None).unwrap();

    let details = client
        .describe(&PodRef::new("dev", "shop", "web-0"))
        .await
        .unwrap();
    assert_eq!(details.manifest.name.as_deref(), Some("web-0"));
    assert_eq!(details.manifest.containers.len(), 1);

    let err = client
        .describe(&PodRef::new("dev", "shop", "gone"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Backend(ref msg) if msg.contains("not found")));

    let err = client
        .describe(&PodRef::new("dev", "shop", "empty"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Incomplete("pod_details")));
}

#[tokio::test]
async fn test_unauthorized_and_basic_auth() {
    let url = serve(guarded_backend()).await;

    let anonymous = ApiClient::new(&url, None).unwrap();
    assert!(anonymous.contexts().await.unwrap_err().is_unauthorized());

    let wrong = ApiClient::new(&url, Some(Credentials::new("admin", "nope"))).unwrap();
    assert!(wrong.contexts().await.unwrap_err().is_unauthorized());

    let client = ApiClient::new(&url, Some(Credentials::new("admin", "secret"))).unwrap();
    assert_eq!(client.contexts().await.unwrap(), vec!["secure"]);
}

#[tokio::test]
async fn test_unexpected_status_and_body() {
    let url = serve(backend()).await;
    let client = ApiClient::new(&url, None).unwrap();

    // No such route
    let err = client
        .logs(&PodRef::new("dev", "shop", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(404)));

    let broken_url = serve(broken_backend()).await;
    let broken = ApiClient::new(&broken_url, None).unwrap();
    assert!(matches!(broken.contexts().await.unwrap_err(), ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
    assert!(matches!(client.contexts().await.unwrap_err(), ApiError::Transport(_)));
}
