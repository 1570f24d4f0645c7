//! Loopback HTTP ingestion endpoint.
//!
//! Accepts `POST` with `application/json` on any path, stages the raw
//! body on the clipboard, and schedules a delayed dispatch against the
//! configured target window. The acknowledgement goes out immediately;
//! the dispatch runs on its own detached task and can only log, never
//! fail the request that scheduled it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::desktop::Desktop;
use crate::dispatch::{dispatch, DispatchRequest};
use crate::errors::RelayError;
use crate::guard::SendGuard;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shared state injected into the endpoint: configuration, the
/// single-flight guard, and the capability surface. Constructed at
/// startup, cloned per handler.
#[derive(Clone)]
pub struct RelayContext {
    pub config: Arc<RelayConfig>,
    pub guard: Arc<SendGuard>,
    pub desktop: Arc<dyn Desktop>,
}

impl RelayContext {
    pub fn new(config: Arc<RelayConfig>, desktop: Arc<dyn Desktop>) -> Self {
        Self {
            config,
            guard: Arc::new(SendGuard::new()),
            desktop,
        }
    }
}

/// A payload as it came off the wire. Lives only until it has been
/// handed to the clipboard and echoed back.
struct IngestedMessage {
    raw_body: String,
    received_at: DateTime<Local>,
}

/// Acknowledgement body. Field names and the time format follow the
/// wire contract of the original service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpAck {
    pub status: String,
    pub message: String,
    pub data: String,
    pub time: String,
}

/// Build the ingestion router. The fallback route makes every path land
/// in the same handler; method and content-type checks happen there.
pub fn router(ctx: RelayContext) -> Router {
    Router::new().fallback(ingest).with_state(ctx)
}

async fn ingest(
    State(ctx): State<RelayContext>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    let message = IngestedMessage {
        raw_body: body,
        received_at: Local::now(),
    };
    log::info!(
        "post received|len:{}|path:{}",
        message.raw_body.len(),
        uri.path()
    );

    // Stage the payload before acknowledging; the clipboard worker
    // blocks its thread, so it runs off the async runtime.
    let desktop = ctx.desktop.clone();
    let payload = message.raw_body.clone();
    let staged =
        tokio::task::spawn_blocking(move || desktop.set_clipboard_text(&payload, "post")).await;
    if staged.is_err() {
        log::error!("clipboard task panicked");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    schedule_dispatch(&ctx);

    let ack = HttpAck {
        status: "success".to_owned(),
        message: "OK".to_owned(),
        data: message.raw_body,
        time: message.received_at.format(TIME_FORMAT).to_string(),
    };
    (StatusCode::OK, Json(ack)).into_response()
}

/// Detach a task that waits out the dispatch delay and then runs the
/// pipeline against the configured target, without the clipboard check
/// (the triggering request just set the clipboard).
fn schedule_dispatch(ctx: &RelayContext) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ctx.config.timings.dispatch_delay).await;

        let ran = tokio::task::spawn_blocking(move || {
            let request = DispatchRequest {
                process_name: &ctx.config.process_name,
                window_title: &ctx.config.window_title,
                verify_clipboard: false,
            };
            if ctx.config.guard_http_dispatch {
                if !ctx.guard.run(|| dispatch(ctx.desktop.as_ref(), request)) {
                    log::warn!("another send is in progress, delayed dispatch skipped");
                }
            } else {
                dispatch(ctx.desktop.as_ref(), request);
            }
        })
        .await;

        if let Err(err) = ran {
            log::error!("delayed dispatch task failed: {err}");
        }
    });
}

/// Bind the loopback listener and serve until `shutdown` resolves.
///
/// Graceful shutdown only stops accepting; in-flight delayed dispatches
/// keep running on their detached tasks.
pub async fn serve<S>(ctx: RelayContext, shutdown: S) -> Result<(), RelayError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let port = ctx.config.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Server(format!("bind {addr} failed: {e}")))?;

    log::info!("http listener started|port:{port}");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RelayError::Server(format!("serve failed: {e}")))?;

    log::info!("http listener stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Timings;
    use crate::desktop::testing::{Event, MockDesktop};

    fn test_context(guard_http_dispatch: bool) -> (RelayContext, Arc<MockDesktop>) {
        let mock = Arc::new(MockDesktop::default());
        let desktop: Arc<dyn Desktop> = mock.clone();
        let config = RelayConfig {
            process_name: "weixin".to_owned(),
            window_title: "alice".to_owned(),
            port: 0,
            guard_http_dispatch,
            timings: Timings {
                activate_settle: Duration::from_millis(0),
                dispatch_delay: Duration::from_millis(5),
            },
        };
        (RelayContext::new(Arc::new(config), desktop), mock)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn post_is_acked_and_body_echoed_exactly() {
        let (ctx, mock) = test_context(false);
        let app = router(ctx);

        let body = r#"{"hello":"world"}"#;
        let response = app.oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let ack = json_body(response).await;
        assert_eq!(ack["Status"], "success");
        assert_eq!(ack["Message"], "OK");
        assert_eq!(ack["Data"], body);
        assert_eq!(ack["Time"].as_str().unwrap().len(), 19);

        // The payload was staged before the ack went out.
        assert_eq!(
            mock.events(),
            vec![Event::SetClipboard(body.to_owned(), "post".to_owned())]
        );
    }

    #[tokio::test]
    async fn delayed_dispatch_runs_full_sequence() {
        let (ctx, mock) = test_context(false);
        let app = router(ctx);

        let response = app.oneshot(post_json("ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let events = mock.events();
        assert_eq!(
            events,
            vec![
                Event::SetClipboard("ping".into(), "post".into()),
                Event::Locate("weixin".into(), "alice".into()),
                Event::Activate(1),
                Event::Paste,
                Event::Click(500 - 62, 400 - 31),
            ]
        );
    }

    #[tokio::test]
    async fn get_is_rejected_without_touching_the_clipboard() {
        let (ctx, mock) = test_context(false);
        let app = router(ctx);

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(mock.events().is_empty());
        assert!(mock.clipboard.lock().is_none());
    }

    #[tokio::test]
    async fn wrong_content_type_is_rejected_without_touching_the_clipboard() {
        let (ctx, mock) = test_context(false);
        let app = router(ctx);

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "text/plain")
            .body(Body::from("hello"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("hello"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        assert!(mock.events().is_empty());
    }

    #[tokio::test]
    async fn any_path_is_accepted() {
        let (ctx, _mock) = test_context(false);
        let app = router(ctx);

        let request = Request::builder()
            .method("POST")
            .uri("/some/nested/path?x=1")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn repeated_posts_dispatch_independently() {
        let (ctx, mock) = test_context(false);
        let app = router(ctx);

        for _ in 0..2 {
            let response = app.clone().oneshot(post_json("again")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        tokio::time::sleep(Duration::from_millis(100)).await;

        let events = mock.events();
        assert_eq!(
            events.iter().filter(|e| **e == Event::Paste).count(),
            2,
            "no deduplication: each POST runs its own dispatch"
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Event::Click(..)))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn guarded_http_dispatch_is_skipped_while_guard_is_busy() {
        let (ctx, mock) = test_context(true);
        assert!(ctx.guard.try_acquire());
        let app = router(ctx.clone());

        let response = app.oneshot(post_json("blocked")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Clipboard was staged, but the delivery never ran.
        let events = mock.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::SetClipboard(..)));
        ctx.guard.release();
    }

    #[tokio::test]
    async fn unguarded_http_dispatch_ignores_the_manual_guard() {
        let (ctx, mock) = test_context(false);
        assert!(ctx.guard.try_acquire());
        let app = router(ctx.clone());

        let response = app.oneshot(post_json("racing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(mock.events().contains(&Event::Paste));
        ctx.guard.release();
    }
}
