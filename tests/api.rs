//! End-to-end tests over the real router: flag reads, the SSE stream, and
//! the poller-to-subscriber pipeline with a mock parameter store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use flagcast::api::{create_router, AppState};
use flagcast::config::Config;
use flagcast::flags::{Broadcaster, FlagCache, FlagSet, Poller};
use flagcast::store::MockParameterStore;

fn test_state() -> AppState {
    AppState {
        cache: FlagCache::new(FlagSet::default()),
        broadcaster: Arc::new(Broadcaster::new()),
    }
}

async fn open_stream(state: AppState) -> axum::response::Response {
    let app = create_router(state);
    app.oneshot(
        Request::builder()
            .uri("/api/flags/stream")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn stream_delivers_current_state_as_first_event() {
    let state = test_state();
    state.cache.set(FlagSet::new(false)).await;

    let response = open_stream(state).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body().into_data_stream();
    let frame = body.next().await.unwrap().unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();

    assert!(text.starts_with("data:"), "unexpected frame: {text}");
    assert!(text.contains("\"fear\":false"), "unexpected frame: {text}");
    assert!(text.ends_with("\n\n"), "unexpected frame: {text}");
}

#[tokio::test]
async fn stream_receives_each_broadcast() {
    let state = test_state();
    let response = open_stream(state.clone()).await;
    let mut body = response.into_body().into_data_stream();

    // connect-time snapshot first
    let first = body.next().await.unwrap().unwrap();
    assert!(String::from_utf8(first.to_vec()).unwrap().contains("\"fear\":true"));

    state.broadcaster.publish(&FlagSet::new(false));

    let second = body.next().await.unwrap().unwrap();
    let text = String::from_utf8(second.to_vec()).unwrap();
    assert!(text.contains("\"fear\":false"), "unexpected frame: {text}");
}

#[tokio::test]
async fn closing_the_stream_unsubscribes_the_sink() {
    let state = test_state();
    let response = open_stream(state.clone()).await;
    let mut body = response.into_body().into_data_stream();
    body.next().await.unwrap().unwrap();

    assert_eq!(state.broadcaster.subscriber_count(), 1);

    drop(body);

    assert_eq!(state.broadcaster.subscriber_count(), 0);

    // publishing after the disconnect must not panic or block
    state.broadcaster.publish(&FlagSet::new(false));
}

#[tokio::test]
async fn poll_change_flows_to_flags_endpoint_and_stream() {
    let state = test_state();

    let store = MockParameterStore::new("true");
    let poller = Poller::new(
        store.clone(),
        state.cache.clone(),
        state.broadcaster.clone(),
        &Config::default(),
    );

    // initial populate: same boolean, no broadcast
    poller.poll_once().await;

    let response = open_stream(state.clone()).await;
    let mut body = response.into_body().into_data_stream();
    body.next().await.unwrap().unwrap();

    // upstream flips the flag
    store.set_value("false");
    poller.poll_once().await;

    let event = tokio::time::timeout(Duration::from_secs(1), body.next())
        .await
        .expect("no event after flag change")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(event.to_vec()).unwrap();
    assert!(text.contains("\"fear\":false"), "unexpected frame: {text}");

    // the synchronous read agrees with the pushed state
    let app = create_router(state);
    let response = app
        .oneshot(Request::builder().uri("/api/flags").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["fear"], false);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn failed_poll_keeps_serving_last_known_good() {
    let state = test_state();
    state.cache.set(FlagSet::new(false)).await;

    let store = MockParameterStore::new("true");
    store.set_failing(true);
    let poller = Poller::new(
        store,
        state.cache.clone(),
        state.broadcaster.clone(),
        &Config::default(),
    );

    poller.poll_once().await;

    let app = create_router(state);
    let response = app
        .oneshot(Request::builder().uri("/api/flags").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["fear"], false);
}

#[tokio::test]
async fn stream_response_carries_required_headers() {
    let response = open_stream(test_state()).await;
    let headers = response.headers();

    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "Content-Type"
    );
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-cache");
    assert_eq!(headers.get(header::CONNECTION).unwrap(), "keep-alive");
}
