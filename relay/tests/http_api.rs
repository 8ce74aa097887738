use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use gemini_relay::config::RelayConfig;
use gemini_relay::delivery::HttpCallbackSink;
use gemini_relay::http_server::{router, AppState};
use gemini_relay::provider::GeminiProviderFactory;
use gemini_relay::Relay;
use std::sync::Arc;
use tower::ServiceExt;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn app_for(gemini_url: &str, api_key: Option<&str>) -> Router {
    let mut config = RelayConfig::default();
    config.api_key_env = "GEMINI_RELAY_TEST_UNSET_KEY".to_string();
    config.gemini.api_key = api_key.map(str::to_string);
    config.gemini.base_url = Some(gemini_url.to_string());

    let relay = Relay::new(
        config.policy.clone(),
        Arc::new(GeminiProviderFactory::new(config.gemini.clone())),
        Arc::new(HttpCallbackSink::new()),
    );
    router(AppState::new(config, relay))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn gemini_answer(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
    .to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app_for("http://127.0.0.1:1", None);
    let (status, body) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Relay is running");
}

#[tokio::test]
async fn test_post_query_answers_directly() {
    let mut gemini = mockito::Server::new_async().await;
    let mock = gemini
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(mockito::Matcher::Regex("who is pocopie\\?".to_string()))
        .with_status(200)
        .with_body(gemini_answer("Pocopie is the streamer and owner."))
        .create_async()
        .await;

    let app = app_for(&gemini.url(), Some("test-key"));
    let (status, body) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/ask")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query":"who is pocopie?"}"#))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Pocopie is the streamer and owner.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_with_callback_posts_to_chat() {
    let mut gemini = mockito::Server::new_async().await;
    let _generate = gemini
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(gemini_answer("Hello from the stream!"))
        .create_async()
        .await;

    let mut nightbot = mockito::Server::new_async().await;
    let callback = nightbot
        .mock("POST", "/1/channel/send/token")
        .match_body(mockito::Matcher::JsonString(
            r#"{"message":"Hello from the stream!"}"#.to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;

    let app = app_for(&gemini.url(), Some("test-key"));
    let (status, body) = send(
        app,
        Request::builder()
            .uri("/.netlify/functions/ask?q=hello")
            .header("Nightbot-Response-Url", format!("{}/1/channel/send/token", nightbot.url()))
            .header("Nightbot-User", "name=night&provider=youtube")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Response sent to chat");
    callback.assert_async().await;
}

#[tokio::test]
async fn test_missing_key_never_reaches_gemini() {
    let mut gemini = mockito::Server::new_async().await;
    let mock = gemini
        .mock("POST", GENERATE_PATH)
        .expect(0)
        .create_async()
        .await;

    let app = app_for(&gemini.url(), None);
    let (status, body) = send(
        app,
        Request::builder()
            .uri("/api/ask?query=hello")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Server configuration error: the Gemini API key is not set.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_error_is_500() {
    let mut gemini = mockito::Server::new_async().await;
    let _mock = gemini
        .mock("POST", GENERATE_PATH)
        .with_status(400)
        .with_body(r#"{"error":{"code":400,"message":"API key not valid"}}"#)
        .create_async()
        .await;

    let app = app_for(&gemini.url(), Some("bad-key"));
    let (status, body) = send(
        app,
        Request::builder()
            .uri("/api/ask?q=hello")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Sorry, there was an error processing your request."));
    assert!(body.chars().count() <= 350);
}

#[tokio::test]
async fn test_pretty_printed_gemini_error_keeps_its_message() {
    let mut gemini = mockito::Server::new_async().await;
    let _mock = gemini
        .mock("POST", GENERATE_PATH)
        .with_status(400)
        .with_header("content-type", "application/json; charset=UTF-8")
        .with_body(
            "{\n  \"error\": {\n    \"code\": 400,\n    \"message\": \"API key not valid. Please pass a valid API key.\",\n    \"status\": \"INVALID_ARGUMENT\"\n  }\n}\n",
        )
        .create_async()
        .await;

    let app = app_for(&gemini.url(), Some("bad-key"));
    let (status, body) = send(
        app,
        Request::builder()
            .uri("/api/ask?q=hello")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        "Sorry, there was an error processing your request. (HTTP Error: 400 - API key not valid. Please pass a valid API key.)"
    );
}

#[tokio::test]
async fn test_invalid_json_body_without_params_prompts() {
    let app = app_for("http://127.0.0.1:1", Some("test-key"));
    let (status, body) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/ask")
            .body(Body::from("{definitely not json"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Please provide a question to ask Gemini!");
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let app = app_for("http://127.0.0.1:1", Some("test-key"));
    let (status, _) = send(
        app,
        Request::builder()
            .method("DELETE")
            .uri("/api/ask")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
