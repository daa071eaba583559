use apicheck::json::{PathExpression, evaluate};
use apicheck::{Client, RequestBuilder, TransportError};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_send_collects_status_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(header("X-Trace", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "page": 2,
                    "data": [{"email": "michael.lawson@reqres.in"}]
                }))
                .insert_header("X-Request-ID", "req-123"),
        )
        .mount(&mock_server)
        .await;

    let request = RequestBuilder::new()
        .get()
        .base_uri(mock_server.uri())
        .path("/api/users")
        .query("page", "2")
        .header("x-trace", "abc")
        .build()
        .unwrap();

    let response = Client::new()
        .send(&request, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(response.status().code(), 200);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");

    let email = evaluate(
        response.json().unwrap(),
        &PathExpression::parse("data[0].email").unwrap(),
    )
    .unwrap();
    assert_eq!(email, "michael.lawson@reqres.in");
}

#[tokio::test]
async fn test_elapsed_covers_server_delay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    let request = RequestBuilder::new()
        .get()
        .base_uri(mock_server.uri())
        .path("/slow")
        .build()
        .unwrap();

    let response = Client::new()
        .send(&request, Duration::from_secs(5))
        .await
        .unwrap();

    assert!(response.elapsed_ms() >= 200, "elapsed {}ms", response.elapsed_ms());
}

#[tokio::test]
async fn test_timeout_is_distinguishable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let request = RequestBuilder::new()
        .get()
        .base_uri(mock_server.uri())
        .path("/api/users")
        .build()
        .unwrap();

    let err = Client::new()
        .send(&request, Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(err, TransportError::Timeout { timeout_ms: 50, .. }));
    assert!(err.to_string().contains("timed out after 50ms"));
}

#[tokio::test]
async fn test_reqwest_timeout_keeps_cause() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let request = RequestBuilder::new()
        .get()
        .base_uri(mock_server.uri())
        .path("/api/users")
        .build()
        .unwrap();

    // reqwest 的读超时先于 send 的超时触发
    let inner = reqwest::Client::builder()
        .read_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let err = Client::with_client(inner)
        .send(&request, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "{:?}", err);
    let cause = std::error::Error::source(&err).expect("timeout should keep the reqwest cause");
    assert!(cause.downcast_ref::<reqwest::Error>().is_some_and(|e| e.is_timeout()));
}

#[tokio::test]
async fn test_timeout_does_not_affect_later_sends() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\": true}"))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let build = |p: &str| {
        RequestBuilder::new()
            .get()
            .base_uri(mock_server.uri())
            .path(p)
            .build()
            .unwrap()
    };

    let slow = build("/slow");
    let fast = build("/fast");

    let (slow_result, fast_result) = tokio::join!(
        client.send(&slow, Duration::from_millis(50)),
        client.send(&fast, Duration::from_secs(5)),
    );
    assert!(slow_result.unwrap_err().is_timeout());
    assert_eq!(fast_result.unwrap().status().code(), 200);

    // 超时后同一个客户端仍然可用
    let again = client.send(&fast, Duration::from_secs(5)).await.unwrap();
    assert_eq!(again.status().code(), 200);
}

#[tokio::test]
async fn test_connection_refused_is_not_timeout() {
    // 绑定后立即释放端口，保证没有服务在监听
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let request = RequestBuilder::new()
        .get()
        .base_uri(format!("http://127.0.0.1:{}", port))
        .path("/")
        .build()
        .unwrap();

    let err = Client::new()
        .send(&request, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(!err.is_timeout());
    assert!(matches!(err, TransportError::Connect { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_no_retry_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RequestBuilder::new()
        .post()
        .base_uri(mock_server.uri())
        .path("/api/users")
        .body(r#"{"name":"morpheus","job":"leader"}"#)
        .build()
        .unwrap();

    let response = Client::new()
        .send(&request, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(response.status().code(), 503);
    // MockServer 在 drop 时校验 expect(1)
}
