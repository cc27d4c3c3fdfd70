//! Mock HTTP tests for FaucetClient.
//!
//! These tests cover:
//! - Claim form encoding
//! - Response status mapping
//! - Captcha download
//! - Cookie session between captcha and claim

use getcoins::faucet::{ClaimRequest, FaucetClient, FaucetError};
use url::Url;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn claim(captcha: Option<&str>) -> ClaimRequest {
    ClaimRequest {
        address: "tb1qexample".to_string(),
        password: String::new(),
        amount: "0.001".to_string(),
        captcha: captcha.map(str::to_string),
    }
}

fn claim_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/claim", server.uri())).unwrap()
}

// === Claim Submission ===

#[tokio::test]
async fn test_submit_claim_sends_form_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/claim"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("address=tb1qexample&password=&amount=0.001"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Payment of 0.001 BTC sent"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let body = client
        .submit_claim(&claim_url(&mock_server), &claim(None))
        .await
        .unwrap();
    assert_eq!(body, "Payment of 0.001 BTC sent");
}

#[tokio::test]
async fn test_submit_claim_includes_captcha_answer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/claim"))
        .and(body_string(
            "address=tb1qexample&password=&amount=0.001&captcha=x7k2p",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let result = client
        .submit_claim(&claim_url(&mock_server), &claim(Some("x7k2p")))
        .await;
    assert_eq!(result.unwrap(), "ok");
}

#[tokio::test]
async fn test_submit_claim_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such page"))
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let err = client
        .submit_claim(&claim_url(&mock_server), &claim(None))
        .await
        .unwrap_err();
    assert!(matches!(err, FaucetError::NotFound));
}

#[tokio::test]
async fn test_submit_claim_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let err = client
        .submit_claim(&claim_url(&mock_server), &claim(None))
        .await
        .unwrap_err();
    assert!(matches!(err, FaucetError::RateLimited));
    assert!(err.to_string().contains("rate-limited"));
}

#[tokio::test]
async fn test_submit_claim_other_error_echoes_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid address"))
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let err = client
        .submit_claim(&claim_url(&mock_server), &claim(None))
        .await
        .unwrap_err();
    match &err {
        FaucetError::Remote { status, body } => {
            assert_eq!(*status, 400);
            assert_eq!(body, "Invalid address");
        }
        other => panic!("Expected Remote error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Returned Error Code 400\nInvalid address\n"));
}

#[tokio::test]
async fn test_submit_claim_connection_refused() {
    // Nothing listens on port 1
    let uri = Url::parse("http://127.0.0.1:1/claim").unwrap();

    let client = FaucetClient::new().unwrap();
    let err = client.submit_claim(&uri, &claim(None)).await.unwrap_err();
    assert!(matches!(err, FaucetError::Http(_)));
    assert!(err
        .to_string()
        .starts_with("Unexpected error when contacting faucet"));
}

#[tokio::test]
async fn test_submit_claim_does_not_follow_redirects() {
    let faucet = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/claim"))
        .respond_with(
            ResponseTemplate::new(307)
                .insert_header("location", format!("{}/collect", elsewhere.uri()).as_str()),
        )
        .expect(1)
        .mount(&faucet)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("collected"))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let client = FaucetClient::with_resolved_host("faucet.test", *faucet.address()).unwrap();
    let url = Url::parse(&format!("http://faucet.test:{}/claim", faucet.address().port())).unwrap();
    let request = ClaimRequest {
        password: "secret".to_string(),
        ..claim(None)
    };
    let body = client.submit_claim(&url, &request).await.unwrap();
    assert_eq!(body, "");
    assert!(elsewhere.received_requests().await.unwrap().is_empty());
}

// === Captcha Download ===

#[tokio::test]
async fn test_fetch_challenge_returns_body() {
    let mock_server = MockServer::start().await;
    let svg = r#"<svg width="150" height="50"></svg>"#;

    Mock::given(method("GET"))
        .and(path("/captcha"))
        .respond_with(ResponseTemplate::new(200).set_body_string(svg))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let bytes = client
        .fetch_challenge(&format!("{}/captcha", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, svg.as_bytes());
}

#[tokio::test]
async fn test_fetch_challenge_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/captcha"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = FaucetClient::new().unwrap();
    let err = client
        .fetch_challenge(&format!("{}/captcha", mock_server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FaucetError::Remote { status: 503, .. }));
}

// === Session ===

#[tokio::test]
async fn test_captcha_cookie_is_sent_with_claim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/captcha"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/")
                .set_body_string("<svg/>"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/claim"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FaucetClient::with_resolved_host("faucet.test", *mock_server.address()).unwrap();
    let port = mock_server.address().port();
    client
        .fetch_challenge(&format!("http://faucet.test:{}/captcha", port))
        .await
        .unwrap();
    let url = Url::parse(&format!("http://faucet.test:{}/claim", port)).unwrap();
    assert_eq!(client.submit_claim(&url, &claim(None)).await.unwrap(), "ok");
}
