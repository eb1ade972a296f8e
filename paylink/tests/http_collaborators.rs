//! HTTP collaborators against a local mock server

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use paylink::directory::{ApyHubDirectory, CurrencyDirectory, DirectoryError};
use paylink::generator::{GenerationError, HttpLinkGenerator, LinkGenerator};
use paylink::{Currency, FormValues};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn submitted_values() -> FormValues {
    FormValues {
        currency: "NGN".to_string(),
        amount: "100".to_string(),
        description: "invoice".to_string(),
        expiry_date: "2025-03-15".to_string(),
    }
}

#[tokio::test]
async fn directory_sends_token_and_reads_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/dictionary/currency"))
        .and(header("apy-token", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "key": "NGN", "symbol": "₦", "emoji": "🇳🇬", "value": "Nigerian Naira" },
                { "key": "USD", "symbol": "$", "emoji": "🇺🇸", "value": "US Dollar" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = ApyHubDirectory::with_url(
        "test-key",
        format!("{}/data/dictionary/currency", server.uri()),
    );
    let currencies = directory.fetch_all().await.unwrap();

    assert_eq!(
        currencies,
        vec![
            Currency::new("NGN", "₦", "🇳🇬", "Nigerian Naira"),
            Currency::new("USD", "$", "🇺🇸", "US Dollar"),
        ]
    );
}

#[tokio::test]
async fn directory_accepts_any_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(203).set_body_json(json!({
            "data": [
                { "key": "NGN", "symbol": "₦", "emoji": "🇳🇬", "value": "Nigerian Naira" }
            ]
        })))
        .mount(&server)
        .await;

    let directory = ApyHubDirectory::with_url("key", server.uri());
    let currencies = directory.fetch_all().await.unwrap();

    assert_eq!(currencies, vec![Currency::new("NGN", "₦", "🇳🇬", "Nigerian Naira")]);
}

#[tokio::test]
async fn directory_reports_service_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let directory = ApyHubDirectory::with_url("wrong", server.uri());
    let error = directory.fetch_all().await.unwrap_err();

    assert_eq!(
        error,
        DirectoryError::Service {
            status: 401,
            message: "invalid token".to_string()
        }
    );
}

#[tokio::test]
async fn directory_reports_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "currencies": [] })))
        .mount(&server)
        .await;

    let directory = ApyHubDirectory::with_url("key", server.uri());
    let error = directory.fetch_all().await.unwrap_err();

    assert!(matches!(error, DirectoryError::Parse(_)));
}

#[tokio::test]
async fn directory_reports_unreachable_host() {
    let directory = ApyHubDirectory::with_url("key", "http://127.0.0.1:1/currency");
    let error = directory.fetch_all().await.unwrap_err();

    assert!(matches!(error, DirectoryError::Network(_)));
}

#[tokio::test]
async fn generator_posts_camel_case_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/links"))
        .and(body_json(json!({
            "currency": "NGN",
            "amount": "100",
            "description": "invoice",
            "expiryDate": "2025-03-15"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "link": "https://pay.example.com/pay/xyz" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let generator = HttpLinkGenerator::new(format!("{}/links", server.uri()));
    let link = generator.generate(submitted_values()).await.unwrap();

    assert_eq!(link, "https://pay.example.com/pay/xyz");
}

#[tokio::test]
async fn generator_reports_service_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let generator = HttpLinkGenerator::new(server.uri());
    let error = generator.generate(submitted_values()).await.unwrap_err();

    assert_eq!(
        error,
        GenerationError::Service {
            status: 503,
            message: "maintenance".to_string()
        }
    );
}

#[tokio::test]
async fn generator_rejects_empty_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "link": "  " })))
        .mount(&server)
        .await;

    let generator = HttpLinkGenerator::new(server.uri());
    let error = generator.generate(submitted_values()).await.unwrap_err();

    assert_eq!(error, GenerationError::EmptyLink);
}

#[tokio::test]
async fn generator_reports_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let generator = HttpLinkGenerator::new(server.uri());
    let error = generator.generate(submitted_values()).await.unwrap_err();

    assert!(matches!(error, GenerationError::ResponseParseFailed(_)));
}
