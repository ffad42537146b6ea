//! Supabase client against a mock HTTP server.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cotizapro_core::{LineItemField, NewQuote, OwnerId, QuoteDraft, QuoteId};
use cotizapro_engine::config::SupabaseConfig;
use cotizapro_engine::{IdentityProvider, QuoteStore, StoreError, SupabaseClient};

const ANON_KEY: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.aB3xY9mK2nL5pQ7rT0uW4zC6";
const USER_TOKEN: &str = "user-access-token";

fn client(server: &MockServer, access_token: Option<&str>) -> SupabaseClient {
    let config = SupabaseConfig {
        url: Url::parse(&server.uri()).unwrap(),
        anon_key: SecretString::from(ANON_KEY.to_owned()),
        access_token: access_token.map(|t| SecretString::from(t.to_owned())),
    };
    SupabaseClient::new(&config).unwrap()
}

fn new_quote() -> NewQuote {
    let mut draft = QuoteDraft::new();
    draft.customer_name = "Juan Pérez".to_owned();
    draft.customer_phone = "55 1234 5678".to_owned();
    let first = draft.line_items.id_at(1).cloned().unwrap();
    draft
        .line_items
        .update(&first, LineItemField::Description, "Pintura");
    draft.line_items.update(&first, LineItemField::Quantity, "2");
    draft
        .line_items
        .update(&first, LineItemField::PricePerUnit, "100");

    let created_at = Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).unwrap();
    NewQuote::from_draft(OwnerId::new("user-1"), &draft, created_at)
}

fn stored_row() -> serde_json::Value {
    json!({
        "id": "8c5e0c1a-4b7a-4f5e-9d43-0e2b7c9f1a11",
        "user_id": "user-1",
        "customer_name": "Juan Pérez",
        "customer_phone": "55 1234 5678",
        "line_items": [
            {"id": "a", "description": "Pintura", "quantity": 2, "pricePerUnit": 100}
        ],
        "subtotal": 200,
        "iva": 32,
        "total": 232,
        "created_at": "2026-10-17T18:00:00+00:00"
    })
}

#[tokio::test]
async fn test_create_posts_row_and_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/quotes"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {USER_TOKEN}").as_str()))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({
            "user_id": "user-1",
            "customer_name": "Juan Pérez",
            "customer_phone": "55 1234 5678",
            "line_items": [{"description": "Pintura", "quantity": 2.0, "pricePerUnit": 100.0}],
            "subtotal": 200.0,
            "iva": 32.0,
            "total": 232.0,
            "created_at": "2026-10-17T18:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(stored_row()))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server, Some(USER_TOKEN))
        .create(&new_quote())
        .await
        .unwrap();

    assert_eq!(id.as_str(), "8c5e0c1a-4b7a-4f5e-9d43-0e2b7c9f1a11");
}

#[tokio::test]
async fn test_create_surfaces_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/quotes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server, Some(USER_TOKEN))
        .create(&new_quote())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Api { status: 500, ref message } if message == "boom"));
}

#[tokio::test]
async fn test_get_by_id_filters_by_owner() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/quotes"))
        .and(query_param("id", "eq.8c5e0c1a-4b7a-4f5e-9d43-0e2b7c9f1a11"))
        .and(query_param("user_id", "eq.user-1"))
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_row()])))
        .mount(&server)
        .await;

    let quote = client(&server, Some(USER_TOKEN))
        .get_by_id(
            &QuoteId::new("8c5e0c1a-4b7a-4f5e-9d43-0e2b7c9f1a11"),
            &OwnerId::new("user-1"),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(quote.customer_name, "Juan Pérez");
    assert_eq!(quote.tax, Decimal::from(32));
    assert_eq!(quote.total, Decimal::from(232));
    assert_eq!(quote.line_items.len(), 1);
    assert_eq!(
        quote.created_at,
        Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_get_by_id_empty_result_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let quote = client(&server, Some(USER_TOKEN))
        .get_by_id(&QuoteId::new("missing"), &OwnerId::new("user-2"))
        .await
        .unwrap();

    assert!(quote.is_none());
}

#[tokio::test]
async fn test_get_by_id_malformed_uuid_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/quotes"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "22P02",
            "message": "invalid input syntax for type uuid: \"abc\""
        })))
        .mount(&server)
        .await;

    let quote = client(&server, Some(USER_TOKEN))
        .get_by_id(&QuoteId::new("abc"), &OwnerId::new("user-1"))
        .await
        .unwrap();

    assert!(quote.is_none());
}

#[tokio::test]
async fn test_current_identity_reads_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {USER_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "email": "taller@correo.mx",
            "user_metadata": {}
        })))
        .mount(&server)
        .await;

    let identity = client(&server, Some(USER_TOKEN))
        .current_identity()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(identity.owner_id.as_str(), "user-1");
    assert_eq!(identity.display_name, "taller");
}

#[tokio::test]
async fn test_rejected_token_means_signed_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let identity = client(&server, Some(USER_TOKEN))
        .current_identity()
        .await
        .unwrap();

    assert!(identity.is_none());
}

#[tokio::test]
async fn test_without_token_identity_is_not_requested() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let identity = client(&server, None).current_identity().await.unwrap();
    assert!(identity.is_none());
}
