//! Supabase client for quote storage and the signed-in user.
//!
//! Quotes live in the `quotes` table and are reached through the PostgREST
//! API; row-level security scopes them to their owner, and every read also
//! filters on `user_id` explicitly. The signed-in user comes from the Auth
//! API using the user's access token.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use cotizapro_core::{LineItem, NewQuote, OwnerId, Quote, QuoteId};

use crate::config::SupabaseConfig;
use crate::identity::{Identity, IdentityError, IdentityProvider};
use crate::store::{QuoteStore, StoreError};

/// Table holding committed quotes.
const QUOTES_TABLE: &str = "quotes";

/// Ask PostgREST for a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Postgres "invalid text representation", e.g. a malformed uuid filter.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Supabase REST + Auth client.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    has_user_token: bool,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    ///
    /// Requests carry the anon key as `apikey`, and the user's access token
    /// (or the anon key when there is none) as the bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if a key is not a valid header value or the HTTP client
    /// fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", secret_header(config.anon_key.expose_secret())?);

        let bearer = config
            .access_token
            .as_ref()
            .unwrap_or(&config.anon_key)
            .expose_secret();
        headers.insert(AUTHORIZATION, secret_header(&format!("Bearer {bearer}"))?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.as_str().trim_end_matches('/').to_owned(),
            has_user_token: config.access_token.is_some(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        Url::parse(&format!("{}/{path}", self.base_url))
            .map_err(|e| StoreError::Parse(format!("invalid endpoint {path}: {e}")))
    }
}

fn secret_header(value: &str) -> Result<HeaderValue, StoreError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Read the body of a failed response into an API error.
async fn api_error(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    (status, message)
}

impl QuoteStore for SupabaseClient {
    #[instrument(skip(self, quote), fields(owner_id = %quote.owner_id, items = quote.line_items.len()))]
    async fn create(&self, quote: &NewQuote) -> Result<QuoteId, StoreError> {
        let url = self.endpoint(&format!("rest/v1/{QUOTES_TABLE}"))?;

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&QuoteInsert::from(quote))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = api_error(response).await;
            return Err(StoreError::Api { status, message });
        }

        let row: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        let id = row
            .get("id")
            .and_then(id_text)
            .ok_or_else(|| StoreError::Parse("created row has no id".to_owned()))?;

        debug!(quote_id = %id, "Quote created");
        Ok(QuoteId::new(id))
    }

    #[instrument(skip(self), fields(quote_id = %id, owner_id = %owner_id))]
    async fn get_by_id(
        &self,
        id: &QuoteId,
        owner_id: &OwnerId,
    ) -> Result<Option<Quote>, StoreError> {
        let mut url = self.endpoint(&format!("rest/v1/{QUOTES_TABLE}"))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("user_id", &format!("eq.{owner_id}"));

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let (status, message) = api_error(response).await;
            // An id that cannot even be parsed by Postgres matches no row.
            if status == StatusCode::BAD_REQUEST.as_u16()
                && message.contains(INVALID_TEXT_REPRESENTATION)
            {
                return Ok(None);
            }
            return Err(StoreError::Api { status, message });
        }

        let rows: Vec<QuoteRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(Quote::try_from)
            .transpose()
    }
}

impl IdentityProvider for SupabaseClient {
    #[instrument(skip(self))]
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        if !self.has_user_token {
            debug!("No access token configured");
            return Ok(None);
        }

        let url = Url::parse(&format!("{}/auth/v1/user", self.base_url))
            .map_err(|e| IdentityError::Parse(e.to_string()))?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(status = status.as_u16(), "Access token rejected");
            return Ok(None);
        }

        if !status.is_success() {
            let (status, message) = api_error(response).await;
            return Err(IdentityError::Api { status, message });
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;

        Ok(Some(Identity::from_profile(
            OwnerId::new(user.id),
            user.user_metadata.name.as_deref(),
            user.email.as_deref(),
        )))
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Row inserted into `quotes`. Amounts go out as JSON numbers, like every
/// other client of the table writes them.
#[derive(Debug, Serialize)]
struct QuoteInsert<'a> {
    user_id: &'a OwnerId,
    customer_name: &'a str,
    customer_phone: &'a str,
    line_items: &'a [LineItem],
    #[serde(with = "rust_decimal::serde::float")]
    subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    iva: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a NewQuote> for QuoteInsert<'a> {
    fn from(quote: &'a NewQuote) -> Self {
        Self {
            user_id: &quote.owner_id,
            customer_name: &quote.customer_name,
            customer_phone: &quote.customer_phone,
            line_items: &quote.line_items,
            subtotal: quote.subtotal,
            iva: quote.tax,
            total: quote.total,
            created_at: quote.created_at,
        }
    }
}

/// Row read from `quotes`.
#[derive(Debug, Deserialize)]
struct QuoteRow {
    id: Value,
    user_id: String,
    customer_name: String,
    customer_phone: Option<String>,
    line_items: Vec<LineItem>,
    subtotal: Decimal,
    iva: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuoteRow> for Quote {
    type Error = StoreError;

    fn try_from(row: QuoteRow) -> Result<Self, Self::Error> {
        let id = id_text(&row.id)
            .ok_or_else(|| StoreError::Parse(format!("unexpected quote id: {}", row.id)))?;

        Ok(Self {
            id: QuoteId::new(id),
            owner_id: OwnerId::new(row.user_id),
            customer_name: row.customer_name,
            customer_phone: row.customer_phone.unwrap_or_default(),
            line_items: row.line_items,
            subtotal: row.subtotal,
            tax: row.iva,
            total: row.total,
            created_at: row.created_at,
        })
    }
}

/// Ids are uuids or bigints depending on the table definition.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// User object returned by `/auth/v1/user`.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    name: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use cotizapro_core::{LineItemField, QuoteDraft};

    #[test]
    fn test_insert_row_uses_table_column_names() {
        let mut draft = QuoteDraft::new();
        draft.customer_name = "Ana".to_owned();
        let first = draft.line_items.id_at(1).cloned().unwrap();
        draft.line_items.update(&first, LineItemField::Quantity, "2");
        draft
            .line_items
            .update(&first, LineItemField::PricePerUnit, "99.50");
        let created_at = Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).unwrap();
        let quote = NewQuote::from_draft(OwnerId::new("u-1"), &draft, created_at);

        let json = serde_json::to_value(QuoteInsert::from(&quote)).unwrap();
        assert_eq!(json["user_id"], "u-1");
        assert_eq!(json["customer_name"], "Ana");
        assert!(json.get("tax").is_none());

        let row = &json["line_items"][0];
        assert_eq!(row["quantity"], serde_json::json!(2.0));
        assert_eq!(row["pricePerUnit"], serde_json::json!(99.5));
        assert_eq!(json["subtotal"], serde_json::json!(199.0));
        assert!(json["iva"].is_number());
        assert!(json["total"].is_number());
    }

    #[test]
    fn test_row_with_numeric_id_and_amounts() {
        let row: QuoteRow = serde_json::from_value(serde_json::json!({
            "id": 17,
            "user_id": "u-1",
            "customer_name": "Juan",
            "customer_phone": null,
            "line_items": [
                {"id": "1", "description": "Pintura", "quantity": 2, "pricePerUnit": 100}
            ],
            "subtotal": 200,
            "iva": 32,
            "total": 232,
            "created_at": "2026-10-17T18:00:00.000+00:00"
        }))
        .unwrap();

        let quote = Quote::try_from(row).unwrap();
        assert_eq!(quote.id.as_str(), "17");
        assert_eq!(quote.customer_phone, "");
        assert_eq!(quote.total, Decimal::from(232));
        assert_eq!(quote.line_items.len(), 1);
    }

    #[test]
    fn test_id_text_rejects_other_shapes() {
        assert_eq!(id_text(&Value::Null), None);
        assert_eq!(id_text(&Value::String(String::new())), None);
        assert_eq!(id_text(&serde_json::json!("abc")).as_deref(), Some("abc"));
    }
}
