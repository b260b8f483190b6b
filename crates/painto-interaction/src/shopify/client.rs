//! Storefront GraphQL client.

use std::time::Duration;

use async_trait::async_trait;
use painto_core::cart::{Cart, CartLineInput, CartLineUpdate, CommerceApi, ProductSummary};
use painto_core::config::ShopifyConfig;
use painto_core::error::{PaintoError, Result};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::dto::{
    CartCreateData, CartLinesAddData, CartLinesRemoveData, CartLinesUpdateData, GetCartData,
    GraphQlResponse, ProductsData,
};
use super::queries;

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// [`CommerceApi`] backed by the Shopify Storefront API.
#[derive(Clone)]
pub struct StorefrontClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl StorefrontClient {
    /// Builds a client for the configured store.
    pub fn new(config: &ShopifyConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(PaintoError::config(
                "Shopify store domain and public access token are required",
            ));
        }
        Ok(Self::with_endpoint(
            config.endpoint(),
            config.public_access_token.clone(),
        ))
    }

    /// Builds a client against an explicit GraphQL endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        tracing::debug!(operation, endpoint = %self.endpoint, "Storefront request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&GraphQlRequest { query, variables })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PaintoError::Transport {
                status: Some(status.as_u16()),
                message: format!("Storefront API error ({}): {}", status, error_text),
            });
        }

        let body: GraphQlResponse<T> = response.json().await?;
        body.into_data()
    }
}

fn line_inputs(lines: &[CartLineInput]) -> Value {
    Value::Array(
        lines
            .iter()
            .map(|line| json!({ "merchandiseId": line.variant_id, "quantity": line.quantity }))
            .collect(),
    )
}

fn missing_payload(operation: &str) -> PaintoError {
    PaintoError::Api(vec![format!("{operation} returned no payload")])
}

#[async_trait]
impl CommerceApi for StorefrontClient {
    async fn create_cart(&self, lines: Vec<CartLineInput>, buyer_country: &str) -> Result<Cart> {
        let variables = json!({
            "input": {
                "lines": line_inputs(&lines),
                "buyerIdentity": { "countryCode": buyer_country },
            }
        });
        let data: CartCreateData = self
            .execute("cartCreate", queries::CART_CREATE, variables)
            .await?;
        data.cart_create
            .ok_or_else(|| missing_payload("cartCreate"))?
            .into_cart("cartCreate")
    }

    async fn add_lines(&self, cart_id: &str, lines: Vec<CartLineInput>) -> Result<Cart> {
        let variables = json!({ "cartId": cart_id, "lines": line_inputs(&lines) });
        let data: CartLinesAddData = self
            .execute("cartLinesAdd", queries::CART_LINES_ADD, variables)
            .await?;
        data.cart_lines_add
            .ok_or_else(|| missing_payload("cartLinesAdd"))?
            .into_cart("cartLinesAdd")
    }

    async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>> {
        let data: GetCartData = self
            .execute("cart", queries::GET_CART, json!({ "cartId": cart_id }))
            .await?;
        Ok(data.cart.map(Cart::from))
    }

    async fn update_lines(&self, cart_id: &str, updates: Vec<CartLineUpdate>) -> Result<Cart> {
        let lines: Vec<Value> = updates
            .iter()
            .map(|update| json!({ "id": update.line_id, "quantity": update.quantity }))
            .collect();
        let data: CartLinesUpdateData = self
            .execute(
                "cartLinesUpdate",
                queries::CART_LINES_UPDATE,
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        data.cart_lines_update
            .ok_or_else(|| missing_payload("cartLinesUpdate"))?
            .into_cart("cartLinesUpdate")
    }

    async fn remove_lines(&self, cart_id: &str, line_ids: Vec<String>) -> Result<Cart> {
        let data: CartLinesRemoveData = self
            .execute(
                "cartLinesRemove",
                queries::CART_LINES_REMOVE,
                json!({ "cartId": cart_id, "lineIds": line_ids }),
            )
            .await?;
        data.cart_lines_remove
            .ok_or_else(|| missing_payload("cartLinesRemove"))?
            .into_cart("cartLinesRemove")
    }

    async fn products(&self, first: u32) -> Result<Vec<ProductSummary>> {
        let data: ProductsData = self
            .execute("products", queries::PRODUCTS, json!({ "first": first }))
            .await?;
        Ok(data.into_summaries())
    }
}
