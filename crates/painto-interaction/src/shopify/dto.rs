//! Wire shapes of Storefront API responses and their mapping onto the
//! core cart models. Connection `edges { node }` wrappers are flattened here.

use painto_core::cart::{Cart, CartCost, CartLine, Money, ProductSummary};
use painto_core::error::{PaintoError, Result, UserError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Top-level `errors` win over any partial `data`.
    pub fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            return Err(PaintoError::Api(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data
            .ok_or_else(|| PaintoError::Api(vec!["Response contained no data".to_string()]))
    }
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDto {
    pub amount: String,
    pub currency_code: String,
}

impl From<MoneyDto> for Money {
    fn from(dto: MoneyDto) -> Self {
        Money::new(dto.amount, dto.currency_code)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRefDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub featured_image: Option<ImageDto>,
}

/// `merchandise { ... on ProductVariant }`. Every field is optional since
/// other merchandise types come back as an empty object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "priceV2")]
    pub price: Option<MoneyDto>,
    #[serde(default)]
    pub product: Option<ProductRefDto>,
}

#[derive(Debug, Deserialize)]
pub struct CartLineDto {
    pub id: String,
    pub quantity: u32,
    #[serde(default)]
    pub merchandise: Option<MerchandiseDto>,
}

impl From<CartLineDto> for CartLine {
    fn from(dto: CartLineDto) -> Self {
        let merchandise = dto.merchandise.unwrap_or_default();
        let (title, image) = match merchandise.product {
            Some(product) => (product.title, product.featured_image),
            None => (None, None),
        };
        let (image_url, image_alt) = match image {
            Some(image) => (Some(image.url), image.alt_text),
            None => (None, None),
        };
        CartLine {
            id: dto.id,
            quantity: dto.quantity,
            variant_id: merchandise.id.unwrap_or_default(),
            variant_title: merchandise.title,
            title,
            image_url,
            image_alt,
            unit_price: merchandise.price.map(Money::from),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostDto {
    #[serde(default)]
    pub total_amount: Option<MoneyDto>,
    #[serde(default)]
    pub subtotal_amount: Option<MoneyDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub total_quantity: u32,
    #[serde(default)]
    pub lines: Option<Connection<CartLineDto>>,
    #[serde(default)]
    pub cost: Option<CartCostDto>,
}

impl From<CartDto> for Cart {
    fn from(dto: CartDto) -> Self {
        let cost = dto
            .cost
            .map(|cost| CartCost {
                subtotal: cost.subtotal_amount.map(Money::from),
                total: cost.total_amount.map(Money::from),
            })
            .unwrap_or_default();
        Cart {
            id: dto.id,
            checkout_url: dto.checkout_url,
            total_quantity: dto.total_quantity,
            lines: dto
                .lines
                .map(|lines| lines.into_nodes().map(CartLine::from).collect())
                .unwrap_or_default(),
            cost,
        }
    }
}

/// Payload shared by every cart mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    #[serde(default)]
    pub cart: Option<CartDto>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

impl CartMutationPayload {
    /// User errors take precedence over a returned cart.
    pub fn into_cart(self, operation: &str) -> Result<Cart> {
        if !self.user_errors.is_empty() {
            return Err(PaintoError::UserErrors(self.user_errors));
        }
        self.cart
            .map(Cart::from)
            .ok_or_else(|| PaintoError::Api(vec![format!("{operation} returned no cart")]))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesUpdateData {
    pub cart_lines_update: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveData {
    pub cart_lines_remove: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
pub struct GetCartData {
    #[serde(default)]
    pub cart: Option<CartDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeDto {
    pub min_variant_price: MoneyDto,
}

#[derive(Debug, Deserialize)]
pub struct VariantRefDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    pub price_range: PriceRangeDto,
    #[serde(default)]
    pub compare_at_price_range: Option<PriceRangeDto>,
    #[serde(default)]
    pub images: Option<Connection<ImageDto>>,
    #[serde(default)]
    pub variants: Option<Connection<VariantRefDto>>,
}

impl From<ProductDto> for ProductSummary {
    fn from(dto: ProductDto) -> Self {
        let price = Money::from(dto.price_range.min_variant_price);
        let compare_at_price = dto
            .compare_at_price_range
            .map(|range| Money::from(range.min_variant_price))
            .unwrap_or_else(|| price.clone());
        let image = dto.images.and_then(|images| images.into_nodes().next());
        let (image_url, image_alt) = match image {
            Some(image) => (Some(image.url), image.alt_text.or(Some(dto.title.clone()))),
            None => (None, None),
        };
        ProductSummary {
            id: dto.id,
            description: dto.description.unwrap_or_default(),
            handle: dto.handle.unwrap_or_default(),
            price,
            compare_at_price,
            image_url,
            image_alt,
            variant_id: dto
                .variants
                .and_then(|variants| variants.into_nodes().next())
                .map(|variant| variant.id),
            title: dto.title,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductDto>,
}

impl ProductsData {
    pub fn into_summaries(self) -> Vec<ProductSummary> {
        self.products.into_nodes().map(ProductSummary::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_flattens_edges() {
        let dto: CartDto = serde_json::from_value(json!({
            "id": "gid://shopify/Cart/1",
            "checkoutUrl": "https://shop.example/checkout/1",
            "totalQuantity": 3,
            "lines": { "edges": [{ "node": {
                "id": "gid://shopify/CartLine/9",
                "quantity": 3,
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/101",
                    "title": "25kg",
                    "priceV2": { "amount": "89.9", "currencyCode": "ILS" },
                    "product": {
                        "title": "Tile Adhesive",
                        "featuredImage": { "url": "https://cdn.example/a.png", "altText": null }
                    }
                }
            }}]},
            "cost": { "totalAmount": { "amount": "269.7", "currencyCode": "ILS" } }
        }))
        .unwrap();

        let cart = Cart::from(dto);
        assert_eq!(cart.total_quantity, 3);
        let line = &cart.lines[0];
        assert_eq!(line.variant_id, "gid://shopify/ProductVariant/101");
        assert_eq!(line.title.as_deref(), Some("Tile Adhesive"));
        assert_eq!(line.image_alt, None);
        assert_eq!(line.unit_price, Some(Money::new("89.9", "ILS")));
        assert_eq!(cart.cost.total, Some(Money::new("269.7", "ILS")));
        assert_eq!(cart.cost.subtotal, None);
    }

    #[test]
    fn test_user_errors_win_over_cart() {
        let payload: CartMutationPayload = serde_json::from_value(json!({
            "cart": null,
            "userErrors": [{ "field": ["lines", "0", "merchandiseId"], "message": "invalid variant", "code": "INVALID" }]
        }))
        .unwrap();

        match payload.into_cart("cartCreate") {
            Err(PaintoError::UserErrors(errors)) => {
                assert_eq!(errors[0].message, "invalid variant");
                assert_eq!(errors[0].code.as_deref(), Some("INVALID"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_product_defaults() {
        let dto: ProductDto = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "title": "Wood Glue Pro",
            "description": null,
            "priceRange": { "minVariantPrice": { "amount": "29.9", "currencyCode": "ILS" } },
            "images": { "edges": [{ "node": { "url": "https://cdn.example/g.png", "altText": null } }] },
            "variants": { "edges": [] }
        }))
        .unwrap();

        let product = ProductSummary::from(dto);
        assert_eq!(product.compare_at_price, product.price);
        assert_eq!(product.handle, "");
        assert_eq!(product.image_alt.as_deref(), Some("Wood Glue Pro"));
        assert_eq!(product.variant_id, None);
    }

    #[test]
    fn test_top_level_errors() {
        let response: GraphQlResponse<GetCartData> = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "Throttled" }]
        }))
        .unwrap();
        match response.into_data() {
            Err(PaintoError::Api(messages)) => assert_eq!(messages, vec!["Throttled"]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
