//! GraphQL documents.
//!
//! Every cart operation selects the same cart shape so the response mapping
//! is shared.

macro_rules! cart_fields {
    () => {
        r#"
      id
      checkoutUrl
      totalQuantity
      lines(first: 50) {
        edges {
          node {
            id
            quantity
            merchandise {
              ... on ProductVariant {
                id
                title
                priceV2 {
                  amount
                  currencyCode
                }
                product {
                  title
                  featuredImage {
                    url
                    altText
                  }
                }
              }
            }
          }
        }
      }
      cost {
        totalAmount {
          amount
          currencyCode
        }
        subtotalAmount {
          amount
          currencyCode
        }
      }
"#
    };
}

macro_rules! user_error_fields {
    () => {
        r#"
    userErrors {
      field
      message
      code
    }
"#
    };
}

pub const CART_CREATE: &str = concat!(
    "mutation cartCreate($input: CartInput!) {\n  cartCreate(input: $input) {\n    cart {",
    cart_fields!(),
    "    }",
    user_error_fields!(),
    "  }\n}\n"
);

pub const CART_LINES_ADD: &str = concat!(
    "mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {\n  cartLinesAdd(cartId: $cartId, lines: $lines) {\n    cart {",
    cart_fields!(),
    "    }",
    user_error_fields!(),
    "  }\n}\n"
);

pub const CART_LINES_UPDATE: &str = concat!(
    "mutation cartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {\n  cartLinesUpdate(cartId: $cartId, lines: $lines) {\n    cart {",
    cart_fields!(),
    "    }",
    user_error_fields!(),
    "  }\n}\n"
);

pub const CART_LINES_REMOVE: &str = concat!(
    "mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {\n  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {\n    cart {",
    cart_fields!(),
    "    }",
    user_error_fields!(),
    "  }\n}\n"
);

pub const GET_CART: &str = concat!(
    "query getCart($cartId: ID!) {\n  cart(id: $cartId) {",
    cart_fields!(),
    "  }\n}\n"
);

pub const PRODUCTS: &str = r#"query getProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        description
        handle
        priceRange {
          minVariantPrice {
            amount
            currencyCode
          }
        }
        compareAtPriceRange {
          minVariantPrice {
            amount
            currencyCode
          }
        }
        images(first: 1) {
          edges {
            node {
              url
              altText
            }
          }
        }
        variants(first: 1) {
          edges {
            node {
              id
            }
          }
        }
      }
    }
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutations_select_user_errors() {
        for doc in [CART_CREATE, CART_LINES_ADD, CART_LINES_UPDATE, CART_LINES_REMOVE] {
            assert!(doc.contains("userErrors"));
            assert!(doc.contains("checkoutUrl"));
        }
        assert!(!GET_CART.contains("userErrors"));
        assert_eq!(CART_CREATE.matches('{').count(), CART_CREATE.matches('}').count());
        assert_eq!(GET_CART.matches('{').count(), GET_CART.matches('}').count());
    }
}
