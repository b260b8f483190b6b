use anyhow::{Context, Result, bail};
use painto_application::{ActionOutcome, Storefront, format_money};

/// Prints an outcome; failures become the command's error.
fn report(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::CartChanged { cart, message } => {
            println!("{} ({} items)", message, cart.total_quantity);
            Ok(())
        }
        ActionOutcome::Checkout { url } => {
            println!("{}", url);
            Ok(())
        }
        ActionOutcome::Failed { message } => bail!(message),
    }
}

pub async fn add(storefront: &Storefront, variant_id: &str, quantity: u32) -> Result<()> {
    report(storefront.add_to_cart(Some(variant_id), quantity).await)
}

pub async fn buy_now(storefront: &Storefront, variant_id: &str, quantity: u32) -> Result<()> {
    report(storefront.buy_now(Some(variant_id), quantity).await)
}

pub async fn update(storefront: &Storefront, line_id: &str, quantity: u32) -> Result<()> {
    report(storefront.update_item(line_id, quantity).await)
}

pub async fn remove(storefront: &Storefront, line_ids: &[String]) -> Result<()> {
    for line_id in line_ids {
        report(storefront.remove_item(line_id).await)?;
    }
    Ok(())
}

pub async fn clear(storefront: &Storefront) -> Result<()> {
    storefront.clear_cart().await;
    println!("Cart cleared");
    Ok(())
}

pub async fn show(storefront: &Storefront, json: bool) -> Result<()> {
    let mini_cart = storefront.open_mini_cart().await;
    if json {
        let snapshot = mini_cart.snapshot();
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to render cart")?
        );
    } else {
        println!("{}", mini_cart.view());
    }
    Ok(())
}

pub async fn products(storefront: &Storefront, first: u32) -> Result<()> {
    let Some(products) = storefront.products(first).await else {
        bail!(storefront.translate("errors.generic", "Something went wrong. Please try again."));
    };
    for product in products {
        let variant = product.variant_id.as_deref().unwrap_or("-");
        println!(
            "{}  {}  {}",
            format_money(&product.price),
            product.title,
            variant
        );
    }
    Ok(())
}
