use anyhow::{Result, bail};
use painto_application::{ActionOutcome, Storefront};
use painto_core::cart::Cart;

/// Scripted session against the offline catalog. Prints every step in the
/// active language.
pub async fn run(storefront: &Storefront) -> Result<()> {
    let Some(products) = storefront.products(3).await else {
        bail!("Demo catalog unavailable");
    };
    let variants: Vec<String> = products.into_iter().filter_map(|p| p.variant_id).collect();
    let [first, second, ..] = variants.as_slice() else {
        bail!("Demo catalog needs at least two variants");
    };
    let (first, second) = (first.as_str(), second.as_str());

    let mini_cart = storefront.open_mini_cart().await;
    println!("{}\n", mini_cart.view());

    step(storefront.add_to_cart(Some(first), 1).await)?;
    step(storefront.add_to_cart(Some(first), 1).await)?;
    let cart = step(storefront.add_to_cart(Some(second), 1).await)?;

    if let Some(line) = cart.as_ref().and_then(|cart| cart.line_for_variant(second)) {
        step(storefront.update_item(&line.id, 3).await)?;
        step(storefront.remove_item(&line.id).await)?;
    }

    mini_cart.refresh().await;
    println!("\n{}\n", mini_cart.view());

    step(storefront.buy_now(Some(first), 1).await)?;
    Ok(())
}

fn step(outcome: ActionOutcome) -> Result<Option<Cart>> {
    match outcome {
        ActionOutcome::CartChanged { cart, message } => {
            println!("{}  ({})", message, cart.total_quantity);
            Ok(Some(cart))
        }
        ActionOutcome::Checkout { url } => {
            println!("→ {}", url);
            Ok(None)
        }
        ActionOutcome::Failed { message } => bail!(message),
    }
}
