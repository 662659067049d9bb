//! Cart and checkout commands.

use std::sync::Arc;

use fastrac_core::ProductId;
use fastrac_storefront::cart::CartStore;
use fastrac_storefront::checkout::{CheckoutError, OrderDraft};
use fastrac_storefront::quantity;
use fastrac_storefront::variants::{VariantSelection, variant_label, variants_for};

use super::{CommandError, Context};

fn open_cart(ctx: &Context) -> CartStore {
    CartStore::open(Arc::clone(&ctx.storage))
}

/// Add a product to the cart with an optional variant choice.
pub async fn add(
    ctx: &Context,
    product_id: i64,
    raw_quantity: &str,
    size: Option<String>,
    color: Option<String>,
) -> Result<(), CommandError> {
    let product = ctx.client.product_by_id(ProductId::new(product_id)).await?;

    if !product.is_purchasable() {
        println!("'{}' is out of stock.", product.title);
        return Ok(());
    }

    // Free-form quantity goes through the same finalization the product
    // dialog applies on blur
    let corrected = quantity::finalize_input(raw_quantity, product.stock);
    if let Some(notice) = corrected.notice {
        println!("Quantity adjusted: {notice}");
    }

    let label = resolve_variant(&product.category, size, color);

    let mut cart = open_cart(ctx);
    let outcome = cart.add_item(&product, corrected.quantity, Some(&label));
    if outcome.stock_limited {
        println!(
            "Stock limit reached: '{}' capped at {} in the cart.",
            product.title, outcome.quantity
        );
    }

    println!(
        "Added to cart: {} ({label}) x{} - {} item(s) total",
        product.title,
        outcome.quantity,
        cart.total_items()
    );

    Ok(())
}

/// Fold size/color flags into a variant label, falling back to the
/// category defaults and warning about values outside the configured
/// tables.
fn resolve_variant(category: &str, size: Option<String>, color: Option<String>) -> String {
    let config = variants_for(category);
    let default = VariantSelection::default_for(category);

    let size = size.map_or_else(
        || default.size.to_string(),
        |s| {
            if !config.sizes.iter().any(|known| known.eq_ignore_ascii_case(&s)) {
                println!("Note: size '{s}' is not listed for {category}.");
            }
            s
        },
    );
    let color = color.map_or_else(
        || default.color.name.to_string(),
        |c| {
            if !config.colors.iter().any(|known| known.name.eq_ignore_ascii_case(&c)) {
                println!("Note: color '{c}' is not listed for {category}.");
            }
            c
        },
    );

    variant_label(&size, &color)
}

/// Print the cart's lines and totals.
pub fn list(ctx: &Context) {
    let cart = open_cart(ctx);

    if cart.state().is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        let variant = line
            .selected_variant
            .as_deref()
            .map_or_else(String::new, |v| format!(" ({v})"));
        println!(
            "{:>4}  {}{}  x{}  @ {}  = {}",
            line.product.id,
            line.product.title,
            variant,
            line.quantity,
            ctx.formatter.format(line.product.discounted_price()),
            ctx.formatter.format(line.line_total()),
        );
    }
    println!(
        "\nTotal: {} item(s), {}",
        cart.total_items(),
        ctx.formatter.format(cart.subtotal())
    );
}

/// Remove a product's line.
pub fn remove(ctx: &Context, product_id: i64) {
    let mut cart = open_cart(ctx);
    let id = ProductId::new(product_id);

    if !cart.is_in_cart(id) {
        println!("Product {product_id} is not in the cart.");
        return;
    }

    cart.remove_item(id);
    println!(
        "Removed. {} item(s) remain, {}",
        cart.total_items(),
        ctx.formatter.format(cart.subtotal())
    );
}

/// Set a line's quantity (0 removes the line).
pub fn set(ctx: &Context, product_id: i64, raw_quantity: &str) {
    let mut cart = open_cart(ctx);
    let id = ProductId::new(product_id);

    let Some(stock) = cart
        .lines()
        .iter()
        .find(|line| line.product.id == id)
        .map(|line| line.product.stock)
    else {
        println!("Product {product_id} is not in the cart.");
        return;
    };

    // "0" removes; anything else is corrected against the product's stock
    if raw_quantity.trim() == "0" {
        cart.update_quantity(id, 0);
        println!("Removed product {product_id} from the cart.");
        return;
    }

    let corrected = quantity::finalize_input(raw_quantity, stock);
    if let Some(notice) = corrected.notice {
        println!("Quantity adjusted: {notice}");
    }

    let outcome = cart.update_quantity(id, corrected.quantity);
    println!(
        "Quantity set to {}. Total: {} item(s), {}",
        outcome.quantity,
        cart.total_items(),
        ctx.formatter.format(cart.subtotal())
    );
}

/// Empty the cart.
pub fn clear(ctx: &Context) {
    let mut cart = open_cart(ctx);
    cart.clear();
    println!("Cart cleared.");
}

/// Order a single product directly, bypassing the cart.
pub async fn buy_now(
    ctx: &Context,
    product_id: i64,
    raw_quantity: &str,
    size: Option<String>,
    color: Option<String>,
) -> Result<(), CommandError> {
    let product = ctx.client.product_by_id(ProductId::new(product_id)).await?;

    if !product.is_purchasable() {
        println!("'{}' is out of stock.", product.title);
        return Ok(());
    }

    let corrected = quantity::finalize_input(raw_quantity, product.stock);
    if let Some(notice) = corrected.notice {
        println!("Quantity adjusted: {notice}");
    }

    let label = resolve_variant(&product.category, size, color);

    let draft = match OrderDraft::buy_now(&product, corrected.quantity, Some(label)) {
        Ok(draft) => draft,
        Err(CheckoutError::EmptyCart) => {
            println!("Nothing to order.");
            return Ok(());
        }
    };

    println!("{}\n", draft.message(&ctx.formatter, &ctx.config.app_name));
    println!(
        "Open to place the order:\n{}",
        draft.whatsapp_link(&ctx.config.whatsapp_number, &ctx.formatter, &ctx.config.app_name)
    );

    Ok(())
}

/// Serialize the cart into the WhatsApp order message and deep link.
pub fn checkout(ctx: &Context) {
    let cart = open_cart(ctx);

    let draft = match OrderDraft::from_cart(cart.state()) {
        Ok(draft) => draft,
        Err(CheckoutError::EmptyCart) => {
            // A notice, not a failure
            println!("Your cart is empty - nothing to check out.");
            return;
        }
    };

    println!("{}\n", draft.message(&ctx.formatter, &ctx.config.app_name));
    println!(
        "Open to place the order:\n{}",
        draft.whatsapp_link(&ctx.config.whatsapp_number, &ctx.formatter, &ctx.config.app_name)
    );
}
