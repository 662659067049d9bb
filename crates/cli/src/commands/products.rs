//! Catalog browsing commands.

use fastrac_core::ProductId;
use fastrac_storefront::catalog::types::Product;
use fastrac_storefront::catalog::{ProductFilter, SortKey};
use fastrac_storefront::text::{StockLevel, stock_level, truncate};
use fastrac_storefront::variants::{has_multiple_variants, variants_for};

use super::{CommandError, Context};

/// List products, optionally refined by category/search/sort.
pub async fn list(
    ctx: &Context,
    category: Option<String>,
    sort: SortKey,
    search: Option<String>,
) -> Result<(), CommandError> {
    // A free-text query goes through the API's search endpoint; plain
    // browsing pulls the categories and refines locally.
    let products = match search.as_deref() {
        Some(query) => ctx.client.search(query).await?,
        None => ctx.client.all_catalog_products().await?,
    };

    let filter = ProductFilter {
        search: None,
        category,
        sort,
    };
    let view = filter.apply(&products);

    if view.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &view {
        println!(
            "{:>4}  {:<40} {:>14}  {}",
            product.id,
            truncate(&product.title, 40),
            ctx.formatter.format(product.discounted_price()),
            stock_label(product),
        );
    }
    println!("\n{} product(s)", view.len());

    Ok(())
}

/// Show one product in detail.
pub async fn show(ctx: &Context, id: i64) -> Result<(), CommandError> {
    let product = ctx.client.product_by_id(ProductId::new(id)).await?;

    println!("{}  [{}]", product.title, product.sku);
    if let Some(brand) = &product.brand {
        println!("Brand:    {brand}");
    }
    println!("Category: {}", product.category);
    println!("Price:    {}", ctx.formatter.format(product.discounted_price()));
    if product.discount_percentage > rust_decimal::Decimal::ZERO {
        println!(
            "          was {} (-{}%)",
            ctx.formatter.format(product.price),
            product.discount_percentage
        );
    }
    println!("Stock:    {}", stock_label(&product));
    println!("Rating:   {:.2}", product.rating);

    let variants = variants_for(&product.category);
    if has_multiple_variants(&product.category) {
        println!("Sizes:    {}", variants.sizes.join(", "));
        println!(
            "Colors:   {}",
            variants
                .colors
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    if !product.description.is_empty() {
        println!("\n{}", truncate(&product.description, 300));
    }

    Ok(())
}

fn stock_label(product: &Product) -> String {
    match stock_level(product.stock) {
        StockLevel::OutOfStock => "out of stock".to_string(),
        StockLevel::Low => format!("{} left (low)", product.stock),
        StockLevel::InStock => format!("{} in stock", product.stock),
    }
}
