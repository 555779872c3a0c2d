//! Plain-text views of products.

use std::io::{self, Write};

use catalog_admin::models::Product;
use catalog_admin::services::CatalogSummary;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// One row per product: ID, name, brand, category, price, stock, status.
///
/// Products below the low-stock threshold are flagged with `!`.
pub fn product_table<'a>(
    out: &mut impl Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> io::Result<usize> {
    writeln!(
        out,
        "{:<13}  {:<28}  {:<14}  {:<18}  {:>15}  {:>6}  {}",
        "ID", "NAME", "BRAND", "CATEGORY", "PRICE", "STOCK", "STATUS"
    )?;

    let mut rows = 0;
    for product in products {
        let stock = if product.is_low_stock() {
            format!("{}!", product.total_stock())
        } else {
            product.total_stock().to_string()
        };
        writeln!(
            out,
            "{:<13}  {:<28}  {:<14}  {:<18}  {:>15}  {:>6}  {}",
            product.id,
            product.name,
            product.brand,
            product.category,
            product.price_range().to_string(),
            stock,
            status(product),
        )?;
        rows += 1;
    }
    Ok(rows)
}

/// Every field of one product.
pub fn product_detail(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "{}", product.name)?;
    writeln!(out, "  ID:        {}", product.id)?;
    writeln!(out, "  Brand:     {}", product.brand)?;
    writeln!(out, "  Category:  {}", product.category)?;
    writeln!(out, "  Status:    {}", status(product))?;
    writeln!(out, "  Price:     {}", product.price_range())?;
    writeln!(out, "  Stock:     {}", product.total_stock())?;
    writeln!(out, "  Created:   {}", product.created_at.format(DATE_FORMAT))?;
    writeln!(out, "  Updated:   {}", product.updated_at.format(DATE_FORMAT))?;

    writeln!(out, "Variants:")?;
    if product.variants.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for variant in &product.variants {
        write!(out, "  [{}] {}  {}", variant.id, variant.size, variant.price)?;
        let discount = variant.discount_percent();
        if discount > 0 {
            write!(out, " (MRP {}, {discount}% off)", variant.mrp)?;
        }
        write!(out, "  stock {}", variant.stock)?;
        if !variant.sku.is_empty() {
            write!(out, "  SKU {}", variant.sku)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Images:")?;
    if product.images.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (index, image) in product.images.iter().enumerate() {
        let label = if index == 0 { "cover" } else { "gallery" };
        let stale = if image.is_durable() { "" } else { " (unavailable)" };
        writeln!(out, "  {index}. {label}: {image}{stale}")?;
    }

    if !product.description.is_empty() {
        writeln!(out, "Description:")?;
        writeln!(out, "  {}", product.description)?;
    }
    if !product.disclaimer.is_empty() {
        writeln!(out, "Disclaimer:")?;
        writeln!(out, "  {}", product.disclaimer)?;
    }
    Ok(())
}

/// Dashboard totals.
pub fn summary(out: &mut impl Write, summary: &CatalogSummary) -> io::Result<()> {
    writeln!(out, "Products:   {}", summary.total_products)?;
    writeln!(out, "Published:  {}", summary.published)?;
    writeln!(out, "Drafts:     {}", summary.drafts)?;
    writeln!(out, "Stock:      {}", summary.total_stock)?;
    writeln!(out, "Low stock:  {}", summary.low_stock)?;
    Ok(())
}

const fn status(product: &Product) -> &'static str {
    if product.published {
        "Published"
    } else {
        "Draft"
    }
}
