//! Product catalog commands.
//!
//! `add` and `edit` drive a [`ProductForm`] exactly as the admin panel does:
//! fields are set on the draft, validated on submit and only then written.

use std::io::Write;
use std::str::FromStr;

use clap::Args;
use thiserror::Error;
use tracing::{info, warn};

use catalog_admin::AppError;
use catalog_admin::models::{ImageRef, is_known_brand, is_known_category};
use catalog_admin::services::{ProductForm, RECENT_LIMIT, SubmitOutcome, VariantField};
use catalog_core::{Price, PriceError, ProductId, VariantId};

use super::{Context, render};

/// Errors in `--variant` and `--set-variant` values.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("variant size is required")]
    MissingSize,

    #[error("variant price is required")]
    MissingPrice,

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("invalid stock '{0}', expected a whole number of at least 0")]
    InvalidStock(String),

    #[error("expected VARIANT_ID:FIELD=VALUE, got '{0}'")]
    MalformedEdit(String),

    #[error("unknown variant field '{0}', expected size, price, mrp, stock or sku")]
    UnknownField(String),
}

/// A variant given on the command line as `SIZE:PRICE[:MRP[:STOCK[:SKU]]]`.
///
/// MRP defaults to the price, stock to 0 and SKU to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub size: String,
    pub price: Price,
    pub mrp: Price,
    pub stock: i64,
    pub sku: String,
}

impl FromStr for VariantSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(5, ':').map(str::trim);

        let size = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or(SpecError::MissingSize)?;
        let price: Price = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or(SpecError::MissingPrice)?
            .parse()?;
        let mrp = match parts.next().filter(|p| !p.is_empty()) {
            Some(mrp) => mrp.parse()?,
            None => price,
        };
        let stock = match parts.next().filter(|p| !p.is_empty()) {
            Some(stock) => parse_stock(stock)?,
            None => 0,
        };
        let sku = parts.next().unwrap_or_default();

        Ok(Self {
            size: size.to_owned(),
            price,
            mrp,
            stock,
            sku: sku.to_owned(),
        })
    }
}

impl VariantSpec {
    /// Add this variant to the form's draft.
    fn add_to(self, form: &mut ProductForm) -> VariantId {
        let id = form.add_variant();
        for field in [
            VariantField::Size(self.size),
            VariantField::Price(self.price),
            VariantField::Mrp(self.mrp),
            VariantField::Stock(self.stock),
            VariantField::Sku(self.sku),
        ] {
            form.update_variant(&id, field);
        }
        id
    }
}

/// A single-field variant change given as `VARIANT_ID:FIELD=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEdit {
    pub id: VariantId,
    pub field: VariantField,
}

impl FromStr for VariantEdit {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SpecError::MalformedEdit(s.to_owned());
        let (id, assignment) = s.split_once(':').ok_or_else(malformed)?;
        let (field, value) = assignment.split_once('=').ok_or_else(malformed)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(malformed());
        }

        let value = value.trim();
        let field = match field.trim().to_ascii_lowercase().as_str() {
            "size" => VariantField::Size(value.to_owned()),
            "price" => VariantField::Price(value.parse()?),
            "mrp" => VariantField::Mrp(value.parse()?),
            "stock" => VariantField::Stock(parse_stock(value)?),
            "sku" => VariantField::Sku(value.to_owned()),
            other => return Err(SpecError::UnknownField(other.to_owned())),
        };

        Ok(Self {
            id: VariantId::new(id),
            field,
        })
    }
}

fn parse_stock(s: &str) -> Result<i64, SpecError> {
    s.parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| SpecError::InvalidStock(s.to_owned()))
}

/// Text fields shared by `add` and `edit`.
#[derive(Debug, Args)]
pub struct TextArgs {
    /// Product name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Brand (see `catalog brands`)
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Category (see `catalog categories`)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Product description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Product disclaimer
    #[arg(long)]
    pub disclaimer: Option<String>,

    /// Generate the description with AI from name, brand and category
    #[arg(long)]
    pub describe: bool,

    /// Generate the disclaimer with AI from the category
    #[arg(long)]
    pub disclaim: bool,
}

/// Arguments of `catalog add`.
#[derive(Debug, Args)]
pub struct ProductArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Variant as SIZE:PRICE[:MRP[:STOCK[:SKU]]] (repeatable)
    #[arg(long = "variant", value_name = "SPEC")]
    pub variants: Vec<VariantSpec>,

    /// Image URL or file path; the first is the cover (repeatable)
    #[arg(long = "image", value_name = "URL_OR_PATH")]
    pub images: Vec<String>,

    /// Save as a draft hidden from the storefront
    #[arg(long)]
    pub draft: bool,
}

/// Arguments of `catalog edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Product ID
    pub id: String,

    #[command(flatten)]
    pub text: TextArgs,

    /// Add a variant as SIZE:PRICE[:MRP[:STOCK[:SKU]]] (repeatable)
    #[arg(long = "add-variant", value_name = "SPEC")]
    pub add_variants: Vec<VariantSpec>,

    /// Change one variant field as VARIANT_ID:FIELD=VALUE (repeatable)
    #[arg(long = "set-variant", value_name = "EDIT")]
    pub set_variants: Vec<VariantEdit>,

    /// Remove the variant with this ID (repeatable)
    #[arg(long = "remove-variant", value_name = "VARIANT_ID")]
    pub remove_variants: Vec<String>,

    /// Append an image URL or file path (repeatable)
    #[arg(long = "add-image", value_name = "URL_OR_PATH")]
    pub add_images: Vec<String>,

    /// Remove the image at this position, 0 being the cover (repeatable)
    #[arg(long = "remove-image", value_name = "INDEX")]
    pub remove_images: Vec<usize>,

    /// Remove the cover image; the next image becomes the cover
    #[arg(long, conflicts_with = "remove_images")]
    pub remove_cover: bool,

    /// Show the product in the storefront
    #[arg(long, conflicts_with = "unpublish")]
    pub publish: bool,

    /// Hide the product from the storefront
    #[arg(long)]
    pub unpublish: bool,
}

// =============================================================================
// Browse
// =============================================================================

/// List products, optionally filtered by name or category.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if nobody is signed in.
pub fn list(
    ctx: &Context,
    search: Option<&str>,
    limit: Option<usize>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    ctx.require_admin()?;
    let store = ctx.products();

    let matches = match search {
        Some(query) => store.search(query),
        None => store.products().iter().collect(),
    };
    if matches.is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }

    let shown = render::product_table(
        out,
        matches.iter().copied().take(limit.unwrap_or(usize::MAX)),
    )?;
    if shown < matches.len() {
        writeln!(out, "({shown} of {} shown)", matches.len())?;
    }
    Ok(())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown ID.
pub fn show(ctx: &Context, id: &str, out: &mut impl Write) -> Result<(), AppError> {
    ctx.require_admin()?;
    let store = ctx.products();
    let id = ProductId::new(id);
    let product = store.get(&id).ok_or(AppError::NotFound(id))?;
    render::product_detail(out, product)?;
    Ok(())
}

/// Print catalog totals and the most recent products.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if nobody is signed in.
pub fn stats(ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    ctx.require_admin()?;
    let store = ctx.products();

    render::summary(out, &store.summary())?;
    if !store.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recent products:")?;
        render::product_table(out, store.recent(RECENT_LIMIT))?;
    }
    Ok(())
}

// =============================================================================
// Change
// =============================================================================

/// Create a product.
///
/// # Errors
///
/// Returns `AppError::Form` with the first validation failure, or if the
/// product could not be saved.
pub async fn add(ctx: &Context, args: ProductArgs, out: &mut impl Write) -> Result<(), AppError> {
    let admin = ctx.require_admin()?;
    let mut store = ctx.products();
    let mut form = ProductForm::new();

    apply_text(&mut form, &args.text);
    form.set_published(!args.draft);
    for spec in args.variants {
        spec.add_to(&mut form);
    }
    for raw in &args.images {
        form.add_image(resolve_image(raw)?);
    }
    generate(ctx, &mut form, &args.text).await?;

    match form.submit(&mut store)? {
        SubmitOutcome::Created(product) => {
            info!(admin = %admin.email, id = %product.id, "Product created");
            writeln!(out, "Product added successfully")?;
            render::product_detail(out, &product)?;
        }
        SubmitOutcome::Updated(id) => writeln!(out, "Product updated: {id}")?,
    }
    Ok(())
}

/// Edit an existing product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product ID,
/// `AppError::BadRequest` for unknown variant IDs or image positions, and
/// `AppError::Form` if the edited product fails validation or cannot be saved.
pub async fn edit(ctx: &Context, args: EditArgs, out: &mut impl Write) -> Result<(), AppError> {
    let admin = ctx.require_admin()?;
    let mut store = ctx.products();
    let id = ProductId::new(args.id);
    let mut form = ProductForm::edit(store.get(&id).ok_or_else(|| AppError::NotFound(id.clone()))?);

    apply_text(&mut form, &args.text);
    if args.publish {
        form.set_published(true);
    }
    if args.unpublish {
        form.set_published(false);
    }

    for variant_id in &args.remove_variants {
        if !form.remove_variant(&VariantId::new(variant_id.as_str())) {
            return Err(AppError::BadRequest(format!("Variant not found: {variant_id}")));
        }
    }
    for edit in args.set_variants {
        if !form.update_variant(&edit.id, edit.field) {
            return Err(AppError::BadRequest(format!("Variant not found: {}", edit.id)));
        }
    }
    for spec in args.add_variants {
        spec.add_to(&mut form);
    }

    // Highest first so earlier positions stay valid.
    let mut positions = args.remove_images;
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    for index in positions {
        form.remove_image(index)
            .ok_or_else(|| AppError::BadRequest(format!("No image at position {index}")))?;
    }
    if args.remove_cover && form.remove_primary_image().is_none() {
        return Err(AppError::BadRequest("Product has no cover image".to_string()));
    }
    for raw in &args.add_images {
        form.add_image(resolve_image(raw)?);
    }
    generate(ctx, &mut form, &args.text).await?;

    form.submit(&mut store)?;
    info!(admin = %admin.email, id = %id, "Product updated");
    writeln!(out, "Product updated successfully")?;
    if let Some(product) = store.get(&id) {
        render::product_detail(out, product)?;
    }
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown ID, or `AppError::Storage` if
/// the deletion could not be saved.
pub fn delete(ctx: &Context, id: &str, out: &mut impl Write) -> Result<(), AppError> {
    let admin = ctx.require_admin()?;
    let mut store = ctx.products();
    let id = ProductId::new(id);

    if !store.delete(&id)? {
        return Err(AppError::NotFound(id));
    }
    info!(admin = %admin.email, id = %id, "Product deleted");
    writeln!(out, "Product deleted successfully")?;
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn apply_text(form: &mut ProductForm, text: &TextArgs) {
    if let Some(name) = &text.name {
        form.set_name(name.as_str());
    }
    if let Some(brand) = &text.brand {
        if !is_known_brand(brand) {
            warn!(brand = %brand, "Brand is not in the standard list");
        }
        form.set_brand(brand.as_str());
    }
    if let Some(category) = &text.category {
        if !is_known_category(category) {
            warn!(category = %category, "Category is not in the standard list");
        }
        form.set_category(category.as_str());
    }
    if let Some(description) = &text.description {
        form.set_description(description.as_str());
    }
    if let Some(disclaimer) = &text.disclaimer {
        form.set_disclaimer(disclaimer.as_str());
    }
}

async fn generate(ctx: &Context, form: &mut ProductForm, text: &TextArgs) -> Result<(), AppError> {
    if text.describe {
        if form.generate_description(ctx.copywriter()).await? {
            info!("Description generated");
        } else {
            warn!("No description generated, keeping the current text");
        }
    }
    if text.disclaim {
        if form.generate_disclaimer(ctx.copywriter()).await {
            info!("Disclaimer generated");
        } else {
            warn!("No disclaimer generated, keeping the current text");
        }
    }
    Ok(())
}

/// Turn a URL or local path into a durable image reference.
///
/// Local paths must exist and are stored canonicalized.
fn resolve_image(raw: &str) -> Result<ImageRef, AppError> {
    let raw = raw.trim();
    if raw.contains("://") || raw.starts_with("blob:") || raw.starts_with("data:") {
        return Ok(ImageRef::parse(raw)?);
    }

    let path = std::fs::canonicalize(raw)
        .map_err(|e| AppError::BadRequest(format!("Image not found: {raw} ({e})")))?;
    let path = path
        .to_str()
        .ok_or_else(|| AppError::BadRequest(format!("Image path is not valid UTF-8: {raw}")))?;
    Ok(ImageRef::parse(path)?)
}
