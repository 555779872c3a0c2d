//! Product form controller.
//!
//! Holds the draft of a single product while it is being created or edited,
//! validates it on submit and hands the result to the [`ProductStore`].
//! Nothing here touches storage until [`ProductForm::submit`] succeeds.
//!
//! # AI generation
//!
//! Text generation is split into a request and an apply step so a response
//! that arrives late can be discarded. Each request returns a
//! [`GenerationTicket`] bound to the draft's current epoch. Epochs are unique
//! across every form in the process; resetting or reseeding the draft starts
//! a new one, and a newer request for the same field supersedes older ones. [`ProductForm::apply_generated`] ignores
//! tickets that are stale for either reason.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, info, instrument};

use catalog_core::{Price, ProductId, VariantId};

use crate::claude::TextGenerator;
use crate::db::{ProductRepository, StorageError};
use crate::models::{ImageRef, Product, ProductInput, ProductVariant};

use super::products::ProductStore;

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

/// Errors surfaced to the person filling in the form.
#[derive(Debug, Error)]
pub enum FormError {
    /// Name is blank.
    #[error("Please enter a product name")]
    MissingName,

    /// No brand selected.
    #[error("Please select a brand")]
    MissingBrand,

    /// No category selected.
    #[error("Please select a category")]
    MissingCategory,

    /// The product has no variants.
    #[error("Please add at least one product variant")]
    NoVariants,

    /// Description generation needs a name and brand to work from.
    #[error("Please enter a product name and brand first.")]
    MissingGenerationContext,

    /// The validated product could not be saved.
    #[error("Could not save the product: {0}")]
    Storage(#[from] StorageError),
}

/// Whether the form creates a new product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Submitting adds a new product.
    Create,
    /// Submitting updates the product with this ID.
    Edit(ProductId),
}

/// Editable fields of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub disclaimer: String,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ImageRef>,
    pub published: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            brand: String::new(),
            category: String::new(),
            description: String::new(),
            disclaimer: String::new(),
            variants: Vec::new(),
            images: Vec::new(),
            published: true,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            disclaimer: product.disclaimer.clone(),
            variants: product.variants.clone(),
            images: product.images.clone(),
            published: product.published,
        }
    }
}

impl From<ProductDraft> for ProductInput {
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: Some(draft.name),
            brand: Some(draft.brand),
            category: Some(draft.category),
            description: Some(draft.description),
            disclaimer: Some(draft.disclaimer),
            variants: Some(draft.variants),
            images: Some(draft.images),
            published: Some(draft.published),
        }
    }
}

/// A single-field change to one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantField {
    Size(String),
    Price(Price),
    Mrp(Price),
    Stock(i64),
    Sku(String),
}

impl VariantField {
    fn apply_to(self, variant: &mut ProductVariant) {
        match self {
            Self::Size(size) => variant.size = size,
            Self::Price(price) => variant.price = price,
            Self::Mrp(mrp) => variant.mrp = mrp,
            Self::Stock(stock) => variant.stock = stock,
            Self::Sku(sku) => variant.sku = sku,
        }
    }
}

/// Text fields that can be filled by the AI text service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiField {
    Description,
    Disclaimer,
}

/// Inputs sent to the text service for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Description {
        name: String,
        brand: String,
        category: String,
    },
    Disclaimer {
        category: String,
    },
}

impl GenerationRequest {
    /// Run this request against `generator`.
    pub async fn run<G: TextGenerator>(&self, generator: &G) -> Option<String> {
        match self {
            Self::Description {
                name,
                brand,
                category,
            } => generator.generate_description(name, brand, category).await,
            Self::Disclaimer { category } => generator.generate_disclaimer(category).await,
        }
    }
}

/// Proof of an outstanding generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    field: AiField,
    epoch: u64,
    serial: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    /// The field the response will fill.
    #[must_use]
    pub const fn field(&self) -> AiField {
        self.field
    }

    /// The inputs to send to the text service.
    #[must_use]
    pub const fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new product was added.
    Created(Product),
    /// The edited product was updated (or had disappeared, in which case
    /// nothing was written).
    Updated(ProductId),
}

/// Draft state and submit logic for one product.
#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: FormMode,
    draft: ProductDraft,
    epoch: u64,
    next_serial: u64,
    pending_description: Option<u64>,
    pending_disclaimer: Option<u64>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductForm {
    /// A blank form for creating a product.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            draft: ProductDraft::default(),
            epoch: next_epoch(),
            next_serial: 0,
            pending_description: None,
            pending_disclaimer: None,
        }
    }

    /// A form seeded from an existing product; submitting updates it.
    #[must_use]
    pub fn edit(product: &Product) -> Self {
        Self {
            mode: FormMode::Edit(product.id.clone()),
            draft: ProductDraft::from(product),
            ..Self::new()
        }
    }

    /// Discard the draft and start a blank create form.
    ///
    /// Outstanding generation tickets become stale.
    pub fn reset(&mut self) {
        self.reseed(FormMode::Create, ProductDraft::default());
    }

    /// Discard the draft and start editing `product`.
    ///
    /// Outstanding generation tickets become stale.
    pub fn load(&mut self, product: &Product) {
        self.reseed(FormMode::Edit(product.id.clone()), ProductDraft::from(product));
    }

    fn reseed(&mut self, mode: FormMode, draft: ProductDraft) {
        self.mode = mode;
        self.draft = draft;
        self.epoch = next_epoch();
        self.pending_description = None;
        self.pending_disclaimer = None;
    }

    /// Whether submitting creates or updates.
    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    // =========================================================================
    // Field setters
    // =========================================================================

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_brand(&mut self, brand: impl Into<String>) {
        self.draft.brand = brand.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.draft.category = category.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_disclaimer(&mut self, disclaimer: impl Into<String>) {
        self.draft.disclaimer = disclaimer.into();
    }

    pub const fn set_published(&mut self, published: bool) {
        self.draft.published = published;
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Append a blank variant and return its ID.
    pub fn add_variant(&mut self) -> VariantId {
        let id = loop {
            let candidate = VariantId::generate();
            if !self.draft.variants.iter().any(|v| v.id == candidate) {
                break candidate;
            }
        };
        self.draft.variants.push(ProductVariant::blank(id.clone()));
        id
    }

    /// Remove the variant with `id`. Returns whether one was removed.
    pub fn remove_variant(&mut self, id: &VariantId) -> bool {
        let before = self.draft.variants.len();
        self.draft.variants.retain(|v| &v.id != id);
        self.draft.variants.len() != before
    }

    /// Change one field of the variant with `id`. Returns whether it exists.
    pub fn update_variant(&mut self, id: &VariantId, field: VariantField) -> bool {
        match self.draft.variants.iter_mut().find(|v| &v.id == id) {
            Some(variant) => {
                field.apply_to(variant);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Append an image; the first image added becomes the cover.
    pub fn add_image(&mut self, image: ImageRef) {
        self.draft.images.push(image);
    }

    /// Remove the image at `index`, shifting later images forward.
    pub fn remove_image(&mut self, index: usize) -> Option<ImageRef> {
        (index < self.draft.images.len()).then(|| self.draft.images.remove(index))
    }

    /// Remove the cover image; the next gallery image takes its place.
    pub fn remove_primary_image(&mut self) -> Option<ImageRef> {
        self.remove_image(0)
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Check the draft, stopping at the first problem.
    ///
    /// # Errors
    ///
    /// Returns the `FormError` for the first failing rule, in the order name,
    /// brand, category, variants.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.draft.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        if self.draft.brand.is_empty() {
            return Err(FormError::MissingBrand);
        }
        if self.draft.category.is_empty() {
            return Err(FormError::MissingCategory);
        }
        if self.draft.variants.is_empty() {
            return Err(FormError::NoVariants);
        }
        Ok(())
    }

    /// Validate the draft and commit it to `store`.
    ///
    /// # Errors
    ///
    /// Returns a validation `FormError` without touching the store, or
    /// `FormError::Storage` if the snapshot write failed.
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub fn submit<R: ProductRepository>(
        &self,
        store: &mut ProductStore<R>,
    ) -> Result<SubmitOutcome, FormError> {
        self.validate()?;

        let input = ProductInput::from(self.draft.clone());
        match &self.mode {
            FormMode::Create => {
                let product = store.add(input)?;
                Ok(SubmitOutcome::Created(product))
            }
            FormMode::Edit(id) => {
                store.update(id, input)?;
                Ok(SubmitOutcome::Updated(id.clone()))
            }
        }
    }

    // =========================================================================
    // AI generation
    // =========================================================================

    /// Start a description request from the current name, brand and category.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingGenerationContext` if name or brand is empty.
    pub fn request_description(&mut self) -> Result<GenerationTicket, FormError> {
        if self.draft.name.is_empty() || self.draft.brand.is_empty() {
            return Err(FormError::MissingGenerationContext);
        }
        let request = GenerationRequest::Description {
            name: self.draft.name.clone(),
            brand: self.draft.brand.clone(),
            category: self.draft.category.clone(),
        };
        Ok(self.issue(AiField::Description, request))
    }

    /// Start a disclaimer request from the current category.
    pub fn request_disclaimer(&mut self) -> GenerationTicket {
        let request = GenerationRequest::Disclaimer {
            category: self.draft.category.clone(),
        };
        self.issue(AiField::Disclaimer, request)
    }

    fn issue(&mut self, field: AiField, request: GenerationRequest) -> GenerationTicket {
        let serial = self.next_serial;
        self.next_serial += 1;
        *self.pending_slot(field) = Some(serial);
        GenerationTicket {
            field,
            epoch: self.epoch,
            serial,
            request,
        }
    }

    const fn pending_slot(&mut self, field: AiField) -> &mut Option<u64> {
        match field {
            AiField::Description => &mut self.pending_description,
            AiField::Disclaimer => &mut self.pending_disclaimer,
        }
    }

    /// Whether a request for `field` is still outstanding.
    #[must_use]
    pub const fn is_generating(&self, field: AiField) -> bool {
        match field {
            AiField::Description => self.pending_description.is_some(),
            AiField::Disclaimer => self.pending_disclaimer.is_some(),
        }
    }

    /// Apply the response for `ticket`.
    ///
    /// Returns `true` if the field was changed. Stale or superseded tickets and
    /// empty responses leave the draft as it is.
    pub fn apply_generated(&mut self, ticket: GenerationTicket, text: Option<String>) -> bool {
        if ticket.epoch != self.epoch {
            debug!(field = ?ticket.field, "Dropping response for abandoned draft");
            return false;
        }

        let slot = self.pending_slot(ticket.field);
        if *slot != Some(ticket.serial) {
            debug!(field = ?ticket.field, "Dropping superseded response");
            return false;
        }
        *slot = None;

        let Some(text) = text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()) else {
            return false;
        };

        match ticket.field {
            AiField::Description => self.draft.description = text,
            AiField::Disclaimer => self.draft.disclaimer = text,
        }
        info!(field = ?ticket.field, "Applied generated text");
        true
    }

    /// Request, await and apply a generated description.
    ///
    /// Returns whether the description changed.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingGenerationContext` if name or brand is empty.
    pub async fn generate_description<G: TextGenerator>(
        &mut self,
        generator: &G,
    ) -> Result<bool, FormError> {
        let ticket = self.request_description()?;
        let text = ticket.request().run(generator).await;
        Ok(self.apply_generated(ticket, text))
    }

    /// Request, await and apply a generated disclaimer.
    ///
    /// Returns whether the disclaimer changed.
    pub async fn generate_disclaimer<G: TextGenerator>(&mut self, generator: &G) -> bool {
        let ticket = self.request_disclaimer();
        let text = ticket.request().run(generator).await;
        self.apply_generated(ticket, text)
    }
}
