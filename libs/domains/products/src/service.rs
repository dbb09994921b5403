use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, Product, ProductQuery, ProductStats, ProductSummary, UpdateOutcome,
};
use crate::repository::ProductRepository;

/// Service layer for product reads, writes and statistics
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List product summaries, optionally restricted to one category
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<String>) -> ProductResult<Vec<ProductSummary>> {
        self.repository
            .query(ProductQuery::in_category(category))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<ProductSummary> {
        self.repository
            .query(ProductQuery::by_id(id))
            .await?
            .into_iter()
            .next()
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> ProductResult<ProductStats> {
        self.repository.stats().await
    }

    /// Validate and persist a new product
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        self.repository.insert(input).await
    }

    /// Replace every field of product `id`.
    ///
    /// A write that does not apply is re-checked: a vanished row is
    /// `NotFound`, a row that still exists is a retryable `Conflict`.
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: i32, product: Product) -> ProductResult<()> {
        if product.id != id {
            return Err(ProductError::IdMismatch {
                path: id,
                body: product.id,
            });
        }

        product.validate()?;

        match self.repository.replace(product).await? {
            UpdateOutcome::Updated => Ok(()),
            UpdateOutcome::Conflict => {
                if self.repository.exists(id).await? {
                    tracing::warn!(product_id = id, "Concurrent modification on update");
                    Err(ProductError::Conflict(id))
                } else {
                    Err(ProductError::NotFound(id))
                }
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        if !self.repository.exists(id).await? {
            return Err(ProductError::NotFound(id));
        }

        // Lost a race with another delete
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}
