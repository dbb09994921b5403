use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, Product, ProductQuery, ProductStats, ProductSummary, UpdateOutcome,
};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Run a query, projecting matches to summaries in ascending id order
    async fn query(&self, query: ProductQuery) -> ProductResult<Vec<ProductSummary>>;

    async fn exists(&self, id: i32) -> ProductResult<bool>;

    /// Aggregate statistics over every product in one read
    async fn stats(&self) -> ProductResult<ProductStats>;

    /// Persist a new product; the store assigns the id
    async fn insert(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Overwrite every field of the row with `product.id`.
    ///
    /// Reports [`UpdateOutcome::Conflict`] instead of failing when the write
    /// did not apply.
    async fn replace(&self, product: Product) -> ProductResult<UpdateOutcome>;

    /// Remove a product; `false` when no row was removed
    async fn delete(&self, id: i32) -> ProductResult<bool>;
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Product>,
    last_id: i32,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn query(&self, query: ProductQuery) -> ProductResult<Vec<ProductSummary>> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .values()
            .filter(|p| query.matches(p))
            .map(ProductSummary::from)
            .collect())
    }

    async fn exists(&self, id: i32) -> ProductResult<bool> {
        Ok(self.table.read().await.rows.contains_key(&id))
    }

    async fn stats(&self) -> ProductResult<ProductStats> {
        let table = self.table.read().await;
        Ok(ProductStats::compute(table.rows.values()))
    }

    async fn insert(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut table = self.table.write().await;

        table.last_id += 1;
        let product = input.into_product(table.last_id);
        table.rows.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn replace(&self, product: Product) -> ProductResult<UpdateOutcome> {
        let mut table = self.table.write().await;

        match table.rows.get_mut(&product.id) {
            Some(row) => {
                tracing::info!(product_id = product.id, "Updated product");
                *row = product;
                Ok(UpdateOutcome::Updated)
            }
            None => Ok(UpdateOutcome::Conflict),
        }
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let removed = self.table.write().await.rows.remove(&id).is_some();

        if removed {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, category: &str, price: i32, count: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            price,
            category: category.to_string(),
            shelf: String::new(),
            count,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_fresh_and_never_reused() {
        let repo = InMemoryProductRepository::new();

        let first = repo.insert(input("Widget", "Hardware", 500, 10)).await.unwrap();
        let second = repo.insert(input("Gadget", "Hardware", 700, 1)).await.unwrap();
        assert_ne!(first.id, second.id);

        assert!(repo.delete(second.id).await.unwrap());
        let third = repo.insert(input("Gizmo", "Toys", 100, 3)).await.unwrap();
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn test_query_filters_by_category_in_id_order() {
        let repo = InMemoryProductRepository::new();
        repo.insert(input("Hammer", "Tools", 1500, 4)).await.unwrap();
        repo.insert(input("Teddy", "Toys", 900, 2)).await.unwrap();
        repo.insert(input("Wrench", "Tools", 1200, 6)).await.unwrap();

        let tools = repo
            .query(ProductQuery::in_category(Some("Tools".into())))
            .await
            .unwrap();
        let names: Vec<_> = tools.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Hammer", "Wrench"]);

        let all = repo.query(ProductQuery::all()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_replace_missing_row_is_conflict() {
        let repo = InMemoryProductRepository::new();
        let ghost = input("Ghost", "None", 1, 1).into_product(99);

        assert_eq!(repo.replace(ghost).await.unwrap(), UpdateOutcome::Conflict);
    }

    #[tokio::test]
    async fn test_replace_overwrites_all_fields() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(input("Widget", "Hardware", 500, 10)).await.unwrap();

        let replacement = Product {
            name: "Widget Pro".into(),
            price: 900,
            shelf: "B2".into(),
            count: 3,
            ..created.clone()
        };
        assert_eq!(
            repo.replace(replacement).await.unwrap(),
            UpdateOutcome::Updated
        );

        let summary = repo.query(ProductQuery::by_id(created.id)).await.unwrap();
        assert_eq!(summary[0].name, "Widget Pro");
        assert_eq!(summary[0].price, 900);
        assert_eq!(summary[0].count, 3);
    }

    #[tokio::test]
    async fn test_stats_over_rows() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.stats().await.unwrap().average_price, None);

        repo.insert(input("Widget", "Hardware", 500, 10)).await.unwrap();
        repo.insert(input("Gadget", "Hardware", 1500, 2)).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_count, 12);
        assert_eq!(stats.total_value, 8000);
        assert_eq!(stats.average_price, Some(1000.0));
    }
}
