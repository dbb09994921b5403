use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
};

use crate::{
    entity,
    error::ProductResult,
    models::{CreateProduct, Product, ProductQuery, ProductStats, ProductSummary, UpdateOutcome},
    repository::ProductRepository,
};

/// Single-pass aggregate over the table. Sums are computed as BIGINT and
/// `AVG` over zero rows yields NULL.
const STATS_SQL: &str = r#"SELECT
    COALESCE(SUM("count"), 0)::BIGINT AS total_count,
    COALESCE(SUM("count"::BIGINT * "price"), 0)::BIGINT AS total_value,
    AVG("price")::DOUBLE PRECISION AS average_price
FROM "products""#;

#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn query(&self, query: ProductQuery) -> ProductResult<Vec<ProductSummary>> {
        let mut select = entity::Entity::find()
            .select_only()
            .columns([
                entity::Column::Id,
                entity::Column::Name,
                entity::Column::Price,
                entity::Column::Count,
            ]);

        if let Some(id) = query.id {
            select = select.filter(entity::Column::Id.eq(id));
        }

        if let Some(category) = query.category {
            select = select.filter(entity::Column::Category.eq(category));
        }

        let rows = select
            .order_by_asc(entity::Column::Id)
            .into_model::<ProductSummary>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn exists(&self, id: i32) -> ProductResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn stats(&self) -> ProductResult<ProductStats> {
        let stats = ProductStats::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            STATS_SQL,
        ))
        .one(&self.db)
        .await?;

        // An aggregate without GROUP BY always yields one row
        Ok(stats.unwrap_or(ProductStats {
            total_count: 0,
            total_value: 0,
            average_price: None,
        }))
    }

    async fn insert(&self, input: CreateProduct) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn replace(&self, product: Product) -> ProductResult<UpdateOutcome> {
        let id = product.id;
        let result = entity::Entity::update_many()
            .set(entity::replacement(product))
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            tracing::warn!(product_id = id, "Update affected no rows");
            return Ok(UpdateOutcome::Conflict);
        }

        tracing::info!(product_id = id, "Updated product");
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
