use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{CreateProduct, Product};

/// Sea-ORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub category: String,
    pub shelf: String,
    pub count: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            category: model.category,
            shelf: model.shelf,
            count: model.count,
            description: model.description,
        }
    }
}

// id is left unset so the serial column assigns it
impl From<CreateProduct> for ActiveModel {
    fn from(input: CreateProduct) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            price: Set(input.price),
            category: Set(input.category),
            shelf: Set(input.shelf),
            count: Set(input.count),
            description: Set(input.description),
        }
    }
}

/// Every mutable column of `product`, for a full-replacement `UPDATE`.
/// The key is not part of the SET list; callers filter on it.
pub fn replacement(product: Product) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(product.name),
        price: Set(product.price),
        category: Set(product.category),
        shelf: Set(product.shelf),
        count: Set(product.count),
        description: Set(product.description),
    }
}
