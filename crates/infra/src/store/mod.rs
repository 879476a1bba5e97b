//! Product storage abstractions.
//!
//! Both backends must agree with [`StockStatus::classify`] on every stock-status
//! filter and count: the in-memory store evaluates [`StockBound::holds`], the
//! SQLite store translates the same bounds into SQL.
//!
//! [`StockStatus::classify`]: stockroom_products::StockStatus::classify
//! [`StockBound::holds`]: stockroom_products::StockBound::holds

use async_trait::async_trait;
use thiserror::Error;

use stockroom_core::ProductId;
use stockroom_products::{DashboardStats, Product, ProductFields, ProductFilter, SortSpec};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryProductStore;
pub use sqlite::SqliteProductStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("corrupt row: {0}")]
    Decode(String),
}

/// Queryable collection of product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(
        &self,
        fields: &ProductFields,
        image_path: Option<&str>,
    ) -> Result<Product, StoreError>;

    /// Overwrites every attribute including `image_path`. `None` if the id is unknown.
    async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image_path: Option<&str>,
    ) -> Result<Option<Product>, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Hard delete. Returns the removed record.
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Filter, then order, then slice.
    async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortSpec,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Product>, StoreError>;

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    /// Total and per-status counts taken from a single consistent read.
    async fn stock_counts(&self) -> Result<DashboardStats, StoreError>;

    /// Low-stock products ordered by `stock` ascending, then id.
    async fn low_stock(&self, limit: u32) -> Result<Vec<Product>, StoreError>;
}
