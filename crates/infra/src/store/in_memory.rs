use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use stockroom_core::{Entity, ProductId};
use stockroom_products::{
    DashboardStats, Product, ProductFields, ProductFilter, SortSpec, StockStatus,
};

use super::{ProductStore, StoreError};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(
        &self,
        fields: &ProductFields,
        image_path: Option<&str>,
    ) -> Result<Product, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        state.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(state.last_id),
            name: fields.name.clone(),
            price: fields.price,
            description: fields.description.clone(),
            stock: fields.stock,
            low_stock_threshold: fields.low_stock_threshold,
            image_path: image_path.map(str::to_string),
            category_id: None,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(product.id(), product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image_path: Option<&str>,
    ) -> Result<Option<Product>, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(row) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.name = fields.name.clone();
        row.price = fields.price;
        row.description = fields.description.clone();
        row.stock = fields.stock;
        row.low_stock_threshold = fields.low_stock_threshold;
        row.image_path = image_path.map(str::to_string);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.get(&id).cloned())
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.remove(&id))
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortSpec,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Product>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut matched: Vec<&Product> = state.rows.values().filter(|p| filter.matches(p)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));
        Ok(matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn stock_counts(&self) -> Result<DashboardStats, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut stats = DashboardStats::default();
        for p in state.rows.values() {
            stats.record(p.stock, p.low_stock_threshold);
        }
        Ok(stats)
    }

    async fn low_stock(&self, limit: u32) -> Result<Vec<Product>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut low: Vec<&Product> = state
            .rows
            .values()
            .filter(|p| StockStatus::LowStock.matches(p.stock, p.low_stock_threshold))
            .collect();
        low.sort_by_key(|p| (p.stock, p.id));
        Ok(low.into_iter().take(limit as usize).cloned().collect())
    }
}
