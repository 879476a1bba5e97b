//! Product catalog service: listing, dashboard summary and product writes.
//!
//! Sits between the HTTP layer and the storage collaborators. All business rules
//! come from `stockroom-products`; this type only sequences store and image calls.

use std::sync::Arc;

use thiserror::Error;

use stockroom_core::{DomainError, ProductId, ValidationErrors};
use stockroom_products::{
    Dashboard, LOW_STOCK_FEED_LIMIT, ListParams, LowStockItem, PAGE_SIZE, Page, Product,
    ProductForm, ProductView, RawListParams, UploadedImage,
};

use crate::images::{ImageStore, ImageStoreError, is_external};
use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Image(#[from] ImageStoreError),
}

impl From<ValidationErrors> for CatalogError {
    fn from(value: ValidationErrors) -> Self {
        Self::Domain(DomainError::Validation(value))
    }
}

#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn ProductStore>,
    images: Arc<dyn ImageStore>,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn ProductStore>, images: Arc<dyn ImageStore>) -> Self {
        Self { store, images }
    }

    pub fn images(&self) -> &dyn ImageStore {
        self.images.as_ref()
    }

    /// One page of the product listing.
    ///
    /// Raw parameters are normalized first, so this only fails on storage errors.
    /// A page past the end yields an empty item list with the requested page echoed.
    #[tracing::instrument(skip(self, raw))]
    pub async fn build_view(&self, raw: &RawListParams) -> Result<ProductView, CatalogError> {
        let params = ListParams::normalize(raw);

        let total = self.store.count(&params.filter).await?;
        let items = self
            .store
            .list(&params.filter, params.sort, params.offset(), PAGE_SIZE)
            .await?;

        tracing::debug!(
            total,
            page = params.page,
            returned = items.len(),
            "built product view"
        );

        Ok(ProductView {
            products: Page::new(items, params.page, PAGE_SIZE, total),
            filters: params.filter,
            sort: params.sort,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, CatalogError> {
        let stats = self.store.stock_counts().await?;
        let low_stock_items = self
            .store
            .low_stock(LOW_STOCK_FEED_LIMIT)
            .await?
            .into_iter()
            .map(LowStockItem::from)
            .collect();
        Ok(Dashboard {
            stats,
            low_stock_items,
        })
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn create(&self, form: ProductForm) -> Result<Product, CatalogError> {
        let draft = form.validate()?;
        let key = self.store_upload(draft.image.as_ref()).await?;

        match self.store.insert(&draft.fields, key.as_deref()).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id, name = %product.name, "product created");
                Ok(product)
            }
            Err(e) => {
                self.release(key.as_deref()).await;
                Err(e.into())
            }
        }
    }

    /// Overwrite a product. Without a new upload the existing image is kept; with
    /// one, the previously uploaded file is removed once the record points elsewhere.
    #[tracing::instrument(skip(self, form))]
    pub async fn update(&self, id: ProductId, form: ProductForm) -> Result<Product, CatalogError> {
        let existing = self.get(id).await?;
        let draft = form.validate()?;
        let key = self.store_upload(draft.image.as_ref()).await?;

        let image_path = key.as_deref().or(existing.image_path.as_deref());
        match self.store.update(id, &draft.fields, image_path).await {
            Ok(Some(product)) => {
                if key.is_some() {
                    self.release(existing.image_path.as_deref()).await;
                }
                tracing::info!(product_id = %product.id, "product updated");
                Ok(product)
            }
            Ok(None) => {
                self.release(key.as_deref()).await;
                Err(DomainError::not_found().into())
            }
            Err(e) => {
                self.release(key.as_deref()).await;
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<Product, CatalogError> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        self.release(removed.image_path.as_deref()).await;
        tracing::info!(product_id = %removed.id, "product deleted");
        Ok(removed)
    }

    async fn store_upload(
        &self,
        image: Option<&UploadedImage>,
    ) -> Result<Option<String>, ImageStoreError> {
        match image {
            Some(image) => self.images.store(image).await.map(Some),
            None => Ok(None),
        }
    }

    /// Best-effort removal of an uploaded file no record refers to anymore.
    async fn release(&self, image_path: Option<&str>) {
        let Some(path) = image_path.filter(|p| !is_external(p)) else {
            return;
        };
        if let Err(e) = self.images.remove(path).await {
            tracing::warn!(key = %path, error = %e, "failed to remove product image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::LocalImageStore;
    use crate::store::InMemoryProductStore;
    use stockroom_products::{ProductFields, SortSpec, StockStatus};

    struct Fixture {
        catalog: ProductCatalog,
        store: Arc<InMemoryProductStore>,
        dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryProductStore::new());
        let catalog = ProductCatalog::new(store.clone(), Arc::new(LocalImageStore::new(dir.path())));
        Fixture {
            catalog,
            store,
            dir,
        }
    }

    fn form(name: &str, stock: u32, threshold: u32) -> ProductForm {
        ProductForm {
            name: Some(name.to_string()),
            price: Some("1.99".to_string()),
            description: None,
            stock: Some(stock.to_string()),
            low_stock_threshold: Some(threshold.to_string()),
            image: None,
        }
    }

    fn with_png(mut f: ProductForm) -> ProductForm {
        f.image = Some(UploadedImage {
            file_name: Some("photo.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec(),
        });
        f
    }

    fn raw_status(status: &str) -> RawListParams {
        RawListParams {
            stock_status: Some(status.to_string()),
            ..RawListParams::default()
        }
    }

    #[tokio::test]
    async fn out_of_stock_product_shows_up_in_out_filter_and_dashboard() {
        let fx = fixture();
        fx.catalog.create(form("Ripe Bananas", 30, 5)).await.unwrap();
        let before = fx.catalog.dashboard().await.unwrap().stats;

        let created = fx.catalog.create(form("Oreo Cookies", 0, 5)).await.unwrap();
        assert_eq!(created.stock_status(), StockStatus::OutOfStock);

        for (status, expected) in [("out", true), ("low", false), ("in", false)] {
            let view = fx.catalog.build_view(&raw_status(status)).await.unwrap();
            let listed = view.products.items.iter().any(|p| p.id == created.id);
            assert_eq!(listed, expected, "{status}");
        }

        let after = fx.catalog.dashboard().await.unwrap().stats;
        assert_eq!(after.out_of_stock, before.out_of_stock + 1);
        assert_eq!(after.total_products, before.total_products + 1);
        assert!(after.is_partitioned());
    }

    #[tokio::test]
    async fn twenty_five_products_paginate_into_three_pages() {
        let fx = fixture();
        for i in 0..25 {
            fx.catalog.create(form(&format!("Item {i:02}"), 10, 2)).await.unwrap();
        }

        let raw = RawListParams {
            page: Some("3".to_string()),
            ..RawListParams::default()
        };
        let view = fx.catalog.build_view(&raw).await.unwrap();
        assert_eq!(view.products.items.len(), 5);
        assert_eq!(view.products.last_page, 3);
        assert_eq!(view.products.total, 25);
        assert_eq!(view.products.from, Some(21));
        assert_eq!(view.products.to, Some(25));

        let raw = RawListParams {
            page: Some("9".to_string()),
            ..RawListParams::default()
        };
        let view = fx.catalog.build_view(&raw).await.unwrap();
        assert!(view.products.items.is_empty());
        assert_eq!(view.products.current_page, 9);
    }

    #[tokio::test]
    async fn search_matches_substring_and_echoes_state() {
        let fx = fixture();
        fx.catalog.create(form("Coca-Cola 1.5L", 20, 5)).await.unwrap();
        fx.catalog.create(form("Instant Coffee", 20, 5)).await.unwrap();

        let raw = RawListParams {
            search: Some("cola".to_string()),
            sort_by: Some("colour".to_string()),
            ..RawListParams::default()
        };
        let view = fx.catalog.build_view(&raw).await.unwrap();
        assert_eq!(view.products.items.len(), 1);
        assert_eq!(view.products.items[0].name, "Coca-Cola 1.5L");
        assert_eq!(view.filters.search.as_deref(), Some("cola"));
        assert_eq!(view.sort, SortSpec::default());
    }

    #[tokio::test]
    async fn low_stock_feed_is_capped() {
        let fx = fixture();
        for stock in [9, 1, 4, 2, 3, 5, 1, 2] {
            fx.catalog.create(form(&format!("p{stock}"), stock, 5)).await.unwrap();
        }
        let dashboard = fx.catalog.dashboard().await.unwrap();
        assert_eq!(dashboard.stats.low_stock, 7);
        assert_eq!(dashboard.low_stock_items.len(), LOW_STOCK_FEED_LIMIT as usize);
        let stocks: Vec<u32> = dashboard.low_stock_items.iter().map(|i| i.stock).collect();
        assert_eq!(stocks, vec![1, 1, 2, 2, 3, 4]);
    }

    #[tokio::test]
    async fn invalid_form_stores_nothing() {
        let fx = fixture();
        let mut bad = with_png(form("", 1, 1));
        bad.price = Some("abc".to_string());

        let err = fx.catalog.create(bad).await.unwrap_err();
        let CatalogError::Domain(DomainError::Validation(errors)) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "price"]);
        assert_eq!(fx.store.stock_counts().await.unwrap().total_products, 0);
        assert!(!fx.dir.path().join("products").exists());
    }

    #[tokio::test]
    async fn image_lifecycle_follows_the_record() {
        let fx = fixture();
        let created = fx.catalog.create(with_png(form("Fresh Broccoli", 8, 2))).await.unwrap();
        let first = created.image_path.clone().unwrap();
        assert!(fx.dir.path().join(&first).exists());

        // No new upload keeps the current image.
        let kept = fx.catalog.update(created.id, form("Fresh Broccoli", 7, 2)).await.unwrap();
        assert_eq!(kept.image_path.as_deref(), Some(first.as_str()));

        let replaced = fx
            .catalog
            .update(created.id, with_png(form("Fresh Broccoli", 7, 2)))
            .await
            .unwrap();
        let second = replaced.image_path.clone().unwrap();
        assert_ne!(second, first);
        assert!(!fx.dir.path().join(&first).exists());
        assert!(fx.dir.path().join(&second).exists());

        fx.catalog.delete(created.id).await.unwrap();
        assert!(!fx.dir.path().join(&second).exists());
    }

    #[tokio::test]
    async fn external_image_urls_survive_delete() {
        let fx = fixture();
        let fields = ProductFields {
            name: "Fresh Red Apple".to_string(),
            price: 1.0,
            description: None,
            stock: 3,
            low_stock_threshold: 5,
        };
        let url = "https://images.unsplash.com/photo-1560806887-1e4cd0b6cbd6";
        let product = fx.store.insert(&fields, Some(url)).await.unwrap();

        let removed = fx.catalog.delete(product.id).await.unwrap();
        assert_eq!(removed.image_path.as_deref(), Some(url));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let fx = fixture();
        let id = ProductId::new(42);
        for err in [
            fx.catalog.get(id).await.unwrap_err(),
            fx.catalog.update(id, form("x", 1, 1)).await.unwrap_err(),
            fx.catalog.delete(id).await.unwrap_err(),
        ] {
            assert!(matches!(err, CatalogError::Domain(DomainError::NotFound)), "{err:?}");
        }
    }
}
