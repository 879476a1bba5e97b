use std::sync::Arc;

use anyhow::Context;

use stockroom_infra::{
    AppConfig, InMemoryProductStore, LocalImageStore, ProductCatalog, ProductStore,
    SqliteProductStore, StorageConfig, seed::seed_demo_products,
};

/// Long-lived services shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: ProductCatalog,
    /// URL prefix uploaded images are served from.
    pub public_storage_prefix: String,
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn ProductStore> = match &config.storage {
        StorageConfig::InMemory => {
            tracing::info!("using in-memory product store");
            Arc::new(InMemoryProductStore::new())
        }
        StorageConfig::Sqlite { database_url } => {
            tracing::info!(%database_url, "using sqlite product store");
            Arc::new(
                SqliteProductStore::connect(database_url)
                    .await
                    .context("failed to open product database")?,
            )
        }
    };

    if config.seed_demo_products {
        seed_demo_products(store.as_ref())
            .await
            .context("failed to seed demo products")?;
    }

    tracing::info!(root = %config.image_storage_dir.display(), "product images on local disk");
    let images = Arc::new(LocalImageStore::new(&config.image_storage_dir));

    Ok(AppServices {
        catalog: ProductCatalog::new(store, images),
        public_storage_prefix: config.public_storage_prefix.clone(),
    })
}
