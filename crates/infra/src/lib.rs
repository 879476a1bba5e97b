//! Infrastructure layer: product storage, image files, configuration and the
//! catalog service that ties them together.

pub mod catalog;
pub mod config;
pub mod images;
pub mod seed;
pub mod store;

pub use catalog::{CatalogError, ProductCatalog};
pub use config::{AppConfig, ConfigError, StorageConfig};
pub use images::{ImageStore, ImageStoreError, LocalImageStore, StoredImage, image_url};
pub use store::{InMemoryProductStore, ProductStore, SqliteProductStore, StoreError};
