//! Products domain module.
//!
//! This crate contains the business rules for the product catalog, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage): stock
//! classification, form validation, listing-parameter normalization, pagination
//! and dashboard summary types.

pub mod dashboard;
pub mod pagination;
pub mod product;
pub mod query;
pub mod stock;

pub use dashboard::{Dashboard, DashboardStats, LOW_STOCK_FEED_LIMIT, LowStockItem};
pub use pagination::{Page, PageLink};
pub use product::{
    IMAGE_MAX_KILOBYTES, ImageType, NAME_MAX_CHARS, Product, ProductDraft, ProductFields,
    ProductForm, UploadedImage,
};
pub use query::{
    ListParams, PAGE_SIZE, ProductFilter, ProductView, RawListParams, SortDirection, SortField,
    SortSpec,
};
pub use stock::{StockBound, StockStatus};
