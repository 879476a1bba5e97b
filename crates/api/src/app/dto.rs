use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use serde_json::{Value, json};

use stockroom_infra::image_url;
use stockroom_products::{
    Dashboard, IMAGE_MAX_KILOBYTES, ImageType, LowStockItem, NAME_MAX_CHARS, PageLink, Product,
    ProductFilter, ProductForm, ProductView, SortDirection, SortField, SortSpec, StockStatus,
    UploadedImage,
};

// -------------------------
// Request DTOs
// -------------------------

/// Read a create/update form from a multipart body.
///
/// Unknown parts (`_token`, `_method`, ...) are ignored. A file part without
/// content counts as "no image".
pub async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm, MultipartError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "price" => form.price = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "stock" => form.stock = Some(field.text().await?),
            "low_stock_threshold" => form.low_stock_threshold = Some(field.text().await?),
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                form.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

// -------------------------
// Response mapping helpers
// -------------------------

pub fn product_to_json(p: &Product, public_prefix: &str) -> Value {
    let status = p.stock_status();
    json!({
        "id": p.id,
        "name": p.name,
        "price": p.price,
        "description": p.description,
        "stock": p.stock,
        "low_stock_threshold": p.low_stock_threshold,
        "stock_status": status,
        "stock_status_label": status.label(),
        "image_path": p.image_path,
        "image_url": p.image_path.as_deref().map(|path| image_url(path, public_prefix)),
        "category_id": p.category_id,
        "created_at": p.created_at,
        "updated_at": p.updated_at,
    })
}

pub fn low_stock_item_to_json(item: &LowStockItem, public_prefix: &str) -> Value {
    json!({
        "id": item.id,
        "name": item.name,
        "stock": item.stock,
        "low_stock_threshold": item.low_stock_threshold,
        "image_url": item.image_path.as_deref().map(|path| image_url(path, public_prefix)),
    })
}

pub fn dashboard_to_json(dashboard: &Dashboard, public_prefix: &str) -> Value {
    json!({
        "stats": dashboard.stats,
        "low_stock_items": dashboard
            .low_stock_items
            .iter()
            .map(|i| low_stock_item_to_json(i, public_prefix))
            .collect::<Vec<_>>(),
    })
}

/// Query parameters that reproduce the view's state on another page.
fn link_query(filters: &ProductFilter, sort: SortSpec, page: u32) -> Value {
    json!({
        "search": filters.search,
        "stock_status": filters.stock_status.map(StockStatus::as_param),
        "sort_by": sort.field.as_str(),
        "sort_dir": sort.direction.as_str(),
        "page": page,
    })
}

fn page_link_to_json(link: &PageLink, filters: &ProductFilter, sort: SortSpec) -> Value {
    json!({
        "page": link.page,
        "label": link.label,
        "active": link.active,
        "query": link.page.map(|page| link_query(filters, sort, page)),
    })
}

pub fn view_to_json(view: &ProductView, public_prefix: &str) -> Value {
    let page = &view.products;
    json!({
        "products": {
            "data": page
                .items
                .iter()
                .map(|p| product_to_json(p, public_prefix))
                .collect::<Vec<_>>(),
            "current_page": page.current_page,
            "last_page": page.last_page,
            "per_page": page.per_page,
            "total": page.total,
            "from": page.from,
            "to": page.to,
            "has_more_pages": page.has_more_pages(),
            "links": page
                .links
                .iter()
                .map(|l| page_link_to_json(l, &view.filters, view.sort))
                .collect::<Vec<_>>(),
        },
        "filters": {
            "search": view.filters.search,
            "stock_status": view.filters.stock_status,
        },
        "sort": view.sort,
    })
}

/// Field constraints and choices the create/edit screens render.
pub fn form_metadata_json() -> Value {
    json!({
        "fields": {
            "name": { "required": true, "max_length": NAME_MAX_CHARS },
            "price": { "required": true, "numeric": true, "min": 0 },
            "description": { "required": false },
            "stock": { "required": true, "integer": true, "min": 0 },
            "low_stock_threshold": { "required": true, "integer": true, "min": 0 },
            "image": {
                "required": false,
                "accepted_types": ImageType::ALL.iter().map(|t| t.mime()).collect::<Vec<_>>(),
                "max_kilobytes": IMAGE_MAX_KILOBYTES,
            },
        },
        "stock_statuses": StockStatus::ALL
            .iter()
            .map(|s| json!({ "value": s.as_param(), "label": s.label() }))
            .collect::<Vec<_>>(),
        "sort_fields": SortField::ALLOWED.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
        "sort_directions": SortDirection::ALLOWED.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
    })
}
