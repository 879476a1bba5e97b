//! Product listing parameters: untrusted input in, safe query state out.
//!
//! Nothing here fails. Unknown or malformed values degrade to defaults so the
//! listing always renders; the normalized state is echoed back to the caller.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::pagination::Page;
use crate::product::Product;
use crate::stock::StockStatus;

/// Fixed listing page size.
pub const PAGE_SIZE: u32 = 10;

/// Query-string parameters as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawListParams {
    pub search: Option<String>,
    pub stock_status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<String>,
}

impl<K, V> FromIterator<(K, V)> for RawListParams
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Collect query pairs. Unknown keys are ignored; a repeated key keeps its last value.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut raw = RawListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "search" => &mut raw.search,
                "stock_status" => &mut raw.stock_status,
                "sort_by" => &mut raw.sort_by,
                "sort_dir" => &mut raw.sort_dir,
                "page" => &mut raw.page,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        raw
    }
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Price,
    Stock,
}

impl SortField {
    /// The only fields a listing may be ordered by.
    pub const ALLOWED: [SortField; 3] = [SortField::Name, SortField::Price, SortField::Stock];

    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALLOWED.into_iter().find(|f| f.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::Stock => "stock",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const ALLOWED: [SortDirection; 2] = [SortDirection::Asc, SortDirection::Desc];

    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALLOWED.into_iter().find(|d| d.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Resolved ordering. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SortSpec {
    #[serde(rename = "by")]
    pub field: SortField,
    #[serde(rename = "dir")]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// In-memory ordering equivalent to the SQL `ORDER BY` storage emits.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Stock => a.stock.cmp(&b.stock),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Normalized filters. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub stock_status: Option<StockStatus>,
}

impl ProductFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            stock_status: None,
        }
    }

    pub fn status(status: StockStatus) -> Self {
        Self {
            search: None,
            stock_status: Some(status),
        }
    }

    /// In-memory predicate: case-insensitive substring on name, then stock status.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            if !product.name.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        match self.stock_status {
            Some(status) => status.matches(product.stock, product.low_stock_threshold),
            None => true,
        }
    }
}

/// Normalized listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: ProductFilter,
    pub sort: SortSpec,
    /// 1-based page number.
    pub page: u32,
}

impl ListParams {
    pub fn normalize(raw: &RawListParams) -> Self {
        let search = raw
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let stock_status = raw.stock_status.as_deref().and_then(StockStatus::from_param);

        let field = raw
            .sort_by
            .as_deref()
            .and_then(SortField::from_param)
            .unwrap_or_default();
        let direction = raw
            .sort_dir
            .as_deref()
            .and_then(SortDirection::from_param)
            .unwrap_or_default();

        let page = raw
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        Self {
            filter: ProductFilter {
                search,
                stock_status,
            },
            sort: SortSpec::new(field, direction),
            page,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(PAGE_SIZE)
    }
}

/// One page of the product listing plus the state that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub products: Page<Product>,
    pub filters: ProductFilter,
    pub sort: SortSpec,
}
