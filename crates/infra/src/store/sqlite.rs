//! SQLite-backed product store.
//!
//! Stock-status filters are emitted by translating each [`StockBound`] into a SQL
//! comparison, so the database evaluates exactly the rule the classifier defines.
//! Note that SQLite's `LIKE` and `NOCASE` only fold ASCII letters.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use stockroom_core::ProductId;
use stockroom_products::{
    DashboardStats, Product, ProductFields, ProductFilter, SortDirection, SortField, SortSpec,
    StockBound, StockStatus,
};

use super::{ProductStore, StoreError};

const COLUMNS: &str = "id, name, price, description, stock, low_stock_threshold, \
                       image_path, category_id, created_at, updated_at";

/// SQLite product store (the persistent backend).
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Open (creating if needed) the database at `database_url` and ensure the schema.
    ///
    /// In-memory URLs get a single long-lived connection so every query sees the
    /// same database.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                name                TEXT    NOT NULL CHECK (length(name) > 0),
                price               REAL    NOT NULL CHECK (price >= 0),
                description         TEXT    NULL,
                stock               INTEGER NOT NULL CHECK (stock >= 0),
                low_stock_threshold INTEGER NOT NULL CHECK (low_stock_threshold >= 0),
                image_path          TEXT    NULL,
                category_id         INTEGER NULL,
                created_at          TEXT    NOT NULL,
                updated_at          TEXT    NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS products_stock_idx ON products (stock)")
            .execute(&pool)
            .await?;

        tracing::debug!("products schema ready");
        Ok(Self { pool })
    }
}

fn bound_sql(bound: StockBound) -> &'static str {
    match bound {
        StockBound::StockIsZero => "stock = 0",
        StockBound::StockAboveZero => "stock > 0",
        StockBound::StockAtMostThreshold => "stock <= low_stock_threshold",
        StockBound::StockAboveThreshold => "stock > low_stock_threshold",
    }
}

fn status_sql(status: StockStatus) -> String {
    let parts: Vec<&str> = status.bounds().iter().map(|b| bound_sql(*b)).collect();
    format!("({})", parts.join(" AND "))
}

fn order_sql(sort: SortSpec) -> String {
    let column = match sort.field {
        SortField::Name => "name COLLATE NOCASE",
        SortField::Price => "price",
        SortField::Stock => "stock",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!(" ORDER BY {column} {direction}, id ASC")
}

/// Escape `LIKE` metacharacters so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    let mut sep = " WHERE ";
    if let Some(term) = &filter.search {
        qb.push(sep)
            .push("name LIKE ")
            .push_bind(format!("%{}%", escape_like(term)))
            .push(" ESCAPE '\\'");
        sep = " AND ";
    }
    if let Some(status) = filter.stock_status {
        qb.push(sep).push(status_sql(status));
    }
}

fn count_column(row: &SqliteRow, column: &str) -> Result<u32, StoreError> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|_| StoreError::Decode(format!("{column} out of range: {value}")))
}

fn tally_column(row: &SqliteRow, column: &str) -> Result<u64, StoreError> {
    let value: i64 = row.try_get(column)?;
    u64::try_from(value).map_err(|_| StoreError::Decode(format!("{column} is negative: {value}")))
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        description: row.try_get("description")?,
        stock: count_column(row, "stock")?,
        low_stock_threshold: count_column(row, "low_stock_threshold")?,
        image_path: row.try_get("image_path")?,
        category_id: row.try_get("category_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn insert(
        &self,
        fields: &ProductFields,
        image_path: Option<&str>,
    ) -> Result<Product, StoreError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO products (
                name,
                price,
                description,
                stock,
                low_stock_threshold,
                image_path,
                created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(fields.name.as_str())
            .bind(fields.price)
            .bind(fields.description.as_deref())
            .bind(i64::from(fields.stock))
            .bind(i64::from(fields.low_stock_threshold))
            .bind(image_path)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        product_from_row(&row)
    }

    async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image_path: Option<&str>,
    ) -> Result<Option<Product>, StoreError> {
        let sql = format!(
            r#"
            UPDATE products SET
                name = ?,
                price = ?,
                description = ?,
                stock = ?,
                low_stock_threshold = ?,
                image_path = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(fields.name.as_str())
            .bind(fields.price)
            .bind(fields.description.as_deref())
            .bind(i64::from(fields.stock))
            .bind(i64::from(fields.low_stock_threshold))
            .bind(image_path)
            .bind(Utc::now())
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("DELETE FROM products WHERE id = ? RETURNING {COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortSpec,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Product>, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM products"));
        push_filter(&mut qb, filter);
        qb.push(order_sql(sort))
            .push(" LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS total FROM products");
        push_filter(&mut qb, filter);
        let row = qb.build().fetch_one(&self.pool).await?;
        tally_column(&row, "total")
    }

    async fn stock_counts(&self) -> Result<DashboardStats, StoreError> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN {} THEN 1 ELSE 0 END), 0) AS in_stock,
                COALESCE(SUM(CASE WHEN {} THEN 1 ELSE 0 END), 0) AS low_stock,
                COALESCE(SUM(CASE WHEN {} THEN 1 ELSE 0 END), 0) AS out_of_stock
            FROM products
            "#,
            status_sql(StockStatus::InStock),
            status_sql(StockStatus::LowStock),
            status_sql(StockStatus::OutOfStock),
        );
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(DashboardStats {
            total_products: tally_column(&row, "total")?,
            in_stock: tally_column(&row, "in_stock")?,
            low_stock: tally_column(&row, "low_stock")?,
            out_of_stock: tally_column(&row, "out_of_stock")?,
        })
    }

    async fn low_stock(&self, limit: u32) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE {} ORDER BY stock ASC, id ASC LIMIT ?",
            status_sql(StockStatus::LowStock)
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(product_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;

    async fn store() -> SqliteProductStore {
        SqliteProductStore::connect("sqlite::memory:").await.unwrap()
    }

    #[test]
    fn status_sql_mirrors_bounds() {
        assert_eq!(status_sql(StockStatus::OutOfStock), "(stock = 0)");
        assert_eq!(
            status_sql(StockStatus::LowStock),
            "(stock > 0 AND stock <= low_stock_threshold)"
        );
        assert_eq!(status_sql(StockStatus::InStock), "(stock > low_stock_threshold)");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
        assert_eq!(escape_like("cola"), "cola");
    }

    #[tokio::test]
    async fn crud_round_trip() {
        conformance::crud_round_trip(&store().await).await;
    }

    #[tokio::test]
    async fn status_filters_agree_with_classifier() {
        conformance::status_filters_agree_with_classifier(&store().await).await;
    }

    #[tokio::test]
    async fn low_status_picks_only_the_low_product() {
        conformance::low_status_picks_only_the_low_product(&store().await).await;
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        conformance::search_is_case_insensitive_substring(&store().await).await;
    }

    #[tokio::test]
    async fn sorting_and_pagination() {
        conformance::sorting_and_pagination(&store().await).await;
    }

    #[tokio::test]
    async fn name_sort_ignores_case() {
        conformance::name_sort_ignores_case(&store().await).await;
    }

    #[tokio::test]
    async fn low_stock_feed_is_ordered_and_limited() {
        conformance::low_stock_feed_is_ordered_and_limited(&store().await).await;
    }

    #[tokio::test]
    async fn empty_table_counts_are_zero() {
        let stats = store().await.stock_counts().await.unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("stockroom.db").display());

        let first = SqliteProductStore::connect(&url).await.unwrap();
        let created = first
            .insert(&conformance::fields("Oreo Cookies", 3.5, 2, 4), None)
            .await
            .unwrap();
        drop(first);

        let second = SqliteProductStore::connect(&url).await.unwrap();
        let fetched = second.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Oreo Cookies");
        assert_eq!(fetched.stock_status(), StockStatus::LowStock);
    }
}
