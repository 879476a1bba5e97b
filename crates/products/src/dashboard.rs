//! Stock-health summary types.

use serde::Serialize;

use stockroom_core::ProductId;

use crate::product::Product;
use crate::stock::StockStatus;

/// How many low-stock products the dashboard feed shows.
pub const LOW_STOCK_FEED_LIMIT: u32 = 6;

/// Counts over the three-way stock partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_products: u64,
    pub in_stock: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

impl DashboardStats {
    /// Tally one product into the matching bucket.
    pub fn record(&mut self, stock: u32, threshold: u32) {
        self.total_products += 1;
        match StockStatus::classify(stock, threshold) {
            StockStatus::InStock => self.in_stock += 1,
            StockStatus::LowStock => self.low_stock += 1,
            StockStatus::OutOfStock => self.out_of_stock += 1,
        }
    }

    pub fn count(&self, status: StockStatus) -> u64 {
        match status {
            StockStatus::InStock => self.in_stock,
            StockStatus::LowStock => self.low_stock,
            StockStatus::OutOfStock => self.out_of_stock,
        }
    }

    pub fn is_partitioned(&self) -> bool {
        self.in_stock + self.low_stock + self.out_of_stock == self.total_products
    }
}

/// A row of the low-stock feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
    pub low_stock_threshold: u32,
    pub image_path: Option<String>,
}

impl From<Product> for LowStockItem {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            stock: p.stock,
            low_stock_threshold: p.low_stock_threshold,
            image_path: p.image_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    /// Most urgent first (`stock` ascending, then id).
    pub low_stock_items: Vec<LowStockItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_partitioned() {
        let stats = DashboardStats::default();
        assert_eq!(stats.total_products, 0);
        assert!(stats.is_partitioned());
    }

    #[test]
    fn record_uses_classifier() {
        let mut stats = DashboardStats::default();
        stats.record(0, 0);
        stats.record(0, 5);
        stats.record(5, 5);
        stats.record(6, 5);
        assert_eq!(stats.out_of_stock, 2);
        assert_eq!(stats.count(StockStatus::LowStock), 1);
        assert_eq!(stats.in_stock, 1);
        assert!(stats.is_partitioned());
    }
}
