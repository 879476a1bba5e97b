//! Stock classification.
//!
//! A product is in exactly one of three states, derived from its current stock
//! and its low-stock threshold:
//!
//! - `OutOfStock` ⟺ `stock == 0`
//! - `LowStock`   ⟺ `0 < stock <= threshold`
//! - `InStock`    ⟺ `stock > threshold`
//!
//! The same rule is available as a pure function ([`StockStatus::classify`]) and as
//! a conjunction of primitive [`StockBound`]s that storage backends translate into
//! their own predicate language, so set filters and counts never drift from the
//! per-row classification.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "in")]
    InStock,
    #[serde(rename = "low")]
    LowStock,
    #[serde(rename = "out")]
    OutOfStock,
}

/// A primitive comparison over `stock` and `low_stock_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockBound {
    /// `stock = 0`
    StockIsZero,
    /// `stock > 0`
    StockAboveZero,
    /// `stock <= low_stock_threshold`
    StockAtMostThreshold,
    /// `stock > low_stock_threshold`
    StockAboveThreshold,
}

impl StockBound {
    pub fn holds(self, stock: u32, threshold: u32) -> bool {
        match self {
            StockBound::StockIsZero => stock == 0,
            StockBound::StockAboveZero => stock > 0,
            StockBound::StockAtMostThreshold => stock <= threshold,
            StockBound::StockAboveThreshold => stock > threshold,
        }
    }
}

impl StockStatus {
    pub const ALL: [StockStatus; 3] = [
        StockStatus::OutOfStock,
        StockStatus::LowStock,
        StockStatus::InStock,
    ];

    pub fn classify(stock: u32, threshold: u32) -> Self {
        if stock == 0 {
            StockStatus::OutOfStock
        } else if stock <= threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Bounds that must all hold for a product to be in this state.
    pub fn bounds(self) -> &'static [StockBound] {
        match self {
            StockStatus::OutOfStock => &[StockBound::StockIsZero],
            StockStatus::LowStock => &[StockBound::StockAboveZero, StockBound::StockAtMostThreshold],
            StockStatus::InStock => &[StockBound::StockAboveThreshold],
        }
    }

    pub fn matches(self, stock: u32, threshold: u32) -> bool {
        self.bounds().iter().all(|b| b.holds(stock, threshold))
    }

    /// Parse the `stock_status` query value. Matching is exact.
    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_param() == value)
    }

    pub fn as_param(self) -> &'static str {
        match self {
            StockStatus::InStock => "in",
            StockStatus::LowStock => "low",
            StockStatus::OutOfStock => "out",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::LowStock => "Low stock",
            StockStatus::OutOfStock => "Out of stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stock_is_out_for_every_threshold() {
        for threshold in [0, 1, 5, u32::MAX] {
            assert_eq!(StockStatus::classify(0, threshold), StockStatus::OutOfStock);
        }
    }

    #[test]
    fn stock_equal_to_threshold_is_low() {
        for threshold in [1, 5, 100] {
            assert_eq!(StockStatus::classify(threshold, threshold), StockStatus::LowStock);
        }
    }

    #[test]
    fn stock_one_above_threshold_is_in() {
        for threshold in [0, 1, 5, 100] {
            assert_eq!(StockStatus::classify(threshold + 1, threshold), StockStatus::InStock);
        }
    }

    #[test]
    fn bounds_agree_with_classify_on_boundaries() {
        for threshold in [0u32, 1, 5] {
            for stock in [0, threshold, threshold + 1] {
                let status = StockStatus::classify(stock, threshold);
                for candidate in StockStatus::ALL {
                    assert_eq!(
                        candidate.matches(stock, threshold),
                        candidate == status,
                        "stock={stock} threshold={threshold} candidate={candidate}"
                    );
                }
            }
        }
    }

    #[test]
    fn params_are_exact() {
        assert_eq!(StockStatus::from_param("low"), Some(StockStatus::LowStock));
        assert_eq!(StockStatus::from_param("in"), Some(StockStatus::InStock));
        assert_eq!(StockStatus::from_param("out"), Some(StockStatus::OutOfStock));
        assert_eq!(StockStatus::from_param("LOW"), None);
        assert_eq!(StockStatus::from_param(""), None);
        assert_eq!(StockStatus::from_param("sideways"), None);
    }

    #[test]
    fn serializes_as_param() {
        let json = serde_json::to_string(&StockStatus::LowStock).unwrap();
        assert_eq!(json, "\"low\"");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: the three states partition every (stock, threshold) pair.
            #[test]
            fn exactly_one_status_matches(stock in 0u32..10_000, threshold in 0u32..10_000) {
                let matching: Vec<_> = StockStatus::ALL
                    .into_iter()
                    .filter(|s| s.matches(stock, threshold))
                    .collect();
                prop_assert_eq!(matching, vec![StockStatus::classify(stock, threshold)]);
            }

            /// Property: classification is deterministic.
            #[test]
            fn classify_is_deterministic(stock in any::<u32>(), threshold in any::<u32>()) {
                prop_assert_eq!(
                    StockStatus::classify(stock, threshold),
                    StockStatus::classify(stock, threshold)
                );
            }
        }
    }
}
