//! Demo catalog for local development.

use stockroom_products::ProductFields;

use crate::store::{ProductStore, StoreError};

struct DemoProduct {
    name: &'static str,
    price: f64,
    description: &'static str,
    stock: u32,
    low_stock_threshold: u32,
    image: &'static str,
}

const DEMO_PRODUCTS: [DemoProduct; 10] = [
    DemoProduct {
        name: "Fresh Red Apple",
        price: 12.50,
        description: "Crisp red apples, sold per kilo.",
        stock: 42,
        low_stock_threshold: 8,
        image: "https://images.unsplash.com/photo-1567306226416-28f0efdc88ce",
    },
    DemoProduct {
        name: "Ripe Bananas",
        price: 10.99,
        description: "A bunch of ripe yellow bananas.",
        stock: 6,
        low_stock_threshold: 10,
        image: "https://images.unsplash.com/photo-1574226516831-e1dff420e12e",
    },
    DemoProduct {
        name: "Fresh Broccoli",
        price: 18.25,
        description: "Green broccoli crowns.",
        stock: 0,
        low_stock_threshold: 5,
        image: "https://images.unsplash.com/photo-1584305574644-4f1d2c51f3c3",
    },
    DemoProduct {
        name: "Coca-Cola 1.5L",
        price: 24.00,
        description: "Chilled soft drink bottle.",
        stock: 35,
        low_stock_threshold: 6,
        image: "https://images.unsplash.com/photo-1580913116721-3b1975a7e16e",
    },
    DemoProduct {
        name: "Oreo Cookies",
        price: 31.40,
        description: "Chocolate sandwich cookies.",
        stock: 3,
        low_stock_threshold: 4,
        image: "https://images.unsplash.com/photo-1580910051070-dc4c1e746b20",
    },
    DemoProduct {
        name: "Dishwashing Liquid",
        price: 45.75,
        description: "Lemon scented dish soap.",
        stock: 17,
        low_stock_threshold: 5,
        image: "https://images.unsplash.com/photo-1615475118193-3b33f984f90b",
    },
    DemoProduct {
        name: "Hydrating Shampoo",
        price: 129.90,
        description: "Shampoo for dry hair.",
        stock: 9,
        low_stock_threshold: 9,
        image: "https://images.unsplash.com/photo-1600180758890-6b94519a0c07",
    },
    DemoProduct {
        name: "Instant Coffee",
        price: 210.00,
        description: "Freeze-dried instant coffee jar.",
        stock: 0,
        low_stock_threshold: 3,
        image: "https://images.unsplash.com/photo-1504754524776-8f4f37790ca0",
    },
    DemoProduct {
        name: "Classic Bread Loaf",
        price: 15.60,
        description: "Freshly baked white bread.",
        stock: 2,
        low_stock_threshold: 7,
        image: "https://images.unsplash.com/photo-1511385348-a52de1c948fe",
    },
    DemoProduct {
        name: "Bathroom Tissue Roll",
        price: 89.99,
        description: "Pack of soft tissue rolls.",
        stock: 50,
        low_stock_threshold: 10,
        image: "https://images.unsplash.com/photo-1584551883459-7d5cbe0f1f8d",
    },
];

/// Insert the demo catalog into an empty store. Returns how many products were added.
pub async fn seed_demo_products(store: &dyn ProductStore) -> Result<usize, StoreError> {
    let existing = store.stock_counts().await?.total_products;
    if existing > 0 {
        tracing::info!(existing, "store not empty; skipping demo seed");
        return Ok(0);
    }

    for demo in &DEMO_PRODUCTS {
        let fields = ProductFields {
            name: demo.name.to_string(),
            price: demo.price,
            description: Some(demo.description.to_string()),
            stock: demo.stock,
            low_stock_threshold: demo.low_stock_threshold,
        };
        store.insert(&fields, Some(demo.image)).await?;
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "seeded demo products");
    Ok(DEMO_PRODUCTS.len())
}
