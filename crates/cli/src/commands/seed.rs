//! Seed the product catalog.
//!
//! Inserts the starter catalog. Skipped when products already exist, so the
//! command is safe to run repeatedly (e.g., from a deploy hook).

use rust_decimal::Decimal;
use tracing::info;

use ecomshop_api::db::ProductRepository;

use super::{CommandError, database_url};

/// A catalog entry to seed.
struct SeedProduct {
    name: &'static str,
    price: i64,
    description: &'static str,
    image: &'static str,
}

/// The starter catalog.
const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Laptop",
        price: 50000,
        description: "Powerful laptop with 16GB RAM, 512GB SSD, and a fast processor.",
        image: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?q=80&w=1470&auto=format&fit=crop",
    },
    SeedProduct {
        name: "Smartphone",
        price: 20000,
        description: "Latest smartphone with high-resolution camera and all-day battery life.",
        image: "https://images.unsplash.com/photo-1601784551446-20c9e07cdbdb?q=80&w=1467&auto=format&fit=crop",
    },
    SeedProduct {
        name: "Wireless Headphones",
        price: 3000,
        description: "Premium wireless headphones with active noise cancellation.",
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?q=80&w=1470&auto=format&fit=crop",
    },
    SeedProduct {
        name: "Smart Watch",
        price: 5000,
        description: "Fitness tracker with heart rate monitor and sleep tracking.",
        image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?q=80&w=1399&auto=format&fit=crop",
    },
    SeedProduct {
        name: "Gaming Console",
        price: 35000,
        description: "Next-generation gaming console with 4K graphics and 1TB storage.",
        image: "https://images.unsplash.com/photo-1605901309584-818e25960a8f?q=80&w=1619&auto=format&fit=crop",
    },
    SeedProduct {
        name: "Digital Camera",
        price: 25000,
        description: "Professional-grade digital camera with interchangeable lenses.",
        image: "https://images.unsplash.com/photo-1516035069371-29a1b244cc32?q=80&w=1538&auto=format&fit=crop",
    },
];

/// Seed the product catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an insert fails.
pub async fn products() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = ecomshop_api::db::create_pool(&database_url).await?;

    let repo = ProductRepository::new(&pool);

    let existing = repo.count().await?;
    if existing > 0 {
        info!("Catalog already has {existing} products, skipping seed");
        return Ok(());
    }

    for entry in CATALOG {
        let product = repo
            .insert(
                entry.name,
                Decimal::from(entry.price),
                entry.description,
                Some(entry.image),
            )
            .await?;
        info!("Seeded product {} ({})", product.name, product.id);
    }

    info!("Database seeding completed successfully");
    Ok(())
}
