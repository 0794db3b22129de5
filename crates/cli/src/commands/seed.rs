//! Demo catalog seeding.

use sundry_core::Category;
use sundry_store::models::product::NewProduct;
use sundry_store::services::catalog::CatalogService;

/// Seed a small demo catalog.
///
/// A no-op when products already exist, so it is safe to run repeatedly.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let catalog = CatalogService::new(&pool);

    if !catalog.list_products().await?.is_empty() {
        tracing::info!("catalog not empty, skipping seed");
        return Ok(());
    }

    for product in demo_products() {
        catalog.create_product(&product).await?;
    }

    tracing::info!("demo catalog seeded");
    Ok(())
}

fn demo_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Oolong Tea".to_owned(),
            description: "Loose-leaf oolong, 100g tin.".to_owned(),
            price: 12,
            stock: 40,
            category: Category::Food,
        },
        NewProduct {
            name: "Mechanical Keyboard".to_owned(),
            description: "Tenkeyless, brown switches.".to_owned(),
            price: 85,
            stock: 12,
            category: Category::Devices,
        },
        NewProduct {
            name: "Chess Set".to_owned(),
            description: "Weighted pieces, folding board.".to_owned(),
            price: 30,
            stock: 25,
            category: Category::Games,
        },
        NewProduct {
            name: "Field Guide to Mushrooms".to_owned(),
            description: "Illustrated, 320 pages.".to_owned(),
            price: 22,
            stock: 18,
            category: Category::Books,
        },
    ]
}
