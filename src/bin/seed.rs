use restaurant_ordering_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    services::table_service::ordering_url,
};
use rust_decimal::Decimal;
use uuid::Uuid;

// Fixed ids keep the seed idempotent across runs.
const RESTAURANT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);
const MAIN_COURSE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0101);
const DRINKS_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0102);
const SNACKS_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0103);

struct SeedItem {
    category_id: Uuid,
    name: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
    min_stock: i32,
    unit: &'static str,
}

const MENU: &[SeedItem] = &[
    SeedItem { category_id: MAIN_COURSE_ID, name: "Nasi Goreng Spesial", description: "Nasi goreng dengan ayam, telur, acar, dan kerupuk udang", price: 30000, stock: 50, min_stock: 10, unit: "porsi" },
    SeedItem { category_id: MAIN_COURSE_ID, name: "Ayam Bakar Kecap", description: "Ayam kampung bakar bumbu kecap manis dengan nasi putih dan lalapan", price: 35000, stock: 25, min_stock: 5, unit: "porsi" },
    SeedItem { category_id: MAIN_COURSE_ID, name: "Sate Kambing Madura", description: "10 tusuk sate kambing dengan bumbu kacang, lontong, dan timun", price: 45000, stock: 3, min_stock: 5, unit: "porsi" },
    SeedItem { category_id: MAIN_COURSE_ID, name: "Gado-Gado Jakarta", description: "Sayuran segar dengan bumbu kacang gurih dan kerupuk", price: 20000, stock: 30, min_stock: 8, unit: "porsi" },
    SeedItem { category_id: MAIN_COURSE_ID, name: "Rendang Daging Sapi", description: "Daging sapi bumbu rendang khas Padang dengan nasi putih", price: 45000, stock: 20, min_stock: 5, unit: "porsi" },
    SeedItem { category_id: MAIN_COURSE_ID, name: "Mie Ayam Bakso", description: "Mie kuning dengan ayam cincang, bakso sapi, dan pangsit", price: 25000, stock: 35, min_stock: 10, unit: "porsi" },
    SeedItem { category_id: DRINKS_ID, name: "Es Teh Manis", description: "Teh hitam manis dingin dengan es batu", price: 5000, stock: 100, min_stock: 20, unit: "gelas" },
    SeedItem { category_id: DRINKS_ID, name: "Es Jeruk Nipis", description: "Jeruk nipis segar dengan air dingin dan gula", price: 8000, stock: 45, min_stock: 15, unit: "gelas" },
    SeedItem { category_id: DRINKS_ID, name: "Kopi Hitam Tubruk", description: "Kopi robusta tubruk dengan gula aren", price: 8000, stock: 80, min_stock: 25, unit: "cangkir" },
    SeedItem { category_id: SNACKS_ID, name: "Pisang Goreng", description: "Pisang kepok goreng tepung renyah", price: 10000, stock: 40, min_stock: 10, unit: "porsi" },
    SeedItem { category_id: SNACKS_ID, name: "Tahu Isi", description: "Tahu goreng isi sayuran dengan cabai rawit", price: 8000, stock: 6, min_stock: 10, unit: "porsi" },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    seed_restaurant(&pool).await?;
    seed_menu(&pool).await?;
    seed_tables(&pool, &config.frontend_url, 10).await?;

    tracing::info!(restaurant_id = %RESTAURANT_ID, "seed completed");
    Ok(())
}

async fn seed_restaurant(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO restaurants (id, name, description, address, phone)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(RESTAURANT_ID)
    .bind("Warung Makan Sederhana")
    .bind("Warung makan tradisional dengan cita rasa autentik Indonesia")
    .bind("Jl. Merdeka No. 123, Jakarta")
    .bind("021-123456789")
    .execute(pool)
    .await?;

    let categories = [
        (MAIN_COURSE_ID, "Makanan Utama", "Nasi dan lauk pauk", 1),
        (DRINKS_ID, "Minuman", "Minuman segar dan tradisional", 2),
        (SNACKS_ID, "Camilan", "Snack dan makanan ringan", 3),
    ];
    for (id, name, description, sort_order) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, restaurant_id, name, description, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(RESTAURANT_ID)
        .bind(name)
        .bind(description)
        .bind(sort_order)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_menu(pool: &DbPool) -> anyhow::Result<()> {
    for (index, item) in MENU.iter().enumerate() {
        let id = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0001_0000 + index as u128);
        sqlx::query(
            r#"
            INSERT INTO menu_items
                (id, restaurant_id, category_id, name, description, price,
                 stock_quantity, min_stock_alert, unit, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(RESTAURANT_ID)
        .bind(item.category_id)
        .bind(item.name)
        .bind(item.description)
        .bind(Decimal::from(item.price))
        .bind(item.stock)
        .bind(item.min_stock)
        .bind(item.unit)
        .bind(index as i32 + 1)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_tables(pool: &DbPool, frontend_url: &str, count: u32) -> anyhow::Result<()> {
    for number in 1..=count {
        let table_number = number.to_string();
        sqlx::query(
            r#"
            INSERT INTO restaurant_tables (id, restaurant_id, table_number, qr_code)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (restaurant_id, table_number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(RESTAURANT_ID)
        .bind(&table_number)
        .bind(ordering_url(frontend_url, RESTAURANT_ID, &table_number))
        .execute(pool)
        .await?;
    }
    Ok(())
}
