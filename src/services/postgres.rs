use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use crate::models::{ClothingItem, Gender};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL-backed clothing catalog
///
/// Rows in `clothing_items` are mapped onto the same normalised
/// `ClothingItem` the JSON loader produces.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(settings: &crate::config::DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL catalog");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            settings.acquire_timeout_secs.unwrap_or(5),
        )
        .await
    }

    /// Every catalog row, ordered by id
    pub async fn load_items(&self) -> Result<Vec<ClothingItem>, PostgresError> {
        let query = r#"
            SELECT id, brand, category, gender, colors, style, price_eur, url
            FROM clothing_items
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let items: Vec<ClothingItem> = rows.iter().map(row_to_item).collect();

        tracing::debug!("Loaded {} clothing items from PostgreSQL", items.len());

        Ok(items)
    }

    /// Insert items, leaving rows whose id already exists untouched
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_items(&self, items: &[ClothingItem]) -> Result<u64, PostgresError> {
        let query = r#"
            INSERT INTO clothing_items (id, brand, category, gender, colors, style, price_eur, url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
        "#;

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for item in items {
            let result = sqlx::query(query)
                .bind(&item.id)
                .bind(&item.brand)
                .bind(&item.category)
                .bind(item.gender.as_str())
                .bind(&item.colors)
                .bind(&item.style)
                .bind(item.price_eur)
                .bind(&item.url)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        tracing::info!(
            "Seeded {} of {} clothing items ({} already present)",
            inserted,
            items.len(),
            items.len() as u64 - inserted
        );

        Ok(inserted)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn row_to_item(row: &PgRow) -> ClothingItem {
    let gender: String = row.get("gender");
    let colors: Vec<String> = row.get("colors");

    ClothingItem {
        id: row.get("id"),
        brand: row.get("brand"),
        category: row.get("category"),
        gender: Gender::from_catalog(&gender),
        colors: crate::services::catalog::normalize_colors(colors),
        style: row.get("style"),
        price_eur: row.get::<f64, _>("price_eur").max(0.0),
        url: row
            .get::<Option<String>, _>("url")
            .filter(|u| !u.trim().is_empty()),
    }
}
