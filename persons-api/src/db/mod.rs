//! Database access for persons-api
//!
//! SQLite via sqlx. The pool is the only state shared between requests.

pub mod persons;
pub mod query;

pub use persons::PersonStore;

use persons_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Connect to the database and make sure the schema exists
pub async fn init_database_pool(database_url: &str) -> Result<SqlitePool> {
    tracing::debug!("Connecting to database: {}", database_url);

    // Every connection to an in-memory database opens a fresh, empty one,
    // so keep exactly one alive for the life of the pool
    let options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };
    let pool = options.connect(database_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the persons table if it does not exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS persons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            patronymic TEXT,
            age INTEGER,
            gender TEXT,
            nationality TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (persons)");

    Ok(())
}
