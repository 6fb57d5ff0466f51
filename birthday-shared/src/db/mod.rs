/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `schema`: Idempotent registration of every table declared by `models`
///
/// # Example
///
/// ```no_run
/// use birthday_shared::db::{pool::{create_pool, DatabaseConfig}, schema};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::from_env()?).await?;
///     schema::create_all(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;
