/// Database layer for the remote record backend
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations
///
/// The JSON document tables themselves are driven by
/// [`crate::store::remote::PgBackend`].

pub mod migrations;
pub mod pool;
