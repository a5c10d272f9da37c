//! Connection pool utilities

use crate::config::ConnectOptions;
use crate::error::{DbError, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from [`ConnectOptions`].
///
/// Uses `NoTls`; connections are opened lazily on first use.
///
/// # Example
///
/// ```ignore
/// let opts = easy_query::ConnectOptions::new("127.0.0.1", "root", "test").password("root");
/// let pool = easy_query::create_pool(&opts)?;
/// ```
pub fn create_pool(options: &ConnectOptions) -> DbResult<Pool> {
    options.validate()?;

    let mgr = Manager::from_config(options.to_pg_config(), NoTls, default_manager_config());
    Pool::builder(mgr)
        .max_size(options.max_pool_size)
        .build()
        .map_err(|e| DbError::Connection(e.to_string()))
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_uses_configured_size() {
        let opts = ConnectOptions::new("localhost", "root", "test").max_pool_size(3);
        let pool = create_pool(&opts).unwrap();
        assert_eq!(pool.status().max_size, 3);
    }

    #[test]
    fn invalid_options_do_not_build() {
        let opts = ConnectOptions::new("", "root", "test");
        assert!(create_pool(&opts).is_err());
    }
}
