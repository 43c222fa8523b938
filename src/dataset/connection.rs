use anyhow::{Context, Result, bail};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

/// Read-write pool; creates the database file if needed
pub fn create_pool(database: &Path) -> Result<DbPool> {
    build_pool(SqliteConnectionManager::file(database), 2)
}

/// Read-only pool over an existing dataset database
pub fn open_read_only(database: &Path) -> Result<DbPool> {
    if !database.exists() {
        bail!("Dataset database not found: {}", database.display());
    }

    let manager = SqliteConnectionManager::file(database)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI);
    build_pool(manager, 1)
}

fn build_pool(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)
        .context("Failed to create dataset connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get dataset connection from pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.db");

        assert!(open_read_only(&missing).is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.db");
        let pool = create_pool(&path).unwrap();
        get_connection(&pool)
            .unwrap()
            .execute("CREATE TABLE t (x INTEGER)", [])
            .unwrap();

        let pool = open_read_only(&path).unwrap();
        let conn = get_connection(&pool).unwrap();
        assert!(conn.execute("INSERT INTO t VALUES (1)", []).is_err());
    }
}
