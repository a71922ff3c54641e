use std::path::PathBuf;

use tempfile::TempDir;

use beanwatch::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteCatalogStore};

/// Temporary SQLite database for integration tests.
///
/// The file lives in a [`TempDir`] and disappears with it.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("beanwatch-{name}.db"));

        let db = Self { _dir: dir, path };
        // Apply migrations once up front so every store sees the schema.
        let pool = create_pool(&db.url()).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");
        db
    }

    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    /// A fresh store handle onto this database.
    pub fn store(&self) -> SqliteCatalogStore {
        let pool = create_pool(&self.url()).expect("create sqlite pool");
        SqliteCatalogStore::new(pool)
    }
}
