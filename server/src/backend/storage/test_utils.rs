use tempfile::TempDir;

use super::connection::DbConnection;

/// A database in its own temporary directory, removed on drop
pub struct TestDb {
    pub db: DbConnection,
    pub url: String,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}/ledger.db", dir.path().display());
        let db = DbConnection::new(&url).await.expect("Failed to create test database");
        Self { db, url, _dir: dir }
    }
}
