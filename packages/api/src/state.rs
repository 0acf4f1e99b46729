// ABOUTME: Shared application state for API handlers
// ABOUTME: Holds the SQLite pool, storage layers and the token secret

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use schoolgate_core::EnrollmentDefaults;
use schoolgate_storage::{db, AdmissionStorage, StorageError, StudentStorage};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub admissions: Arc<AdmissionStorage>,
    pub students: Arc<StudentStorage>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Assemble state over an already-migrated pool.
    pub fn new(pool: SqlitePool, defaults: EnrollmentDefaults, jwt_secret: &str) -> Self {
        let admissions = Arc::new(AdmissionStorage::new(pool.clone(), defaults));
        let students = Arc::new(StudentStorage::new(pool.clone()));
        Self {
            pool,
            admissions,
            students,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// Open the database at `path` (running migrations) and assemble state.
    pub async fn init(
        path: &Path,
        defaults: EnrollmentDefaults,
        jwt_secret: &str,
    ) -> Result<Self, StorageError> {
        let pool = db::connect(path).await?;
        Ok(Self::new(pool, defaults, jwt_secret))
    }
}
