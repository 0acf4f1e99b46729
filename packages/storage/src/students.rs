// ABOUTME: Read-only storage over enrolled students
// ABOUTME: Students are written by the approve workflow and owned downstream

use sqlx::{Row, SqlitePool};
use tracing::debug;

use schoolgate_core::Student;

use crate::StorageError;

pub struct StudentStorage {
    pool: SqlitePool,
}

impl StudentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List enrolled students, optionally narrowed to one class.
    pub async fn list_students(&self, class: Option<&str>) -> Result<Vec<Student>, StorageError> {
        debug!("Listing students (class: {:?})", class);

        let rows = match class {
            Some(class) => {
                sqlx::query("SELECT * FROM students WHERE class = ? ORDER BY roll_number")
                    .bind(class)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT * FROM students ORDER BY class, roll_number")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_student).collect()
    }

    /// Get a single student by id.
    pub async fn get_student(&self, student_id: &str) -> Result<Student, StorageError> {
        let row = sqlx::query("SELECT * FROM students WHERE id = ?")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("Student {}", student_id)))?;

        row_to_student(&row)
    }
}

pub(crate) fn row_to_student(row: &sqlx::sqlite::SqliteRow) -> Result<Student, StorageError> {
    Ok(Student {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        roll_number: row.try_get("roll_number").map_err(StorageError::Sqlx)?,
        admission_number: row
            .try_get("admission_number")
            .map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        class: row.try_get("class").map_err(StorageError::Sqlx)?,
        section: row.try_get("section").map_err(StorageError::Sqlx)?,
        division: row.try_get("division").map_err(StorageError::Sqlx)?,
        academic_year: row.try_get("academic_year").map_err(StorageError::Sqlx)?,
        date_of_birth: row.try_get("date_of_birth").map_err(StorageError::Sqlx)?,
        gender: row.try_get("gender").map_err(StorageError::Sqlx)?,
        parent_name: row.try_get("parent_name").map_err(StorageError::Sqlx)?,
        parent_phone: row.try_get("parent_phone").map_err(StorageError::Sqlx)?,
        parent_email: row.try_get("parent_email").map_err(StorageError::Sqlx)?,
        address: row.try_get("address").map_err(StorageError::Sqlx)?,
        previous_school: row.try_get("previous_school").map_err(StorageError::Sqlx)?,
        admission_date: row.try_get("admission_date").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
    })
}
