// ABOUTME: Admission application storage and the approve-to-enrollment workflow
// ABOUTME: Handles creation, listing, status transitions and the enrolling transaction

use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use schoolgate_core::{
    idgen, AdmissionApplication, AdmissionCreateInput, AdmissionFilter, ApplicationStatus,
    DocumentInfo, DocumentStatus, EnrollmentDefaults, FieldError, Priority, Student,
};

use crate::StorageError;

/// Bounded retries for roll-number and application-number collisions.
const MAX_INSERT_ATTEMPTS: u32 = 5;

pub struct AdmissionStorage {
    pool: SqlitePool,
    defaults: EnrollmentDefaults,
    /// Serializes in-process status decisions (approve, reject,
    /// update_status) so read-then-write sequences cannot race between
    /// pool connections. Conditional status writes and the unique
    /// roll-number index back this for writers outside this process.
    decision_lock: Mutex<()>,
}

impl AdmissionStorage {
    pub fn new(pool: SqlitePool, defaults: EnrollmentDefaults) -> Self {
        Self {
            pool,
            defaults,
            decision_lock: Mutex::new(()),
        }
    }

    /// Create a new application in `pending` status.
    ///
    /// Application numbers are random tokens guarded by a unique index;
    /// on the (unlikely) collision the insert retries with a fresh number.
    pub async fn create_application(
        &self,
        input: AdmissionCreateInput,
    ) -> Result<AdmissionApplication, StorageError> {
        validate_create_input(&input)?;

        let application_id = idgen::application_id();
        let now = Utc::now();

        let documents = match &input.documents {
            Some(docs) if !docs.is_empty() => docs.clone(),
            _ => placeholder_documents(),
        };
        let documents_json = serde_json::to_string(&documents)?;
        let priority = input.priority.unwrap_or_default();

        debug!(
            "Creating admission application: {} for {}",
            application_id, input.student_name
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            let application_number = idgen::application_number(&self.defaults.academic_year);

            let result = sqlx::query(
                r#"
                INSERT INTO admission_applications (
                    id, application_number, student_name, date_of_birth, gender,
                    class, section, parent_name, email, phone, address,
                    previous_school, status, priority, documents, remarks,
                    interview_date, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&application_id)
            .bind(&application_number)
            .bind(&input.student_name)
            .bind(&input.date_of_birth)
            .bind(input.gender)
            .bind(&input.class)
            .bind(&input.section)
            .bind(&input.parent_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.previous_school)
            .bind(ApplicationStatus::Pending)
            .bind(priority)
            .bind(&documents_json)
            .bind(&input.remarks)
            .bind(input.interview_date)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => break,
                Err(e) if is_unique_violation(&e) && attempt < MAX_INSERT_ATTEMPTS => {
                    warn!(
                        "Application number collision on {}, retrying",
                        application_number
                    );
                    continue;
                }
                Err(e) => return Err(StorageError::Sqlx(e)),
            }
        }

        self.get_application(&application_id).await
    }

    /// List applications, newest first.
    pub async fn list_applications(
        &self,
        filter: &AdmissionFilter,
    ) -> Result<Vec<AdmissionApplication>, StorageError> {
        debug!("Listing admission applications (filter: {:?})", filter);

        let mut query = String::from("SELECT * FROM admission_applications WHERE 1=1");
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        if filter.class.is_some() {
            query.push_str(" AND class = ?");
        }
        if filter.search.is_some() {
            query.push_str(
                " AND (LOWER(student_name) LIKE ? OR LOWER(application_number) LIKE ? \
                 OR LOWER(parent_name) LIKE ?)",
            );
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query(&query);
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(class) = &filter.class {
            q = q.bind(class);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_application).collect()
    }

    /// Get a single application by id.
    pub async fn get_application(
        &self,
        application_id: &str,
    ) -> Result<AdmissionApplication, StorageError> {
        let row = sqlx::query("SELECT * FROM admission_applications WHERE id = ?")
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| {
                StorageError::NotFound(format!("Admission application {}", application_id))
            })?;

        row_to_application(&row)
    }

    /// Approve an application: enroll a student with derived identifiers and
    /// link it back, all in one transaction.
    pub async fn approve_application(
        &self,
        application_id: &str,
    ) -> Result<(Student, AdmissionApplication), StorageError> {
        let _guard = self.decision_lock.lock().await;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_approve(application_id).await {
                Err(StorageError::Sqlx(e))
                    if is_unique_violation(&e) && attempt < MAX_INSERT_ATTEMPTS =>
                {
                    warn!(
                        "Roll number collision approving {}, retrying (attempt {})",
                        application_id, attempt
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(10 * attempt as u64))
                        .await;
                }
                other => return other,
            }
        }
    }

    async fn try_approve(
        &self,
        application_id: &str,
    ) -> Result<(Student, AdmissionApplication), StorageError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let row = sqlx::query("SELECT * FROM admission_applications WHERE id = ?")
            .bind(application_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| {
                StorageError::NotFound(format!("Admission application {}", application_id))
            })?;

        let mut application = row_to_application(&row)?;

        if application.status.is_final() {
            return Err(StorageError::Conflict(format!(
                "Admission application {} is already {}",
                application_id,
                status_label(application.status)
            )));
        }

        let date_of_birth = NaiveDate::parse_from_str(&application.date_of_birth, "%Y-%m-%d")
            .map_err(|_| {
                StorageError::Validation(vec![FieldError::new(
                    "dateOfBirth",
                    "expected an ISO date (YYYY-MM-DD)",
                )])
            })?;

        let gender = match application.gender {
            Some(g) => g,
            None => {
                debug!(
                    "Application {} has no gender, applying default",
                    application_id
                );
                self.defaults.gender
            }
        };
        let section = match &application.section {
            Some(s) => s.clone(),
            None => {
                debug!(
                    "Application {} has no section, applying default {}",
                    application_id, self.defaults.section
                );
                self.defaults.section.clone()
            }
        };

        let academic_year = self.defaults.academic_year.clone();

        // Count inside the transaction; the unique index catches races with
        // writers on other connections.
        let enrolled: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students WHERE class = ? AND academic_year = ?",
        )
        .bind(&application.class)
        .bind(&academic_year)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let roll_number = idgen::roll_number(&application.class, &academic_year, enrolled + 1);
        let now = Utc::now();

        let student = Student {
            id: idgen::student_id(),
            roll_number: roll_number.clone(),
            admission_number: application.application_number.clone(),
            name: application.student_name.clone(),
            class: application.class.clone(),
            section: section.clone(),
            division: format!("{}-{}", application.class, section),
            academic_year,
            date_of_birth,
            gender,
            parent_name: application.parent_name.clone(),
            parent_phone: application.phone.clone(),
            parent_email: application.email.clone(),
            address: application.address.clone(),
            previous_school: application.previous_school.clone(),
            admission_date: now,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO students (
                id, roll_number, admission_number, name, class, section,
                division, academic_year, date_of_birth, gender, parent_name,
                parent_phone, parent_email, address, previous_school,
                admission_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.roll_number)
        .bind(&student.admission_number)
        .bind(&student.name)
        .bind(&student.class)
        .bind(&student.section)
        .bind(&student.division)
        .bind(&student.academic_year)
        .bind(student.date_of_birth)
        .bind(student.gender)
        .bind(&student.parent_name)
        .bind(&student.parent_phone)
        .bind(&student.parent_email)
        .bind(&student.address)
        .bind(&student.previous_school)
        .bind(student.admission_date)
        .bind(student.created_at)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        // Conditional like reject's write; a decision committed by another
        // process since the read above must not be overwritten. Zero rows
        // drops the transaction, rolling back the inserted student.
        let result = sqlx::query(
            r#"
            UPDATE admission_applications
            SET status = ?, approved_date = ?, student_id = ?, updated_at = ?
            WHERE id = ? AND status NOT IN ('approved', 'rejected')
            "#,
        )
        .bind(ApplicationStatus::Approved)
        .bind(now)
        .bind(&student.id)
        .bind(now)
        .bind(application_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict(format!(
                "Admission application {} was decided concurrently",
                application_id
            )));
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        application.status = ApplicationStatus::Approved;
        application.approved_date = Some(now);
        application.student_id = Some(student.id.clone());
        application.updated_at = now;

        info!(
            "Approved application {} -> student {} (roll {})",
            application_id, student.id, roll_number
        );

        Ok((student, application))
    }

    /// Reject an application, storing the reviewer's remarks. No student
    /// side effect.
    pub async fn reject_application(
        &self,
        application_id: &str,
        remarks: Option<String>,
    ) -> Result<AdmissionApplication, StorageError> {
        let _guard = self.decision_lock.lock().await;
        let now = Utc::now();

        // Finality check and write in one statement: an approval on another
        // connection could commit between a separate read and this update.
        let result = sqlx::query(
            "UPDATE admission_applications SET status = ?, remarks = ?, updated_at = ? \
             WHERE id = ? AND status NOT IN ('approved', 'rejected')",
        )
        .bind(ApplicationStatus::Rejected)
        .bind(&remarks)
        .bind(now)
        .bind(application_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            // NotFound when the row is absent, Conflict when it is final.
            let application = self.get_application(application_id).await?;
            return Err(StorageError::Conflict(format!(
                "Admission application {} is already {}",
                application_id,
                status_label(application.status)
            )));
        }

        info!("Rejected application {}", application_id);

        self.get_application(application_id).await
    }

    /// Move an application between the intermediate review states.
    ///
    /// Approval and rejection have dedicated operations; this transition
    /// never enters or leaves a final status.
    pub async fn update_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
        interview_date: Option<chrono::DateTime<Utc>>,
        remarks: Option<String>,
    ) -> Result<AdmissionApplication, StorageError> {
        if status.is_final() {
            return Err(StorageError::Validation(vec![FieldError::new(
                "status",
                "approved and rejected are set through their own operations",
            )]));
        }

        let _guard = self.decision_lock.lock().await;
        let now = Utc::now();

        // Same single-statement guard as reject_application.
        let result = sqlx::query(
            r#"
            UPDATE admission_applications
            SET status = ?,
                interview_date = COALESCE(?, interview_date),
                remarks = COALESCE(?, remarks),
                updated_at = ?
            WHERE id = ? AND status NOT IN ('approved', 'rejected')
            "#,
        )
        .bind(status)
        .bind(interview_date)
        .bind(&remarks)
        .bind(now)
        .bind(application_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            let application = self.get_application(application_id).await?;
            return Err(StorageError::Conflict(format!(
                "Admission application {} is already {}",
                application_id,
                status_label(application.status)
            )));
        }

        self.get_application(application_id).await
    }
}

fn validate_create_input(input: &AdmissionCreateInput) -> Result<(), StorageError> {
    let mut errors = Vec::new();

    if input.student_name.trim().is_empty() {
        errors.push(FieldError::new("studentName", "student name is required"));
    }
    if input.date_of_birth.trim().is_empty() {
        errors.push(FieldError::new("dateOfBirth", "date of birth is required"));
    } else if NaiveDate::parse_from_str(&input.date_of_birth, "%Y-%m-%d").is_err() {
        errors.push(FieldError::new(
            "dateOfBirth",
            "expected an ISO date (YYYY-MM-DD)",
        ));
    }
    if input.class.trim().is_empty() {
        errors.push(FieldError::new("class", "target class is required"));
    }
    if input.parent_name.trim().is_empty() {
        errors.push(FieldError::new("parentName", "guardian name is required"));
    }
    if input.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "guardian phone is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(StorageError::Validation(errors))
    }
}

/// Documents every fresh application carries until the guardian uploads
/// real files.
fn placeholder_documents() -> Vec<DocumentInfo> {
    let now = Utc::now();
    ["Birth Certificate", "Previous School Records"]
        .into_iter()
        .map(|name| DocumentInfo {
            id: idgen::document_id(),
            name: name.to_string(),
            doc_type: "application/pdf".to_string(),
            status: DocumentStatus::Pending,
            upload_date: now,
            size: "0 KB".to_string(),
        })
        .collect()
}

fn status_label(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "pending",
        ApplicationStatus::DocumentReview => "document_review",
        ApplicationStatus::InterviewScheduled => "interview_scheduled",
        ApplicationStatus::Approved => "approved",
        ApplicationStatus::Rejected => "rejected",
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn row_to_application(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AdmissionApplication, StorageError> {
    let documents_json: String = row.try_get("documents").map_err(StorageError::Sqlx)?;
    let documents: Vec<DocumentInfo> = serde_json::from_str(&documents_json)?;

    Ok(AdmissionApplication {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        application_number: row
            .try_get("application_number")
            .map_err(StorageError::Sqlx)?,
        student_name: row.try_get("student_name").map_err(StorageError::Sqlx)?,
        date_of_birth: row.try_get("date_of_birth").map_err(StorageError::Sqlx)?,
        gender: row.try_get("gender").map_err(StorageError::Sqlx)?,
        class: row.try_get("class").map_err(StorageError::Sqlx)?,
        section: row.try_get("section").map_err(StorageError::Sqlx)?,
        parent_name: row.try_get("parent_name").map_err(StorageError::Sqlx)?,
        email: row.try_get("email").map_err(StorageError::Sqlx)?,
        phone: row.try_get("phone").map_err(StorageError::Sqlx)?,
        address: row.try_get("address").map_err(StorageError::Sqlx)?,
        previous_school: row.try_get("previous_school").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        priority: row.try_get("priority").map_err(StorageError::Sqlx)?,
        documents,
        remarks: row.try_get("remarks").map_err(StorageError::Sqlx)?,
        interview_date: row.try_get("interview_date").map_err(StorageError::Sqlx)?,
        approved_date: row.try_get("approved_date").map_err(StorageError::Sqlx)?,
        student_id: row.try_get("student_id").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
