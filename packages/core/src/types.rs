// ABOUTME: Entity definitions for admission applications and enrolled students
// ABOUTME: Structures shared by the storage, API and auth layers

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    DocumentReview,
    InterviewScheduled,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Approved and rejected applications are final and immutable.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

/// Supporting file attached to an application, persisted as part of the
/// application's JSON document list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub status: DocumentStatus,
    pub upload_date: DateTime<Utc>,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionApplication {
    pub id: String,
    pub application_number: String,
    pub student_name: String,
    /// Raw date string as submitted; parsed into a date at approval time.
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    pub class: String,
    pub section: Option<String>,
    pub parent_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub previous_school: Option<String>,
    pub status: ApplicationStatus,
    pub priority: Priority,
    pub documents: Vec<DocumentInfo>,
    pub remarks: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub approved_date: Option<DateTime<Utc>>,
    pub student_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission payload. Fields default when omitted so that required-field
/// validation can report every missing field at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdmissionCreateInput {
    pub student_name: String,
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    pub class: String,
    pub section: Option<String>,
    pub parent_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub previous_school: Option<String>,
    pub priority: Option<Priority>,
    pub documents: Option<Vec<DocumentInfo>>,
    pub remarks: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// Listing filters; all criteria are combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionFilter {
    /// Case-insensitive substring match over student name, application
    /// number and parent name.
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub roll_number: String,
    /// Equals the application number of the originating admission.
    pub admission_number: String,
    pub name: String,
    pub class: String,
    pub section: String,
    pub division: String,
    pub academic_year: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub parent_name: String,
    pub parent_phone: String,
    pub parent_email: Option<String>,
    pub address: Option<String>,
    pub previous_school: Option<String>,
    pub admission_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fallback values applied when an approved application omits optional
/// student fields. Configuration, not policy baked into the workflow.
#[derive(Debug, Clone)]
pub struct EnrollmentDefaults {
    pub gender: Gender,
    pub section: String,
    pub academic_year: String,
}

impl Default for EnrollmentDefaults {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            section: "A".to_string(),
            academic_year: Utc::now().year().to_string(),
        }
    }
}

/// Single field failure reported by input validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
