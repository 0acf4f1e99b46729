// ABOUTME: Shared domain types for the Schoolgate admissions service
// ABOUTME: Re-exports the entity types and identifier derivation helpers

pub mod idgen;
pub mod types;

pub use types::{
    AdmissionApplication, AdmissionCreateInput, AdmissionFilter, ApplicationStatus, DocumentInfo,
    DocumentStatus, EnrollmentDefaults, FieldError, Gender, Priority, Student,
};
