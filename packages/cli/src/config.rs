// ABOUTME: Environment-driven server configuration
// ABOUTME: Port, CORS origin, database path, token secret, enrollment defaults

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

use schoolgate_core::{EnrollmentDefaults, Gender};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid gender default: {0}")]
    InvalidGender(String),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub defaults: EnrollmentDefaults,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "4301".to_string());
        let port = port_str.parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let db_path = env::var("SCHOOLGATE_DB_PATH")
            .unwrap_or_else(|_| "data/schoolgate.db".to_string())
            .into();

        // No usable fallback for the signing secret.
        let jwt_secret = env::var("SCHOOLGATE_JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("SCHOOLGATE_JWT_SECRET"))?;

        let mut defaults = EnrollmentDefaults::default();
        if let Ok(section) = env::var("SCHOOLGATE_DEFAULT_SECTION") {
            defaults.section = section;
        }
        if let Ok(year) = env::var("SCHOOLGATE_ACADEMIC_YEAR") {
            defaults.academic_year = year;
        }
        if let Ok(gender) = env::var("SCHOOLGATE_DEFAULT_GENDER") {
            defaults.gender = gender
                .parse::<Gender>()
                .map_err(|_| ConfigError::InvalidGender(gender))?;
        }

        Ok(Config {
            port,
            cors_origin,
            db_path,
            jwt_secret,
            defaults,
        })
    }
}
