use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unable to find {resource} {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

/// Field names used when reporting a missing resource.
pub mod field_name {
    pub const APPLICATION_ID: &str = "applicationId";
    pub const WORKSPACE: &str = "workspace";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found(field_name::APPLICATION_ID, "app-42");
        assert_eq!(err.to_string(), "Unable to find applicationId app-42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_database_error_is_not_not_found() {
        let err: AppError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Database error: Custom Error: boom");
    }
}
