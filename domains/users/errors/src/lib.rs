use common_errors::AppError;
use database_traits::StoreError;
use thiserror::Error;
use user_validation::ValidationError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {user_id}")]
    NotFound { user_id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Generated user id already exists: {user_id}")]
    IdCollision { user_id: String },
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl UserError {
    /// Store not-found signals become domain not-found errors; everything
    /// else stays a store error.
    pub fn from_store(user_id: &str, err: StoreError) -> Self {
        match err {
            StoreError::DocumentNotFound { .. } => {
                UserError::NotFound {
                    user_id: user_id.to_string(),
                }
            }
            other => UserError::Store(other),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound { user_id } => {
                AppError::not_found(&format!("User with ID {user_id} not found"))
            }
            UserError::Validation(validation) => {
                AppError::validation_failed(validation.violations)
            }
            UserError::IdCollision { user_id } => {
                AppError::internal_server_error(&format!(
                    "Generated user id collided: {user_id}"
                ))
            }
            UserError::Store(store_err) => {
                AppError::internal_server_error(&format!(
                    "Document store error: {store_err}"
                ))
            }
            UserError::InternalError(msg) => {
                AppError::internal_server_error(&format!(
                    "Internal error: {msg}"
                ))
            }
        }
    }
}
