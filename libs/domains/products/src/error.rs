use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Product id {body} in body does not match id {path} in path")]
    IdMismatch { path: i32, body: i32 },

    /// Lost an optimistic-concurrency race; the caller may retry.
    #[error("Product {0} was modified concurrently")]
    Conflict(i32),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProductError::Conflict(_))
    }
}

/// Field error on `id` describing a body/path id mismatch.
fn id_mismatch_errors(path: i32, body: i32) -> ValidationErrors {
    let mut error = ValidationError::new("id_mismatch").with_message(
        format!("Body id {} does not match path id {}", body, path).into(),
    );
    error.add_param("path".into(), &path);
    error.add_param("body".into(), &body);

    let mut errors = ValidationErrors::new();
    errors.add("id", error);
    errors
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::IdMismatch { path, body } => {
                AppError::ValidationError(id_mismatch_errors(path, body))
            }
            ProductError::Conflict(id) => AppError::Conflict(format!(
                "Product {} was modified concurrently, retry the request",
                id
            )),
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ProductError::NotFound(1), StatusCode::NOT_FOUND),
            (
                ProductError::IdMismatch { path: 5, body: 6 },
                StatusCode::BAD_REQUEST,
            ),
            (ProductError::Conflict(1), StatusCode::CONFLICT),
            (
                ProductError::Database(DbErr::Custom("connection reset".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_id_mismatch_is_a_validation_error_on_id() {
        let app_error: AppError = ProductError::IdMismatch { path: 5, body: 6 }.into();
        let AppError::ValidationError(errors) = app_error else {
            panic!("expected a validation error");
        };

        let field_errors = errors.field_errors();
        let id_errors = field_errors.get("id").unwrap();
        assert_eq!(id_errors[0].code, "id_mismatch");
        assert_eq!(id_errors[0].params["path"], 5);
        assert_eq!(id_errors[0].params["body"], 6);
    }

    #[test]
    fn test_only_conflict_is_retryable() {
        assert!(ProductError::Conflict(3).is_retryable());
        assert!(!ProductError::NotFound(3).is_retryable());
        assert!(!ProductError::IdMismatch { path: 1, body: 2 }.is_retryable());
    }
}
