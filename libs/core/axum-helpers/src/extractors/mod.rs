//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with an [`AppError`](crate::errors::AppError) so
//! malformed input gets the same JSON error body as domain failures.

pub mod id_path;
pub mod json_body;

pub use id_path::IdPath;
pub use json_body::JsonBody;
