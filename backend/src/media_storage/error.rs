//! Error types for bucket operations

use aws_sdk_s3::{error::SdkError, operation::put_object::PutObjectError};
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl From<aws_sdk_s3::Error> for BucketError {
    fn from(error: aws_sdk_s3::Error) -> Self {
        Self::S3Error(error.to_string())
    }
}

impl From<SdkError<PutObjectError>> for BucketError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref svc) if svc.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{svc:?}"))
            }
            SdkError::ServiceError(_) => Self::S3Error(error.to_string()),
            _ => Self::AwsError(error.to_string()),
        }
    }
}
