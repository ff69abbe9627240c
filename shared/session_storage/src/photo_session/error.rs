//! Error types for photo session storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError,
};
use thiserror::Error;

/// Result type for photo session storage operations
pub type SessionStorageResult<T> = Result<T, SessionStorageError>;

/// Errors that can occur during photo session storage operations
#[derive(Error, Debug)]
pub enum SessionStorageError {
    /// Failed to insert photo session into Dynamo DB
    #[error("Failed to insert photo session into DynamoDB: {0}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to delete photo session from Dynamo DB
    #[error("Failed to delete photo session from DynamoDB: {0}")]
    DynamoDbDeleteError(#[from] SdkError<DeleteItemError>),

    /// Failed to get photo session from Dynamo DB
    #[error("Failed to get photo session from DynamoDB: {0}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to update photo session in Dynamo DB
    #[error("Failed to update photo session in DynamoDB: {0}")]
    DynamoDbUpdateError(#[from] SdkError<UpdateItemError>),

    /// Photo session already exists
    #[error("Photo session already exists")]
    SessionExists,

    /// Serialization error for `serde_dynamo`
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
