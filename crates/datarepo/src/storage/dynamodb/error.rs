//! DynamoDB error mapping.
//!
//! Every operation maps its SDK error the same way: transport failures
//! become `ConnectionFailed`, service errors are classified by their error
//! code.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use datarepo_core::storage::RepositoryError;

/// Map an SDK error of `operation` on the item or partition `target`.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, operation: &str, target: &str) -> RepositoryError
where
    E: ProvideErrorMetadata + Debug,
    R: Debug,
{
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            RepositoryError::ConnectionFailed(format!("{operation} {target}: {err:?}"))
        }
        _ => map_error_code(err.code(), operation, target, &format!("{err:?}")),
    }
}

fn map_error_code(
    code: Option<&str>,
    operation: &str,
    target: &str,
    detail: &str,
) -> RepositoryError {
    match code {
        Some("ConditionalCheckFailedException") => {
            RepositoryError::Conflict(format!("Condition check failed for {target}"))
        }
        Some("TransactionConflictException") => {
            RepositoryError::Conflict(format!("Transaction conflict on {target}, please retry"))
        }
        Some("ResourceNotFoundException") => {
            RepositoryError::QueryFailed("Table not found".to_string())
        }
        Some(
            code @ ("ProvisionedThroughputExceededException"
            | "RequestLimitExceeded"
            | "ThrottlingException"),
        ) => RepositoryError::QueryFailed(format!("{operation} throttled ({code}), please retry")),
        Some("ItemCollectionSizeLimitExceededException") => {
            RepositoryError::QueryFailed(format!("Item collection of {target} is full"))
        }
        Some("InternalServerError") => {
            RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
        }
        _ => RepositoryError::QueryFailed(format!("{operation} {target} failed: {detail}")),
    }
}
