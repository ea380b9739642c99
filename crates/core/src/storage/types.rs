use serde::{Deserialize, Serialize};

use crate::keys::Keys;
use crate::object::DataObject;

use super::{repository_error_to_status_code, RepositoryError};

/// Outcome of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    Updated,
    Created,
    Conflict,
    Error,
}

/// Outcome of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadResult {
    Found,
    NotFound,
    Error,
}

/// Response to `put_object`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    pub data: DataObject,
    pub result: WriteResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl WriteResponse {
    pub fn created(data: DataObject) -> Self {
        Self::with_result(data, WriteResult::Created)
    }

    pub fn updated(data: DataObject) -> Self {
        Self::with_result(data, WriteResult::Updated)
    }

    /// An `ERROR` response carrying the object that failed to write.
    pub fn from_error(data: DataObject, error: &RepositoryError) -> Self {
        let result = match error {
            RepositoryError::Conflict(_) => WriteResult::Conflict,
            _ => WriteResult::Error,
        };
        Self {
            data,
            result,
            error: Some(error.to_string()),
            error_code: Some(repository_error_to_status_code(error)),
        }
    }

    fn with_result(data: DataObject, result: WriteResult) -> Self {
        Self {
            data,
            result,
            error: None,
            error_code: None,
        }
    }
}

/// Response to `get_object`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    pub data: Option<DataObject>,
    pub result: ReadResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl GetResponse {
    pub fn found(data: DataObject) -> Self {
        Self {
            data: Some(data),
            result: ReadResult::Found,
            error: None,
            error_code: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            data: None,
            result: ReadResult::NotFound,
            error: None,
            error_code: None,
        }
    }

    /// `FOUND` when `data` is present, `NOT_FOUND` otherwise.
    pub fn from_option(data: Option<DataObject>) -> Self {
        data.map_or_else(Self::not_found, Self::found)
    }

    pub fn from_error(error: &RepositoryError) -> Self {
        Self {
            data: None,
            result: ReadResult::Error,
            error: Some(error.to_string()),
            error_code: Some(repository_error_to_status_code(error)),
        }
    }
}

/// Response to `list_objects`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub data: Vec<DataObject>,
    pub result: ReadResult,
    pub has_more: bool,
    pub next: Option<Keys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl ListResponse {
    /// `FOUND` when `data` has records, `NOT_FOUND` otherwise. No paging.
    pub fn from_records(data: Vec<DataObject>) -> Self {
        let result = if data.is_empty() {
            ReadResult::NotFound
        } else {
            ReadResult::Found
        };
        Self {
            data,
            result,
            has_more: false,
            next: None,
            error: None,
            error_code: None,
        }
    }

    /// Marks the response as one page of a longer listing.
    pub fn with_next(mut self, next: Keys) -> Self {
        self.has_more = true;
        self.next = Some(next);
        self
    }

    pub fn from_error(error: &RepositoryError) -> Self {
        Self {
            data: Vec::new(),
            result: ReadResult::Error,
            has_more: false,
            next: None,
            error: Some(error.to_string()),
            error_code: Some(repository_error_to_status_code(error)),
        }
    }
}
