mod types;

pub(crate) use types::serialize_number;
pub use types::{DataObject, Value};
