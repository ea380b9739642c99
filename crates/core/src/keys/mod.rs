mod composite;
mod error;
mod extract;
mod scalar;

pub use composite::{
    composite_key, escape_segment, is_valid_separator, join_keys, KeyPrefix, KEY_SEPARATOR,
};
pub use error::{KeyError, ParseKeyTypeError};
pub use extract::{
    get_value_for_key, get_values_for_keys, Key, KeyConfig, KeyOptions, KeySource, Keys,
};
pub use scalar::{key_type_of, scalar_to_string, IndexableScalar, KeyType};
