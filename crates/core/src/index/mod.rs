mod registry;
mod types;

pub use registry::IndexRegistry;
pub use types::{default_get_keys, GetKeys, IndexDescription, ResolvedIndex};
