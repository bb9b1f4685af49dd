pub use chunk::Chunk;
pub use document::Document;
pub use schema_index::{OperationSchemas, SchemaIndex};

pub mod chunk;
pub mod document;
pub mod schema_index;

/// Keys of a path item that name operations. Everything else (`parameters`, `$ref`, vendor
/// extensions) is not an operation.
pub const HTTP_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

pub fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.contains(&key)
}
