pub mod json_store;
pub mod schema;

pub use json_store::DatasetCache;
