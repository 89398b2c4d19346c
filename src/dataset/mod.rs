pub mod entry;
pub mod loader;
pub mod lookup;
pub mod source;

pub use entry::{CefrLevel, NounGender, WordClass, WordEntry};
pub use loader::{Dataset, DatasetError, LoadReport};
pub use source::DatasetSource;
