pub mod classifier;
pub mod loader;
pub mod mapping;

pub use classifier::classify;
pub use loader::{load_mapping, mapping_from_sheet};
pub use mapping::{LocalityMapping, MappingEntry};
