pub mod mappable;
pub mod store;

// Re-export commonly used types
pub use mappable::{Mappable, MigrationStep};
pub use store::{EmptyReader, ReadExt, Reader, WriteExt, Writer};
