pub mod local;
pub mod memory;

pub use local::LocalSource;
pub use memory::MemorySource;
