//! Persistence layer
//!
//! - `engine`: the `Storage` trait every backend implements
//! - `disk`: JSON files in a database directory
//! - `memory`: snapshot kept in process memory

pub mod disk;
pub mod engine;
pub mod memory;

pub use disk::DiskStorage;
pub use engine::Storage;
pub use memory::MemoryStorage;
