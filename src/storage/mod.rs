// src/storage/mod.rs
pub mod error;
pub mod filesystem;

// Re-exports
pub use error::StoreError;
pub use filesystem::DatasetStore;

/// Default location of the working file, relative to the process directory.
pub const DEFAULT_WORKING_FILE: &str = "data/penguins.csv";

/// Default location of the bundled dataset used to seed the working file.
pub const DEFAULT_ORIGINAL_FILE: &str = "data/penguins_original.csv";
