// Pipeline ingestion: loading prospect tables and identifying their sources

pub mod loader;
pub mod source_key;

pub use loader::{load_bytes, load_path, load_reader, InputFormat, LoadOptions, LoadedSource};
pub use source_key::SourceKey;
