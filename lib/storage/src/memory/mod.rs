mod index;
mod object_id;
mod object_id_mapping;
mod reader;
mod storage;

pub use reader::MemoryStorageReader;
pub use storage::MemoryQuadStorage;
