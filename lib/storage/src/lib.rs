#![doc(test(attr(deny(warnings))))]

//! Contains storage layer implementations for [RDF Weave](https://docs.rs/rdf-weave/).

mod memory;

pub use memory::{MemoryQuadStorage, MemoryStorageReader};
