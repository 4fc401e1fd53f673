mod dataset;
pub mod error;
mod quad_storage;

pub use dataset::{QuadDataset, QuadIter};
pub use quad_storage::QuadStorage;
