// mod.rs - Storage module exports

mod dense;
mod sparse;

pub use dense::DensePool;
pub use sparse::SparseMap;
