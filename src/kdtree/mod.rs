//! An implementation of an immutable k-d tree for nearest-neighbor queries.

#![warn(missing_docs)]

mod builder;
mod index;

pub use builder::KdTreeBuilder;
pub use index::{KdTree, Neighbor};

#[cfg(test)]
mod test;
