#![doc = include_str!("../README.md")]

pub mod dataset;
mod error;
pub mod indices;
pub mod kdtree;
mod r#type;

pub use dataset::{Coord, DatasetLoader, MineralSoil, SoilDataset, SoilRecord, SoilSchema};
pub use error::{Result, SoilIndexError};
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
