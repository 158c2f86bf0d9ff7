//! Quiz datasets: features, GeoJSON loading and the dataset catalog

pub mod catalog;
mod feature;
mod loader;

pub use catalog::{mix_datasets, remove_file_extension, DatasetCatalog, DatasetEntry, RANDOM_KEY};
pub use feature::{Dataset, QuizFeature};
pub use loader::{LoadError, LoadState};
