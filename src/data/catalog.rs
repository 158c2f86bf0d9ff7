//! Dataset catalog from the settings file, plus the mixed "random" dataset

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::feature::{Dataset, QuizFeature};
use super::LoadError;
use crate::core::types::FeatureId;
use crate::quiz::shuffle;

/// Key (and `data` value) of the virtual dataset mixing all others
pub const RANDOM_KEY: &str = "random";

/// One playable dataset listed in the settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Display name, e.g. "Provinces"
    pub name: String,
    /// File name of the GeoJSON, or "random"
    pub data: String,
}

impl DatasetEntry {
    /// Lookup key: the file name without extension
    pub fn key(&self) -> &str {
        remove_file_extension(&self.data)
    }

    pub fn is_random(&self) -> bool {
        self.data == RANDOM_KEY
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetCatalog {
    pub datasets: Vec<DatasetEntry>,
}

impl DatasetCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn find(&self, key: &str) -> Option<&DatasetEntry> {
        self.datasets.iter().find(|entry| entry.key() == key)
    }

    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.find(key).map(|entry| entry.name.as_str())
    }

    /// Load the dataset stored as `<root>/<key>.json`
    ///
    /// The "random" key is handed to [`DatasetCatalog::load_random`].
    pub fn load<R: Rng + ?Sized>(
        &self,
        key: &str,
        root: &Path,
        random_mix_limit: usize,
        rng: &mut R,
    ) -> Result<Dataset, LoadError> {
        if key == RANDOM_KEY {
            let dataset = self.load_random(root, random_mix_limit, rng)?;
            return Ok(match self.display_name(key) {
                Some(name) => dataset.with_name(name),
                None => dataset,
            });
        }
        let entry = self
            .find(key)
            .ok_or_else(|| LoadError::UnknownDataset(key.to_string()))?;
        Ok(Dataset::from_file(&dataset_path(root, entry))?.with_name(entry.name.clone()))
    }

    /// Mix every non-random dataset into one of at most `limit` features
    pub fn load_random<R: Rng + ?Sized>(
        &self,
        root: &Path,
        limit: usize,
        rng: &mut R,
    ) -> Result<Dataset, LoadError> {
        let parts = self
            .datasets
            .iter()
            .filter(|entry| !entry.is_random())
            .map(|entry| {
                Dataset::from_file(&dataset_path(root, entry))
                    .map(|dataset| dataset.with_name(entry.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        mix_datasets(parts, limit, rng)
    }
}

fn dataset_path(root: &Path, entry: &DatasetEntry) -> PathBuf {
    root.join(format!("{}.json", entry.key()))
}

/// Concatenate datasets, shuffle, keep `limit` features and renumber them
///
/// Each name is prefixed with its dataset's name ("Rivers: Miño") so mixed
/// questions stay unambiguous.
pub fn mix_datasets<R: Rng + ?Sized>(
    parts: Vec<Dataset>,
    limit: usize,
    rng: &mut R,
) -> Result<Dataset, LoadError> {
    let mut features: Vec<QuizFeature> = Vec::new();
    for part in parts {
        let prefix = part.name().unwrap_or_default().to_string();
        features.extend(part.into_features().into_iter().map(|mut feature| {
            let name = format!("{}: {}", prefix, feature.name().unwrap_or_default());
            feature.set_name(Some(name));
            feature
        }));
    }

    shuffle(&mut features, rng);
    features.truncate(limit);
    for (index, feature) in features.iter_mut().enumerate() {
        feature.set_id(FeatureId::from(index));
    }

    tracing::info!("Mixed random dataset with {} features", features.len());
    Dataset::new(features)
}

/// Strip the last extension from a file name: "rivers.geo.json" -> "rivers.geo"
///
/// An extension is a final dot followed by at least one character other
/// than a dot or slash, so ".hidden" becomes "" and "notes." is kept whole.
pub fn remove_file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) => {
            let extension = &file_name[dot + 1..];
            if extension.is_empty() || extension.contains('/') {
                file_name
            } else {
                &file_name[..dot]
            }
        }
        None => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, Geometry};
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn numbered(name: &str, count: usize) -> Dataset {
        let features = (0..count)
            .map(|i| {
                QuizFeature::new(
                    i,
                    Some(format!("Place {}", i)),
                    Geometry::Point(point!(x: i as f64, y: 0.0)),
                )
            })
            .collect();
        Dataset::new(features).unwrap().with_name(name)
    }

    #[test]
    fn test_remove_file_extension() {
        assert_eq!(remove_file_extension("provinces.json"), "provinces");
        assert_eq!(remove_file_extension("rivers.geo.json"), "rivers.geo");
        assert_eq!(remove_file_extension("random"), "random");
        assert_eq!(remove_file_extension(".hidden"), "");
        assert_eq!(remove_file_extension("notes."), "notes.");
        assert_eq!(remove_file_extension("data.v2/rivers"), "data.v2/rivers");
    }

    #[test]
    fn test_catalog_finds_by_key() {
        let catalog = DatasetCatalog::from_json_str(
            r#"{"datasets": [
                {"name": "Provinces", "data": "provinces.json"},
                {"name": "Random", "data": "random"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.display_name("provinces"), Some("Provinces"));
        assert!(catalog.find("random").unwrap().is_random());
        assert!(catalog.find("rivers").is_none());
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let catalog = DatasetCatalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = catalog.load("rivers", Path::new("."), 100, &mut rng);
        assert!(matches!(result, Err(LoadError::UnknownDataset(key)) if key == "rivers"));
    }

    #[test]
    fn test_mix_limits_prefixes_and_renumbers() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mixed = mix_datasets(
            vec![numbered("Rivers", 60), numbered("Peaks", 60)],
            100,
            &mut rng,
        )
        .unwrap();

        assert_eq!(mixed.len(), 100);
        let ids: HashSet<_> = mixed.ids().cloned().collect();
        assert_eq!(ids, (0..100usize).map(FeatureId::from).collect::<HashSet<_>>());
        assert!(mixed.features().iter().all(|feature| {
            let name = feature.name().unwrap();
            name.starts_with("Rivers: Place ") || name.starts_with("Peaks: Place ")
        }));
    }

    #[test]
    fn test_mix_smaller_than_limit_keeps_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mixed = mix_datasets(vec![numbered("Rivers", 3)], 100, &mut rng).unwrap();
        assert_eq!(mixed.len(), 3);
    }
}
