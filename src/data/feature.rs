//! Quiz features and the dataset that owns them

use geo::Centroid;
use geo_types::Geometry;
use std::borrow::Cow;
use std::collections::HashMap;

use super::LoadError;
use crate::core::types::FeatureId;
use crate::geometry::{GeoBounds, GeometryKind};

/// One identified geographic entity of a quiz
#[derive(Debug, Clone, PartialEq)]
pub struct QuizFeature {
    id: FeatureId,
    name: Option<String>,
    geometry: Geometry<f64>,
    render_as_point: bool,
}

impl QuizFeature {
    pub fn new(id: impl Into<FeatureId>, name: Option<String>, geometry: Geometry<f64>) -> Self {
        Self {
            id: id.into(),
            name,
            geometry,
            render_as_point: false,
        }
    }

    /// Display the feature as its centroid while scoring against the full geometry
    pub fn rendered_as_point(mut self, render_as_point: bool) -> Self {
        self.render_as_point = render_as_point;
        self
    }

    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Geometry used for distance scoring
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn kind(&self) -> GeometryKind {
        GeometryKind::of(&self.geometry)
    }

    pub fn render_as_point(&self) -> bool {
        self.render_as_point
    }

    /// Geometry handed to the map: the centroid when flagged, otherwise the original
    pub fn display_geometry(&self) -> Cow<'_, Geometry<f64>> {
        if self.render_as_point {
            if let Some(centroid) = self.geometry.centroid() {
                return Cow::Owned(Geometry::Point(centroid));
            }
        }
        Cow::Borrowed(&self.geometry)
    }

    pub(crate) fn set_id(&mut self, id: FeatureId) {
        self.id = id;
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

/// Ordered, read-only set of features for one quiz
#[derive(Debug, Clone)]
pub struct Dataset {
    name: Option<String>,
    features: Vec<QuizFeature>,
    index: HashMap<FeatureId, usize>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate ids
    pub fn new(features: Vec<QuizFeature>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(features.len());
        for (position, feature) in features.iter().enumerate() {
            if index.insert(feature.id.clone(), position).is_some() {
                return Err(LoadError::DuplicateId(feature.id.clone()));
            }
        }
        Ok(Self {
            name: None,
            features,
            index,
        })
    }

    /// Attach the label shown in summaries; it has no effect on scoring
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, id: &FeatureId) -> Option<&QuizFeature> {
        self.index.get(id).map(|&position| &self.features[position])
    }

    /// Label for `id`, if the feature exists and has one
    pub fn name_of(&self, id: &FeatureId) -> Option<&str> {
        self.get(id).and_then(QuizFeature::name)
    }

    pub fn features(&self) -> &[QuizFeature] {
        &self.features
    }

    pub fn ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.features.iter().map(QuizFeature::id)
    }

    /// Box around every feature, `None` for an empty dataset
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::of_all(self.features.iter().map(QuizFeature::geometry))
    }

    pub(crate) fn into_features(self) -> Vec<QuizFeature> {
        self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, polygon};

    fn square() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ])
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let features = vec![
            QuizFeature::new(1_i64, Some("Lugo".into()), Geometry::Point(point!(x: 0.0, y: 0.0))),
            QuizFeature::new(1_i64, Some("Vigo".into()), Geometry::Point(point!(x: 1.0, y: 0.0))),
        ];
        assert!(matches!(Dataset::new(features), Err(LoadError::DuplicateId(FeatureId::Number(1)))));
    }

    #[test]
    fn test_lookup_by_id() {
        let dataset = Dataset::new(vec![
            QuizFeature::new("a", Some("Lugo".into()), Geometry::Point(point!(x: 0.0, y: 0.0))),
            QuizFeature::new("b", None, Geometry::Point(point!(x: 1.0, y: 0.0))),
        ])
        .unwrap();
        assert_eq!(dataset.name_of(&"a".into()), Some("Lugo"));
        assert_eq!(dataset.name_of(&"b".into()), None);
        assert!(dataset.get(&"c".into()).is_none());
    }

    #[test]
    fn test_render_as_point_keeps_scoring_geometry() {
        let feature = QuizFeature::new(0_i64, None, square()).rendered_as_point(true);
        assert_eq!(feature.kind(), GeometryKind::Polygon);
        match feature.display_geometry().as_ref() {
            Geometry::Point(centroid) => {
                assert!((centroid.x() - 1.0).abs() < 1e-12);
                assert!((centroid.y() - 1.0).abs() < 1e-12);
            }
            other => panic!("Expected centroid point, got {:?}", other),
        }
        assert!(matches!(feature.geometry(), Geometry::Polygon(_)));
    }

    #[test]
    fn test_display_geometry_unflagged_is_original() {
        let feature = QuizFeature::new(0_i64, None, square());
        assert!(matches!(feature.display_geometry(), Cow::Borrowed(_)));
    }
}
