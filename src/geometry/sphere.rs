//! Unit-sphere vector math for great-circle projection
//!
//! Working on 3D unit vectors instead of raw degrees keeps the projection
//! correct across the antimeridian and near the poles.

use geo_types::Point;

const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vec3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vec3 {
    fn from_lng_lat(point: Point<f64>) -> Self {
        let lng = point.x().to_radians();
        let lat = point.y().to_radians();
        Self {
            x: lat.cos() * lng.cos(),
            y: lat.cos() * lng.sin(),
            z: lat.sin(),
        }
    }

    fn to_lng_lat(self) -> Point<f64> {
        let lat = self.z.atan2(self.x.hypot(self.y));
        let lng = self.y.atan2(self.x);
        Point::new(lng.to_degrees(), lat.to_degrees())
    }

    fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// `None` when the vector is too short to carry a direction
    fn normalized(self) -> Option<Self> {
        let len = self.dot(self).sqrt();
        if len > EPSILON {
            Some(self.scale(1.0 / len))
        } else {
            None
        }
    }
}

/// Closest point to `query` on the minor great-circle arc from `a` to `b`
///
/// Degenerate arcs (coincident or antipodal endpoints) collapse to `a`,
/// as does a query sitting on a pole of the arc's great circle, where every
/// point of the circle is equally far.
pub fn closest_point_on_arc(a: Point<f64>, b: Point<f64>, query: Point<f64>) -> Point<f64> {
    let va = Vec3::from_lng_lat(a);
    let vb = Vec3::from_lng_lat(b);
    let vq = Vec3::from_lng_lat(query);

    let Some(normal) = va.cross(vb).normalized() else {
        return a;
    };
    let Some(foot) = vq.sub(normal.scale(vq.dot(normal))).normalized() else {
        return a;
    };

    let after_a = va.cross(foot).dot(normal) >= 0.0;
    let before_b = foot.cross(vb).dot(normal) >= 0.0;
    if after_a && before_b {
        return foot.to_lng_lat();
    }

    // Outside the arc the nearest point is an endpoint; larger dot = smaller angle
    if vq.dot(va) >= vq.dot(vb) {
        a
    } else {
        b
    }
}
