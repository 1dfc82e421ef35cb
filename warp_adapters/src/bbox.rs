use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box of an adapter's output domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox3 {
  pub min: Point3<f64>,
  pub max: Point3<f64>,
}

impl BoundingBox3 {
  /// The first quadrant, [0, 1]^n.
  pub const UNIT_SQUARE: BoundingBox3 = BoundingBox3 {
    min: Point3::new(0., 0., 0.),
    max: Point3::new(1., 1., 1.),
  };

  /// Encloses a disk of radius 1 centered at the origin, [-1, 1]^n.
  pub const CENTERED_SQUARE: BoundingBox3 = BoundingBox3 {
    min: Point3::new(-1., -1., -1.),
    max: Point3::new(1., 1., 1.),
  };

  pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
    BoundingBox3 { min, max }
  }

  /// A box spanning `[-half_extent, half_extent]` along every axis.
  pub fn centered(half_extent: f64) -> Self {
    BoundingBox3 {
      min: Point3::new(-half_extent, -half_extent, -half_extent),
      max: Point3::new(half_extent, half_extent, half_extent),
    }
  }

  pub fn extents(&self) -> Vector3<f64> {
    self.max - self.min
  }

  /// Inclusive containment test restricted to the first `dims` axes.
  pub fn contains(&self, p: &Vector3<f64>, dims: usize) -> bool {
    (0..dims.min(3)).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
  }

  /// Maps a point inside the box to [0, 1] along each axis.
  pub fn normalize(&self, p: &Vector3<f64>) -> Vector3<f64> {
    let extents = self.extents();
    Vector3::new(
      (p.x - self.min.x) / extents.x,
      (p.y - self.min.y) / extents.y,
      (p.z - self.min.z) / extents.z,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_contains_respects_dimensionality() {
    let bbox = BoundingBox3::UNIT_SQUARE;
    assert!(bbox.contains(&Vector3::new(0.5, 0.5, 7.), 2));
    assert!(!bbox.contains(&Vector3::new(0.5, 0.5, 7.), 3));
    assert!(bbox.contains(&Vector3::new(1., 0., 0.), 2));
    assert!(!bbox.contains(&Vector3::new(1.01, 0., 0.), 1));
  }

  #[test]
  fn test_normalize() {
    let bbox = BoundingBox3::CENTERED_SQUARE;
    let n = bbox.normalize(&Vector3::new(-1., 0., 1.));
    assert_eq!(n, Vector3::new(0., 0.5, 1.));
    assert_eq!(BoundingBox3::centered(4.).extents(), Vector3::new(8., 8., 8.));
  }
}
