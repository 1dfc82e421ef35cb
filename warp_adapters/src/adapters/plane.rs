use std::{
  fmt::{self, Debug, Display},
  sync::Arc,
};

use nalgebra::{Point2, Vector2, Vector3};

use super::{importance_weight, AdapterBase, WarpAdapter};
use crate::{Argument, BoundingBox3, WarpError};

pub type PlaneWarpFn = Arc<dyn Fn(&Point2<f64>, &[f64]) -> Point2<f64> + Send + Sync>;
pub type PlanePdfFn = Arc<dyn Fn(&Point2<f64>, &[f64]) -> f64 + Send + Sync>;

/// Adapter for warps from the unit square into a planar region.
///
/// Histograms cover the bounding box's xy extent directly.
#[derive(Clone)]
pub struct PlaneWarpAdapter {
  base: AdapterBase,
  warp: PlaneWarpFn,
  pdf: PlanePdfFn,
}

impl PlaneWarpAdapter {
  pub fn new(
    name: impl Into<String>,
    warp: impl Fn(&Point2<f64>, &[f64]) -> Point2<f64> + Send + Sync + 'static,
    pdf: impl Fn(&Point2<f64>, &[f64]) -> f64 + Send + Sync + 'static,
    arguments: Vec<Argument>,
    bbox: BoundingBox3,
  ) -> Result<Self, WarpError> {
    Ok(Self::from_base(
      AdapterBase::new(name, arguments, bbox)?,
      warp,
      pdf,
    ))
  }

  pub(super) fn from_base(
    base: AdapterBase,
    warp: impl Fn(&Point2<f64>, &[f64]) -> Point2<f64> + Send + Sync + 'static,
    pdf: impl Fn(&Point2<f64>, &[f64]) -> f64 + Send + Sync + 'static,
  ) -> Self {
    PlaneWarpAdapter {
      base,
      warp: Arc::new(warp),
      pdf: Arc::new(pdf),
    }
  }

  /// Evaluates the wrapped density under the current argument values.
  pub fn pdf(&self, p: &Point2<f64>) -> f64 {
    (self.pdf)(p, self.base.values())
  }

  fn extents(&self) -> Vector2<f64> {
    self.base.bbox().extents().xy()
  }
}

impl WarpAdapter for PlaneWarpAdapter {
  fn base(&self) -> &AdapterBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut AdapterBase {
    &mut self.base
  }

  fn input_dimensionality(&self) -> usize {
    2
  }

  fn domain_dimensionality(&self) -> usize {
    2
  }

  fn warp_sample(&self, sample: &Point2<f64>) -> (Vector3<f64>, f64) {
    let p = (self.warp)(sample, self.base.values());
    let weight = importance_weight(self.pdf(&p));
    (Vector3::new(p.x, p.y, 0.), weight)
  }

  fn domain_to_point(&self, position: &Vector3<f64>) -> Option<Point2<f64>> {
    let finite = position.x.is_finite() && position.y.is_finite();
    if !finite || !self.base.bbox().contains(position, 2) {
      return None;
    }

    let normalized = self.base.bbox().normalize(position);
    Some(Point2::new(normalized.x, normalized.y))
  }

  fn pdf_integrand(&self) -> Box<dyn Fn(f64, f64) -> f64 + '_> {
    let min = self.base.bbox().min;
    let extents = self.extents();
    Box::new(move |u, v| {
      let p = Point2::new(min.x + u * extents.x, min.y + v * extents.y);
      self.pdf(&p)
    })
  }

  fn pdf_scaling_factor(&self) -> f64 {
    let extents = self.extents();
    extents.x * extents.y
  }
}

impl Display for PlaneWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "PlaneWarpAdapter[{}]", self.base)
  }
}

impl Debug for PlaneWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PlaneWarpAdapter")
      .field("base", &self.base)
      .finish_non_exhaustive()
  }
}
