use std::fmt::{self, Display};

use nalgebra::{Point2, Vector3};

use super::{AdapterBase, PlaneWarpAdapter, WarpAdapter};
use crate::BoundingBox3;

fn unit_square_pdf(p: &Point2<f64>) -> f64 {
  if (0. ..=1.).contains(&p.x) && (0. ..=1.).contains(&p.y) {
    1.
  } else {
    0.
  }
}

/// Pass-through warp over the unit square with a uniform density.  Used as a control to validate
/// the testing pipeline itself.
#[derive(Clone, Debug)]
pub struct IdentityWarpAdapter {
  inner: PlaneWarpAdapter,
}

impl IdentityWarpAdapter {
  pub fn new() -> Self {
    let inner = PlaneWarpAdapter::from_base(
      AdapterBase::without_arguments("Identity", BoundingBox3::UNIT_SQUARE),
      |s, _| *s,
      |p, _| unit_square_pdf(p),
    );

    IdentityWarpAdapter { inner }
  }
}

impl Default for IdentityWarpAdapter {
  fn default() -> Self {
    Self::new()
  }
}

impl WarpAdapter for IdentityWarpAdapter {
  fn base(&self) -> &AdapterBase {
    self.inner.base()
  }

  fn base_mut(&mut self) -> &mut AdapterBase {
    self.inner.base_mut()
  }

  fn is_identity(&self) -> bool {
    true
  }

  fn input_dimensionality(&self) -> usize {
    self.inner.input_dimensionality()
  }

  fn domain_dimensionality(&self) -> usize {
    self.inner.domain_dimensionality()
  }

  fn warp_sample(&self, sample: &Point2<f64>) -> (Vector3<f64>, f64) {
    self.inner.warp_sample(sample)
  }

  fn domain_to_point(&self, position: &Vector3<f64>) -> Option<Point2<f64>> {
    self.inner.domain_to_point(position)
  }

  fn pdf_integrand(&self) -> Box<dyn Fn(f64, f64) -> f64 + '_> {
    self.inner.pdf_integrand()
  }

  fn pdf_scaling_factor(&self) -> f64 {
    self.inner.pdf_scaling_factor()
  }
}

impl Display for IdentityWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "IdentityWarpAdapter[]")
  }
}
