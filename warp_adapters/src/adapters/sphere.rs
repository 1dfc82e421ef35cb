use std::{
  f64::consts::PI,
  fmt::{self, Debug, Display},
  sync::Arc,
};

use nalgebra::{Point2, Vector3};

use super::{importance_weight, AdapterBase, WarpAdapter};
use crate::{Argument, BoundingBox3, WarpError};

pub type SphereWarpFn = Arc<dyn Fn(&Point2<f64>, &[f64]) -> Vector3<f64> + Send + Sync>;
pub type SpherePdfFn = Arc<dyn Fn(&Vector3<f64>, &[f64]) -> f64 + Send + Sync>;

/// Adapter for warps from the unit square onto the unit sphere.
///
/// Histograms use Lambert's cylindrical equal-area projection: the azimuth `phi` maps to the grid's
/// `x` axis and `cos(theta) = z` maps to its `y` axis.  Since `dA = dz dphi` on the unit sphere,
/// equal-area grid cells cover equal solid angles.
#[derive(Clone)]
pub struct SphereWarpAdapter {
  base: AdapterBase,
  warp: SphereWarpFn,
  pdf: SpherePdfFn,
}

/// Inverse of the equal-area projection used for sphere histograms.
pub fn grid_to_direction(u: f64, v: f64) -> Vector3<f64> {
  let z = 2. * v - 1.;
  let sin_theta = (1. - z * z).max(0.).sqrt();
  let (sin_phi, cos_phi) = (2. * PI * u).sin_cos();
  Vector3::new(sin_theta * cos_phi, sin_theta * sin_phi, z)
}

/// Equal-area projection of a unit direction into [0, 1]^2.
pub fn direction_to_grid(v: &Vector3<f64>) -> Point2<f64> {
  let mut u = v.y.atan2(v.x) * (0.5 / PI);
  if u < 0. {
    u += 1.;
  }
  Point2::new(u.min(1.), (0.5 * (v.z + 1.)).clamp(0., 1.))
}

impl SphereWarpAdapter {
  pub fn new(
    name: impl Into<String>,
    warp: impl Fn(&Point2<f64>, &[f64]) -> Vector3<f64> + Send + Sync + 'static,
    pdf: impl Fn(&Vector3<f64>, &[f64]) -> f64 + Send + Sync + 'static,
    arguments: Vec<Argument>,
    bbox: BoundingBox3,
  ) -> Result<Self, WarpError> {
    Ok(SphereWarpAdapter {
      base: AdapterBase::new(name, arguments, bbox)?,
      warp: Arc::new(warp),
      pdf: Arc::new(pdf),
    })
  }

  pub fn pdf(&self, v: &Vector3<f64>) -> f64 {
    (self.pdf)(v, self.base.values())
  }
}

impl WarpAdapter for SphereWarpAdapter {
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
    3
  }

  fn warp_sample(&self, sample: &Point2<f64>) -> (Vector3<f64>, f64) {
    let v = (self.warp)(sample, self.base.values());
    (v, importance_weight(self.pdf(&v)))
  }

  /// The projection covers the whole sphere, so only non-finite positions are rejected.
  fn domain_to_point(&self, position: &Vector3<f64>) -> Option<Point2<f64>> {
    if !position.iter().all(|c| c.is_finite()) {
      return None;
    }
    Some(direction_to_grid(position))
  }

  fn pdf_integrand(&self) -> Box<dyn Fn(f64, f64) -> f64 + '_> {
    Box::new(move |u, v| self.pdf(&grid_to_direction(u, v)))
  }

  /// Area of the (phi, z) parameter rectangle, [0, 2pi] x [-1, 1].
  fn pdf_scaling_factor(&self) -> f64 {
    4. * PI
  }
}

impl Display for SphereWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SphereWarpAdapter[{}]", self.base)
  }
}

impl Debug for SphereWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SphereWarpAdapter")
      .field("base", &self.base)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use common::{build_sampler, random};

  use crate::SamplingType;

  fn sphere() -> SphereWarpAdapter {
    SphereWarpAdapter::new(
      "Uniform sphere",
      |s, _| warp::square_to_uniform_sphere(s),
      |v, _| warp::square_to_uniform_sphere_pdf(v),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )
    .unwrap()
  }

  #[test]
  fn test_projection_round_trip() {
    let mut rng = build_sampler(21);
    for _ in 0..500 {
      let (u, v) = (random(&mut rng), random(&mut rng));
      let p = direction_to_grid(&grid_to_direction(u, v));
      assert!((p.x - u).abs() < 1e-9 || (p.x - u).abs() > 1. - 1e-9);
      assert!((p.y - v).abs() < 1e-9);
    }
  }

  #[test]
  fn test_poles_project_to_grid_edges() {
    assert_eq!(direction_to_grid(&Vector3::new(0., 0., 1.)).y, 1.);
    assert_eq!(direction_to_grid(&Vector3::new(0., 0., -1.)).y, 0.);
    // slightly denormalized directions are still binned
    assert_eq!(direction_to_grid(&Vector3::new(0., 0., 1. + 1e-12)).y, 1.);
  }

  #[test]
  fn test_metadata() {
    let adapter = sphere();
    assert_eq!(adapter.input_dimensionality(), 2);
    assert_eq!(adapter.domain_dimensionality(), 3);
    assert!((adapter.pdf_scaling_factor() - 4. * PI).abs() < 1e-12);
  }

  #[test]
  fn test_uniform_sphere_expected_histogram_is_flat() {
    let adapter = sphere();
    let hist = adapter.generate_expected_histogram(51_200, 16, 16).unwrap();
    for &cell in hist.cells() {
      assert!((cell - 200.).abs() < 1e-6, "{cell}");
    }
  }

  #[test]
  fn test_hemisphere_mass_conservation() {
    let adapter = SphereWarpAdapter::new(
      "Uniform hemisphere",
      |s, _| warp::square_to_uniform_hemisphere(s),
      |v, _| warp::square_to_uniform_hemisphere_pdf(v),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )
    .unwrap();

    let hist = adapter.generate_expected_histogram(10_000, 8, 8).unwrap();
    assert!((hist.total() - 10_000.).abs() < 1., "{}", hist.total());
    // lower half of the grid is the lower hemisphere
    let lower: f64 = (0..8).flat_map(|x| (0..3).map(move |y| (x, y))).map(|c| hist[c]).sum();
    assert_eq!(lower, 0.);
  }

  #[test]
  fn test_observed_histogram_bins_every_point() {
    let adapter = sphere();
    let hist = adapter
      .generate_observed_histogram(&mut build_sampler(9), SamplingType::Independent, 4_000, 8, 8)
      .unwrap();
    assert_eq!(hist.total(), 4_000.);
  }
}
