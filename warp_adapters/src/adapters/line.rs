use std::{
  fmt::{self, Debug, Display},
  sync::Arc,
};

use nalgebra::{Point2, Vector3};
use rand::RngCore;

use super::{importance_weight, log_skipped_points, AdapterBase, WarpAdapter};
use crate::{
  integrate::{adaptive_simpson, DEFAULT_EPSILON, DEFAULT_MAX_DEPTH},
  Argument, BoundingBox3, Histogram, SamplingType, WarpError,
};

pub type LineWarpFn = Arc<dyn Fn(f64, &[f64]) -> f64 + Send + Sync>;
pub type LinePdfFn = Arc<dyn Fn(f64, &[f64]) -> f64 + Send + Sync>;

/// Adapter for warps from the unit interval onto a segment of the x axis.
///
/// The 1D domain is split into `grid_width * grid_height` equal bins laid out in row-major order,
/// so a histogram row holds `grid_width` consecutive bins of the segment.
#[derive(Clone)]
pub struct LineWarpAdapter {
  base: AdapterBase,
  warp: LineWarpFn,
  pdf: LinePdfFn,
}

impl LineWarpAdapter {
  pub fn new(
    name: impl Into<String>,
    warp: impl Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    pdf: impl Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    arguments: Vec<Argument>,
    bbox: BoundingBox3,
  ) -> Result<Self, WarpError> {
    Ok(LineWarpAdapter {
      base: AdapterBase::new(name, arguments, bbox)?,
      warp: Arc::new(warp),
      pdf: Arc::new(pdf),
    })
  }

  pub fn pdf(&self, x: f64) -> f64 {
    (self.pdf)(x, self.base.values())
  }

  /// Row-major `(column, row)` of the bin holding normalized coordinate `t`.
  fn flat_cell(t: f64, grid_width: usize, grid_height: usize) -> (usize, usize) {
    let bin_count = grid_width * grid_height;
    let ix = ((t * bin_count as f64) as usize).min(bin_count - 1);
    (ix % grid_width, ix / grid_width)
  }
}

impl WarpAdapter for LineWarpAdapter {
  fn base(&self) -> &AdapterBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut AdapterBase {
    &mut self.base
  }

  fn input_dimensionality(&self) -> usize {
    1
  }

  fn domain_dimensionality(&self) -> usize {
    1
  }

  fn warp_sample(&self, sample: &Point2<f64>) -> (Vector3<f64>, f64) {
    let x = (self.warp)(sample.x, self.base.values());
    (Vector3::new(x, 0., 0.), importance_weight(self.pdf(x)))
  }

  /// Returns the position along the segment as `x`; `y` is always zero.
  fn domain_to_point(&self, position: &Vector3<f64>) -> Option<Point2<f64>> {
    if !position.x.is_finite() || !self.base.bbox().contains(position, 1) {
      return None;
    }

    let bbox = self.base.bbox();
    Some(Point2::new((position.x - bbox.min.x) / bbox.extents().x, 0.))
  }

  fn pdf_integrand(&self) -> Box<dyn Fn(f64, f64) -> f64 + '_> {
    let min = self.base.bbox().min.x;
    let extent = self.base.bbox().extents().x;
    Box::new(move |u, _v| self.pdf(min + u * extent))
  }

  fn pdf_scaling_factor(&self) -> f64 {
    self.base.bbox().extents().x
  }

  fn generate_observed_histogram(
    &self,
    sampler: &mut dyn RngCore,
    strategy: SamplingType,
    point_count: usize,
    grid_width: usize,
    grid_height: usize,
  ) -> Result<Histogram, WarpError> {
    let mut hist = Histogram::new(grid_width, grid_height)?;
    let batch = self.generate_warped_points(sampler, strategy, point_count)?;

    let (mut dropped, mut zero_weight) = (0usize, 0usize);
    for (position, weight) in batch.iter() {
      if weight == 0. {
        zero_weight += 1;
        continue;
      }

      match self.domain_to_point(position) {
        Some(p) => hist[Self::flat_cell(p.x, grid_width, grid_height)] += 1.,
        None => dropped += 1,
      }
    }

    log_skipped_points(self.name(), batch.len(), dropped, zero_weight);
    Ok(hist)
  }

  fn generate_expected_histogram(
    &self,
    point_count: usize,
    grid_width: usize,
    grid_height: usize,
  ) -> Result<Histogram, WarpError> {
    if point_count == 0 {
      return Err(WarpError::ZeroPointCount);
    }
    let mut hist = Histogram::new(grid_width, grid_height)?;

    let integrand = self.pdf_integrand();
    let scale = point_count as f64 * self.pdf_scaling_factor();
    let bin_count = grid_width * grid_height;
    let inv_bin_count = 1. / bin_count as f64;

    for ix in 0..bin_count {
      let t0 = ix as f64 * inv_bin_count;
      let t1 = (ix + 1) as f64 * inv_bin_count;
      let mass = adaptive_simpson(
        |t| integrand(t, 0.),
        t0,
        t1,
        DEFAULT_EPSILON,
        DEFAULT_MAX_DEPTH,
      );
      hist[(ix % grid_width, ix / grid_width)] = (scale * mass).max(0.);
    }

    Ok(hist)
  }
}

impl Display for LineWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "LineWarpAdapter[{}]", self.base)
  }
}

impl Debug for LineWarpAdapter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LineWarpAdapter")
      .field("base", &self.base)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use common::build_sampler;

  fn tent() -> LineWarpAdapter {
    LineWarpAdapter::new(
      "Tent",
      |s, _| warp::interval_to_tent(s),
      |x, _| warp::tent_pdf(x),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )
    .unwrap()
  }

  #[test]
  fn test_metadata() {
    let adapter = tent();
    assert_eq!(adapter.input_dimensionality(), 1);
    assert_eq!(adapter.domain_dimensionality(), 1);
    assert_eq!(adapter.pdf_scaling_factor(), 2.);
  }

  #[test]
  fn test_warp_sample_leaves_unused_components_zero() {
    let adapter = tent();
    let (position, weight) = adapter.warp_sample(&Point2::new(0.125, 0.9));
    assert_eq!(position, Vector3::new(0.5, 0., 0.));
    assert!((weight - 2.).abs() < 1e-12);
  }

  #[test]
  fn test_flat_cells_are_row_major() {
    assert_eq!(LineWarpAdapter::flat_cell(0., 4, 2), (0, 0));
    assert_eq!(LineWarpAdapter::flat_cell(0.49, 4, 2), (3, 0));
    assert_eq!(LineWarpAdapter::flat_cell(0.5, 4, 2), (0, 1));
    assert_eq!(LineWarpAdapter::flat_cell(1., 4, 2), (3, 1));
  }

  #[test]
  fn test_expected_histogram_is_symmetric_and_normalized() {
    let adapter = tent();
    let hist = adapter.generate_expected_histogram(1_000, 4, 2).unwrap();
    assert!((hist.total() - 1_000.).abs() < 1e-6, "{}", hist.total());

    // bins are symmetric around x = 0, which sits between (3, 0) and (0, 1)
    let cells = hist.cells();
    for ix in 0..4 {
      assert!((cells[ix] - cells[7 - ix]).abs() < 1e-6);
    }
    // the first bin spans [-1, -0.75]: mass = 0.25^2 / 2
    assert!((cells[0] - 1_000. * 0.03125).abs() < 1e-6);
  }

  #[test]
  fn test_observed_histogram_counts_every_point() {
    let adapter = tent();
    let hist = adapter
      .generate_observed_histogram(&mut build_sampler(4), SamplingType::Stratified, 5_000, 8, 8)
      .unwrap();
    assert_eq!(hist.total(), 5_000.);
  }

  #[test]
  fn test_zero_weight_points_are_skipped() {
    let adapter = LineWarpAdapter::new(
      "Upper half",
      |s, _| s,
      |x, _| if x >= 0.5 { 2. } else { 0. },
      Vec::new(),
      BoundingBox3::UNIT_SQUARE,
    )
    .unwrap();

    let hist = adapter
      .generate_observed_histogram(&mut build_sampler(0), SamplingType::Grid, 1_000, 4, 2)
      .unwrap();
    assert_eq!(hist.total(), 500.);
    assert!(hist.cells()[..4].iter().all(|&c| c == 0.));
    assert!(hist.cells()[4..].iter().all(|&c| c == 125.));
  }
}
