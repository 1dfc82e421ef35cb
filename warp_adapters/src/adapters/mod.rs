//! Uniform wrappers around warp + pdf pairs that can generate sample batches and histograms for
//! statistical testing.
//!
//! The generation and histogram logic is shared through default methods on [`WarpAdapter`]; the
//! concrete adapters only describe their dimensionality, how output positions are projected into
//! grid space and how the density is integrated over grid cells.

use std::fmt::{self, Display};

use nalgebra::{Point2, Vector3};
use rand::RngCore;

use crate::{
  integrate::{adaptive_simpson_2d, DEFAULT_EPSILON, DEFAULT_MAX_DEPTH},
  sampling::generate_canonical_samples,
  Argument, BoundingBox3, Histogram, SampleBatch, SamplingType, WarpError,
};

mod identity;
mod line;
mod plane;
mod sphere;

pub use identity::IdentityWarpAdapter;
pub use line::{LinePdfFn, LineWarpAdapter, LineWarpFn};
pub use plane::{PlanePdfFn, PlaneWarpAdapter, PlaneWarpFn};
pub use sphere::{SpherePdfFn, SphereWarpAdapter, SphereWarpFn};

/// Densities at or below this are treated as zero when computing importance weights.
pub const MIN_PDF: f64 = 1e-12;

/// Importance weight for a sample with density `pdf`.  Zero, negative, tiny or non-finite
/// densities get a weight of zero.
#[inline]
pub fn importance_weight(pdf: f64) -> f64 {
  if pdf.is_finite() && pdf > MIN_PDF {
    1. / pdf
  } else {
    0.
  }
}

pub(crate) fn log_skipped_points(name: &str, total: usize, dropped: usize, zero_weight: usize) {
  if zero_weight > 0 {
    log::debug!("{name}: skipped {zero_weight} of {total} points with zero weight");
  }
  if dropped > 0 {
    log::debug!("{name}: dropped {dropped} of {total} points outside of the histogram domain");
  }
}

/// Construction-time state shared by every adapter: its name, its tunable arguments along with
/// their current values, and the bounding box of its output domain.
#[derive(Clone, Debug, PartialEq)]
pub struct AdapterBase {
  name: String,
  arguments: Vec<Argument>,
  values: Vec<f64>,
  bbox: BoundingBox3,
}

impl AdapterBase {
  pub fn new(
    name: impl Into<String>,
    arguments: Vec<Argument>,
    bbox: BoundingBox3,
  ) -> Result<Self, WarpError> {
    for arg in &arguments {
      if !(arg.min_value <= arg.default_value && arg.default_value <= arg.max_value) {
        return Err(WarpError::InvalidArgumentBounds {
          name: arg.name.clone(),
          min: arg.min_value,
          default: arg.default_value,
          max: arg.max_value,
        });
      }
    }

    let values = arguments.iter().map(|arg| arg.default_value).collect();
    Ok(AdapterBase {
      name: name.into(),
      arguments,
      values,
      bbox,
    })
  }

  /// Base for an adapter with no tunable arguments, which can't fail validation.
  pub fn without_arguments(name: impl Into<String>, bbox: BoundingBox3) -> Self {
    AdapterBase {
      name: name.into(),
      arguments: Vec::new(),
      values: Vec::new(),
      bbox,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn arguments(&self) -> &[Argument] {
    &self.arguments
  }

  pub fn values(&self) -> &[f64] {
    &self.values
  }

  pub fn bbox(&self) -> &BoundingBox3 {
    &self.bbox
  }

  /// Sets the named argument, clamped to its range.  Returns the value actually stored.
  pub fn set_argument(&mut self, name: &str, value: f64) -> Result<f64, WarpError> {
    let ix = self
      .arguments
      .iter()
      .position(|arg| arg.name == name)
      .ok_or_else(|| WarpError::UnknownArgument {
        adapter: self.name.clone(),
        name: name.to_owned(),
      })?;

    let clamped = self.arguments[ix].clamp(value);
    self.values[ix] = clamped;
    Ok(clamped)
  }

  /// Sets every argument at once from normalized [0, 1] control values.
  pub fn set_normalized_values(&mut self, normalized: &[f64]) -> Result<(), WarpError> {
    if normalized.len() != self.arguments.len() {
      return Err(WarpError::ArgumentCountMismatch {
        expected: self.arguments.len(),
        found: normalized.len(),
      });
    }

    for (ix, &t) in normalized.iter().enumerate() {
      let arg = &self.arguments[ix];
      self.values[ix] = arg.clamp(arg.map(t));
    }
    Ok(())
  }

  pub fn reset_arguments(&mut self) {
    for (value, arg) in self.values.iter_mut().zip(&self.arguments) {
      *value = arg.default_value;
    }
  }
}

impl Display for AdapterBase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "name=\"{}\", arguments=[", self.name)?;
    for (ix, (arg, value)) in self.arguments.iter().zip(&self.values).enumerate() {
      if ix > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}={value} in [{}, {}]", arg.name, arg.min_value, arg.max_value)?;
    }
    write!(
      f,
      "], bbox=[({}, {}, {}), ({}, {}, {})]",
      self.bbox.min.x,
      self.bbox.min.y,
      self.bbox.min.z,
      self.bbox.max.x,
      self.bbox.max.y,
      self.bbox.max.z
    )
  }
}

/// A warping function and its density, wrapped so it can be tested statistically.
///
/// Implementors provide the dimensionality metadata, the per-sample warp, the projection from the
/// output domain into normalized grid coordinates and the density integrand over grid space.  Batch
/// generation and both histograms are provided in terms of those.
pub trait WarpAdapter: Send + Sync {
  fn base(&self) -> &AdapterBase;

  fn base_mut(&mut self) -> &mut AdapterBase;

  fn name(&self) -> &str {
    self.base().name()
  }

  fn bbox(&self) -> &BoundingBox3 {
    self.base().bbox()
  }

  fn arguments(&self) -> &[Argument] {
    self.base().arguments()
  }

  /// Current values of the arguments, in declaration order.
  fn argument_values(&self) -> &[f64] {
    self.base().values()
  }

  fn set_argument(&mut self, name: &str, value: f64) -> Result<f64, WarpError> {
    self.base_mut().set_argument(name, value)
  }

  /// Sets every argument from normalized [0, 1] control values, in declaration order.
  fn set_normalized_arguments(&mut self, normalized: &[f64]) -> Result<(), WarpError> {
    self.base_mut().set_normalized_values(normalized)
  }

  fn reset_arguments(&mut self) {
    self.base_mut().reset_arguments()
  }

  /// Only true for the pass-through adapter used to validate the testing pipeline itself.
  fn is_identity(&self) -> bool {
    false
  }

  /// Dimensionality of the canonical domain the samples are drawn from.
  fn input_dimensionality(&self) -> usize;

  /// Dimensionality of the output domain.
  fn domain_dimensionality(&self) -> usize;

  /// Warps a single canonical sample, returning the output position and its importance weight.
  fn warp_sample(&self, sample: &Point2<f64>) -> (Vector3<f64>, f64);

  /// Projects an output position into normalized [0, 1]^2 grid coordinates.  Returns `None` for
  /// positions that fall outside of the histogrammed region.
  fn domain_to_point(&self, position: &Vector3<f64>) -> Option<Point2<f64>>;

  /// The density expressed over normalized grid coordinates.
  fn pdf_integrand(&self) -> Box<dyn Fn(f64, f64) -> f64 + '_>;

  /// Jacobian of the map from normalized grid coordinates to the output domain.
  fn pdf_scaling_factor(&self) -> f64;

  fn generate_warped_points(
    &self,
    sampler: &mut dyn RngCore,
    strategy: SamplingType,
    point_count: usize,
  ) -> Result<SampleBatch, WarpError> {
    let samples =
      generate_canonical_samples(sampler, strategy, point_count, self.input_dimensionality())?;

    let mut batch = SampleBatch::with_capacity(samples.len());
    for sample in &samples {
      let (position, weight) = self.warp_sample(sample);
      batch.push(position, weight);
    }
    Ok(batch)
  }

  /// Bins warped points into a `grid_width` x `grid_height` histogram, one count per point.
  /// Points with zero weight contribute nothing, and points projecting outside of the grid are
  /// dropped.
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

      let binned = match self.domain_to_point(position) {
        Some(p) => hist.accumulate(p.x, p.y, 1.),
        None => false,
      };
      if !binned {
        dropped += 1;
      }
    }

    log_skipped_points(self.name(), batch.len(), dropped, zero_weight);
    Ok(hist)
  }

  /// Integrates the density over every grid cell and scales by `point_count`, giving the counts a
  /// perfect warp would produce.
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
    let (inv_width, inv_height) = (1. / grid_width as f64, 1. / grid_height as f64);

    for y in 0..grid_height {
      for x in 0..grid_width {
        let lo = (x as f64 * inv_width, y as f64 * inv_height);
        let hi = ((x + 1) as f64 * inv_width, (y + 1) as f64 * inv_height);
        let mass = adaptive_simpson_2d(&*integrand, lo, hi, DEFAULT_EPSILON, DEFAULT_MAX_DEPTH);
        hist[(x, y)] = (scale * mass).max(0.);
      }
    }

    Ok(hist)
  }
}
