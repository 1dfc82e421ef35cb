use nalgebra::{Point2, Vector3};
use rand::RngCore;
use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

use common::random;

use crate::WarpError;

/// How canonical-domain samples are produced before warping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum SamplingType {
  /// Every sample is drawn independently from the sampler.
  Independent,
  /// Samples sit at the centers of a regular lattice.  Doesn't touch the sampler.
  Grid,
  /// One jittered sample per lattice cell.
  Stratified,
}

impl SamplingType {
  /// Number of lattice cells along each axis used for `point_count` samples over a 2D domain.
  fn lattice_side(point_count: usize) -> usize {
    ((point_count as f64).sqrt().round() as usize).max(1)
  }

  /// Number of samples that will actually be produced when `point_count` are requested from a
  /// canonical domain of dimension `input_dims`.
  ///
  /// Lattice-based strategies over the unit square round to the nearest perfect square; all other
  /// combinations produce exactly `point_count`.
  pub fn effective_point_count(self, point_count: usize, input_dims: usize) -> usize {
    match self {
      SamplingType::Independent => point_count,
      SamplingType::Grid | SamplingType::Stratified if input_dims >= 2 => {
        let side = Self::lattice_side(point_count);
        side * side
      }
      SamplingType::Grid | SamplingType::Stratified => point_count,
    }
  }
}

/// Draws canonical samples from [0, 1)^`input_dims`.  For 1D domains the `y` coordinate of every
/// sample is zero.
pub fn generate_canonical_samples(
  sampler: &mut dyn RngCore,
  strategy: SamplingType,
  point_count: usize,
  input_dims: usize,
) -> Result<Vec<Point2<f64>>, WarpError> {
  if point_count == 0 {
    return Err(WarpError::ZeroPointCount);
  }

  let count = strategy.effective_point_count(point_count, input_dims);
  let mut samples = Vec::with_capacity(count);

  if input_dims < 2 {
    let inv_count = 1. / count as f64;
    for i in 0..count {
      let x = match strategy {
        SamplingType::Independent => random(sampler),
        SamplingType::Grid => (i as f64 + 0.5) * inv_count,
        SamplingType::Stratified => (i as f64 + random(sampler)) * inv_count,
      };
      samples.push(Point2::new(x, 0.));
    }
    return Ok(samples);
  }

  match strategy {
    SamplingType::Independent => {
      for _ in 0..count {
        let x = random(sampler);
        let y = random(sampler);
        samples.push(Point2::new(x, y));
      }
    }
    SamplingType::Grid | SamplingType::Stratified => {
      let side = SamplingType::lattice_side(point_count);
      let inv_side = 1. / side as f64;
      for y in 0..side {
        for x in 0..side {
          let (jitter_x, jitter_y) = if strategy == SamplingType::Stratified {
            (random(sampler), random(sampler))
          } else {
            (0.5, 0.5)
          };
          samples.push(Point2::new(
            (x as f64 + jitter_x) * inv_side,
            (y as f64 + jitter_y) * inv_side,
          ));
        }
      }
    }
  }

  Ok(samples)
}

/// Output of warping a batch of canonical samples.
///
/// `positions` and `weights` always have the same length.  Lower-dimensional domains leave the
/// unused position components at zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleBatch {
  pub positions: Vec<Vector3<f64>>,
  pub weights: Vec<f64>,
}

impl SampleBatch {
  pub fn with_capacity(capacity: usize) -> Self {
    SampleBatch {
      positions: Vec::with_capacity(capacity),
      weights: Vec::with_capacity(capacity),
    }
  }

  pub fn push(&mut self, position: Vector3<f64>, weight: f64) {
    self.positions.push(position);
    self.weights.push(weight);
  }

  pub fn len(&self) -> usize {
    self.positions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Vector3<f64>, f64)> + '_ {
    self.positions.iter().zip(self.weights.iter().copied())
  }
}
