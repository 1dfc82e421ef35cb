pub extern crate rand;
pub extern crate rand_pcg;

use rand::prelude::*;
use rand_pcg::Pcg32;

/// The uniform random source consumed by sample generation.
pub type Sampler = Pcg32;

const DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;

/// Builds a sampler from a 64-bit seed on the default PCG stream.
pub fn build_sampler(seed: u64) -> Sampler {
  build_sampler_with_stream(seed, DEFAULT_STREAM)
}

pub fn build_sampler_with_stream(seed: u64, stream: u64) -> Sampler {
  let mut rng = Pcg32::new(seed, stream);

  // pump the rng a few times to avoid possible issues with seeding
  for _ in 0..8 {
    let _ = rng.gen::<u32>();
  }

  rng
}

/// Returns a random f64 in the range [0, 1).
#[inline(always)]
pub fn random(rng: &mut (impl RngCore + ?Sized)) -> f64 {
  rng.gen::<f64>()
}

pub fn clamp(val: f64, min: f64, max: f64) -> f64 {
  if val < min {
    return min;
  }
  if val > max {
    return max;
  }
  val
}

#[inline]
pub fn lerp(min: f64, max: f64, t: f64) -> f64 {
  min + t * (max - min)
}
