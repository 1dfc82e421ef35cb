//! Warps that map samples from the unit square (or unit interval) onto other domains, along with
//! the densities of the resulting distributions.
//!
//! Every `*_pdf` function is normalized over its target domain with respect to the natural
//! measure of that domain: area for planar warps, solid angle for spherical ones and length for
//! the interval warps.

use std::f64::consts::{FRAC_1_PI, FRAC_PI_2, FRAC_PI_4, PI};

use nalgebra::{Point2, Vector3};

const INV_TWO_PI: f64 = 0.5 * FRAC_1_PI;
const INV_FOUR_PI: f64 = 0.25 * FRAC_1_PI;

#[inline]
fn safe_sqrt(x: f64) -> f64 {
  x.max(0.).sqrt()
}

/// Builds a direction from the cosine of its polar angle and its azimuth.
#[inline]
fn spherical_direction(cos_theta: f64, phi: f64) -> Vector3<f64> {
  let sin_theta = safe_sqrt(1. - cos_theta * cos_theta);
  let (sin_phi, cos_phi) = phi.sin_cos();
  Vector3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

pub fn square_to_uniform_sphere(sample: &Point2<f64>) -> Vector3<f64> {
  let z = 1. - 2. * sample.y;
  spherical_direction(z, 2. * PI * sample.x)
}

pub fn square_to_uniform_sphere_pdf(_v: &Vector3<f64>) -> f64 {
  INV_FOUR_PI
}

pub fn square_to_uniform_hemisphere(sample: &Point2<f64>) -> Vector3<f64> {
  spherical_direction(sample.x, 2. * PI * sample.y)
}

pub fn square_to_uniform_hemisphere_pdf(v: &Vector3<f64>) -> f64 {
  if v.z >= 0. {
    INV_TWO_PI
  } else {
    0.
  }
}

/// Malley's method: project a uniform disk sample up onto the hemisphere.
pub fn square_to_cosine_hemisphere(sample: &Point2<f64>) -> Vector3<f64> {
  let p = square_to_uniform_disk_concentric(sample);
  let z = safe_sqrt(1. - p.x * p.x - p.y * p.y);
  Vector3::new(p.x, p.y, z)
}

pub fn square_to_cosine_hemisphere_pdf(v: &Vector3<f64>) -> f64 {
  if v.z >= 0. {
    v.z * FRAC_1_PI
  } else {
    0.
  }
}

/// Uniformly samples directions within `acos(cos_cutoff)` of the +z axis.
pub fn square_to_uniform_cone(sample: &Point2<f64>, cos_cutoff: f64) -> Vector3<f64> {
  let cos_theta = (1. - sample.x) + sample.x * cos_cutoff;
  spherical_direction(cos_theta, 2. * PI * sample.y)
}

/// The density is constant up to and including the cutoff and zero beyond it.
pub fn square_to_uniform_cone_pdf(v: &Vector3<f64>, cos_cutoff: f64) -> f64 {
  if v.z >= cos_cutoff {
    INV_TWO_PI / (1. - cos_cutoff)
  } else {
    0.
  }
}

pub fn square_to_uniform_disk(sample: &Point2<f64>) -> Point2<f64> {
  let r = sample.x.sqrt();
  let (sin_phi, cos_phi) = (2. * PI * sample.y).sin_cos();
  Point2::new(r * cos_phi, r * sin_phi)
}

pub fn square_to_uniform_disk_pdf(p: &Point2<f64>) -> f64 {
  if p.x * p.x + p.y * p.y <= 1. {
    FRAC_1_PI
  } else {
    0.
  }
}

/// Low-distortion square to disk mapping from Shirley and Chiu, "A Low Distortion Map Between
/// Disk and Square" (1997).
pub fn square_to_uniform_disk_concentric(sample: &Point2<f64>) -> Point2<f64> {
  let r1 = 2. * sample.x - 1.;
  let r2 = 2. * sample.y - 1.;

  if r1 == 0. && r2 == 0. {
    return Point2::origin();
  }

  let (r, phi) = if r1 * r1 > r2 * r2 {
    (r1, FRAC_PI_4 * (r2 / r1))
  } else {
    (r2, FRAC_PI_2 - FRAC_PI_4 * (r1 / r2))
  };

  let (sin_phi, cos_phi) = phi.sin_cos();
  Point2::new(r * cos_phi, r * sin_phi)
}

pub fn square_to_uniform_disk_concentric_pdf(p: &Point2<f64>) -> f64 {
  square_to_uniform_disk_pdf(p)
}

/// Inverse of [`square_to_uniform_disk_concentric`].
pub fn uniform_disk_to_square_concentric(p: &Point2<f64>) -> Point2<f64> {
  let r = (p.x * p.x + p.y * p.y).sqrt();
  let mut phi = p.y.atan2(p.x);
  if phi < -FRAC_PI_4 {
    phi += 2. * PI;
  }

  let (a, b) = if phi < FRAC_PI_4 {
    (r, phi * r / FRAC_PI_4)
  } else if phi < 3. * FRAC_PI_4 {
    (-(phi - FRAC_PI_2) * r / FRAC_PI_4, r)
  } else if phi < 5. * FRAC_PI_4 {
    (-r, (phi - PI) * -r / FRAC_PI_4)
  } else {
    (-(phi - 3. * FRAC_PI_2) * -r / FRAC_PI_4, -r)
  };

  Point2::new(0.5 * (a + 1.), 0.5 * (b + 1.))
}

/// Maps onto the triangle with vertices (0, 0), (1, 0) and (0, 1).
pub fn square_to_uniform_triangle(sample: &Point2<f64>) -> Point2<f64> {
  let t = safe_sqrt(1. - sample.x);
  Point2::new(1. - t, t * sample.y)
}

pub fn square_to_uniform_triangle_pdf(p: &Point2<f64>) -> f64 {
  if p.x >= 0. && p.y >= 0. && p.x + p.y <= 1. {
    2.
  } else {
    0.
  }
}

/// Box-Muller transform producing two independent standard normal variates.
pub fn square_to_std_normal(sample: &Point2<f64>) -> Point2<f64> {
  let r = (-2. * (1. - sample.x).ln()).sqrt();
  let (sin_phi, cos_phi) = (2. * PI * sample.y).sin_cos();
  Point2::new(r * cos_phi, r * sin_phi)
}

pub fn square_to_std_normal_pdf(p: &Point2<f64>) -> f64 {
  INV_TWO_PI * (-0.5 * (p.x * p.x + p.y * p.y)).exp()
}

/// Maps the unit interval onto the tent function supported on [-1, 1].
pub fn interval_to_tent(sample: f64) -> f64 {
  if sample < 0.5 {
    1. - (2. * sample).sqrt()
  } else {
    (2. * sample - 1.).sqrt() - 1.
  }
}

pub fn tent_pdf(x: f64) -> f64 {
  if x.abs() <= 1. {
    1. - x.abs()
  } else {
    0.
  }
}

pub fn square_to_tent(sample: &Point2<f64>) -> Point2<f64> {
  Point2::new(interval_to_tent(sample.x), interval_to_tent(sample.y))
}

pub fn square_to_tent_pdf(p: &Point2<f64>) -> f64 {
  tent_pdf(p.x) * tent_pdf(p.y)
}

/// Maps the unit interval onto a triangular distribution supported on `[a, c]` with its mode at
/// `b`.  Requires `a <= b <= c` and `a < c`.
pub fn interval_to_nonuniform_tent(sample: f64, a: f64, b: f64, c: f64) -> f64 {
  let split = (b - a) / (c - a);
  if sample < split {
    let u = sample / split;
    b - (b - a) * (1. - safe_sqrt(u))
  } else {
    let u = (sample - split) / (1. - split);
    b + (c - b) * (1. - safe_sqrt(u))
  }
}

pub fn nonuniform_tent_pdf(x: f64, a: f64, b: f64, c: f64) -> f64 {
  if x < a || x > c {
    return 0.;
  }

  if x < b {
    2. * (x - a) / ((c - a) * (b - a))
  } else if x > b {
    2. * (c - x) / ((c - a) * (c - b))
  } else {
    2. / (c - a)
  }
}
