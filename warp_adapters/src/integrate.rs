//! Adaptive Simpson quadrature, used to integrate densities over histogram cells.
//!
//! Uses the stopping criterion from J.N. Lyness, "Notes on the adaptive Simpson quadrature
//! routine" (1969), followed by one step of Richardson extrapolation.

pub const DEFAULT_EPSILON: f64 = 1e-6;
pub const DEFAULT_MAX_DEPTH: u32 = 10;

struct Panel {
  a: f64,
  b: f64,
  c: f64,
  fa: f64,
  fb: f64,
  fc: f64,
  estimate: f64,
}

fn integrate_panel(f: &impl Fn(f64) -> f64, panel: Panel, eps: f64, depth: u32) -> f64 {
  let Panel {
    a,
    b,
    c,
    fa,
    fb,
    fc,
    estimate,
  } = panel;

  let d = 0.5 * (a + b);
  let e = 0.5 * (b + c);
  let fd = f(d);
  let fe = f(e);

  let h = c - a;
  let left = h / 12. * (fa + 4. * fd + fb);
  let right = h / 12. * (fb + 4. * fe + fc);
  let refined = left + right;

  if depth == 0 || (refined - estimate).abs() < 15. * eps {
    return refined + (refined - estimate) / 15.;
  }

  integrate_panel(
    f,
    Panel {
      a,
      b: d,
      c: b,
      fa,
      fb: fd,
      fc: fb,
      estimate: left,
    },
    0.5 * eps,
    depth - 1,
  ) + integrate_panel(
    f,
    Panel {
      a: b,
      b: e,
      c,
      fa: fb,
      fb: fe,
      fc,
      estimate: right,
    },
    0.5 * eps,
    depth - 1,
  )
}

/// Integrates `f` over `[x0, x1]`.
pub fn adaptive_simpson(f: impl Fn(f64) -> f64, x0: f64, x1: f64, eps: f64, max_depth: u32) -> f64 {
  let a = x0;
  let b = 0.5 * (x0 + x1);
  let c = x1;
  let (fa, fb, fc) = (f(a), f(b), f(c));
  let estimate = (c - a) / 6. * (fa + 4. * fb + fc);

  integrate_panel(
    &f,
    Panel {
      a,
      b,
      c,
      fa,
      fb,
      fc,
      estimate,
    },
    eps,
    max_depth,
  )
}

/// Integrates `f(x, y)` over `[x0, x1] x [y0, y1]` as nested 1D integrals, `x` innermost.
pub fn adaptive_simpson_2d(
  f: impl Fn(f64, f64) -> f64,
  (x0, y0): (f64, f64),
  (x1, y1): (f64, f64),
  eps: f64,
  max_depth: u32,
) -> f64 {
  adaptive_simpson(
    |y| adaptive_simpson(|x| f(x, y), x0, x1, eps, max_depth),
    y0,
    y1,
    eps,
    max_depth,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::f64::consts::PI;

  #[test]
  fn test_cubic_is_exact() {
    let val = adaptive_simpson(|x| x * x * x - 2. * x + 1., 0., 2., DEFAULT_EPSILON, 0);
    assert!((val - 2.).abs() < 1e-12, "{val}");
  }

  #[test]
  fn test_sine() {
    let val = adaptive_simpson(f64::sin, 0., PI, DEFAULT_EPSILON, DEFAULT_MAX_DEPTH);
    assert!((val - 2.).abs() < 1e-7, "{val}");
  }

  #[test]
  fn test_step_function() {
    let step = |x: f64| if x < 0.3 { 1. } else { 0. };
    let val = adaptive_simpson(step, 0., 1., DEFAULT_EPSILON, DEFAULT_MAX_DEPTH);
    assert!((val - 0.3).abs() < 1e-3, "{val}");
  }

  #[test]
  fn test_2d_product() {
    let val = adaptive_simpson_2d(
      |x, y| x * y,
      (0., 0.),
      (1., 2.),
      DEFAULT_EPSILON,
      DEFAULT_MAX_DEPTH,
    );
    assert!((val - 1.).abs() < 1e-12, "{val}");
  }

  #[test]
  fn test_2d_disk_area() {
    let disk = |x: f64, y: f64| if x * x + y * y <= 1. { 1. } else { 0. };
    let val = adaptive_simpson_2d(disk, (-1., -1.), (1., 1.), DEFAULT_EPSILON, DEFAULT_MAX_DEPTH);
    assert!((val - PI).abs() < 1e-2, "{val}");
  }
}
