use common::{clamp, lerp};

use crate::WarpError;

/// One tunable scalar parameter of a warping function, such as the cutoff angle of a cone.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
  pub name: String,
  pub min_value: f64,
  pub max_value: f64,
  pub default_value: f64,
  pub description: String,
}

impl Argument {
  pub fn new(
    name: impl Into<String>,
    min_value: f64,
    max_value: f64,
    default_value: f64,
    description: impl Into<String>,
  ) -> Result<Self, WarpError> {
    let name = name.into();
    let well_ordered = min_value <= default_value && default_value <= max_value;
    if !well_ordered {
      return Err(WarpError::InvalidArgumentBounds {
        name,
        min: min_value,
        default: default_value,
        max: max_value,
      });
    }

    Ok(Argument {
      name,
      min_value,
      max_value,
      default_value,
      description: description.into(),
    })
  }

  /// Maps a value from [0, 1] into [`min_value`, `max_value`].  Values outside of [0, 1]
  /// extrapolate linearly.
  pub fn map(&self, t: f64) -> f64 {
    lerp(self.min_value, self.max_value, t)
  }

  /// Inverse of [`Argument::map`].  A degenerate range maps everything to 0.
  pub fn normalize(&self, value: f64) -> f64 {
    let range = self.max_value - self.min_value;
    if range == 0. {
      return 0.;
    }
    (value - self.min_value) / range
  }

  pub fn clamp(&self, value: f64) -> f64 {
    clamp(value, self.min_value, self.max_value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cutoff() -> Argument {
    Argument::new("cosCutoff", -1., 0.95, 0.5, "Cosine of the cone's opening angle").unwrap()
  }

  #[test]
  fn test_map_endpoints() {
    let arg = cutoff();
    assert_eq!(arg.map(0.), -1.);
    assert_eq!(arg.map(1.), 0.95);
    assert!((arg.map(0.5) - (-0.025)).abs() < 1e-12);
  }

  #[test]
  fn test_normalize_map_round_trip() {
    let args = [
      cutoff(),
      Argument::new("a", 0., 1., 0., "").unwrap(),
      Argument::new("b", -10., 250., 3., "").unwrap(),
      Argument::new("c", 1e-3, 2e-3, 1.5e-3, "").unwrap(),
    ];
    for arg in &args {
      for i in 0..=100 {
        let t = i as f64 / 100.;
        let back = arg.normalize(arg.map(t));
        assert!((back - t).abs() < 1e-9, "{}: {t} -> {back}", arg.name);
      }
    }
  }

  #[test]
  fn test_map_extrapolates() {
    let arg = Argument::new("x", 0., 2., 1., "").unwrap();
    assert_eq!(arg.map(1.5), 3.);
    assert_eq!(arg.map(-0.5), -1.);
    assert_eq!(arg.normalize(4.), 2.);
  }

  #[test]
  fn test_clamp() {
    let arg = cutoff();
    assert_eq!(arg.clamp(-3.), -1.);
    assert_eq!(arg.clamp(3.), 0.95);
    assert_eq!(arg.clamp(0.1), 0.1);
  }

  #[test]
  fn test_invalid_bounds_rejected() {
    let err = Argument::new("bad", 1., 0., 0.5, "").unwrap_err();
    assert!(matches!(err, WarpError::InvalidArgumentBounds { .. }));

    let err = Argument::new("bad_default", 0., 1., 2., "").unwrap_err();
    assert!(matches!(err, WarpError::InvalidArgumentBounds { .. }));
  }

  #[test]
  fn test_degenerate_range() {
    let arg = Argument::new("fixed", 0.3, 0.3, 0.3, "").unwrap();
    assert_eq!(arg.map(0.7), 0.3);
    assert_eq!(arg.normalize(0.3), 0.);
  }
}
