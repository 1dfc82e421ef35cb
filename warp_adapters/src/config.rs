use serde::Deserialize;

use crate::{SamplingType, WarpError};

/// Parameters of a statistical test run.
///
/// Can be loaded from JSON; missing keys keep their default values:
///
/// ```json
/// { "point_count": 40000, "sampling_type": "Stratified", "significance_level": 0.001 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticalTestConfig {
  pub point_count: usize,
  pub grid_width: usize,
  pub grid_height: usize,
  pub sampling_type: SamplingType,
  pub significance_level: f64,
  /// Cells expecting fewer samples than this are pooled before computing the statistic.
  pub min_expected_frequency: f64,
  /// Number of tests run as one family, used for the Sidak correction.
  pub test_count: usize,
  pub seed: u64,
}

impl Default for StatisticalTestConfig {
  fn default() -> Self {
    StatisticalTestConfig {
      point_count: 160_000,
      grid_width: 16,
      grid_height: 16,
      sampling_type: SamplingType::Independent,
      significance_level: 0.01,
      min_expected_frequency: 5.,
      test_count: 1,
      seed: 0,
    }
  }
}

impl StatisticalTestConfig {
  pub fn from_json(json: &str) -> Result<Self, WarpError> {
    let config: StatisticalTestConfig =
      serde_json::from_str(json).map_err(|err| WarpError::Config(err.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), WarpError> {
    if self.point_count == 0 {
      return Err(WarpError::ZeroPointCount);
    }
    if self.grid_width == 0 || self.grid_height == 0 {
      return Err(WarpError::InvalidGridSize {
        width: self.grid_width,
        height: self.grid_height,
      });
    }
    if !(self.significance_level > 0. && self.significance_level < 1.) {
      return Err(WarpError::InvalidSignificance(self.significance_level));
    }
    if !(self.min_expected_frequency >= 0.) {
      return Err(WarpError::Config(format!(
        "min_expected_frequency must be non-negative, found {}",
        self.min_expected_frequency
      )));
    }
    if self.test_count == 0 {
      return Err(WarpError::Config("test_count must be at least 1".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_are_valid() {
    let config = StatisticalTestConfig::default();
    config.validate().unwrap();
    assert_eq!(config.grid_width * config.grid_height, 256);
  }

  #[test]
  fn test_partial_json_keeps_defaults() {
    let config = StatisticalTestConfig::from_json(
      r#"{ "point_count": 40000, "sampling_type": "Stratified", "seed": 12 }"#,
    )
    .unwrap();
    assert_eq!(config.point_count, 40_000);
    assert_eq!(config.sampling_type, SamplingType::Stratified);
    assert_eq!(config.seed, 12);
    assert_eq!(config.grid_width, 16);
    assert_eq!(config.significance_level, 0.01);
  }

  #[test]
  fn test_empty_json_is_default() {
    assert_eq!(
      StatisticalTestConfig::from_json("{}").unwrap(),
      StatisticalTestConfig::default()
    );
  }

  #[test]
  fn test_invalid_json_rejected() {
    assert!(matches!(
      StatisticalTestConfig::from_json(r#"{ "sampling_type": "Sobol" }"#),
      Err(WarpError::Config(_))
    ));
    assert!(matches!(
      StatisticalTestConfig::from_json(r#"{ "grid_size": 4 }"#),
      Err(WarpError::Config(_))
    ));
    assert!(matches!(
      StatisticalTestConfig::from_json("not json"),
      Err(WarpError::Config(_))
    ));
  }

  #[test]
  fn test_validation() {
    let zero_points = StatisticalTestConfig {
      point_count: 0,
      ..Default::default()
    };
    assert_eq!(zero_points.validate(), Err(WarpError::ZeroPointCount));

    let bad_grid = StatisticalTestConfig {
      grid_height: 0,
      ..Default::default()
    };
    assert!(matches!(
      bad_grid.validate(),
      Err(WarpError::InvalidGridSize { .. })
    ));

    let bad_alpha = StatisticalTestConfig {
      significance_level: 0.,
      ..Default::default()
    };
    assert_eq!(bad_alpha.validate(), Err(WarpError::InvalidSignificance(0.)));

    let no_tests = StatisticalTestConfig {
      test_count: 0,
      ..Default::default()
    };
    assert!(matches!(no_tests.validate(), Err(WarpError::Config(_))));
  }
}
