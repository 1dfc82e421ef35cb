//! Pearson's chi-squared goodness-of-fit test between an observed and an expected histogram.

use std::fmt::{self, Display};

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::{Histogram, WarpError};

/// Observed mass in a zero-expectation cell is tolerated up to this fraction of the sample count.
const ZERO_CELL_TOLERANCE: f64 = 1e-5;

/// Outcome of a goodness-of-fit test.  A rejected null hypothesis is reported here with
/// `passed == false`, never as an error.
#[derive(Clone, Debug, PartialEq)]
pub struct TestOutcome {
  pub passed: bool,
  pub statistic: f64,
  pub degrees_of_freedom: usize,
  pub p_value: f64,
  /// Significance level after the Sidak correction for the number of tests being run.
  pub significance_level: f64,
  /// Statistic value above which the null hypothesis is rejected.
  pub critical_value: f64,
  /// Number of low-expectation cells merged into a single pooled cell.
  pub pooled_cells: usize,
  pub report: String,
}

impl TestOutcome {
  fn rejected_early(report: String) -> Self {
    TestOutcome {
      passed: false,
      statistic: f64::INFINITY,
      degrees_of_freedom: 0,
      p_value: 0.,
      significance_level: 0.,
      critical_value: f64::NAN,
      pooled_cells: 0,
      report,
    }
  }
}

impl Display for TestOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.report)
  }
}

/// Sidak-corrected per-test significance level that keeps the family-wise rate at
/// `significance_level` over `test_count` independent tests.
pub fn sidak_correction(significance_level: f64, test_count: usize) -> f64 {
  1. - (1. - significance_level).powf(1. / test_count.max(1) as f64)
}

/// Runs the test.  Cells are visited in order of increasing expected frequency; those expecting
/// fewer than `min_expected_frequency` samples are pooled together until the pool reaches that
/// threshold.
pub fn chi2_test(
  observed: &Histogram,
  expected: &Histogram,
  sample_count: usize,
  min_expected_frequency: f64,
  significance_level: f64,
  test_count: usize,
) -> Result<TestOutcome, WarpError> {
  observed.ensure_same_dims(expected)?;
  if !(significance_level > 0. && significance_level < 1.) {
    return Err(WarpError::InvalidSignificance(significance_level));
  }

  let obs = observed.cells();
  let exp = expected.cells();

  let mut order: Vec<usize> = (0..exp.len()).collect();
  order.sort_by(|&a, &b| exp[a].total_cmp(&exp[b]));

  let mut report = String::new();
  let mut statistic = 0.;
  let mut cell_count = 0usize;
  let (mut pooled_obs, mut pooled_exp, mut pooled_cells) = (0., 0., 0usize);

  for ix in order {
    let (o, e) = (obs[ix], exp[ix]);

    if e <= 0. {
      if o > sample_count as f64 * ZERO_CELL_TOLERANCE {
        let msg = format!(
          "Encountered {o} samples in a cell with expected frequency 0. Rejecting the null \
           hypothesis!"
        );
        log::warn!("{msg}");
        return Ok(TestOutcome::rejected_early(msg));
      }
    } else if e < min_expected_frequency || (pooled_exp > 0. && pooled_exp < min_expected_frequency)
    {
      pooled_obs += o;
      pooled_exp += e;
      pooled_cells += 1;
    } else {
      let diff = o - e;
      statistic += diff * diff / e;
      cell_count += 1;
    }
  }

  if pooled_exp > 0. {
    report.push_str(&format!(
      "Pooled {pooled_cells} cells to ensure sufficiently high expected cell frequencies (>{})\n",
      min_expected_frequency
    ));
    log::warn!("pooled {pooled_cells} low-expectation cells");
    let diff = pooled_obs - pooled_exp;
    statistic += diff * diff / pooled_exp;
    cell_count += 1;
  }

  // All parameters are known, so the only constraint is the fixed total.
  if cell_count < 2 {
    report.push_str(&format!(
      "The number of degrees of freedom ({}) is too low!",
      cell_count as i64 - 1
    ));
    log::warn!("{report}");
    return Ok(TestOutcome {
      statistic,
      pooled_cells,
      ..TestOutcome::rejected_early(report)
    });
  }
  let dof = cell_count - 1;

  report.push_str(&format!("Chi^2 statistic = {statistic} (d.o.f. = {dof})\n"));

  let dist = ChiSquared::new(dof as f64).map_err(|err| WarpError::Statistics(err.to_string()))?;
  let p_value = dist.sf(statistic);
  let alpha = sidak_correction(significance_level, test_count);
  let critical_value = dist.inverse_cdf(1. - alpha);

  let passed = p_value.is_finite() && p_value >= alpha;
  if passed {
    report.push_str(&format!(
      "Accepted the null hypothesis (p-value = {p_value}, significance level = {alpha})"
    ));
  } else {
    report.push_str(&format!(
      "***** Rejected ***** the null hypothesis (p-value = {p_value}, significance level = \
       {alpha})"
    ));
  }

  Ok(TestOutcome {
    passed,
    statistic,
    degrees_of_freedom: dof,
    p_value,
    significance_level: alpha,
    critical_value,
    pooled_cells,
    report,
  })
}
