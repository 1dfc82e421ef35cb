//! Statistical verification of sample warping functions.
//!
//! Each warp is wrapped in a [`WarpAdapter`] that knows how to generate warped samples and bin them
//! into an observed histogram, and how to integrate the warp's density into an expected
//! histogram.  [`run_statistical_test`] compares the two with Pearson's chi-squared test.

pub mod adapters;
pub mod argument;
pub mod bbox;
pub mod catalogue;
pub mod chi2;
pub mod config;
pub mod error;
pub mod histogram;
pub mod integrate;
pub mod sampling;

pub use adapters::{
  importance_weight, AdapterBase, IdentityWarpAdapter, LineWarpAdapter, PlaneWarpAdapter,
  SphereWarpAdapter, WarpAdapter, MIN_PDF,
};
pub use argument::Argument;
pub use bbox::BoundingBox3;
pub use catalogue::{find_adapter, standard_adapters};
pub use chi2::{chi2_test, sidak_correction, TestOutcome};
pub use common::{build_sampler, Sampler};
pub use config::StatisticalTestConfig;
pub use error::WarpError;
pub use histogram::Histogram;
pub use sampling::{generate_canonical_samples, SampleBatch, SamplingType};
pub use statistical_test::{
  run_statistical_test, run_statistical_test_with_config, run_statistical_test_with_sampler,
};
