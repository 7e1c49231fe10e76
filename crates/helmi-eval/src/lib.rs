//! Scoring and orchestration of Helmi experiments.
//!
//! Three pieces, leaves first:
//!
//! - [`metrics`]: fidelity, iterative trace distance and success rates of a
//!   histogram against a [`TargetDistribution`] or a desired outcome.
//! - [`oracle`]: the Bernstein–Vazirani [`OracleSimulator`], with classical
//!   and quantum query paths and call counters.
//! - [`runner`]: the [`ExperimentRunner`], which pushes circuits through a
//!   [`Backend`](helmi_hal::Backend) and turns histograms into
//!   [`ExperimentResult`]s.
//!
//! # Example
//!
//! ```
//! use helmi_eval::{TargetDistribution, metrics};
//! use helmi_hal::Counts;
//!
//! let counts = Counts::from_pairs([("00", 480), ("11", 520)]);
//! let f = metrics::fidelity(&counts, 1000, &TargetDistribution::bell()).unwrap();
//! assert!((f - 0.9998).abs() < 1e-4);
//! ```

pub mod distribution;
pub mod error;
pub mod metrics;
pub mod oracle;
pub mod runner;

pub use distribution::{TargetDistribution, outcome_bitstring, outcome_index};
pub use error::{EvalError, EvalResult};
pub use oracle::{
    DEFAULT_ORACLE_BITS, MAX_ORACLE_BITS, OracleRun, OracleSimulator, most_frequent_outcome,
};
pub use runner::{Experiment, ExperimentResult, ExperimentRunner, RunnerConfig};
