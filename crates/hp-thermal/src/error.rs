//! Error types for the thermal kernel.

use hp_core::{AssetId, CoreError};
use thiserror::Error;

use crate::guard::Bound;

/// Errors raised by model construction, initialization and stepping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermalError {
    /// Static parameters are physically invalid.
    #[error("Configuration error: {what} (value={value})")]
    Configuration { what: &'static str, value: f64 },

    /// A temperature left its operating bound by more than the noise tolerance.
    #[error("Domain violation for asset {asset}: {bound} breached (value={value} K, limit={limit} K)")]
    DomainViolation {
        asset: AssetId,
        bound: Bound,
        value: f64,
        limit: f64,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Unclamped equilibrium did not reproduce the requested indoor temperature.
    #[error("Equilibrium mismatch: target {target} K, solved {achieved} K")]
    Equilibrium { target: f64, achieved: f64 },

    #[error("Numeric error: {0}")]
    Numeric(#[from] CoreError),
}

pub type ThermalResult<T> = Result<T, ThermalError>;

impl ThermalError {
    pub fn is_domain_violation(&self) -> bool {
        matches!(self, ThermalError::DomainViolation { .. })
    }
}
