//! TransientModel trait for the lumped thermal models.

use crate::error::ThermalResult;

/// A dynamic system with state `x` and derivative `x_dot = f(t, x)`.
///
/// Forcing is frozen inside the implementor for the duration of one control
/// interval, so `rhs` only sees time and state.
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &Self::State) -> ThermalResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
