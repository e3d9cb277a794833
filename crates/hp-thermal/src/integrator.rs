//! Fixed-step time integrators.

use crate::error::{ThermalError, ThermalResult};
use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> ThermalResult<M::State>;
}

/// Forward Euler (explicit, 1st order).
///
/// One rhs evaluation per step, no sub-stepping and no error control.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> ThermalResult<M::State> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ThermalError::InvalidArg {
                what: "dt must be positive and finite",
            });
        }
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}
