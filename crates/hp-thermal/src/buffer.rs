//! Single-node lumped heat buffer.

use hp_core::{Real, ensure_finite};

use crate::error::{ThermalError, ThermalResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::model::TransientModel;

/// Buffer temperature [K].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferState {
    pub temperature: Real,
}

/// Lumped-capacitance heat store.
///
/// Dynamics: `C dT/dt = Q_in - Q_out`. With rates held constant over the
/// interval the Euler update is exact.
#[derive(Clone, Debug)]
pub struct ThermalBufferModel {
    capacitance: Real,
}

impl ThermalBufferModel {
    pub fn new(capacitance: Real) -> ThermalResult<Self> {
        if !(capacitance.is_finite() && capacitance > 0.0) {
            return Err(ThermalError::Configuration {
                what: "buffer capacitance must be positive",
                value: capacitance,
            });
        }
        Ok(Self { capacitance })
    }

    pub fn capacitance(&self) -> Real {
        self.capacitance
    }

    /// Single node without ambient coupling: the state is set directly.
    pub fn initialize(&self, initial_temp: Real) -> ThermalResult<BufferState> {
        Ok(BufferState {
            temperature: ensure_finite(initial_temp, "initial buffer temperature")?,
        })
    }

    /// Advance by `dt` [s] with heat drawn (`heat_out`) and delivered (`heat_in`) [W].
    pub fn step(
        &self,
        state: &BufferState,
        dt: Real,
        heat_out: Real,
        heat_in: Real,
    ) -> ThermalResult<BufferState> {
        let net_heat = ensure_finite(heat_in, "heat_in")? - ensure_finite(heat_out, "heat_out")?;
        let forced = ForcedBuffer {
            capacitance: self.capacitance,
            net_heat,
        };
        let temperature = ForwardEuler.step(&forced, 0.0, &state.temperature, dt)?;
        Ok(BufferState { temperature })
    }
}

struct ForcedBuffer {
    capacitance: Real,
    net_heat: Real,
}

impl TransientModel for ForcedBuffer {
    type State = Real;

    fn rhs(&self, _t: f64, _x: &Real) -> ThermalResult<Real> {
        Ok(self.net_heat / self.capacitance)
    }

    fn add(&self, a: &Real, b: &Real) -> Real {
        a + b
    }

    fn scale(&self, a: &Real, scale: f64) -> Real {
        a * scale
    }
}
