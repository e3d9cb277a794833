//! Per-asset thermal dynamics kernel for hybrid heat-pump systems.
//!
//! Provides:
//! - Two-node building RC network (indoor air + envelope) with constrained equilibrium solve
//! - Single-node lumped heat buffer
//! - Fixed-step forward Euler integration behind the `TransientModel` seam
//! - Post-step boundary guard with a fixed numerical-noise tolerance
//! - Explicit per-asset lifecycle (uninitialized / initialized / failed)

pub mod buffer;
pub mod error;
pub mod guard;
pub mod house;
pub mod integrator;
pub mod lifecycle;
pub mod model;

pub use buffer::{BufferState, ThermalBufferModel};
pub use error::{ThermalError, ThermalResult};
pub use guard::{BOUNDARY_EPS, Bound, BoundaryGuard, Guarded, OperatingBounds};
pub use house::{
    Capacities, EQUILIBRIUM_TOL, Equilibrium, HouseState, Resistances, SOLAR_HEAT_GAIN_COEFFICIENT,
    ThermalNetworkModel, WeatherForcing,
};
pub use integrator::{ForwardEuler, Integrator};
pub use lifecycle::{AssetLifecycle, LifecyclePhase, ThermalState};
pub use model::TransientModel;
