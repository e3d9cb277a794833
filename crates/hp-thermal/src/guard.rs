//! Post-step boundary enforcement.
//!
//! Forward Euler and floating-point accumulation can leave a temperature a
//! hair outside a hard bound while the true trajectory sits on it. Values
//! within `BOUNDARY_EPS` of a bound are snapped just inside; anything still
//! outside afterwards is a real excursion.

use core::fmt;

use hp_core::{AssetId, Real};
use tracing::debug;

use crate::buffer::BufferState;
use crate::error::{ThermalError, ThermalResult};
use crate::house::HouseState;

/// Numerical-noise band around each bound [K].
pub const BOUNDARY_EPS: Real = 1.0e-4;

/// Operating bound that a temperature can breach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    BufferMin,
    BufferMax,
    HouseMin,
}

impl Bound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bound::BufferMin => "buffer_temp_min",
            Bound::BufferMax => "buffer_temp_max",
            Bound::HouseMin => "house_temp_min",
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-asset operating limits [K].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatingBounds {
    pub buffer_min: Real,
    pub buffer_max: Real,
    pub house_min: Real,
}

/// Guarded temperatures plus the bounds that were snapped to.
#[derive(Clone, Debug, PartialEq)]
pub struct Guarded {
    pub buffer: BufferState,
    pub house: HouseState,
    pub snapped: Vec<Bound>,
}

/// Stateless snap-then-validate policy for one asset.
#[derive(Clone, Debug)]
pub struct BoundaryGuard {
    asset: AssetId,
    bounds: OperatingBounds,
}

impl BoundaryGuard {
    pub fn new(asset: AssetId, bounds: OperatingBounds) -> ThermalResult<Self> {
        for (v, what) in [
            (bounds.buffer_min, "buffer_temp_min must be finite"),
            (bounds.buffer_max, "buffer_temp_max must be finite"),
            (bounds.house_min, "house_temp_min must be finite"),
        ] {
            if !v.is_finite() {
                return Err(ThermalError::Configuration { what, value: v });
            }
        }
        if bounds.buffer_min >= bounds.buffer_max {
            return Err(ThermalError::Configuration {
                what: "buffer_temp_min must be below buffer_temp_max",
                value: bounds.buffer_min,
            });
        }
        Ok(Self { asset, bounds })
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn bounds(&self) -> &OperatingBounds {
        &self.bounds
    }

    /// Snap values within the noise band, then validate.
    ///
    /// Buffer bounds are checked before the house bound.
    pub fn apply(&self, buffer: BufferState, house: HouseState) -> ThermalResult<Guarded> {
        let OperatingBounds {
            buffer_min,
            buffer_max,
            house_min,
        } = self.bounds;

        let mut buffer = buffer;
        let mut house = house;
        let mut snapped = Vec::new();

        if (buffer.temperature - buffer_min).abs() < BOUNDARY_EPS {
            buffer.temperature = buffer_min + BOUNDARY_EPS;
            snapped.push(Bound::BufferMin);
        }
        if (buffer.temperature - buffer_max).abs() < BOUNDARY_EPS {
            buffer.temperature = buffer_max - BOUNDARY_EPS;
            snapped.push(Bound::BufferMax);
        }
        if (house.temperatures[0] - house_min).abs() < BOUNDARY_EPS {
            house.temperatures[0] = house_min + BOUNDARY_EPS;
            snapped.push(Bound::HouseMin);
        }
        if !snapped.is_empty() {
            debug!(asset = %self.asset, ?snapped, "temperatures snapped inside bounds");
        }

        if buffer.temperature < buffer_min {
            return Err(self.violation(Bound::BufferMin, buffer.temperature, buffer_min));
        }
        if buffer.temperature > buffer_max {
            return Err(self.violation(Bound::BufferMax, buffer.temperature, buffer_max));
        }
        if house.temperatures[0] < house_min {
            return Err(self.violation(Bound::HouseMin, house.temperatures[0], house_min));
        }

        Ok(Guarded {
            buffer,
            house,
            snapped,
        })
    }

    fn violation(&self, bound: Bound, value: Real, limit: Real) -> ThermalError {
        ThermalError::DomainViolation {
            asset: self.asset.clone(),
            bound,
            value,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUFFER_MIN: Real = 303.15;
    const BUFFER_MAX: Real = 353.15;
    const HOUSE_MIN: Real = 288.15;

    fn guard() -> BoundaryGuard {
        BoundaryGuard::new(
            AssetId::from("hp-1"),
            OperatingBounds {
                buffer_min: BUFFER_MIN,
                buffer_max: BUFFER_MAX,
                house_min: HOUSE_MIN,
            },
        )
        .unwrap()
    }

    fn buffer(t: Real) -> BufferState {
        BufferState { temperature: t }
    }

    #[test]
    fn interior_values_pass_untouched() {
        let out = guard()
            .apply(buffer(320.0), HouseState::new(293.0, 287.0))
            .unwrap();
        assert_eq!(out.buffer.temperature, 320.0);
        assert_eq!(out.house, HouseState::new(293.0, 287.0));
        assert!(out.snapped.is_empty());
    }

    #[test]
    fn snaps_buffer_min_exactly() {
        let out = guard()
            .apply(buffer(BUFFER_MIN + 5e-5), HouseState::new(293.0, 287.0))
            .unwrap();
        assert_eq!(out.buffer.temperature, BUFFER_MIN + 1e-4);
        assert_eq!(out.snapped, vec![Bound::BufferMin]);
    }

    #[test]
    fn snaps_noise_below_bounds() {
        let out = guard()
            .apply(buffer(BUFFER_MIN - 5e-5), HouseState::new(HOUSE_MIN - 2e-5, 287.0))
            .unwrap();
        assert_eq!(out.buffer.temperature, BUFFER_MIN + BOUNDARY_EPS);
        assert_eq!(out.house.indoor(), HOUSE_MIN + BOUNDARY_EPS);
        assert_eq!(out.house.envelope(), 287.0);
    }

    #[test]
    fn snaps_buffer_max_inward() {
        let out = guard()
            .apply(buffer(BUFFER_MAX + 3e-5), HouseState::new(293.0, 287.0))
            .unwrap();
        assert_eq!(out.buffer.temperature, BUFFER_MAX - BOUNDARY_EPS);
        assert_eq!(out.snapped, vec![Bound::BufferMax]);
    }

    #[test]
    fn real_excursions_are_violations() {
        let err = guard()
            .apply(buffer(BUFFER_MIN - 0.5), HouseState::new(293.0, 287.0))
            .unwrap_err();
        assert!(matches!(
            err,
            ThermalError::DomainViolation {
                bound: Bound::BufferMin,
                ..
            }
        ));

        let err = guard()
            .apply(buffer(BUFFER_MAX + 1.0), HouseState::new(293.0, 287.0))
            .unwrap_err();
        assert!(matches!(
            err,
            ThermalError::DomainViolation {
                bound: Bound::BufferMax,
                ..
            }
        ));
    }

    #[test]
    fn house_violation_names_bound_and_asset() {
        let err = guard()
            .apply(buffer(320.0), HouseState::new(HOUSE_MIN - 1.0, 287.0))
            .unwrap_err();
        match &err {
            ThermalError::DomainViolation {
                asset,
                bound,
                value,
                limit,
            } => {
                assert_eq!(asset.as_str(), "hp-1");
                assert_eq!(*bound, Bound::HouseMin);
                assert_eq!(*value, HOUSE_MIN - 1.0);
                assert_eq!(*limit, HOUSE_MIN);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("house_temp_min"));
        assert!(msg.contains("hp-1"));
    }

    #[test]
    fn buffer_checked_before_house() {
        let err = guard()
            .apply(buffer(BUFFER_MAX + 1.0), HouseState::new(HOUSE_MIN - 1.0, 287.0))
            .unwrap_err();
        assert!(matches!(
            err,
            ThermalError::DomainViolation {
                bound: Bound::BufferMax,
                ..
            }
        ));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = BoundaryGuard::new(
            AssetId::from("hp-1"),
            OperatingBounds {
                buffer_min: 350.0,
                buffer_max: 320.0,
                house_min: HOUSE_MIN,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ThermalError::Configuration { .. }));
    }
}
