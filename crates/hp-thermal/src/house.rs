//! Two-node building RC network (indoor air + envelope).
//!
//! Dynamics:
//!
//! ```text
//! C dT/dt = -K T + K_amb T_amb + [A_win * I_sol, 0] + [Q_house, 0]
//! ```
//!
//! with `T = [T_in, T_out]` and `T_amb = [T_air, T_soil]`.

use core::fmt;

use hp_core::{Mat2, Real, Vec2, ensure_finite};
use tracing::{debug, info};

use crate::error::{ThermalError, ThermalResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::model::TransientModel;

/// Solar heat gain coefficient of the glazing.
pub const SOLAR_HEAT_GAIN_COEFFICIENT: Real = 0.7;

/// Allowed |T_in - target| after an unclamped equilibrium solve [K].
pub const EQUILIBRIUM_TOL: Real = 1.0e-3;

/// Node heat capacities [J/K].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capacities {
    pub c_in: Real,
    pub c_out: Real,
}

/// Thermal resistances [K/W].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resistances {
    /// Indoor air <-> envelope
    pub r_exch: Real,
    /// Indoor air <-> soil
    pub r_floor: Real,
    /// Indoor air <-> outdoor air
    pub r_vent: Real,
    /// Envelope <-> outdoor air
    pub r_cond: Real,
}

/// Exogenous weather forcing at the current instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherForcing {
    /// Outdoor air temperature [K]
    pub air_temp: Real,
    /// Soil temperature [K]
    pub soil_temp: Real,
    /// Global solar irradiance [W/m²]
    pub solar_irradiance: Real,
}

impl WeatherForcing {
    fn ambient(&self) -> Vec2 {
        Vec2::new(self.air_temp, self.soil_temp)
    }

    fn validate(&self) -> ThermalResult<()> {
        ensure_finite(self.air_temp, "air_temp")?;
        ensure_finite(self.soil_temp, "soil_temp")?;
        ensure_finite(self.solar_irradiance, "solar_irradiance")?;
        Ok(())
    }
}

/// Node temperatures `[T_in, T_out]` [K].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HouseState {
    pub temperatures: Vec2,
}

impl HouseState {
    pub fn new(t_in: Real, t_out: Real) -> Self {
        Self {
            temperatures: Vec2::new(t_in, t_out),
        }
    }

    /// Controlled indoor node.
    pub fn indoor(&self) -> Real {
        self.temperatures[0]
    }

    /// Building envelope node.
    pub fn envelope(&self) -> Real {
        self.temperatures[1]
    }
}

/// Result of the constrained steady-state solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Equilibrium {
    /// Heat the indoor node needs to sit exactly at the target [W], before clamping.
    pub required_heat_to_house: Real,
    /// Heat actually applied, clamped to `[0, nominal]` [W].
    pub heat_to_house: Real,
    pub state: HouseState,
}

impl Equilibrium {
    /// Whether the heat pump capacity (or the no-cooling floor) limited the solve.
    pub fn is_clamped(&self) -> bool {
        self.heat_to_house != self.required_heat_to_house
    }
}

/// Static parameters of a building's two-node thermal network.
#[derive(Clone, Debug)]
pub struct ThermalNetworkModel {
    c: Mat2,
    c_inv: Mat2,
    k: Mat2,
    k_amb: Mat2,
    window_area: Real,
}

fn positive(v: Real, what: &'static str) -> ThermalResult<Real> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(ThermalError::Configuration { what, value: v })
    }
}

impl ThermalNetworkModel {
    /// Build the network matrices.
    ///
    /// Resistances and capacities must be strictly positive; the window area
    /// must be non-negative.
    pub fn new(
        capacities: Capacities,
        resistances: Resistances,
        window_area: Real,
    ) -> ThermalResult<Self> {
        let c_in = positive(capacities.c_in, "C_in must be positive")?;
        let c_out = positive(capacities.c_out, "C_out must be positive")?;

        let k_exch = 1.0 / positive(resistances.r_exch, "R_exch must be positive")?;
        let k_floor = 1.0 / positive(resistances.r_floor, "R_floor must be positive")?;
        let k_vent = 1.0 / positive(resistances.r_vent, "R_vent must be positive")?;
        let k_cond = 1.0 / positive(resistances.r_cond, "R_cond must be positive")?;

        if !(window_area.is_finite() && window_area >= 0.0) {
            return Err(ThermalError::Configuration {
                what: "window area must be non-negative",
                value: window_area,
            });
        }

        let c = Mat2::diag(c_in, c_out);
        let c_inv = c.inverse("capacitance matrix")?;

        // Diagonally dominant for positive conductances
        let k = Mat2::new([
            [k_vent + k_exch + k_floor, -k_exch],
            [-k_exch, k_cond + k_exch],
        ]);
        let k_amb = Mat2::new([[k_vent, k_floor], [k_cond, 0.0]]);

        Ok(Self {
            c,
            c_inv,
            k,
            k_amb,
            window_area,
        })
    }

    pub fn capacitance(&self) -> &Mat2 {
        &self.c
    }

    pub fn conductance(&self) -> &Mat2 {
        &self.k
    }

    pub fn ambient_coupling(&self) -> &Mat2 {
        &self.k_amb
    }

    pub fn window_area(&self) -> Real {
        self.window_area
    }

    /// Per-node time constants `C_ii / K_ii` [s].
    pub fn time_constants(&self) -> Vec2 {
        Vec2::new(
            self.c.0[0][0] / self.k.0[0][0],
            self.c.0[1][1] / self.k.0[1][1],
        )
    }

    /// Ambient + solar + heating load vector.
    fn drive(&self, forcing: &WeatherForcing, heat_to_house: Real) -> Vec2 {
        self.k_amb.mul_vec(forcing.ambient())
            + Vec2::first(self.window_area * forcing.solar_irradiance)
            + Vec2::first(heat_to_house)
    }

    /// Steady state with the indoor node pinned to `target_indoor_temp`.
    ///
    /// Unknowns are the heat delivered to the indoor node and `T_out`. The
    /// heat is then clamped to `[0, nominal_heat_capacity]` and the full
    /// network is re-solved with the clamped heat, so a capacity-limited
    /// house settles below the target.
    pub fn initialize(
        &self,
        target_indoor_temp: Real,
        nominal_heat_capacity: Real,
        forcing: &WeatherForcing,
    ) -> ThermalResult<Equilibrium> {
        ensure_finite(target_indoor_temp, "target_indoor_temp")?;
        forcing.validate()?;
        if !(nominal_heat_capacity.is_finite() && nominal_heat_capacity >= 0.0) {
            return Err(ThermalError::InvalidArg {
                what: "nominal heat capacity must be non-negative",
            });
        }

        // K T = T_in K[:,0] + T_out K[:,1]; move the known T_in to the rhs and
        // put the heat unknown (coefficient -1 on the indoor row) in column 0.
        let a = self.k.with_column(0, Vec2::new(-1.0, 0.0));
        let b = self.drive(forcing, 0.0) - self.k.column(0).scale(target_indoor_temp);
        let x = a.solve(b, "constrained equilibrium")?;
        let required_heat_to_house = x[0];

        let heat_to_house = required_heat_to_house.clamp(0.0, nominal_heat_capacity);
        let temperatures = self
            .k
            .solve(self.drive(forcing, heat_to_house), "equilibrium")?;

        info!(
            required_heat_w = required_heat_to_house,
            nominal_heat_w = nominal_heat_capacity,
            target_k = target_indoor_temp,
            t_in_k = temperatures[0],
            t_out_k = temperatures[1],
            "house equilibrium solved"
        );

        let equilibrium = Equilibrium {
            required_heat_to_house,
            heat_to_house,
            state: HouseState { temperatures },
        };

        if !equilibrium.is_clamped()
            && (temperatures[0] - target_indoor_temp).abs() >= EQUILIBRIUM_TOL
        {
            return Err(ThermalError::Equilibrium {
                target: target_indoor_temp,
                achieved: temperatures[0],
            });
        }

        Ok(equilibrium)
    }

    /// One forward-Euler step of length `dt` [s] with forcing held constant.
    pub fn step(
        &self,
        state: &HouseState,
        dt: Real,
        forcing: &WeatherForcing,
        heat_to_house: Real,
    ) -> ThermalResult<HouseState> {
        forcing.validate()?;
        ensure_finite(heat_to_house, "heat_to_house")?;

        let forced = ForcedHouse {
            model: self,
            drive: self.drive(forcing, heat_to_house),
        };
        let temperatures = ForwardEuler.step(&forced, 0.0, &state.temperatures, dt)?;
        debug!(
            dt_s = dt,
            heat_to_house_w = heat_to_house,
            t_in_k = temperatures[0],
            t_out_k = temperatures[1],
            "house step"
        );
        Ok(HouseState { temperatures })
    }
}

impl fmt::Display for ThermalNetworkModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[c_in, _], [_, c_out]] = self.c.0;
        let [[k00, k01], [k10, k11]] = self.k.0;
        let [[a00, a01], [a10, a11]] = self.k_amb.0;
        writeln!(f, "house network:")?;
        writeln!(f, "  capacitances [J/K]: C_in={c_in:.4e} C_out={c_out:.4e}")?;
        writeln!(f, "  K     [W/K]: [[{k00:.3}, {k01:.3}], [{k10:.3}, {k11:.3}]]")?;
        writeln!(f, "  K_amb [W/K]: [[{a00:.3}, {a01:.3}], [{a10:.3}, {a11:.3}]]")?;
        write!(
            f,
            "  window area: {:.2} m², SHGC {}",
            self.window_area, SOLAR_HEAT_GAIN_COEFFICIENT
        )
    }
}

/// The network with one interval's forcing frozen in.
struct ForcedHouse<'a> {
    model: &'a ThermalNetworkModel,
    drive: Vec2,
}

impl TransientModel for ForcedHouse<'_> {
    type State = Vec2;

    fn rhs(&self, _t: f64, x: &Vec2) -> ThermalResult<Vec2> {
        let flux = self.drive - self.model.k.mul_vec(*x);
        Ok(self.model.c_inv.mul_vec(flux))
    }

    fn add(&self, a: &Vec2, b: &Vec2) -> Vec2 {
        *a + *b
    }

    fn scale(&self, a: &Vec2, scale: f64) -> Vec2 {
        a.scale(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_house() -> ThermalNetworkModel {
        ThermalNetworkModel::new(
            Capacities {
                c_in: 2.0e6,
                c_out: 1.0e7,
            },
            Resistances {
                r_exch: 0.01,
                r_floor: 0.02,
                r_vent: 0.05,
                r_cond: 0.01,
            },
            10.0,
        )
        .unwrap()
    }

    fn winter() -> WeatherForcing {
        WeatherForcing {
            air_temp: 280.0,
            soil_temp: 285.0,
            solar_irradiance: 0.0,
        }
    }

    #[test]
    fn matrices_from_resistances() {
        let house = reference_house();
        let k = house.conductance().0;
        assert!((k[0][0] - 170.0).abs() < 1e-9);
        assert!((k[0][1] + 100.0).abs() < 1e-9);
        assert!((k[1][0] + 100.0).abs() < 1e-9);
        assert!((k[1][1] - 200.0).abs() < 1e-9);

        let k_amb = house.ambient_coupling().0;
        assert!((k_amb[0][0] - 20.0).abs() < 1e-9);
        assert!((k_amb[0][1] - 50.0).abs() < 1e-9);
        assert!((k_amb[1][0] - 100.0).abs() < 1e-9);
        assert_eq!(k_amb[1][1], 0.0);

        assert_eq!(house.capacitance().0, [[2.0e6, 0.0], [0.0, 1.0e7]]);
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let caps = Capacities {
            c_in: 2.0e6,
            c_out: 1.0e7,
        };
        let res = Resistances {
            r_exch: 0.01,
            r_floor: 0.02,
            r_vent: 0.05,
            r_cond: 0.01,
        };

        let err = ThermalNetworkModel::new(caps, Resistances { r_floor: 0.0, ..res }, 10.0)
            .unwrap_err();
        assert!(matches!(err, ThermalError::Configuration { .. }));

        let err = ThermalNetworkModel::new(Capacities { c_out: -1.0, ..caps }, res, 10.0)
            .unwrap_err();
        assert!(matches!(err, ThermalError::Configuration { .. }));

        assert!(ThermalNetworkModel::new(caps, res, -2.0).is_err());
        assert!(ThermalNetworkModel::new(caps, Resistances { r_vent: f64::NAN, ..res }, 1.0).is_err());
    }

    #[test]
    fn equilibrium_hits_target_within_capacity() {
        let house = reference_house();
        let eq = house.initialize(293.15, 3000.0, &winter()).unwrap();
        assert!((eq.required_heat_to_house - 1328.0).abs() < 1e-6);
        assert!(!eq.is_clamped());
        assert!((eq.state.indoor() - 293.15).abs() < EQUILIBRIUM_TOL);
        assert!((eq.state.envelope() - 286.575).abs() < 1e-6);
    }

    #[test]
    fn solar_gain_reduces_required_heat() {
        let house = reference_house();
        let dark = house.initialize(293.15, 3000.0, &winter()).unwrap();
        let sunny = house
            .initialize(
                293.15,
                3000.0,
                &WeatherForcing {
                    solar_irradiance: 50.0,
                    ..winter()
                },
            )
            .unwrap();
        // 10 m² * 50 W/m² enters the indoor node directly
        assert!((dark.required_heat_to_house - sunny.required_heat_to_house - 500.0).abs() < 1e-6);
    }

    #[test]
    fn negative_requirement_clamps_to_zero() {
        let house = reference_house();
        let hot = WeatherForcing {
            air_temp: 303.15,
            soil_temp: 300.0,
            solar_irradiance: 200.0,
        };
        let eq = house.initialize(293.15, 3000.0, &hot).unwrap();
        assert!(eq.required_heat_to_house < 0.0);
        assert_eq!(eq.heat_to_house, 0.0);
        assert!(eq.is_clamped());
        assert!(eq.state.indoor() > 293.15);
    }

    #[test]
    fn equilibrium_is_a_fixed_point_of_step() {
        let house = reference_house();
        let eq = house.initialize(293.15, 3000.0, &winter()).unwrap();
        let next = house
            .step(&eq.state, 900.0, &winter(), eq.heat_to_house)
            .unwrap();
        assert!((next.indoor() - eq.state.indoor()).abs() < 1e-9);
        assert!((next.envelope() - eq.state.envelope()).abs() < 1e-9);
    }

    #[test]
    fn step_is_single_euler_update() {
        let house = reference_house();
        let state = HouseState::new(290.0, 285.0);
        let forcing = WeatherForcing {
            air_temp: 275.0,
            soil_temp: 283.0,
            solar_irradiance: 100.0,
        };
        let next = house.step(&state, 60.0, &forcing, 2000.0).unwrap();

        // -K T + K_amb T_amb + solar + heat, written out by hand
        let flux_in = -(170.0 * 290.0 - 100.0 * 285.0) + (20.0 * 275.0 + 50.0 * 283.0) + 1000.0 + 2000.0;
        let flux_out = -(-100.0 * 290.0 + 200.0 * 285.0) + 100.0 * 275.0;
        assert!((next.indoor() - (290.0 + 60.0 * flux_in / 2.0e6)).abs() < 1e-9);
        assert!((next.envelope() - (285.0 + 60.0 * flux_out / 1.0e7)).abs() < 1e-9);
    }

    #[test]
    fn step_rejects_bad_inputs() {
        let house = reference_house();
        let state = HouseState::new(290.0, 285.0);
        assert!(house.step(&state, 0.0, &winter(), 0.0).is_err());
        assert!(house.step(&state, 900.0, &winter(), f64::NAN).is_err());
        let bad = WeatherForcing {
            air_temp: f64::INFINITY,
            ..winter()
        };
        assert!(house.step(&state, 900.0, &bad, 0.0).is_err());
    }

    #[test]
    fn time_constants_and_display() {
        let house = reference_house();
        let tau = house.time_constants();
        assert!((tau[0] - 2.0e6 / 170.0).abs() < 1e-6);
        assert!((tau[1] - 1.0e7 / 200.0).abs() < 1e-6);
        let text = house.to_string();
        assert!(text.contains("C_in"));
        assert!(text.contains("SHGC 0.7"));
    }
}
