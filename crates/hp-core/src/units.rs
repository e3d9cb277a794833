// hp-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Power as UomPower,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Kelvin value to degrees Celsius, for display.
#[inline]
pub fn to_celsius(kelvin: f64) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    k(kelvin).get::<degree_celsius>()
}

/// Energy delivered by a constant power over a duration.
#[inline]
pub fn energy_over(power: Power, duration: Time) -> Energy {
    power * duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _t = k(293.15);
        let _p = w(3000.0);
        let _dt = s(900.0);
    }

    #[test]
    fn celsius_conversion() {
        assert!((to_celsius(293.15) - 20.0).abs() < 1e-9);
        assert!((to_celsius(273.15)).abs() < 1e-9);
    }

    #[test]
    fn energy_of_interval() {
        use uom::si::energy::kilowatt_hour;
        let e = energy_over(w(4000.0), s(900.0));
        assert!((e.get::<kilowatt_hour>() - 1.0).abs() < 1e-12);
    }
}
