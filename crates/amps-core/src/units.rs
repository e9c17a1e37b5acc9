// amps-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Length as UomLength, MagneticFluxDensity as UomMagneticFluxDensity,
    MassDensity as UomMassDensity, Pressure as UomPressure, Time as UomTime,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type MagField = UomMagneticFluxDensity;
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn nt(v: f64) -> MagField {
    use uom::si::magnetic_flux_density::nanotesla;
    MagField::new::<nanotesla>(v)
}

#[inline]
pub fn npa(v: f64) -> Pressure {
    use uom::si::pressure::nanopascal;
    Pressure::new::<nanopascal>(v)
}

#[inline]
pub fn kmps(v: f64) -> Velocity {
    use uom::si::velocity::kilometer_per_second;
    Velocity::new::<kilometer_per_second>(v)
}

#[inline]
pub fn mev(v: f64) -> Energy {
    use uom::si::energy::megaelectronvolt;
    Energy::new::<megaelectronvolt>(v)
}

#[inline]
pub fn km(v: f64) -> Length {
    use uom::si::length::kilometer;
    Length::new::<kilometer>(v)
}

/// Length given in Earth radii.
#[inline]
pub fn re(v: f64) -> Length {
    km(v * constants::EARTH_RADIUS_KM)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

/// Mass density of a proton plasma with number density `n_cc` (cm^-3).
#[inline]
pub fn proton_density(n_cc: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(n_cc * 1e6 * constants::PROTON_MASS_KG)
}

#[inline]
pub fn in_npa(p: Pressure) -> f64 {
    use uom::si::pressure::nanopascal;
    p.get::<nanopascal>()
}

#[inline]
pub fn in_re(l: Length) -> f64 {
    use uom::si::length::kilometer;
    l.get::<kilometer>() / constants::EARTH_RADIUS_KM
}

pub mod constants {
    /// Nucleon rest energy used for rigidity conversions (MeV).
    pub const PROTON_REST_ENERGY_MEV: f64 = 938.272;

    pub const PROTON_MASS_KG: f64 = 1.672_621_923_69e-27;

    pub const EARTH_RADIUS_KM: f64 = 6371.2;

    /// Kinetic energy per nucleon at which the reference rigidity is quoted.
    pub const REFERENCE_ENERGY_MEV_PER_N: f64 = 100.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _b = nt(-10.0);
        let _p = npa(3.5);
        let _v = kmps(-650.0);
        let _e = mev(100.0);
        let _t = minutes(5.0);
    }

    #[test]
    fn earth_radii_roundtrip() {
        let l = re(6.6);
        assert!((in_re(l) - 6.6).abs() < 1e-12);
    }

    #[test]
    fn ram_pressure_dimensions() {
        let rho = proton_density(5.0);
        let v = kmps(400.0);
        let p: Pressure = rho * v * v;
        // 1.6726e-6 * n * v^2 nPa
        assert!((in_npa(p) - 1.6726e-6 * 5.0 * 400.0 * 400.0).abs() < 1e-3);
    }
}
