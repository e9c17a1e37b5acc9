//! Solar-wind ram pressure.

use amps_core::{in_npa, kmps, proton_density, Pressure};

/// Dynamic pressure (nPa) of a proton wind with density `n_cc` (cm^-3)
/// and bulk speed component `vx_kmps` (km/s). The sign of `vx_kmps` is ignored.
pub fn dynamic_pressure_npa(n_cc: f64, vx_kmps: f64) -> f64 {
    let v = kmps(vx_kmps.abs());
    let p: Pressure = proton_density(n_cc) * v * v;
    in_npa(p)
}
