//! Magnetic rigidity of a fully described ion species.
//!
//! Energies are kinetic energy per nucleon; the rest energy of the ion is
//! approximated as `A * mp` with `mp` the nucleon rest energy.

use amps_core::constants::{PROTON_REST_ENERGY_MEV, REFERENCE_ENERGY_MEV_PER_N};
use amps_core::ensure_finite;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};

/// Charge state and mass of the traced particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IonSpecies {
    pub charge: i32,
    pub mass_amu: f64,
}

impl IonSpecies {
    pub const fn new(charge: i32, mass_amu: f64) -> Self {
        Self { charge, mass_amu }
    }

    pub fn rigidity_gv(&self, t_mev_per_n: f64) -> PhysicsResult<f64> {
        rigidity_gv(self.charge, self.mass_amu, t_mev_per_n)
    }

    pub fn reference_rigidity_gv(&self) -> PhysicsResult<f64> {
        reference_rigidity_gv(self.charge, self.mass_amu)
    }
}

fn check_species(charge: i32, mass_amu: f64) -> PhysicsResult<()> {
    if charge == 0 {
        return Err(PhysicsError::ZeroCharge);
    }
    let mass_amu = ensure_finite(mass_amu, "mass_amu")?;
    if mass_amu <= 0.0 {
        return Err(PhysicsError::NonPhysical {
            what: "mass_amu",
            value: mass_amu,
        });
    }
    Ok(())
}

/// Momentum (MeV/c) of an ion of mass `mass_amu` at `t_mev_per_n` per nucleon.
fn momentum_mev(mass_amu: f64, t_mev_per_n: f64) -> f64 {
    let rest = mass_amu * PROTON_REST_ENERGY_MEV;
    let total = mass_amu * t_mev_per_n + rest;
    (total * total - rest * rest).sqrt()
}

/// Rigidity in GV of an ion with charge state `charge` and mass `mass_amu`
/// moving with kinetic energy `t_mev_per_n` MeV/nucleon.
pub fn rigidity_gv(charge: i32, mass_amu: f64, t_mev_per_n: f64) -> PhysicsResult<f64> {
    check_species(charge, mass_amu)?;
    let t = ensure_finite(t_mev_per_n, "kinetic energy")?;
    if t < 0.0 {
        return Err(PhysicsError::NonPhysical {
            what: "kinetic energy",
            value: t,
        });
    }
    Ok(momentum_mev(mass_amu, t) / (charge.unsigned_abs() as f64 * 1000.0))
}

/// Rigidity at the fixed reference energy of 100 MeV/nucleon.
pub fn reference_rigidity_gv(charge: i32, mass_amu: f64) -> PhysicsResult<f64> {
    rigidity_gv(charge, mass_amu, REFERENCE_ENERGY_MEV_PER_N)
}

/// Inverse of [`rigidity_gv`]: kinetic energy per nucleon (MeV/n) at rigidity `r_gv`.
pub fn kinetic_energy_per_nucleon(charge: i32, mass_amu: f64, r_gv: f64) -> PhysicsResult<f64> {
    check_species(charge, mass_amu)?;
    let r = ensure_finite(r_gv, "rigidity")?;
    if r < 0.0 {
        return Err(PhysicsError::NonPhysical {
            what: "rigidity",
            value: r,
        });
    }
    let p = r * charge.unsigned_abs() as f64 * 1000.0;
    let rest = mass_amu * PROTON_REST_ENERGY_MEV;
    Ok(((p * p + rest * rest).sqrt() - rest) / mass_amu)
}
