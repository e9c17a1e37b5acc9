//! amps-physics: closed-form derivations behind the AMPS run wizard.
//!
//! Provides:
//! - Magnetic rigidity of an ion species at a given energy per nucleon
//! - Shue et al. (1998) magnetopause standoff, flaring and boundary curve
//! - Spectral flux models for the injected particle population
//! - Solar-wind ram pressure from plasma moments
//!
//! Every function here is pure. Inputs use the conventional space-physics
//! units (nT, nPa, km/s, cm^-3, MeV/nucleon, Earth radii).

pub mod error;
pub mod plasma;
pub mod rigidity;
pub mod shue;
pub mod spectrum;

pub use error::{PhysicsError, PhysicsResult};
pub use plasma::dynamic_pressure_npa;
pub use rigidity::{IonSpecies, kinetic_energy_per_nucleon, reference_rigidity_gv, rigidity_gv};
pub use shue::{ShueParams, boundary_curve, shue_params, shue_radius};
pub use spectrum::{SpectrumModel, flux_curve};
