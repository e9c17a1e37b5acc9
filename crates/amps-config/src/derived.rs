//! Values computed from the configuration rather than entered.

use amps_core::log_space;
use amps_physics::{ShueParams, dynamic_pressure_npa, flux_curve, shue_params};
use serde::{Deserialize, Serialize};

use crate::fields::FieldId;
use crate::schema::{OuterBoundary, RunConfiguration, ShueMode};

/// Samples in the spectrum preview curve.
pub const FLUX_CURVE_POINTS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    /// Rigidity at 100 MeV/n; `None` when charge or mass is unusable.
    pub reference_rigidity_gv: Option<f64>,
    /// Shue parameters regressed from the current Bz and Pdyn.
    pub shue_from_drivers: ShueParams,
    /// Shue parameters the outer boundary actually uses, if it is a Shue boundary.
    pub boundary_shue: Option<ShueParams>,
    pub pdyn_from_plasma_npa: f64,
    /// Edges of the output energy bins (MeV/n): `energy_bins + 1` log-spaced
    /// points spanning the spectrum range. Empty when the bin count or range
    /// is unusable.
    pub energy_edges_mev: Vec<f64>,
    /// `(E, J(E))` preview of the spectrum; empty without a closed form.
    pub flux_curve: Vec<(f64, f64)>,
}

impl DerivedValues {
    pub fn compute(cfg: &RunConfiguration) -> Self {
        let ion = cfg.particle.ion();
        let d = &cfg.field.drivers;
        let shue_from_drivers = shue_params(d.bz_nt, d.pdyn_npa);
        let boundary_shue = match &cfg.boundary.outer {
            OuterBoundary::Shue {
                mode: ShueMode::Auto,
                ..
            } => Some(shue_from_drivers),
            OuterBoundary::Shue {
                mode: ShueMode::Manual { r0_re, alpha },
                ..
            } => Some(ShueParams {
                r0_re: *r0_re,
                alpha: *alpha,
            }),
            OuterBoundary::Box { .. } => None,
        };
        let (e_min, e_max) = (cfg.spectrum.e_min_mev, cfg.spectrum.e_max_mev);

        Self {
            reference_rigidity_gv: ion.reference_rigidity_gv().ok(),
            shue_from_drivers,
            boundary_shue,
            pdyn_from_plasma_npa: dynamic_pressure_npa(d.nsw_cc, d.vx_kmps),
            energy_edges_mev: energy_edges(e_min, e_max, cfg.output.energy_bins),
            flux_curve: flux_curve(&cfg.spectrum.model, ion, e_min, e_max, FLUX_CURVE_POINTS)
                .unwrap_or_default(),
        }
    }
}

fn energy_edges(e_min: f64, e_max: f64, bins: usize) -> Vec<f64> {
    if !FieldId::EnergyBins.spec().hard.contains(&(bins as f64)) {
        return Vec::new();
    }
    log_space(e_min, e_max, bins + 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{OuterBoundaryKind, SpectrumKind};

    #[test]
    fn defaults_derive_everything() {
        let derived = DerivedValues::compute(&RunConfiguration::default());
        let r = derived.reference_rigidity_gv.unwrap();
        assert!((r - 0.4478).abs() < 1e-3);
        assert_eq!(derived.boundary_shue, Some(derived.shue_from_drivers));
        let edges = &derived.energy_edges_mev;
        assert_eq!(edges.len(), 41);
        let spectrum = RunConfiguration::default().spectrum;
        assert!((edges[0] / spectrum.e_min_mev - 1.0).abs() < 1e-12);
        assert_eq!(edges[40], spectrum.e_max_mev);
        assert_eq!(derived.flux_curve.len(), FLUX_CURVE_POINTS);
    }

    #[test]
    fn oversized_bin_count_skips_edges() {
        let mut cfg = RunConfiguration::default();
        cfg.output.energy_bins = 10usize.pow(15);
        assert!(DerivedValues::compute(&cfg).energy_edges_mev.is_empty());
        cfg.output.energy_bins = 0;
        assert!(DerivedValues::compute(&cfg).energy_edges_mev.is_empty());
    }

    #[test]
    fn zero_charge_has_no_rigidity() {
        let mut cfg = RunConfiguration::default();
        cfg.particle.charge = 0;
        assert_eq!(DerivedValues::compute(&cfg).reference_rigidity_gv, None);
    }

    #[test]
    fn box_boundary_has_no_shue() {
        let mut cfg = RunConfiguration::default();
        cfg.boundary.outer = OuterBoundaryKind::Box.default_boundary();
        assert_eq!(DerivedValues::compute(&cfg).boundary_shue, None);
    }

    #[test]
    fn table_spectrum_has_no_curve() {
        let mut cfg = RunConfiguration::default();
        cfg.spectrum.model = SpectrumKind::Table.default_model();
        assert!(DerivedValues::compute(&cfg).flux_curve.is_empty());
    }
}
