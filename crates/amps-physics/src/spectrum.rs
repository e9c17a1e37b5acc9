//! Spectral flux models for the injected particle population.
//!
//! All energies are kinetic energy per nucleon in MeV/n. Fluxes are in the
//! units of the model normalisation `j0`, except the force-field model,
//! which returns particles / (m^2 s sr GeV/n).

use amps_core::constants::PROTON_REST_ENERGY_MEV;
use amps_core::{ensure_finite, log_space};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};
use crate::rigidity::IonSpecies;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpectrumModel {
    /// `j0 * (E / e0)^-gamma`
    PowerLaw { j0: f64, gamma: f64, e0_mev: f64 },
    /// Power law rolled over by `exp(-E / e_cut)`.
    PowerLawCutoff {
        j0: f64,
        gamma: f64,
        e0_mev: f64,
        e_cut_mev: f64,
    },
    /// Band double power law joined smoothly at `(gamma_b - gamma_a) * e0`.
    Band {
        j0: f64,
        gamma_a: f64,
        gamma_b: f64,
        e0_mev: f64,
        e_ref_mev: f64,
    },
    /// Galactic cosmic rays: local interstellar spectrum modulated by the
    /// force-field potential `phi_mv` (MV).
    ForceField { phi_mv: f64 },
    /// Tabulated spectrum read by the backend.
    Table { path: String },
}

impl SpectrumModel {
    /// Differential flux at `e_mev` for `species`.
    pub fn flux(&self, e_mev: f64, species: IonSpecies) -> PhysicsResult<f64> {
        let e = ensure_finite(e_mev, "spectrum energy")?;
        if e <= 0.0 {
            return Err(PhysicsError::NonPhysical {
                what: "spectrum energy",
                value: e,
            });
        }
        match *self {
            SpectrumModel::PowerLaw { j0, gamma, e0_mev } => {
                positive(e0_mev, "e0_mev")?;
                Ok(j0 * (e / e0_mev).powf(-gamma))
            }
            SpectrumModel::PowerLawCutoff {
                j0,
                gamma,
                e0_mev,
                e_cut_mev,
            } => {
                positive(e0_mev, "e0_mev")?;
                positive(e_cut_mev, "e_cut_mev")?;
                Ok(j0 * (e / e0_mev).powf(-gamma) * (-e / e_cut_mev).exp())
            }
            SpectrumModel::Band {
                j0,
                gamma_a,
                gamma_b,
                e0_mev,
                e_ref_mev,
            } => {
                positive(e0_mev, "e0_mev")?;
                positive(e_ref_mev, "e_ref_mev")?;
                let d = gamma_b - gamma_a;
                if d <= 0.0 {
                    return Err(PhysicsError::NonPhysical {
                        what: "band gamma_b - gamma_a",
                        value: d,
                    });
                }
                let e_break = d * e0_mev;
                if e < e_break {
                    Ok(j0 * (e / e_ref_mev).powf(-gamma_a) * (-e / e0_mev).exp())
                } else {
                    Ok(j0
                        * (e_break / e_ref_mev).powf(d)
                        * (-d).exp()
                        * (e / e_ref_mev).powf(-gamma_b))
                }
            }
            SpectrumModel::ForceField { phi_mv } => force_field_flux(e, phi_mv, species),
            SpectrumModel::Table { .. } => Err(PhysicsError::NotSupported {
                what: "closed-form flux for tabulated spectrum",
            }),
        }
    }
}

fn positive(v: f64, what: &'static str) -> PhysicsResult<f64> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PhysicsError::NonPhysical { what, value: v })
    }
}

/// Local interstellar spectrum in rigidity (GV), Burger et al. (2000) form.
fn lis_flux(rigidity_gv: f64) -> f64 {
    1.9e4 * rigidity_gv.powf(-2.78) / (1.0 + 0.4866 * rigidity_gv.powf(-2.51))
}

fn force_field_flux(e: f64, phi_mv: f64, species: IonSpecies) -> PhysicsResult<f64> {
    let phi = ensure_finite(phi_mv, "phi_mv")?;
    if phi < 0.0 {
        return Err(PhysicsError::NonPhysical {
            what: "phi_mv",
            value: phi,
        });
    }
    let phi_n = phi * species.charge.unsigned_abs() as f64 / species.mass_amu;
    let e_lis = e + phi_n;
    let r_lis = species.rigidity_gv(e_lis)?;
    let two_mp = 2.0 * PROTON_REST_ENERGY_MEV;
    let ratio = e * (e + two_mp) / (e_lis * (e_lis + two_mp));
    Ok(lis_flux(r_lis) * ratio)
}

/// Sample `model` at `n` log-spaced energies over `[e_min, e_max]`.
pub fn flux_curve(
    model: &SpectrumModel,
    species: IonSpecies,
    e_min_mev: f64,
    e_max_mev: f64,
    n: usize,
) -> PhysicsResult<Vec<(f64, f64)>> {
    log_space(e_min_mev, e_max_mev, n)?
        .into_iter()
        .map(|e| Ok((e, model.flux(e, species)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROTON: IonSpecies = IonSpecies::new(1, 1.0073);

    #[test]
    fn power_law_normalisation() {
        let m = SpectrumModel::PowerLaw {
            j0: 1e4,
            gamma: 3.0,
            e0_mev: 10.0,
        };
        assert!((m.flux(10.0, PROTON).unwrap() - 1e4).abs() < 1e-9);
        assert!((m.flux(100.0, PROTON).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn cutoff_suppresses_high_energy() {
        let plain = SpectrumModel::PowerLaw {
            j0: 1.0,
            gamma: 2.0,
            e0_mev: 1.0,
        };
        let cut = SpectrumModel::PowerLawCutoff {
            j0: 1.0,
            gamma: 2.0,
            e0_mev: 1.0,
            e_cut_mev: 50.0,
        };
        let e = 500.0;
        assert!(cut.flux(e, PROTON).unwrap() < 1e-3 * plain.flux(e, PROTON).unwrap());
    }

    #[test]
    fn band_is_continuous_at_break() {
        let m = SpectrumModel::Band {
            j0: 1.0,
            gamma_a: 1.0,
            gamma_b: 3.0,
            e0_mev: 20.0,
            e_ref_mev: 1.0,
        };
        let e_break = 40.0;
        let below = m.flux(e_break * (1.0 - 1e-9), PROTON).unwrap();
        let above = m.flux(e_break, PROTON).unwrap();
        assert!(((below - above) / above).abs() < 1e-6);
    }

    #[test]
    fn band_requires_steeper_high_side() {
        let m = SpectrumModel::Band {
            j0: 1.0,
            gamma_a: 3.0,
            gamma_b: 2.0,
            e0_mev: 20.0,
            e_ref_mev: 1.0,
        };
        assert!(m.flux(10.0, PROTON).is_err());
    }

    #[test]
    fn modulation_reduces_flux() {
        let quiet = SpectrumModel::ForceField { phi_mv: 400.0 };
        let active = SpectrumModel::ForceField { phi_mv: 1000.0 };
        let e = 200.0;
        assert!(active.flux(e, PROTON).unwrap() < quiet.flux(e, PROTON).unwrap());
    }

    #[test]
    fn table_has_no_closed_form() {
        let m = SpectrumModel::Table {
            path: "sep.txt".into(),
        };
        assert!(matches!(
            m.flux(10.0, PROTON),
            Err(PhysicsError::NotSupported { .. })
        ));
    }

    #[test]
    fn curve_spans_range() {
        let m = SpectrumModel::PowerLaw {
            j0: 1.0,
            gamma: 2.0,
            e0_mev: 1.0,
        };
        let pts = flux_curve(&m, PROTON, 1.0, 1000.0, 10).unwrap();
        assert_eq!(pts.len(), 10);
        assert_eq!(pts[0].0, 1.0);
        assert_eq!(pts[9].0, 1000.0);
        assert!(pts.windows(2).all(|w| w[1].1 < w[0].1));
    }
}
