//! Read-only views of a session for display.

use amps_config::{CheckLevel, FieldId, OuterBoundary, ShueMode, WizardStep};
use amps_physics::{ShueParams, boundary_curve, flux_curve};

use crate::error::{AppError, AppResult};
use crate::session::WizardSession;

/// Where the plotted Shue parameters come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShueSource {
    /// Shue boundary in Auto mode.
    Auto,
    /// Shue boundary with user-entered parameters.
    Manual,
    /// Box boundary; the regression is shown for reference only.
    Reference,
}

#[derive(Debug, Clone)]
pub struct BoundaryProfile {
    pub params: ShueParams,
    pub source: ShueSource,
    /// `(x, rho)` in Earth radii.
    pub points: Vec<(f64, f64)>,
}

/// One active numeric field with its current value and check level.
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub id: FieldId,
    pub step: WizardStep,
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub value: f64,
    pub formatted: String,
    pub level: CheckLevel,
}

pub fn boundary_profile(
    session: &WizardSession,
    theta_max_deg: f64,
    n: usize,
) -> AppResult<BoundaryProfile> {
    let derived = session.derived();
    let source = match &session.config().boundary.outer {
        OuterBoundary::Shue {
            mode: ShueMode::Auto,
            ..
        } => ShueSource::Auto,
        OuterBoundary::Shue { .. } => ShueSource::Manual,
        OuterBoundary::Box { .. } => ShueSource::Reference,
    };
    let params = derived.boundary_shue.unwrap_or(derived.shue_from_drivers);
    let points = boundary_curve(params, theta_max_deg, n)?;
    Ok(BoundaryProfile {
        params,
        source,
        points,
    })
}

/// `(E, J(E))` over the configured energy range.
pub fn spectrum_profile(session: &WizardSession, n: usize) -> AppResult<Vec<(f64, f64)>> {
    let cfg = session.config();
    if n == 0 {
        return Err(AppError::InvalidInput("spectrum needs at least one sample".to_string()));
    }
    Ok(flux_curve(
        &cfg.spectrum.model,
        cfg.particle.ion(),
        cfg.spectrum.e_min_mev,
        cfg.spectrum.e_max_mev,
        n,
    )?)
}

/// Active numeric fields in registry order.
pub fn field_rows(session: &WizardSession) -> Vec<FieldRow> {
    let cfg = session.config();
    let report = session.check();
    cfg.active_fields()
        .into_iter()
        .filter_map(|id| {
            let value = cfg.scalar(id)?;
            let spec = id.spec();
            Some(FieldRow {
                id,
                step: spec.step,
                key: spec.key,
                label: spec.label,
                unit: spec.unit,
                value,
                formatted: spec.format.format(value),
                level: report.level_for_key(spec.key),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Edit;
    use amps_config::{OuterBoundaryKind, SpectrumKind};

    #[test]
    fn default_boundary_follows_drivers() {
        let s = WizardSession::default();
        let profile = boundary_profile(&s, 120.0, 25).unwrap();
        assert_eq!(profile.source, ShueSource::Auto);
        assert_eq!(profile.params, s.derived().shue_from_drivers);
        assert_eq!(profile.points.len(), 25);
        let (x0, rho0) = profile.points[0];
        assert!((x0 - profile.params.r0_re).abs() < 1e-12);
        assert_eq!(rho0, 0.0);
    }

    #[test]
    fn manual_shue_uses_entered_parameters() {
        let mut s = WizardSession::default();
        s.apply(Edit::SetShueManual(true));
        s.apply(Edit::SetScalar {
            field: FieldId::ShueR0,
            input: "12.5".to_string(),
        });
        let profile = boundary_profile(&s, 90.0, 10).unwrap();
        assert_eq!(profile.source, ShueSource::Manual);
        assert_eq!(profile.params.r0_re, 12.5);
    }

    #[test]
    fn box_boundary_shows_reference_regression() {
        let mut s = WizardSession::default();
        s.apply(Edit::SelectBoundary(OuterBoundaryKind::Box));
        let profile = boundary_profile(&s, 120.0, 10).unwrap();
        assert_eq!(profile.source, ShueSource::Reference);
        assert_eq!(profile.params, s.derived().shue_from_drivers);
    }

    #[test]
    fn boundary_rejects_full_sweep() {
        let s = WizardSession::default();
        assert!(boundary_profile(&s, 180.0, 10).is_err());
    }

    #[test]
    fn spectrum_profile_samples_energy_range() {
        let s = WizardSession::default();
        let curve = spectrum_profile(&s, 30).unwrap();
        assert_eq!(curve.len(), 30);
        let (e_last, _) = curve[29];
        assert_eq!(e_last, s.config().spectrum.e_max_mev);
        assert!(curve.iter().all(|(_, j)| j.is_finite()));
    }

    #[test]
    fn spectrum_profile_needs_samples() {
        let s = WizardSession::default();
        assert!(matches!(spectrum_profile(&s, 0), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn table_spectrum_has_no_profile() {
        let mut s = WizardSession::default();
        s.apply(Edit::SelectSpectrum(SpectrumKind::Table));
        assert!(spectrum_profile(&s, 10).is_err());
    }

    #[test]
    fn field_rows_cover_active_fields() {
        let mut s = WizardSession::default();
        let rows = field_rows(&s);
        assert_eq!(rows.len(), s.config().active_fields().len());
        let dst = rows.iter().find(|r| r.id == FieldId::Dst).unwrap();
        assert_eq!(dst.formatted, "-142.0");
        assert_eq!(dst.level, CheckLevel::Ok);
        assert!(rows.iter().all(|r| r.id != FieldId::T89Kp));

        s.apply(Edit::SetScalar {
            field: FieldId::Dst,
            input: "-700".to_string(),
        });
        let dst = field_rows(&s).into_iter().find(|r| r.id == FieldId::Dst).unwrap();
        assert_eq!(dst.level, CheckLevel::Warn);
    }
}
