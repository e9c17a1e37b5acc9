//! Range and consistency checks behind the submission gate.

use amps_physics::{SpectrumModel, dynamic_pressure_npa, shue_params};
use serde::{Deserialize, Serialize};

use crate::fields::FieldId;
use crate::schema::*;
use crate::step::WizardStep;

/// Relative mismatch between entered and plasma-derived Pdyn that is flagged.
pub const PDYN_MISMATCH_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckLevel {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub step: WizardStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub level: CheckLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub checks: Vec<Check>,
}

impl CheckReport {
    fn push(&mut self, step: WizardStep, key: Option<&str>, level: CheckLevel, message: String) {
        self.checks.push(Check {
            step,
            key: key.map(str::to_string),
            level,
            message,
        });
    }

    fn error(&mut self, step: WizardStep, key: Option<&str>, message: impl Into<String>) {
        self.push(step, key, CheckLevel::Error, message.into());
    }

    fn warn(&mut self, step: WizardStep, key: Option<&str>, message: impl Into<String>) {
        self.push(step, key, CheckLevel::Warn, message.into());
    }

    pub fn errors(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| c.level == CheckLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| c.level == CheckLevel::Warn)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Submission is allowed unless some check is fatal.
    pub fn can_submit(&self) -> bool {
        self.error_count() == 0
    }

    /// Worst level reported for `step`.
    pub fn level_for_step(&self, step: WizardStep) -> CheckLevel {
        self.checks
            .iter()
            .filter(|c| c.step == step)
            .map(|c| c.level)
            .max()
            .unwrap_or(CheckLevel::Ok)
    }

    /// Worst level reported for the field with param key `key`.
    pub fn level_for_key(&self, key: &str) -> CheckLevel {
        self.checks
            .iter()
            .filter(|c| c.key.as_deref() == Some(key))
            .map(|c| c.level)
            .max()
            .unwrap_or(CheckLevel::Ok)
    }
}

/// Run every check against `cfg`.
pub fn check_config(cfg: &RunConfiguration) -> CheckReport {
    let mut report = CheckReport::default();
    check_ranges(cfg, &mut report);
    check_run_info(&cfg.run, &mut report);
    check_particle(&cfg.particle, &mut report);
    check_field(&cfg.field, &mut report);
    check_boundary(cfg, &mut report);
    check_temporal(&cfg.temporal, &mut report);
    check_spectrum(&cfg.spectrum, &mut report);
    check_output(&cfg.output, &mut report);
    report
}

fn check_ranges(cfg: &RunConfiguration, report: &mut CheckReport) {
    for id in cfg.active_fields() {
        let Some(v) = cfg.scalar(id) else { continue };
        let spec = id.spec();
        if !v.is_finite() {
            let msg = format!("{} is not a finite number", spec.label);
            report.error(spec.step, Some(spec.key), msg);
        } else if !spec.hard.contains(&v) {
            report.error(
                spec.step,
                Some(spec.key),
                format!(
                    "{} = {} {} is outside {} to {}",
                    spec.label,
                    v,
                    spec.unit,
                    spec.hard.start(),
                    spec.hard.end()
                ),
            );
        } else if let Some(adv) = &spec.advisory
            && !adv.contains(&v)
        {
            report.warn(
                spec.step,
                Some(spec.key),
                format!(
                    "{} = {} {} is unusual (typical {} to {})",
                    spec.label,
                    v,
                    spec.unit,
                    adv.start(),
                    adv.end()
                ),
            );
        }
    }
}

fn check_run_info(run: &RunInfo, report: &mut CheckReport) {
    let step = WizardStep::RunInfo;
    let name = run.run_name.trim();
    if name.is_empty() {
        report.error(step, Some("RUN_NAME"), "Run name is required");
    } else if name.len() > 64 {
        report.error(step, Some("RUN_NAME"), "Run name must be at most 64 characters");
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        report.error(
            step,
            Some("RUN_NAME"),
            "Run name may only contain letters, digits, '_' and '-'",
        );
    }
    if let Some(email) = &run.contact_email
        && !email.contains('@')
    {
        report.error(step, Some("CONTACT_EMAIL"), format!("'{email}' is not an e-mail address"));
    }
}

fn check_particle(particle: &ParticleDef, report: &mut CheckReport) {
    if particle.charge == 0 {
        report.error(
            WizardStep::Particle,
            Some(FieldId::Charge.key()),
            "Charge state must be non-zero",
        );
    }
}

fn check_field(field: &BackgroundFieldDef, report: &mut CheckReport) {
    let step = WizardStep::BackgroundField;
    if let FieldModel::Mhd { run_id, .. } = &field.model {
        if field.evaluation == FieldEvaluation::Gridless {
            report.error(step, Some("FIELD_MODEL"), "MHD fields require gridded evaluation");
        }
        if run_id.trim().is_empty() {
            report.error(step, Some("MHD_RUN_ID"), "MHD run identifier is required");
        }
    }

    let d = &field.drivers;
    if field.model.uses_drivers() && d.nsw_cc > 0.0 && d.pdyn_npa > 0.0 {
        let derived = dynamic_pressure_npa(d.nsw_cc, d.vx_kmps);
        if derived > 0.0 && ((d.pdyn_npa - derived) / derived).abs() > PDYN_MISMATCH_FRACTION {
            report.warn(
                step,
                Some(FieldId::Pdyn.key()),
                format!(
                    "Pdyn {:.2} nPa disagrees with {:.2} nPa from density and speed",
                    d.pdyn_npa, derived
                ),
            );
        }
    }
}

fn check_boundary(cfg: &RunConfiguration, report: &mut CheckReport) {
    let step = WizardStep::Boundary;
    let inner = cfg.boundary.inner_radius_re;
    let key = Some(FieldId::InnerRadius.key());
    match &cfg.boundary.outer {
        OuterBoundary::Box {
            x_min_re,
            x_max_re,
            y_min_re,
            y_max_re,
            z_min_re,
            z_max_re,
        } => {
            for (axis, lo, hi) in [
                ("x", x_min_re, x_max_re),
                ("y", y_min_re, y_max_re),
                ("z", z_min_re, z_max_re),
            ] {
                if lo >= hi {
                    report.error(step, None, format!("Box {axis} min must be below {axis} max"));
                }
            }
            let nearest = [*x_max_re, -x_min_re, *y_max_re, -y_min_re, *z_max_re, -z_min_re]
                .into_iter()
                .fold(f64::INFINITY, f64::min);
            if nearest <= 0.0 {
                report.error(step, None, "Box must enclose the Earth");
            } else if inner >= nearest {
                report.error(step, key, "Inner boundary must lie inside the box");
            }
        }
        OuterBoundary::Shue { mode, x_tail_re } => {
            let r0 = match mode {
                ShueMode::Auto => {
                    let d = &cfg.field.drivers;
                    shue_params(d.bz_nt, d.pdyn_npa).r0_re
                }
                ShueMode::Manual { r0_re, .. } => *r0_re,
            };
            if inner >= r0 {
                let msg = format!(
                    "Inner boundary {inner} RE must lie inside the magnetopause (r0 = {r0:.2} RE)"
                );
                report.error(step, key, msg);
            }
            if -x_tail_re <= inner {
                report.error(
                    step,
                    Some(FieldId::XTail.key()),
                    "Tail cut must lie beyond the inner boundary",
                );
            }
        }
    }
}

fn check_temporal(temporal: &TemporalMode, report: &mut CheckReport) {
    let step = WizardStep::Temporal;
    if let TemporalMode::TimeSeries {
        start,
        end,
        field_update_cadence_min,
        inject_cadence_min,
        driver_source,
    } = temporal
    {
        if end <= start {
            report.error(step, Some("END_TIME"), "End time must be after start time");
        }
        if inject_cadence_min < field_update_cadence_min {
            report.warn(
                step,
                Some(FieldId::InjectCadence.key()),
                "Injection cadence is shorter than the field update cadence",
            );
        }
        let span_min = (*end - *start).num_seconds() as f64 / 60.0;
        if span_min > 0.0 && *field_update_cadence_min > span_min {
            report.warn(
                step,
                Some(FieldId::FieldCadence.key()),
                "Field update cadence exceeds the simulated interval",
            );
        }
        if let DriverSource::File { path } = driver_source
            && path.trim().is_empty()
        {
            report.error(step, Some("DRIVER_FILE"), "Driver file path is required");
        }
    }
}

fn check_spectrum(spectrum: &SpectrumDef, report: &mut CheckReport) {
    let step = WizardStep::Spectrum;
    if spectrum.e_min_mev >= spectrum.e_max_mev {
        report.error(
            step,
            Some(FieldId::EMin.key()),
            "Minimum energy must be below maximum energy",
        );
    }
    match &spectrum.model {
        SpectrumModel::Band {
            gamma_a, gamma_b, ..
        } if gamma_b <= gamma_a => {
            report.error(
                step,
                Some(FieldId::GammaB.key()),
                "High-energy index must exceed the low-energy index",
            );
        }
        SpectrumModel::Table { path } if path.trim().is_empty() => {
            report.error(step, Some("SPECTRUM_FILE"), "Spectrum table path is required");
        }
        _ => {}
    }
}

fn check_output(output: &OutputDef, report: &mut CheckReport) {
    let step = WizardStep::Output;
    match &output.domain {
        OutputDomain::Shells { altitudes_km, .. } => {
            if altitudes_km.is_empty() {
                report.error(
                    step,
                    Some("SHELL_ALTITUDES"),
                    "At least one shell altitude is required",
                );
            }
            if altitudes_km.iter().any(|a| !a.is_finite() || *a <= 0.0) {
                report.error(step, Some("SHELL_ALTITUDES"), "Shell altitudes must be positive");
            }
        }
        OutputDomain::Points { positions_re } => {
            if positions_re.is_empty() {
                report.error(step, Some("POINTS"), "At least one output point is required");
            }
            if positions_re.iter().flatten().any(|c| !c.is_finite()) {
                report.error(step, Some("POINTS"), "Output point coordinates must be finite");
            }
        }
        OutputDomain::Trajectory { path } => {
            if path.trim().is_empty() {
                report.error(step, Some("TRAJECTORY_FILE"), "Trajectory file path is required");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_submittable() {
        let report = check_config(&RunConfiguration::default());
        assert!(report.can_submit(), "{:?}", report.checks);
        assert_eq!(report.warning_count(), 0, "{:?}", report.checks);
    }

    #[test]
    fn extreme_dst_only_warns() {
        let mut cfg = RunConfiguration::default();
        cfg.field.drivers.dst_nt = -700.0;
        let report = check_config(&cfg);
        assert!(report.can_submit());
        assert_eq!(report.level_for_key("DST"), CheckLevel::Warn);
        assert_eq!(report.level_for_step(WizardStep::BackgroundField), CheckLevel::Warn);
    }

    #[test]
    fn absurd_dst_blocks() {
        let mut cfg = RunConfiguration::default();
        cfg.field.drivers.dst_nt = -5000.0;
        assert!(!check_config(&cfg).can_submit());
    }

    #[test]
    fn storm_kp_above_nine_only_warns() {
        let mut cfg = RunConfiguration::default();
        cfg.field.model = FieldModel::T89 { kp: 9.5 };
        let report = check_config(&cfg);
        assert!(report.can_submit(), "{:?}", report.checks);
        assert_eq!(report.level_for_key("KP"), CheckLevel::Warn);

        cfg.field.model = FieldModel::T89 { kp: 20.0 };
        assert_eq!(check_config(&cfg).level_for_key("KP"), CheckLevel::Error);
    }

    #[test]
    fn volland_stern_kp_above_nine_only_warns() {
        let mut cfg = RunConfiguration::default();
        cfg.efield = ElectricFieldModel::VollandStern { kp: 9.5 };
        let report = check_config(&cfg);
        assert!(report.can_submit(), "{:?}", report.checks);
        assert_eq!(report.level_for_key("EFIELD_KP"), CheckLevel::Warn);
    }

    #[test]
    fn zero_charge_blocks() {
        let mut cfg = RunConfiguration::default();
        cfg.particle.charge = 0;
        let report = check_config(&cfg);
        assert_eq!(report.level_for_key("CHARGE"), CheckLevel::Error);
    }

    #[test]
    fn inverted_energy_range_blocks() {
        let mut cfg = RunConfiguration::default();
        cfg.spectrum.e_min_mev = 500.0;
        cfg.spectrum.e_max_mev = 10.0;
        assert_eq!(check_config(&cfg).level_for_step(WizardStep::Spectrum), CheckLevel::Error);
    }

    #[test]
    fn gridless_mhd_blocks() {
        let mut cfg = RunConfiguration::default();
        cfg.field.model = FieldModel::Mhd {
            source: MhdSource::Swmf,
            run_id: "run42".into(),
        };
        let report = check_config(&cfg);
        assert_eq!(report.level_for_key("FIELD_MODEL"), CheckLevel::Error);
    }

    #[test]
    fn slow_injection_cadence_warns() {
        let mut cfg = RunConfiguration::default();
        cfg.temporal = TemporalKind::TimeSeries.default_mode();
        cfg.set_scalar(FieldId::InjectCadence, 1.0).unwrap();
        let report = check_config(&cfg);
        assert!(report.can_submit());
        assert_eq!(report.level_for_key("INJECT_DT"), CheckLevel::Warn);
    }

    #[test]
    fn inner_boundary_outside_box() {
        let mut cfg = RunConfiguration::default();
        cfg.boundary.outer = OuterBoundaryKind::Box.default_boundary();
        cfg.set_scalar(FieldId::BoxXMax, 1.05).unwrap();
        assert_eq!(check_config(&cfg).level_for_key("R_INNER"), CheckLevel::Error);
    }

    #[test]
    fn run_name_characters() {
        let mut cfg = RunConfiguration::default();
        cfg.run.run_name = "bad name!".into();
        assert_eq!(check_config(&cfg).level_for_key("RUN_NAME"), CheckLevel::Error);
    }

    #[test]
    fn pressure_mismatch_warns() {
        let mut cfg = RunConfiguration::default();
        cfg.field.drivers.pdyn_npa = 20.0;
        assert_eq!(check_config(&cfg).level_for_key("PDYN"), CheckLevel::Warn);
    }
}
