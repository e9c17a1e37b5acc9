//! Render a [`RunConfiguration`] into `AMPS_PARAM.in` text.
//!
//! Output is deterministic: the same configuration always renders to the
//! same bytes, so the manifest digest identifies the configuration.

use amps_config::{
    DerivedValues, DriverSource, FieldEvaluation, FieldId, FieldModel, OuterBoundary,
    OutputDomain, RunConfiguration, ShueMode, SpectrumKind, TemporalMode, WizardStep,
};
use amps_physics::SpectrumModel;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::sections::{self, Keyword};

pub const PARAM_FILE_NAME: &str = "AMPS_PARAM.in";

const KEY_WIDTH: usize = 18;

struct ParamWriter<'a> {
    cfg: &'a RunConfiguration,
    out: String,
}

impl<'a> ParamWriter<'a> {
    fn new(cfg: &'a RunConfiguration) -> Self {
        Self {
            cfg,
            out: String::new(),
        }
    }

    fn comment(&mut self, text: &str) {
        self.out.push_str("! ");
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn section(&mut self, name: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push('#');
        self.out.push_str(name);
        self.out.push('\n');
    }

    fn entry(&mut self, key: &str, value: &str, comment: Option<&str>) {
        let line = format!("{key:<KEY_WIDTH$}{value}");
        match comment {
            Some(c) => {
                self.out.push_str(&line);
                self.out.push_str(" ! ");
                self.out.push_str(c);
            }
            None => self.out.push_str(line.trim_end()),
        }
        self.out.push('\n');
    }

    fn text(&mut self, key: &str, value: &str) {
        self.entry(key, &free_text(value), None);
    }

    /// Every active numeric field belonging to `step`, in registry order.
    fn fields(&mut self, step: WizardStep) {
        for id in self.cfg.active_fields() {
            let spec = id.spec();
            if spec.step != step {
                continue;
            }
            if let Some(v) = self.cfg.scalar(id) {
                let comment = unit_comment(spec.label, spec.unit);
                self.entry(spec.key, &spec.format.format(v), Some(&comment));
            }
        }
    }

    fn derived(&mut self, id: FieldId, value: f64, note: &str) {
        let spec = id.spec();
        let comment = format!("{}, {}", unit_comment(spec.label, spec.unit), note);
        self.entry(spec.key, &spec.format.format(value), Some(&comment));
    }
}

fn unit_comment(label: &str, unit: &str) -> String {
    if unit.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{unit}]")
    }
}

/// Comment markers and line breaks would corrupt the line structure.
fn free_text(s: &str) -> String {
    s.replace(['!', '\n', '\r'], " ").trim().to_string()
}

fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn flag(b: bool) -> &'static str {
    if b { "T" } else { "F" }
}

pub fn render_param_file(cfg: &RunConfiguration, derived: &DerivedValues) -> String {
    let mut w = ParamWriter::new(cfg);
    w.comment(&format!(
        "{} generated by amps-param {}",
        PARAM_FILE_NAME,
        env!("CARGO_PKG_VERSION")
    ));

    w.section(sections::RUN);
    w.text("RUN_NAME", &cfg.run.run_name);
    w.text("DESCRIPTION", &cfg.run.description);
    if let Some(email) = &cfg.run.contact_email {
        w.text("CONTACT_EMAIL", email);
    }

    w.section(sections::PARTICLE);
    w.entry("SPECIES", cfg.particle.species.keyword(), None);
    w.fields(WizardStep::Particle);
    if let Some(r) = derived.reference_rigidity_gv {
        w.entry("RIGIDITY_REF", &format!("{r:.4}"), Some("[GV] at 100 MeV/n, informational"));
    }

    let field = &cfg.field;
    w.section(sections::BACKGROUND_FIELD);
    w.entry("FIELD_MODEL", field.model.kind().keyword(), None);
    w.entry("FIELD_EVAL", field.evaluation.keyword(), None);
    w.entry("EPOCH", &timestamp(&field.epoch), Some("UTC"));
    if let FieldModel::Mhd { source, run_id } = &field.model {
        w.entry("MHD_SOURCE", source.keyword(), None);
        w.text("MHD_RUN_ID", run_id);
    }
    w.fields(WizardStep::BackgroundField);
    w.entry(
        "PDYN_PLASMA",
        &format!("{:.2}", derived.pdyn_from_plasma_npa),
        Some("[nPa] from SW_N and SW_VX, informational"),
    );

    w.section(sections::BOUNDARY);
    w.entry("OUTER_BOUNDARY", cfg.boundary.outer.kind().keyword(), None);
    if let OuterBoundary::Shue { mode, .. } = &cfg.boundary.outer {
        let mode_word = match mode {
            ShueMode::Auto => "AUTO",
            ShueMode::Manual { .. } => "MANUAL",
        };
        w.entry("SHUE_MODE", mode_word, None);
        if let (ShueMode::Auto, Some(p)) = (mode, derived.boundary_shue) {
            w.derived(FieldId::ShueR0, p.r0_re, "from IMF_BZ and PDYN");
            w.derived(FieldId::ShueAlpha, p.alpha, "from IMF_BZ and PDYN");
        }
    }
    w.fields(WizardStep::Boundary);

    if field.evaluation == FieldEvaluation::Gridded {
        w.section(sections::ELECTRIC_FIELD);
        w.entry("EFIELD_MODEL", cfg.efield.kind().keyword(), None);
        w.fields(WizardStep::ElectricField);
    }

    w.section(sections::TEMPORAL);
    w.entry("TEMPORAL_MODE", cfg.temporal.kind().keyword(), None);
    if let TemporalMode::TimeSeries {
        start,
        end,
        driver_source,
        ..
    } = &cfg.temporal
    {
        w.entry("START_TIME", &timestamp(start), Some("UTC"));
        w.entry("END_TIME", &timestamp(end), Some("UTC"));
        match driver_source {
            DriverSource::Omniweb => w.entry("DRIVER_SOURCE", "OMNIWEB", None),
            DriverSource::Manual => w.entry("DRIVER_SOURCE", "MANUAL", None),
            DriverSource::File { path } => {
                w.entry("DRIVER_SOURCE", "FILE", None);
                w.text("DRIVER_FILE", path);
            }
        }
    }
    w.fields(WizardStep::Temporal);

    w.section(sections::SPECTRUM);
    w.entry("SPECTRUM_TYPE", SpectrumKind::of(&cfg.spectrum.model).keyword(), None);
    if let SpectrumModel::Table { path } = &cfg.spectrum.model {
        w.text("SPECTRUM_FILE", path);
    }
    w.fields(WizardStep::Spectrum);

    let output = &cfg.output;
    w.section(sections::OUTPUT);
    w.entry("OUTPUT_DOMAIN", output.domain.kind().keyword(), None);
    match &output.domain {
        OutputDomain::Shells { altitudes_km, .. } => {
            let list = altitudes_km
                .iter()
                .map(|a| format!("{a:.1}"))
                .collect::<Vec<_>>()
                .join(" ");
            w.entry("SHELL_ALTITUDES", &list, Some("[km]"));
        }
        OutputDomain::Points { positions_re } => {
            w.entry("N_POINTS", &positions_re.len().to_string(), None);
            for [x, y, z] in positions_re {
                w.entry("POINT", &format!("{x:.3} {y:.3} {z:.3}"), Some("[RE] GSM"));
            }
        }
        OutputDomain::Trajectory { path } => w.text("TRAJECTORY_FILE", path),
    }
    w.fields(WizardStep::Output);
    w.entry("FLUX_TYPE", output.flux_kind.keyword(), None);
    w.entry("OUTPUT_FORMAT", output.format.keyword(), None);
    w.entry("CUTOFF_RIGIDITY", flag(output.cutoff_rigidity), None);

    w.out.push('\n');
    w.out.push('#');
    w.out.push_str(sections::END);
    w.out.push('\n');
    w.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use amps_config::{ElectricFieldModel, FieldModelKind};

    fn render(cfg: &RunConfiguration) -> String {
        render_param_file(cfg, &DerivedValues::compute(cfg))
    }

    #[test]
    fn default_file_layout() {
        let text = render(&RunConfiguration::default());
        assert!(text.starts_with("! AMPS_PARAM.in generated by amps-param"));
        assert!(text.contains("#BACKGROUND_FIELD\nFIELD_MODEL       TS05\n"));
        assert!(text.contains("DST               -142.0 ! Dst [nT]\n"));
        assert!(text.contains("TS05_W3           1.200 ! TS05 W3\n"));
        assert!(text.contains("SHUE_MODE         AUTO\n"));
        assert!(text.trim_end().ends_with("#END"));
    }

    #[test]
    fn gridless_omits_electric_field() {
        let text = render(&RunConfiguration::default());
        assert!(!text.contains("#ELECTRIC_FIELD"));

        let mut cfg = RunConfiguration::default();
        cfg.field.evaluation = FieldEvaluation::Gridded;
        cfg.efield = ElectricFieldModel::VollandStern { kp: 5.0 };
        let text = render(&cfg);
        assert!(text.contains("#ELECTRIC_FIELD\nEFIELD_MODEL      VOLLAND_STERN\n"));
        assert!(text.contains("EFIELD_KP         5.0"));
    }

    #[test]
    fn only_selected_model_parameters_emitted() {
        let mut cfg = RunConfiguration::default();
        cfg.field.model = FieldModelKind::T01.default_model();
        let text = render(&cfg);
        assert!(text.contains("T01_G1"));
        assert!(!text.contains("TS05_W1"));
    }

    #[test]
    fn free_text_cannot_inject_comments() {
        let mut cfg = RunConfiguration::default();
        cfg.run.description = "big storm! really\nbig".into();
        let text = render(&cfg);
        assert!(text.contains("DESCRIPTION       big storm  really big\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let cfg = RunConfiguration::default();
        assert_eq!(render(&cfg), render(&cfg));
    }
}
