//! Wizard session: the configuration, the current step and a reducer
//! applying typed edits to them.
//!
//! Every edit goes through [`WizardSession::apply`], which updates the
//! record, propagates cross-step constraints and recomputes the derived
//! values. Invalid input never reaches the record.

use std::fmt;

use amps_config::{
    CheckReport, DerivedValues, DriverSource, ElectricFieldKind, ElectricFieldModel,
    FieldEvaluation, FieldId, FieldModel, FieldModelKind, FluxKind, MhdSource, OuterBoundary,
    OuterBoundaryKind, OutputDomain, OutputDomainKind, OutputFormat, RunConfiguration,
    SessionSnapshot, ShueMode, SpeciesPreset, SpectrumKind, TemporalKind, TemporalMode,
    WizardStep, check_config,
};
use amps_physics::SpectrumModel;
use chrono::{DateTime, Utc};

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Raw text typed into a numeric field.
    SetScalar { field: FieldId, input: String },
    SetRunName(String),
    SetDescription(String),
    SetContactEmail(Option<String>),
    SelectSpecies(SpeciesPreset),
    SetEvaluation(FieldEvaluation),
    SelectFieldModel(FieldModelKind),
    SetMhdSource(MhdSource),
    SetMhdRunId(String),
    SetEpoch(DateTime<Utc>),
    SelectBoundary(OuterBoundaryKind),
    /// Switch the Shue boundary between Auto and Manual.
    SetShueManual(bool),
    SelectElectricField(ElectricFieldKind),
    SelectTemporal(TemporalKind),
    SetTimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    SetDriverSource(DriverSource),
    SelectSpectrum(SpectrumKind),
    SetSpectrumFile(String),
    SelectOutputDomain(OutputDomainKind),
    /// Comma or whitespace separated shell altitudes in km.
    SetShellAltitudes(String),
    SetPoints(Vec<[f64; 3]>),
    SetTrajectoryFile(String),
    SetFluxKind(FluxKind),
    SetOutputFormat(OutputFormat),
    SetCutoffRigidity(bool),
}

/// Side effects of an edit on other parts of the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintNote {
    /// Gridless evaluation cannot run an MHD model.
    ModelReplaced {
        from: FieldModelKind,
        to: FieldModelKind,
    },
    /// Gridless evaluation has no electric field.
    ElectricFieldDisabled,
    /// The selected model is grid-only.
    SwitchedToGridded { model: FieldModelKind },
    /// Charge or mass no longer match the previous preset.
    SpeciesReclassified { species: SpeciesPreset },
    /// Manual Shue parameters start from the driver regression.
    ShueSeeded { r0_re: f64, alpha: f64 },
    /// The current step was disabled and the session moved on.
    StepMoved { from: WizardStep, to: WizardStep },
}

impl fmt::Display for ConstraintNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintNote::ModelReplaced { from, to } => write!(
                f,
                "{from:?} requires gridded evaluation; model replaced by {to:?}"
            ),
            ConstraintNote::ElectricFieldDisabled => {
                write!(f, "electric field disabled for gridless evaluation")
            }
            ConstraintNote::SwitchedToGridded { model } => {
                write!(f, "{model:?} is grid-only; evaluation switched to gridded")
            }
            ConstraintNote::SpeciesReclassified { species } => {
                write!(f, "species is now {species:?}")
            }
            ConstraintNote::ShueSeeded { r0_re, alpha } => write!(
                f,
                "manual Shue parameters seeded with r0 = {r0_re:.3} RE, alpha = {alpha:.4}"
            ),
            ConstraintNote::StepMoved { from, to } => {
                write!(f, "step {from:?} is disabled; moved to {to:?}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditStatus {
    Applied,
    /// The edit matched the current state.
    Unchanged,
    /// The edit was refused; the previous value is kept.
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub status: EditStatus,
    pub notes: Vec<ConstraintNote>,
    pub derived: DerivedValues,
}

impl ApplyOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self.status, EditStatus::Rejected { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    config: RunConfiguration,
    step: WizardStep,
    derived: DerivedValues,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new(RunConfiguration::default())
    }
}

impl WizardSession {
    pub fn new(config: RunConfiguration) -> Self {
        let derived = DerivedValues::compute(&config);
        Self {
            config,
            step: WizardStep::default(),
            derived,
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let mut session = Self::new(snapshot.config);
        session.step = snapshot.step;
        session.settle_step(&mut Vec::new());
        session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            step: self.step,
            ..SessionSnapshot::new(self.config.clone())
        }
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    pub fn derived(&self) -> &DerivedValues {
        &self.derived
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn check(&self) -> CheckReport {
        check_config(&self.config)
    }

    pub fn is_step_enabled(&self, step: WizardStep) -> bool {
        !(step == WizardStep::ElectricField
            && self.config.field.evaluation == FieldEvaluation::Gridless)
    }

    pub fn enabled_steps(&self) -> Vec<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .filter(|s| self.is_step_enabled(*s))
            .collect()
    }

    /// Advance to the next enabled step. Stays put on the last step.
    pub fn next(&mut self) -> WizardStep {
        if let Some(step) = self
            .enabled_steps()
            .into_iter()
            .find(|s| s.index() > self.step.index())
        {
            self.step = step;
        }
        self.step
    }

    /// Return to the previous enabled step. Stays put on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(step) = self
            .enabled_steps()
            .into_iter()
            .rev()
            .find(|s| s.index() < self.step.index())
        {
            self.step = step;
        }
        self.step
    }

    /// Jump to `step` if it is enabled.
    pub fn go_to(&mut self, step: WizardStep) -> bool {
        if self.is_step_enabled(step) {
            self.step = step;
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, edit: Edit) -> ApplyOutcome {
        let before = self.config.clone();
        let mut notes = Vec::new();

        let status = match self.reduce(edit, &mut notes) {
            Ok(()) if self.config == before => EditStatus::Unchanged,
            Ok(()) => EditStatus::Applied,
            Err(reason) => {
                tracing::debug!(%reason, "edit rejected");
                self.config = before;
                notes.clear();
                EditStatus::Rejected { reason }
            }
        };

        if status == EditStatus::Applied {
            self.propagate(&mut notes);
            self.derived = DerivedValues::compute(&self.config);
        }
        self.settle_step(&mut notes);

        for note in &notes {
            tracing::info!(%note, "constraint applied");
        }

        ApplyOutcome {
            status,
            notes,
            derived: self.derived.clone(),
        }
    }

    fn reduce(&mut self, edit: Edit, notes: &mut Vec<ConstraintNote>) -> Result<(), String> {
        let cfg = &mut self.config;
        match edit {
            Edit::SetScalar { field, input } => {
                let value = field.parse_input(&input).map_err(|e| e.to_string())?;
                cfg.set_scalar(field, value).map_err(|e| e.to_string())?;
                if matches!(field, FieldId::Charge | FieldId::Mass) {
                    let species = SpeciesPreset::matching(cfg.particle.ion());
                    if species != cfg.particle.species {
                        cfg.particle.species = species;
                        notes.push(ConstraintNote::SpeciesReclassified { species });
                    }
                }
            }
            Edit::SetRunName(name) => cfg.run.run_name = name.trim().to_string(),
            Edit::SetDescription(text) => cfg.run.description = text,
            Edit::SetContactEmail(email) => {
                cfg.run.contact_email = email
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty());
            }
            Edit::SelectSpecies(species) => {
                cfg.particle.species = species;
                if let Some(ion) = species.ion() {
                    cfg.particle.charge = ion.charge;
                    cfg.particle.mass_amu = ion.mass_amu;
                }
            }
            Edit::SetEvaluation(evaluation) => cfg.field.evaluation = evaluation,
            Edit::SelectFieldModel(kind) => {
                if cfg.field.model.kind() != kind {
                    cfg.field.model = kind.default_model();
                }
                if kind.requires_grid() && cfg.field.evaluation == FieldEvaluation::Gridless {
                    cfg.field.evaluation = FieldEvaluation::Gridded;
                    notes.push(ConstraintNote::SwitchedToGridded { model: kind });
                }
            }
            Edit::SetMhdSource(new_source) => match &mut cfg.field.model {
                FieldModel::Mhd { source, .. } => *source = new_source,
                _ => return Err("MHD source requires an MHD field model".to_string()),
            },
            Edit::SetMhdRunId(new_id) => match &mut cfg.field.model {
                FieldModel::Mhd { run_id, .. } => *run_id = new_id.trim().to_string(),
                _ => return Err("MHD run id requires an MHD field model".to_string()),
            },
            Edit::SetEpoch(epoch) => cfg.field.epoch = epoch,
            Edit::SelectBoundary(kind) => {
                if cfg.boundary.outer.kind() != kind {
                    cfg.boundary.outer = kind.default_boundary();
                }
            }
            Edit::SetShueManual(manual) => {
                let seed = self.derived.shue_from_drivers;
                let OuterBoundary::Shue { mode, .. } = &mut cfg.boundary.outer else {
                    return Err("Shue mode requires a Shue outer boundary".to_string());
                };
                match (manual, &*mode) {
                    (true, ShueMode::Auto) => {
                        *mode = ShueMode::Manual {
                            r0_re: seed.r0_re,
                            alpha: seed.alpha,
                        };
                        notes.push(ConstraintNote::ShueSeeded {
                            r0_re: seed.r0_re,
                            alpha: seed.alpha,
                        });
                    }
                    (false, ShueMode::Manual { .. }) => *mode = ShueMode::Auto,
                    _ => {}
                }
            }
            Edit::SelectElectricField(kind) => {
                if cfg.field.evaluation == FieldEvaluation::Gridless
                    && kind != ElectricFieldKind::None
                {
                    return Err("electric field models need gridded evaluation".to_string());
                }
                if cfg.efield.kind() != kind {
                    cfg.efield = kind.default_model();
                }
            }
            Edit::SelectTemporal(kind) => {
                if cfg.temporal.kind() != kind {
                    cfg.temporal = kind.default_mode();
                }
            }
            Edit::SetTimeWindow {
                start: new_start,
                end: new_end,
            } => match &mut cfg.temporal {
                TemporalMode::TimeSeries { start, end, .. } => {
                    *start = new_start;
                    *end = new_end;
                }
                TemporalMode::Static => {
                    return Err("time window requires time-series mode".to_string());
                }
            },
            Edit::SetDriverSource(new_source) => match &mut cfg.temporal {
                TemporalMode::TimeSeries { driver_source, .. } => *driver_source = new_source,
                TemporalMode::Static => {
                    return Err("driver source requires time-series mode".to_string());
                }
            },
            Edit::SelectSpectrum(kind) => {
                if SpectrumKind::of(&cfg.spectrum.model) != kind {
                    cfg.spectrum.model = kind.default_model();
                }
            }
            Edit::SetSpectrumFile(new_path) => match &mut cfg.spectrum.model {
                SpectrumModel::Table { path } => *path = new_path.trim().to_string(),
                _ => return Err("spectrum file requires a table spectrum".to_string()),
            },
            Edit::SelectOutputDomain(kind) => {
                if cfg.output.domain.kind() != kind {
                    cfg.output.domain = kind.default_domain();
                }
            }
            Edit::SetShellAltitudes(input) => {
                let parsed = parse_altitudes(&input)?;
                match &mut cfg.output.domain {
                    OutputDomain::Shells { altitudes_km, .. } => *altitudes_km = parsed,
                    _ => return Err("shell altitudes require the shell output domain".to_string()),
                }
            }
            Edit::SetPoints(points) => {
                if points.iter().flatten().any(|v| !v.is_finite()) {
                    return Err("point coordinates must be finite".to_string());
                }
                match &mut cfg.output.domain {
                    OutputDomain::Points { positions_re } => *positions_re = points,
                    _ => return Err("points require the point output domain".to_string()),
                }
            }
            Edit::SetTrajectoryFile(new_path) => match &mut cfg.output.domain {
                OutputDomain::Trajectory { path } => *path = new_path.trim().to_string(),
                _ => return Err("trajectory file requires the trajectory domain".to_string()),
            },
            Edit::SetFluxKind(kind) => cfg.output.flux_kind = kind,
            Edit::SetOutputFormat(format) => cfg.output.format = format,
            Edit::SetCutoffRigidity(on) => cfg.output.cutoff_rigidity = on,
        }
        Ok(())
    }

    /// Restore cross-step consistency after an edit.
    fn propagate(&mut self, notes: &mut Vec<ConstraintNote>) {
        let cfg = &mut self.config;
        let model = cfg.field.model.kind();

        match cfg.field.evaluation {
            FieldEvaluation::Gridless => {
                if model.requires_grid() {
                    let replacement = FieldModelKind::Ts05;
                    cfg.field.model = replacement.default_model();
                    notes.push(ConstraintNote::ModelReplaced {
                        from: model,
                        to: replacement,
                    });
                }
                if cfg.efield != ElectricFieldModel::None {
                    cfg.efield = ElectricFieldModel::None;
                    notes.push(ConstraintNote::ElectricFieldDisabled);
                }
            }
            FieldEvaluation::Gridded => {}
        }
    }

    /// Move off the current step if it has become disabled.
    fn settle_step(&mut self, notes: &mut Vec<ConstraintNote>) {
        if self.is_step_enabled(self.step) {
            return;
        }
        let from = self.step;
        self.next();
        notes.push(ConstraintNote::StepMoved {
            from,
            to: self.step,
        });
    }
}

fn parse_altitudes(input: &str) -> Result<Vec<f64>, String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| match t.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(format!("cannot parse '{t}' as an altitude")),
        })
        .collect()
}
