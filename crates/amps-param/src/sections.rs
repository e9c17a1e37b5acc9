//! Section names and selector keywords shared by the renderer and importer.

use amps_config::{
    ElectricFieldKind, FieldEvaluation, FieldModelKind, FluxKind, MhdSource, OutputDomainKind,
    OutputFormat, OuterBoundaryKind, SpectrumKind, SpeciesPreset, TemporalKind, WizardStep,
};

pub const RUN: &str = "RUN";
pub const PARTICLE: &str = "PARTICLE";
pub const BACKGROUND_FIELD: &str = "BACKGROUND_FIELD";
pub const BOUNDARY: &str = "BOUNDARY";
pub const ELECTRIC_FIELD: &str = "ELECTRIC_FIELD";
pub const TEMPORAL: &str = "TEMPORAL";
pub const SPECTRUM: &str = "SPECTRUM";
pub const OUTPUT: &str = "OUTPUT";
pub const END: &str = "END";

/// Section holding the fields of `step`; `None` for the review step.
pub fn for_step(step: WizardStep) -> Option<&'static str> {
    match step {
        WizardStep::RunInfo => Some(RUN),
        WizardStep::Particle => Some(PARTICLE),
        WizardStep::BackgroundField => Some(BACKGROUND_FIELD),
        WizardStep::Boundary => Some(BOUNDARY),
        WizardStep::ElectricField => Some(ELECTRIC_FIELD),
        WizardStep::Temporal => Some(TEMPORAL),
        WizardStep::Spectrum => Some(SPECTRUM),
        WizardStep::Output => Some(OUTPUT),
        WizardStep::Review => None,
    }
}

/// Bidirectional keyword table for a fieldless selector enum.
pub trait Keyword: Sized + Copy + PartialEq + 'static {
    const TABLE: &'static [(Self, &'static str)];

    fn keyword(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(v, _)| *v == self)
            .map(|(_, k)| *k)
            .unwrap_or("UNKNOWN")
    }

    fn from_keyword(word: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, k)| k.eq_ignore_ascii_case(word.trim()))
            .map(|(v, _)| *v)
    }
}

impl Keyword for SpeciesPreset {
    const TABLE: &'static [(Self, &'static str)] = &[
        (SpeciesPreset::Proton, "PROTON"),
        (SpeciesPreset::Helium, "HELIUM"),
        (SpeciesPreset::Electron, "ELECTRON"),
        (SpeciesPreset::Oxygen, "OXYGEN"),
        (SpeciesPreset::Custom, "CUSTOM"),
    ];
}

impl Keyword for FieldEvaluation {
    const TABLE: &'static [(Self, &'static str)] = &[
        (FieldEvaluation::Gridless, "GRIDLESS"),
        (FieldEvaluation::Gridded, "GRIDDED"),
    ];
}

impl Keyword for FieldModelKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (FieldModelKind::Dipole, "DIPOLE"),
        (FieldModelKind::Igrf, "IGRF"),
        (FieldModelKind::T89, "T89"),
        (FieldModelKind::T96, "T96"),
        (FieldModelKind::T01, "T01"),
        (FieldModelKind::Ts05, "TS05"),
        (FieldModelKind::Ta15, "TA15"),
        (FieldModelKind::Mhd, "MHD"),
    ];
}

impl Keyword for MhdSource {
    const TABLE: &'static [(Self, &'static str)] = &[
        (MhdSource::Swmf, "SWMF"),
        (MhdSource::Lfm, "LFM"),
        (MhdSource::Gamera, "GAMERA"),
    ];
}

impl Keyword for OuterBoundaryKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (OuterBoundaryKind::Box, "BOX"),
        (OuterBoundaryKind::Shue, "SHUE"),
    ];
}

impl Keyword for ElectricFieldKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (ElectricFieldKind::None, "NONE"),
        (ElectricFieldKind::Corotation, "COROTATION"),
        (ElectricFieldKind::VollandStern, "VOLLAND_STERN"),
        (ElectricFieldKind::Weimer, "WEIMER"),
    ];
}

impl Keyword for TemporalKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (TemporalKind::Static, "STATIC"),
        (TemporalKind::TimeSeries, "TIME_SERIES"),
    ];
}

impl Keyword for SpectrumKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (SpectrumKind::PowerLaw, "POWER_LAW"),
        (SpectrumKind::PowerLawCutoff, "POWER_LAW_CUTOFF"),
        (SpectrumKind::Band, "BAND"),
        (SpectrumKind::ForceField, "FORCE_FIELD"),
        (SpectrumKind::Table, "TABLE"),
    ];
}

impl Keyword for OutputDomainKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (OutputDomainKind::Shells, "SHELLS"),
        (OutputDomainKind::Points, "POINTS"),
        (OutputDomainKind::Trajectory, "TRAJECTORY"),
    ];
}

impl Keyword for FluxKind {
    const TABLE: &'static [(Self, &'static str)] = &[
        (FluxKind::Differential, "DIFFERENTIAL"),
        (FluxKind::Integral, "INTEGRAL"),
    ];
}

impl Keyword for OutputFormat {
    const TABLE: &'static [(Self, &'static str)] = &[
        (OutputFormat::Tecplot, "TECPLOT"),
        (OutputFormat::Csv, "CSV"),
    ];
}
