//! Run configuration schema.
//!
//! One record per wizard session. Every selectable mode is a tagged union
//! whose variants carry exactly the fields that mode needs.

use amps_physics::{IonSpecies, SpectrumModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfiguration {
    pub run: RunInfo,
    pub particle: ParticleDef,
    pub field: BackgroundFieldDef,
    pub boundary: BoundaryDef,
    #[serde(default)]
    pub efield: ElectricFieldModel,
    pub temporal: TemporalMode,
    pub spectrum: SpectrumDef,
    pub output: OutputDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunInfo {
    pub run_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpeciesPreset {
    Proton,
    Helium,
    Electron,
    Oxygen,
    Custom,
}

impl SpeciesPreset {
    pub const ALL: [SpeciesPreset; 5] = [
        SpeciesPreset::Proton,
        SpeciesPreset::Helium,
        SpeciesPreset::Electron,
        SpeciesPreset::Oxygen,
        SpeciesPreset::Custom,
    ];

    /// Charge and mass of the preset; `None` for `Custom`.
    pub fn ion(self) -> Option<IonSpecies> {
        match self {
            SpeciesPreset::Proton => Some(IonSpecies::new(1, 1.0073)),
            SpeciesPreset::Helium => Some(IonSpecies::new(2, 4.0026)),
            SpeciesPreset::Electron => Some(IonSpecies::new(-1, 0.000549)),
            SpeciesPreset::Oxygen => Some(IonSpecies::new(8, 15.999)),
            SpeciesPreset::Custom => None,
        }
    }

    /// Preset whose charge and mass equal `ion`, if any.
    pub fn matching(ion: IonSpecies) -> SpeciesPreset {
        SpeciesPreset::ALL
            .into_iter()
            .find(|p| p.ion() == Some(ion))
            .unwrap_or(SpeciesPreset::Custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleDef {
    pub species: SpeciesPreset,
    pub charge: i32,
    pub mass_amu: f64,
}

impl ParticleDef {
    pub fn ion(&self) -> IonSpecies {
        IonSpecies::new(self.charge, self.mass_amu)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldEvaluation {
    /// Field models evaluated analytically at each particle position.
    Gridless,
    /// Field interpolated from a precomputed grid.
    Gridded,
}

/// Solar-wind and IMF drivers shared by the empirical field models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolarWindDrivers {
    pub dst_nt: f64,
    pub pdyn_npa: f64,
    pub bz_nt: f64,
    pub by_nt: f64,
    pub bx_nt: f64,
    pub vx_kmps: f64,
    pub nsw_cc: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MhdSource {
    Swmf,
    Lfm,
    Gamera,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FieldModel {
    Dipole,
    Igrf,
    T89 { kp: f64 },
    T96,
    T01 { g1: f64, g2: f64 },
    Ts05 { w: [f64; 6] },
    Ta15 { n_index: f64, b_index: f64 },
    Mhd { source: MhdSource, run_id: String },
}

/// Field model choice without its parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldModelKind {
    Dipole,
    Igrf,
    T89,
    T96,
    T01,
    Ts05,
    Ta15,
    Mhd,
}

impl FieldModelKind {
    pub const ALL: [FieldModelKind; 8] = [
        FieldModelKind::Dipole,
        FieldModelKind::Igrf,
        FieldModelKind::T89,
        FieldModelKind::T96,
        FieldModelKind::T01,
        FieldModelKind::Ts05,
        FieldModelKind::Ta15,
        FieldModelKind::Mhd,
    ];

    /// MHD output only exists on a grid.
    pub fn requires_grid(self) -> bool {
        matches!(self, FieldModelKind::Mhd)
    }

    /// Model with its parameters at storm-case defaults.
    pub fn default_model(self) -> FieldModel {
        match self {
            FieldModelKind::Dipole => FieldModel::Dipole,
            FieldModelKind::Igrf => FieldModel::Igrf,
            FieldModelKind::T89 => FieldModel::T89 { kp: 7.0 },
            FieldModelKind::T96 => FieldModel::T96,
            FieldModelKind::T01 => FieldModel::T01 { g1: 6.0, g2: 12.0 },
            FieldModelKind::Ts05 => FieldModel::Ts05 {
                w: [0.8, 0.6, 1.2, 0.5, 0.4, 1.0],
            },
            FieldModelKind::Ta15 => FieldModel::Ta15 {
                n_index: 1.2,
                b_index: 1.5,
            },
            FieldModelKind::Mhd => FieldModel::Mhd {
                source: MhdSource::Swmf,
                run_id: String::new(),
            },
        }
    }
}

impl FieldModel {
    pub fn kind(&self) -> FieldModelKind {
        match self {
            FieldModel::Dipole => FieldModelKind::Dipole,
            FieldModel::Igrf => FieldModelKind::Igrf,
            FieldModel::T89 { .. } => FieldModelKind::T89,
            FieldModel::T96 => FieldModelKind::T96,
            FieldModel::T01 { .. } => FieldModelKind::T01,
            FieldModel::Ts05 { .. } => FieldModelKind::Ts05,
            FieldModel::Ta15 { .. } => FieldModelKind::Ta15,
            FieldModel::Mhd { .. } => FieldModelKind::Mhd,
        }
    }

    /// Whether the model consumes the solar-wind driver scalars.
    pub fn uses_drivers(&self) -> bool {
        !matches!(
            self,
            FieldModel::Dipole | FieldModel::Igrf | FieldModel::T89 { .. } | FieldModel::Mhd { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundFieldDef {
    pub evaluation: FieldEvaluation,
    pub model: FieldModel,
    pub drivers: SolarWindDrivers,
    pub epoch: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ShueMode {
    /// r0 and alpha follow the current Bz and Pdyn.
    Auto,
    Manual { r0_re: f64, alpha: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum OuterBoundary {
    Box {
        x_min_re: f64,
        x_max_re: f64,
        y_min_re: f64,
        y_max_re: f64,
        z_min_re: f64,
        z_max_re: f64,
    },
    Shue { mode: ShueMode, x_tail_re: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OuterBoundaryKind {
    Box,
    Shue,
}

impl OuterBoundaryKind {
    pub fn default_boundary(self) -> OuterBoundary {
        match self {
            OuterBoundaryKind::Box => OuterBoundary::Box {
                x_min_re: -60.0,
                x_max_re: 15.0,
                y_min_re: -30.0,
                y_max_re: 30.0,
                z_min_re: -30.0,
                z_max_re: 30.0,
            },
            OuterBoundaryKind::Shue => OuterBoundary::Shue {
                mode: ShueMode::Auto,
                x_tail_re: -60.0,
            },
        }
    }
}

impl OuterBoundary {
    pub fn kind(&self) -> OuterBoundaryKind {
        match self {
            OuterBoundary::Box { .. } => OuterBoundaryKind::Box,
            OuterBoundary::Shue { .. } => OuterBoundaryKind::Shue,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub outer: OuterBoundary,
    pub inner_radius_re: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum ElectricFieldModel {
    #[default]
    None,
    Corotation,
    VollandStern { kp: f64 },
    Weimer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ElectricFieldKind {
    None,
    Corotation,
    VollandStern,
    Weimer,
}

impl ElectricFieldKind {
    pub fn default_model(self) -> ElectricFieldModel {
        match self {
            ElectricFieldKind::None => ElectricFieldModel::None,
            ElectricFieldKind::Corotation => ElectricFieldModel::Corotation,
            ElectricFieldKind::VollandStern => ElectricFieldModel::VollandStern { kp: 7.0 },
            ElectricFieldKind::Weimer => ElectricFieldModel::Weimer,
        }
    }
}

impl ElectricFieldModel {
    pub fn kind(&self) -> ElectricFieldKind {
        match self {
            ElectricFieldModel::None => ElectricFieldKind::None,
            ElectricFieldModel::Corotation => ElectricFieldKind::Corotation,
            ElectricFieldModel::VollandStern { .. } => ElectricFieldKind::VollandStern,
            ElectricFieldModel::Weimer => ElectricFieldKind::Weimer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DriverSource {
    Omniweb,
    File { path: String },
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TemporalMode {
    /// Fields frozen at the background-field epoch.
    Static,
    TimeSeries {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        field_update_cadence_min: f64,
        inject_cadence_min: f64,
        driver_source: DriverSource,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TemporalKind {
    Static,
    TimeSeries,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpectrumKind {
    PowerLaw,
    PowerLawCutoff,
    Band,
    ForceField,
    Table,
}

impl SpectrumKind {
    pub fn default_model(self) -> SpectrumModel {
        match self {
            SpectrumKind::PowerLaw => SpectrumModel::PowerLaw {
                j0: 1e4,
                gamma: 3.0,
                e0_mev: 10.0,
            },
            SpectrumKind::PowerLawCutoff => SpectrumModel::PowerLawCutoff {
                j0: 1e4,
                gamma: 2.0,
                e0_mev: 10.0,
                e_cut_mev: 100.0,
            },
            SpectrumKind::Band => SpectrumModel::Band {
                j0: 1e4,
                gamma_a: 1.5,
                gamma_b: 3.5,
                e0_mev: 20.0,
                e_ref_mev: 1.0,
            },
            SpectrumKind::ForceField => SpectrumModel::ForceField { phi_mv: 550.0 },
            SpectrumKind::Table => SpectrumModel::Table {
                path: String::new(),
            },
        }
    }

    pub fn of(model: &SpectrumModel) -> SpectrumKind {
        match model {
            SpectrumModel::PowerLaw { .. } => SpectrumKind::PowerLaw,
            SpectrumModel::PowerLawCutoff { .. } => SpectrumKind::PowerLawCutoff,
            SpectrumModel::Band { .. } => SpectrumKind::Band,
            SpectrumModel::ForceField { .. } => SpectrumKind::ForceField,
            SpectrumModel::Table { .. } => SpectrumKind::Table,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrumDef {
    pub model: SpectrumModel,
    pub e_min_mev: f64,
    pub e_max_mev: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum OutputDomain {
    Shells {
        altitudes_km: Vec<f64>,
        resolution_deg: f64,
    },
    Points {
        positions_re: Vec<[f64; 3]>,
    },
    Trajectory {
        path: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputDomainKind {
    Shells,
    Points,
    Trajectory,
}

impl OutputDomainKind {
    pub fn default_domain(self) -> OutputDomain {
        match self {
            OutputDomainKind::Shells => OutputDomain::Shells {
                altitudes_km: vec![500.0],
                resolution_deg: 5.0,
            },
            OutputDomainKind::Points => OutputDomain::Points {
                positions_re: vec![[6.6, 0.0, 0.0]],
            },
            OutputDomainKind::Trajectory => OutputDomain::Trajectory {
                path: String::new(),
            },
        }
    }
}

impl OutputDomain {
    pub fn kind(&self) -> OutputDomainKind {
        match self {
            OutputDomain::Shells { .. } => OutputDomainKind::Shells,
            OutputDomain::Points { .. } => OutputDomainKind::Points,
            OutputDomain::Trajectory { .. } => OutputDomainKind::Trajectory,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FluxKind {
    Differential,
    Integral,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Tecplot,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputDef {
    pub domain: OutputDomain,
    pub flux_kind: FluxKind,
    pub format: OutputFormat,
    #[serde(default)]
    pub cutoff_rigidity: bool,
    pub energy_bins: usize,
}
