//! Typed registry of the numeric fields of a [`RunConfiguration`].
//!
//! Each [`FieldId`] knows its param-file key, display unit, printing
//! precision and the ranges the checks apply. Fields that belong to a
//! variant other than the selected one are inactive: reading them yields
//! `None` and writing them fails with [`FieldError::Inactive`].

use amps_core::{Tolerances, nearly_equal};
use amps_physics::SpectrumModel;
use std::ops::RangeInclusive;

use crate::schema::*;
use crate::step::WizardStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Charge,
    Mass,
    Dst,
    Pdyn,
    Bz,
    By,
    Bx,
    Vx,
    Nsw,
    T89Kp,
    T01G1,
    T01G2,
    Ts05W1,
    Ts05W2,
    Ts05W3,
    Ts05W4,
    Ts05W5,
    Ts05W6,
    Ta15N,
    Ta15B,
    BoxXMin,
    BoxXMax,
    BoxYMin,
    BoxYMax,
    BoxZMin,
    BoxZMax,
    ShueR0,
    ShueAlpha,
    XTail,
    InnerRadius,
    EfieldKp,
    FieldCadence,
    InjectCadence,
    J0,
    Gamma,
    E0,
    ECut,
    GammaA,
    GammaB,
    ERef,
    Phi,
    EMin,
    EMax,
    ShellResolution,
    EnergyBins,
}

/// How a field value is printed into the param file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Fixed-point with the given number of decimals.
    Fixed(usize),
    /// Scientific notation with the given number of mantissa decimals.
    Scientific(usize),
}

impl NumberFormat {
    pub fn format(self, v: f64) -> String {
        match self {
            NumberFormat::Fixed(d) => format!("{v:.d$}"),
            NumberFormat::Scientific(d) => format!("{v:.d$e}"),
        }
    }

    /// Tolerance within which a printed and re-read value matches the original.
    pub fn tolerance(self) -> Tolerances {
        match self {
            NumberFormat::Fixed(d) => Tolerances::for_decimals(d),
            NumberFormat::Scientific(d) => Tolerances {
                abs: 0.0,
                rel: 0.5 * 10f64.powi(-(d as i32)) * (1.0 + 1e-9),
            },
        }
    }

    pub fn matches(self, original: f64, reread: f64) -> bool {
        nearly_equal(original, reread, self.tolerance())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub step: WizardStep,
    pub format: NumberFormat,
    /// Values outside this range block submission.
    pub hard: RangeInclusive<f64>,
    /// Values outside this range are flagged but accepted.
    pub advisory: Option<RangeInclusive<f64>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field {key} is not used by the current selection")]
    Inactive { key: &'static str },

    #[error("Field {key} needs a finite number, got {value}")]
    NonFinite { key: &'static str, value: f64 },

    #[error("Field {key} needs a whole number, got {value}")]
    NotInteger { key: &'static str, value: f64 },

    #[error("Cannot parse '{input}' as a number for {key}")]
    Parse { key: &'static str, input: String },

    #[error("Field {key} must lie within {min} to {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

macro_rules! spec {
    ($key:literal, $label:literal, $unit:literal, $step:ident, $fmt:expr, $hard:expr) => {
        spec!($key, $label, $unit, $step, $fmt, $hard, None)
    };
    (
        $key:literal, $label:literal, $unit:literal, $step:ident, $fmt:expr, $hard:expr, $adv:expr
    ) => {
        FieldSpec {
            key: $key,
            label: $label,
            unit: $unit,
            step: WizardStep::$step,
            format: $fmt,
            hard: $hard,
            advisory: $adv,
        }
    };
}

impl FieldId {
    pub const ALL: [FieldId; 45] = [
        FieldId::Charge,
        FieldId::Mass,
        FieldId::Dst,
        FieldId::Pdyn,
        FieldId::Bz,
        FieldId::By,
        FieldId::Bx,
        FieldId::Vx,
        FieldId::Nsw,
        FieldId::T89Kp,
        FieldId::T01G1,
        FieldId::T01G2,
        FieldId::Ts05W1,
        FieldId::Ts05W2,
        FieldId::Ts05W3,
        FieldId::Ts05W4,
        FieldId::Ts05W5,
        FieldId::Ts05W6,
        FieldId::Ta15N,
        FieldId::Ta15B,
        FieldId::BoxXMin,
        FieldId::BoxXMax,
        FieldId::BoxYMin,
        FieldId::BoxYMax,
        FieldId::BoxZMin,
        FieldId::BoxZMax,
        FieldId::ShueR0,
        FieldId::ShueAlpha,
        FieldId::XTail,
        FieldId::InnerRadius,
        FieldId::EfieldKp,
        FieldId::FieldCadence,
        FieldId::InjectCadence,
        FieldId::J0,
        FieldId::Gamma,
        FieldId::E0,
        FieldId::ECut,
        FieldId::GammaA,
        FieldId::GammaB,
        FieldId::ERef,
        FieldId::Phi,
        FieldId::EMin,
        FieldId::EMax,
        FieldId::ShellResolution,
        FieldId::EnergyBins,
    ];

    pub fn spec(self) -> FieldSpec {
        use NumberFormat::{Fixed, Scientific};
        match self {
            FieldId::Charge => spec!(
                "CHARGE", "Charge state Z", "e", Particle, Fixed(0), -92.0..=92.0
            ),
            FieldId::Mass => spec!("MASS", "Mass A", "amu", Particle, Fixed(6), 1e-6..=300.0),
            FieldId::Dst => spec!(
                "DST", "Dst", "nT", BackgroundField, Fixed(1), -2000.0..=500.0, Some(-600.0..=50.0)
            ),
            FieldId::Pdyn => spec!(
                "PDYN",
                "Dynamic pressure",
                "nPa",
                BackgroundField,
                Fixed(2),
                0.0..=200.0,
                Some(0.1..=50.0)
            ),
            FieldId::Bz => spec!(
                "IMF_BZ",
                "IMF Bz",
                "nT",
                BackgroundField,
                Fixed(2),
                -500.0..=500.0,
                Some(-100.0..=100.0)
            ),
            FieldId::By => spec!(
                "IMF_BY",
                "IMF By",
                "nT",
                BackgroundField,
                Fixed(2),
                -500.0..=500.0,
                Some(-100.0..=100.0)
            ),
            FieldId::Bx => spec!(
                "IMF_BX",
                "IMF Bx",
                "nT",
                BackgroundField,
                Fixed(2),
                -500.0..=500.0,
                Some(-100.0..=100.0)
            ),
            FieldId::Vx => spec!(
                "SW_VX",
                "Solar wind Vx",
                "km/s",
                BackgroundField,
                Fixed(1),
                -3000.0..=3000.0,
                Some(-1500.0..=-200.0)
            ),
            FieldId::Nsw => spec!(
                "SW_N",
                "Solar wind density",
                "cm^-3",
                BackgroundField,
                Fixed(2),
                0.0..=1000.0,
                Some(0.1..=100.0)
            ),
            FieldId::T89Kp => spec!(
                "KP", "Kp index", "", BackgroundField, Fixed(1), -5.0..=15.0, Some(0.0..=9.0)
            ),
            FieldId::T01G1 => spec!("T01_G1", "T01 G1", "", BackgroundField, Fixed(2), 0.0..=100.0),
            FieldId::T01G2 => spec!("T01_G2", "T01 G2", "", BackgroundField, Fixed(2), 0.0..=100.0),
            FieldId::Ts05W1 => spec!(
                "TS05_W1", "TS05 W1", "", BackgroundField, Fixed(3), 0.0..=50.0
            ),
            FieldId::Ts05W2 => spec!(
                "TS05_W2", "TS05 W2", "", BackgroundField, Fixed(3), 0.0..=50.0
            ),
            FieldId::Ts05W3 => spec!(
                "TS05_W3", "TS05 W3", "", BackgroundField, Fixed(3), 0.0..=50.0
            ),
            FieldId::Ts05W4 => spec!(
                "TS05_W4", "TS05 W4", "", BackgroundField, Fixed(3), 0.0..=50.0
            ),
            FieldId::Ts05W5 => spec!(
                "TS05_W5", "TS05 W5", "", BackgroundField, Fixed(3), 0.0..=50.0
            ),
            FieldId::Ts05W6 => spec!(
                "TS05_W6", "TS05 W6", "", BackgroundField, Fixed(3), 0.0..=50.0
            ),
            FieldId::Ta15N => spec!(
                "TA15_N", "TA15 N-index", "", BackgroundField, Fixed(3), 0.0..=10.0
            ),
            FieldId::Ta15B => spec!(
                "TA15_B", "TA15 B-index", "", BackgroundField, Fixed(3), 0.0..=10.0
            ),
            FieldId::BoxXMin => spec!(
                "BOX_XMIN", "Box x min", "RE", Boundary, Fixed(2), -500.0..=500.0
            ),
            FieldId::BoxXMax => spec!(
                "BOX_XMAX", "Box x max", "RE", Boundary, Fixed(2), -500.0..=500.0
            ),
            FieldId::BoxYMin => spec!(
                "BOX_YMIN", "Box y min", "RE", Boundary, Fixed(2), -500.0..=500.0
            ),
            FieldId::BoxYMax => spec!(
                "BOX_YMAX", "Box y max", "RE", Boundary, Fixed(2), -500.0..=500.0
            ),
            FieldId::BoxZMin => spec!(
                "BOX_ZMIN", "Box z min", "RE", Boundary, Fixed(2), -500.0..=500.0
            ),
            FieldId::BoxZMax => spec!(
                "BOX_ZMAX", "Box z max", "RE", Boundary, Fixed(2), -500.0..=500.0
            ),
            FieldId::ShueR0 => spec!(
                "SHUE_R0",
                "Standoff distance r0",
                "RE",
                Boundary,
                Fixed(3),
                1.0..=50.0,
                Some(4.0..=15.0)
            ),
            FieldId::ShueAlpha => spec!(
                "SHUE_ALPHA", "Flaring exponent", "", Boundary, Fixed(4), 0.0..=2.0, Some(0.3..=0.9)
            ),
            FieldId::XTail => spec!(
                "X_TAIL", "Tail cut", "RE", Boundary, Fixed(1), -500.0..=0.0, Some(-200.0..=-10.0)
            ),
            FieldId::InnerRadius => spec!(
                "R_INNER", "Inner boundary", "RE", Boundary, Fixed(3), 1.0..=10.0
            ),
            FieldId::EfieldKp => spec!(
                "EFIELD_KP",
                "Volland-Stern Kp",
                "",
                ElectricField,
                Fixed(1),
                -5.0..=15.0,
                Some(0.0..=9.0)
            ),
            FieldId::FieldCadence => spec!(
                "FIELD_UPDATE_DT", "Field update cadence", "min", Temporal, Fixed(2), 0.01..=1440.0
            ),
            FieldId::InjectCadence => spec!(
                "INJECT_DT", "Injection cadence", "min", Temporal, Fixed(2), 0.01..=1440.0
            ),
            FieldId::J0 => spec!(
                "J0", "Flux normalisation", "", Spectrum, Scientific(4), 0.0..=1e30
            ),
            FieldId::Gamma => spec!(
                "GAMMA", "Spectral index", "", Spectrum, Fixed(3), -10.0..=20.0, Some(0.5..=8.0)
            ),
            FieldId::E0 => spec!("E0", "Reference energy", "MeV/n", Spectrum, Fixed(3), 1e-6..=1e7),
            FieldId::ECut => spec!(
                "E_CUT", "Cutoff energy", "MeV/n", Spectrum, Fixed(3), 1e-6..=1e7
            ),
            FieldId::GammaA => spec!(
                "GAMMA_A", "Low-energy index", "", Spectrum, Fixed(3), -10.0..=20.0, Some(0.5..=8.0)
            ),
            FieldId::GammaB => spec!(
                "GAMMA_B",
                "High-energy index",
                "",
                Spectrum,
                Fixed(3),
                -10.0..=20.0,
                Some(0.5..=8.0)
            ),
            FieldId::ERef => spec!(
                "E_REF", "Band pivot energy", "MeV/n", Spectrum, Fixed(3), 1e-6..=1e7
            ),
            FieldId::Phi => spec!(
                "PHI",
                "Modulation potential",
                "MV",
                Spectrum,
                Fixed(1),
                0.0..=5000.0,
                Some(200.0..=1500.0)
            ),
            FieldId::EMin => spec!(
                "E_MIN", "Minimum energy", "MeV/n", Spectrum, Fixed(4), 1e-6..=1e7
            ),
            FieldId::EMax => spec!(
                "E_MAX", "Maximum energy", "MeV/n", Spectrum, Fixed(4), 1e-6..=1e7
            ),
            FieldId::ShellResolution => spec!(
                "SHELL_RES", "Shell resolution", "deg", Output, Fixed(2), 0.1..=45.0
            ),
            FieldId::EnergyBins => spec!(
                "N_ENERGY_BINS", "Energy bins", "", Output, Fixed(0), 1.0..=1000.0
            ),
        }
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn from_key(key: &str) -> Option<FieldId> {
        FieldId::ALL
            .into_iter()
            .find(|id| id.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Whole-number fields reject fractional input.
    pub fn is_integer(self) -> bool {
        matches!(self, FieldId::Charge | FieldId::EnergyBins)
    }

    fn ts05_index(self) -> Option<usize> {
        match self {
            FieldId::Ts05W1 => Some(0),
            FieldId::Ts05W2 => Some(1),
            FieldId::Ts05W3 => Some(2),
            FieldId::Ts05W4 => Some(3),
            FieldId::Ts05W5 => Some(4),
            FieldId::Ts05W6 => Some(5),
            _ => None,
        }
    }

    /// Parse raw user input for this field.
    pub fn parse_input(self, input: &str) -> Result<f64, FieldError> {
        let key = self.key();
        let v: f64 = input.trim().parse().map_err(|_| FieldError::Parse {
            key,
            input: input.to_string(),
        })?;
        if !v.is_finite() {
            return Err(FieldError::NonFinite { key, value: v });
        }
        if self.is_integer() && v.fract() != 0.0 {
            return Err(FieldError::NotInteger { key, value: v });
        }
        Ok(v)
    }
}

enum Slot<'a> {
    Real(&'a mut f64),
    Int(&'a mut i32),
    Count(&'a mut usize),
}

impl RunConfiguration {
    /// Current value of `id`, or `None` if the field is inactive.
    pub fn scalar(&self, id: FieldId) -> Option<f64> {
        let d = &self.field.drivers;
        match id {
            FieldId::Charge => Some(self.particle.charge as f64),
            FieldId::Mass => Some(self.particle.mass_amu),
            FieldId::Dst => Some(d.dst_nt),
            FieldId::Pdyn => Some(d.pdyn_npa),
            FieldId::Bz => Some(d.bz_nt),
            FieldId::By => Some(d.by_nt),
            FieldId::Bx => Some(d.bx_nt),
            FieldId::Vx => Some(d.vx_kmps),
            FieldId::Nsw => Some(d.nsw_cc),
            FieldId::InnerRadius => Some(self.boundary.inner_radius_re),
            FieldId::EMin => Some(self.spectrum.e_min_mev),
            FieldId::EMax => Some(self.spectrum.e_max_mev),
            FieldId::EnergyBins => Some(self.output.energy_bins as f64),
            _ => self.variant_scalar(id),
        }
    }

    fn variant_scalar(&self, id: FieldId) -> Option<f64> {
        if let Some(i) = id.ts05_index() {
            return match &self.field.model {
                FieldModel::Ts05 { w } => Some(w[i]),
                _ => None,
            };
        }
        match (id, &self.field.model) {
            (FieldId::T89Kp, FieldModel::T89 { kp }) => return Some(*kp),
            (FieldId::T01G1, FieldModel::T01 { g1, .. }) => return Some(*g1),
            (FieldId::T01G2, FieldModel::T01 { g2, .. }) => return Some(*g2),
            (FieldId::Ta15N, FieldModel::Ta15 { n_index, .. }) => return Some(*n_index),
            (FieldId::Ta15B, FieldModel::Ta15 { b_index, .. }) => return Some(*b_index),
            _ => {}
        }
        match (id, &self.boundary.outer) {
            (
                FieldId::BoxXMin
                | FieldId::BoxXMax
                | FieldId::BoxYMin
                | FieldId::BoxYMax
                | FieldId::BoxZMin
                | FieldId::BoxZMax,
                OuterBoundary::Box {
                    x_min_re,
                    x_max_re,
                    y_min_re,
                    y_max_re,
                    z_min_re,
                    z_max_re,
                },
            ) => {
                return Some(match id {
                    FieldId::BoxXMin => *x_min_re,
                    FieldId::BoxXMax => *x_max_re,
                    FieldId::BoxYMin => *y_min_re,
                    FieldId::BoxYMax => *y_max_re,
                    FieldId::BoxZMin => *z_min_re,
                    _ => *z_max_re,
                });
            }
            (FieldId::XTail, OuterBoundary::Shue { x_tail_re, .. }) => return Some(*x_tail_re),
            (
                FieldId::ShueR0,
                OuterBoundary::Shue {
                    mode: ShueMode::Manual { r0_re, .. },
                    ..
                },
            ) => return Some(*r0_re),
            (
                FieldId::ShueAlpha,
                OuterBoundary::Shue {
                    mode: ShueMode::Manual { alpha, .. },
                    ..
                },
            ) => return Some(*alpha),
            _ => {}
        }
        if let (FieldId::EfieldKp, ElectricFieldModel::VollandStern { kp }) = (id, &self.efield) {
            return Some(*kp);
        }
        if let TemporalMode::TimeSeries {
            field_update_cadence_min,
            inject_cadence_min,
            ..
        } = &self.temporal
        {
            match id {
                FieldId::FieldCadence => return Some(*field_update_cadence_min),
                FieldId::InjectCadence => return Some(*inject_cadence_min),
                _ => {}
            }
        }
        if let (FieldId::ShellResolution, OutputDomain::Shells { resolution_deg, .. }) =
            (id, &self.output.domain)
        {
            return Some(*resolution_deg);
        }
        spectrum_scalar(id, &self.spectrum.model)
    }

    fn slot_mut(&mut self, id: FieldId) -> Option<Slot<'_>> {
        let d = &mut self.field.drivers;
        let slot = match id {
            FieldId::Charge => Slot::Int(&mut self.particle.charge),
            FieldId::Mass => Slot::Real(&mut self.particle.mass_amu),
            FieldId::Dst => Slot::Real(&mut d.dst_nt),
            FieldId::Pdyn => Slot::Real(&mut d.pdyn_npa),
            FieldId::Bz => Slot::Real(&mut d.bz_nt),
            FieldId::By => Slot::Real(&mut d.by_nt),
            FieldId::Bx => Slot::Real(&mut d.bx_nt),
            FieldId::Vx => Slot::Real(&mut d.vx_kmps),
            FieldId::Nsw => Slot::Real(&mut d.nsw_cc),
            FieldId::InnerRadius => Slot::Real(&mut self.boundary.inner_radius_re),
            FieldId::EMin => Slot::Real(&mut self.spectrum.e_min_mev),
            FieldId::EMax => Slot::Real(&mut self.spectrum.e_max_mev),
            FieldId::EnergyBins => Slot::Count(&mut self.output.energy_bins),
            FieldId::Ts05W1
            | FieldId::Ts05W2
            | FieldId::Ts05W3
            | FieldId::Ts05W4
            | FieldId::Ts05W5
            | FieldId::Ts05W6 => match (&mut self.field.model, id.ts05_index()) {
                (FieldModel::Ts05 { w }, Some(i)) => Slot::Real(&mut w[i]),
                _ => return None,
            },
            FieldId::T89Kp => match &mut self.field.model {
                FieldModel::T89 { kp } => Slot::Real(kp),
                _ => return None,
            },
            FieldId::T01G1 | FieldId::T01G2 => match &mut self.field.model {
                FieldModel::T01 { g1, .. } if id == FieldId::T01G1 => Slot::Real(g1),
                FieldModel::T01 { g2, .. } => Slot::Real(g2),
                _ => return None,
            },
            FieldId::Ta15N | FieldId::Ta15B => match &mut self.field.model {
                FieldModel::Ta15 { n_index, .. } if id == FieldId::Ta15N => Slot::Real(n_index),
                FieldModel::Ta15 { b_index, .. } => Slot::Real(b_index),
                _ => return None,
            },
            FieldId::BoxXMin
            | FieldId::BoxXMax
            | FieldId::BoxYMin
            | FieldId::BoxYMax
            | FieldId::BoxZMin
            | FieldId::BoxZMax => match &mut self.boundary.outer {
                OuterBoundary::Box {
                    x_min_re,
                    x_max_re,
                    y_min_re,
                    y_max_re,
                    z_min_re,
                    z_max_re,
                } => Slot::Real(match id {
                    FieldId::BoxXMin => x_min_re,
                    FieldId::BoxXMax => x_max_re,
                    FieldId::BoxYMin => y_min_re,
                    FieldId::BoxYMax => y_max_re,
                    FieldId::BoxZMin => z_min_re,
                    _ => z_max_re,
                }),
                OuterBoundary::Shue { .. } => return None,
            },
            FieldId::XTail => match &mut self.boundary.outer {
                OuterBoundary::Shue { x_tail_re, .. } => Slot::Real(x_tail_re),
                OuterBoundary::Box { .. } => return None,
            },
            FieldId::ShueR0 | FieldId::ShueAlpha => match &mut self.boundary.outer {
                OuterBoundary::Shue {
                    mode: ShueMode::Manual { r0_re, alpha },
                    ..
                } => Slot::Real(if id == FieldId::ShueR0 { r0_re } else { alpha }),
                _ => return None,
            },
            FieldId::EfieldKp => match &mut self.efield {
                ElectricFieldModel::VollandStern { kp } => Slot::Real(kp),
                _ => return None,
            },
            FieldId::FieldCadence | FieldId::InjectCadence => match &mut self.temporal {
                TemporalMode::TimeSeries {
                    field_update_cadence_min,
                    inject_cadence_min,
                    ..
                } => Slot::Real(if id == FieldId::FieldCadence {
                    field_update_cadence_min
                } else {
                    inject_cadence_min
                }),
                TemporalMode::Static => return None,
            },
            FieldId::ShellResolution => match &mut self.output.domain {
                OutputDomain::Shells { resolution_deg, .. } => Slot::Real(resolution_deg),
                _ => return None,
            },
            FieldId::J0
            | FieldId::Gamma
            | FieldId::E0
            | FieldId::ECut
            | FieldId::GammaA
            | FieldId::GammaB
            | FieldId::ERef
            | FieldId::Phi => Slot::Real(spectrum_slot(id, &mut self.spectrum.model)?),
        };
        Some(slot)
    }

    /// Store `value` into field `id`.
    ///
    /// Real-valued fields accept any finite value; their ranges are reported
    /// by the checks. Integer fields must lie within their hard range.
    pub fn set_scalar(&mut self, id: FieldId, value: f64) -> Result<(), FieldError> {
        let spec = id.spec();
        let key = spec.key;
        if !value.is_finite() {
            return Err(FieldError::NonFinite { key, value });
        }
        if id.is_integer() {
            if value.fract() != 0.0 {
                return Err(FieldError::NotInteger { key, value });
            }
            if !spec.hard.contains(&value) {
                return Err(FieldError::OutOfRange {
                    key,
                    value,
                    min: *spec.hard.start(),
                    max: *spec.hard.end(),
                });
            }
        }
        match self.slot_mut(id).ok_or(FieldError::Inactive { key })? {
            Slot::Real(v) => *v = value,
            Slot::Int(v) => *v = value as i32,
            Slot::Count(v) => *v = value as usize,
        }
        Ok(())
    }

    /// Fields that apply to the current selections, in registry order.
    pub fn active_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|id| self.scalar(*id).is_some())
            .collect()
    }
}

fn spectrum_scalar(id: FieldId, model: &SpectrumModel) -> Option<f64> {
    use SpectrumModel as M;
    match (id, model) {
        (FieldId::J0, M::PowerLaw { j0, .. })
        | (FieldId::J0, M::PowerLawCutoff { j0, .. })
        | (FieldId::J0, M::Band { j0, .. }) => Some(*j0),
        (FieldId::Gamma, M::PowerLaw { gamma, .. })
        | (FieldId::Gamma, M::PowerLawCutoff { gamma, .. }) => Some(*gamma),
        (FieldId::E0, M::PowerLaw { e0_mev, .. })
        | (FieldId::E0, M::PowerLawCutoff { e0_mev, .. })
        | (FieldId::E0, M::Band { e0_mev, .. }) => Some(*e0_mev),
        (FieldId::ECut, M::PowerLawCutoff { e_cut_mev, .. }) => Some(*e_cut_mev),
        (FieldId::GammaA, M::Band { gamma_a, .. }) => Some(*gamma_a),
        (FieldId::GammaB, M::Band { gamma_b, .. }) => Some(*gamma_b),
        (FieldId::ERef, M::Band { e_ref_mev, .. }) => Some(*e_ref_mev),
        (FieldId::Phi, M::ForceField { phi_mv }) => Some(*phi_mv),
        _ => None,
    }
}

fn spectrum_slot(id: FieldId, model: &mut SpectrumModel) -> Option<&mut f64> {
    use SpectrumModel as M;
    match (id, model) {
        (FieldId::J0, M::PowerLaw { j0, .. })
        | (FieldId::J0, M::PowerLawCutoff { j0, .. })
        | (FieldId::J0, M::Band { j0, .. }) => Some(j0),
        (FieldId::Gamma, M::PowerLaw { gamma, .. })
        | (FieldId::Gamma, M::PowerLawCutoff { gamma, .. }) => Some(gamma),
        (FieldId::E0, M::PowerLaw { e0_mev, .. })
        | (FieldId::E0, M::PowerLawCutoff { e0_mev, .. })
        | (FieldId::E0, M::Band { e0_mev, .. }) => Some(e0_mev),
        (FieldId::ECut, M::PowerLawCutoff { e_cut_mev, .. }) => Some(e_cut_mev),
        (FieldId::GammaA, M::Band { gamma_a, .. }) => Some(gamma_a),
        (FieldId::GammaB, M::Band { gamma_b, .. }) => Some(gamma_b),
        (FieldId::ERef, M::Band { e_ref_mev, .. }) => Some(e_ref_mev),
        (FieldId::Phi, M::ForceField { phi_mv }) => Some(phi_mv),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = FieldId::ALL.iter().map(|id| id.key()).collect();
        assert_eq!(keys.len(), FieldId::ALL.len());
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        assert_eq!(FieldId::from_key("dst"), Some(FieldId::Dst));
        assert_eq!(FieldId::from_key(" TS05_W3 "), Some(FieldId::Ts05W3));
        assert_eq!(FieldId::from_key("nope"), None);
    }

    #[test]
    fn defaults_expose_ts05_but_not_t01() {
        let cfg = RunConfiguration::default();
        assert_eq!(cfg.scalar(FieldId::Ts05W3), Some(1.2));
        assert_eq!(cfg.scalar(FieldId::T01G1), None);
        assert_eq!(cfg.scalar(FieldId::BoxXMin), None);
        assert_eq!(cfg.scalar(FieldId::XTail), Some(-60.0));
    }

    #[test]
    fn set_inactive_field_fails() {
        let mut cfg = RunConfiguration::default();
        let err = cfg.set_scalar(FieldId::T89Kp, 3.0).unwrap_err();
        assert!(matches!(err, FieldError::Inactive { key: "KP" }));
    }

    #[test]
    fn set_and_read_back_every_active_field() {
        let mut cfg = RunConfiguration::default();
        cfg.boundary.outer = OuterBoundaryKind::Box.default_boundary();
        cfg.temporal = TemporalKind::TimeSeries.default_mode();
        for id in cfg.active_fields() {
            cfg.set_scalar(id, 7.0).unwrap();
            assert_eq!(cfg.scalar(id), Some(7.0), "{id:?}");
        }
    }

    #[test]
    fn integer_fields_reject_fractions() {
        let mut cfg = RunConfiguration::default();
        assert!(cfg.set_scalar(FieldId::Charge, 1.5).is_err());
        assert!(FieldId::EnergyBins.parse_input("12.5").is_err());
        assert_eq!(FieldId::EnergyBins.parse_input(" 12 ").unwrap(), 12.0);
    }

    #[test]
    fn integer_fields_stay_within_hard_range() {
        let mut cfg = RunConfiguration::default();
        let err = cfg.set_scalar(FieldId::Charge, 1e12).unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { key: "CHARGE", .. }));
        assert_eq!(cfg.particle.charge, 1);

        let err = cfg.set_scalar(FieldId::EnergyBins, 1e15).unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { key: "N_ENERGY_BINS", .. }));
        assert!(cfg.set_scalar(FieldId::EnergyBins, 0.0).is_err());
        assert_eq!(cfg.output.energy_bins, 40);

        cfg.set_scalar(FieldId::Charge, -92.0).unwrap();
        assert_eq!(cfg.particle.charge, -92);
    }

    #[test]
    fn real_fields_accept_out_of_range_values() {
        let mut cfg = RunConfiguration::default();
        cfg.set_scalar(FieldId::Dst, -5000.0).unwrap();
        assert_eq!(cfg.field.drivers.dst_nt, -5000.0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            FieldId::Dst.parse_input("abc"),
            Err(FieldError::Parse { .. })
        ));
        assert!(matches!(
            FieldId::Dst.parse_input("inf"),
            Err(FieldError::NonFinite { .. })
        ));
    }

    #[test]
    fn scientific_format_tolerance() {
        let f = NumberFormat::Scientific(4);
        let text = f.format(12345.678);
        let back: f64 = text.parse().unwrap();
        assert!(f.matches(12345.678, back));
        assert_eq!(NumberFormat::Fixed(2).format(3.14159), "3.14");
    }
}
