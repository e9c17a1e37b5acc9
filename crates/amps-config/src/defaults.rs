//! Storm-case defaults.
//!
//! A fresh configuration describes the 7-8 September 2017 geomagnetic
//! storm near Dst minimum.

use chrono::{DateTime, TimeZone, Utc};

use crate::schema::*;

pub const STORM_EPOCH_UNIX: i64 = 1_504_832_400; // 2017-09-08T01:00:00Z
pub const STORM_START_UNIX: i64 = 1_504_785_600; // 2017-09-07T12:00:00Z
pub const STORM_END_UNIX: i64 = 1_504_958_400; // 2017-09-09T12:00:00Z

fn utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

impl Default for SolarWindDrivers {
    fn default() -> Self {
        Self {
            dst_nt: -142.0,
            pdyn_npa: 3.5,
            bz_nt: -10.0,
            by_nt: 5.0,
            bx_nt: -2.0,
            vx_kmps: -650.0,
            nsw_cc: 8.0,
        }
    }
}

impl Default for RunInfo {
    fn default() -> Self {
        Self {
            run_name: "sep2017_storm".to_string(),
            description: "September 2017 storm, energetic proton access".to_string(),
            contact_email: None,
        }
    }
}

impl Default for ParticleDef {
    fn default() -> Self {
        Self {
            species: SpeciesPreset::Proton,
            charge: 1,
            mass_amu: 1.0073,
        }
    }
}

impl Default for BackgroundFieldDef {
    fn default() -> Self {
        Self {
            evaluation: FieldEvaluation::Gridless,
            model: FieldModelKind::Ts05.default_model(),
            drivers: SolarWindDrivers::default(),
            epoch: utc(STORM_EPOCH_UNIX),
        }
    }
}

impl Default for BoundaryDef {
    fn default() -> Self {
        Self {
            outer: OuterBoundaryKind::Shue.default_boundary(),
            inner_radius_re: 1.1,
        }
    }
}

impl TemporalKind {
    pub fn default_mode(self) -> TemporalMode {
        match self {
            TemporalKind::Static => TemporalMode::Static,
            TemporalKind::TimeSeries => TemporalMode::TimeSeries {
                start: utc(STORM_START_UNIX),
                end: utc(STORM_END_UNIX),
                field_update_cadence_min: 5.0,
                inject_cadence_min: 10.0,
                driver_source: DriverSource::Omniweb,
            },
        }
    }
}

impl TemporalMode {
    pub fn kind(&self) -> TemporalKind {
        match self {
            TemporalMode::Static => TemporalKind::Static,
            TemporalMode::TimeSeries { .. } => TemporalKind::TimeSeries,
        }
    }
}

impl Default for SpectrumDef {
    fn default() -> Self {
        Self {
            model: SpectrumKind::PowerLaw.default_model(),
            e_min_mev: 1.0,
            e_max_mev: 1000.0,
        }
    }
}

impl Default for OutputDef {
    fn default() -> Self {
        Self {
            domain: OutputDomainKind::Shells.default_domain(),
            flux_kind: FluxKind::Differential,
            format: OutputFormat::Tecplot,
            cutoff_rigidity: false,
            energy_bins: 40,
        }
    }
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            run: RunInfo::default(),
            particle: ParticleDef::default(),
            field: BackgroundFieldDef::default(),
            boundary: BoundaryDef::default(),
            efield: ElectricFieldModel::None,
            temporal: TemporalMode::Static,
            spectrum: SpectrumDef::default(),
            output: OutputDef::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storm_epoch() {
        let cfg = RunConfiguration::default();
        assert_eq!(cfg.field.epoch.to_rfc3339(), "2017-09-08T01:00:00+00:00");
        assert_eq!(cfg.field.drivers.dst_nt, -142.0);
        assert_eq!(cfg.field.model.kind(), FieldModelKind::Ts05);
    }

    #[test]
    fn time_series_spans_storm() {
        match TemporalKind::TimeSeries.default_mode() {
            TemporalMode::TimeSeries { start, end, .. } => assert!(end > start),
            TemporalMode::Static => panic!("expected time series"),
        }
    }
}
