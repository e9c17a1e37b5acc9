//! Rebuild a [`RunConfiguration`] from a parsed param file.
//!
//! Selectors are read first so that the numeric fields active for the
//! chosen variants are known; those are then read through the field
//! registry. Informational keys (derived values) are ignored.

use amps_config::{
    DriverSource, ElectricFieldKind, FieldEvaluation, FieldModel, FieldModelKind, FluxKind,
    MhdSource, OuterBoundary, OuterBoundaryKind, OutputDomain, OutputDomainKind, OutputFormat,
    RunConfiguration, ShueMode, SpeciesPreset, SpectrumKind, TemporalKind, TemporalMode,
};
use amps_physics::SpectrumModel;
use chrono::{DateTime, Utc};

use crate::document::{ParamDocument, ParamSection, parse_numbers};
use crate::error::ParamResult;
use crate::sections::{self, Keyword};

fn keyword<K: Keyword>(section: &ParamSection, key: &str) -> ParamResult<K> {
    let raw = section.require(key)?;
    K::from_keyword(raw).ok_or_else(|| {
        let expected = K::TABLE
            .iter()
            .map(|(_, k)| *k)
            .collect::<Vec<_>>()
            .join(", ");
        section.invalid(key, raw, format!("expected one of {expected}"))
    })
}

fn time(section: &ParamSection, key: &str) -> ParamResult<DateTime<Utc>> {
    let raw = section.require(key)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| section.invalid(key, raw, e.to_string()))
}

fn text(section: &ParamSection, key: &str) -> ParamResult<String> {
    section.require(key).map(str::to_string)
}

fn flag(section: &ParamSection, key: &str) -> ParamResult<bool> {
    let raw = section.require(key)?;
    match raw.to_ascii_uppercase().as_str() {
        "T" | "TRUE" | "YES" | "1" => Ok(true),
        "F" | "FALSE" | "NO" | "0" => Ok(false),
        _ => Err(section.invalid(key, raw, "expected T or F")),
    }
}

pub fn import_config(doc: &ParamDocument) -> ParamResult<RunConfiguration> {
    let mut cfg = RunConfiguration::default();

    let run = doc.require_section(sections::RUN)?;
    cfg.run.run_name = text(run, "RUN_NAME")?;
    cfg.run.description = run.get("DESCRIPTION").unwrap_or_default().to_string();
    cfg.run.contact_email = run.get("CONTACT_EMAIL").map(str::to_string);

    let particle = doc.require_section(sections::PARTICLE)?;
    let species: SpeciesPreset = keyword(particle, "SPECIES")?;

    let bf = doc.require_section(sections::BACKGROUND_FIELD)?;
    let model_kind: FieldModelKind = keyword(bf, "FIELD_MODEL")?;
    cfg.field.model = match model_kind {
        FieldModelKind::Mhd => FieldModel::Mhd {
            source: keyword::<MhdSource>(bf, "MHD_SOURCE")?,
            run_id: text(bf, "MHD_RUN_ID")?,
        },
        other => other.default_model(),
    };
    cfg.field.evaluation = keyword::<FieldEvaluation>(bf, "FIELD_EVAL")?;
    cfg.field.epoch = time(bf, "EPOCH")?;

    let boundary = doc.require_section(sections::BOUNDARY)?;
    let outer_kind: OuterBoundaryKind = keyword(boundary, "OUTER_BOUNDARY")?;
    cfg.boundary.outer = outer_kind.default_boundary();
    if let OuterBoundary::Shue { mode, .. } = &mut cfg.boundary.outer {
        let raw = boundary.require("SHUE_MODE")?;
        *mode = match raw.to_ascii_uppercase().as_str() {
            "AUTO" => ShueMode::Auto,
            "MANUAL" => ShueMode::Manual {
                r0_re: 0.0,
                alpha: 0.0,
            },
            _ => return Err(boundary.invalid("SHUE_MODE", raw, "expected AUTO or MANUAL")),
        };
    }

    cfg.efield = match doc.section(sections::ELECTRIC_FIELD) {
        Some(ef) => keyword::<ElectricFieldKind>(ef, "EFIELD_MODEL")?.default_model(),
        None => ElectricFieldKind::None.default_model(),
    };

    let temporal = doc.require_section(sections::TEMPORAL)?;
    let temporal_kind: TemporalKind = keyword(temporal, "TEMPORAL_MODE")?;
    cfg.temporal = temporal_kind.default_mode();
    if let TemporalMode::TimeSeries {
        start,
        end,
        driver_source,
        ..
    } = &mut cfg.temporal
    {
        *start = time(temporal, "START_TIME")?;
        *end = time(temporal, "END_TIME")?;
        let raw = temporal.require("DRIVER_SOURCE")?;
        *driver_source = match raw.to_ascii_uppercase().as_str() {
            "OMNIWEB" => DriverSource::Omniweb,
            "MANUAL" => DriverSource::Manual,
            "FILE" => DriverSource::File {
                path: text(temporal, "DRIVER_FILE")?,
            },
            _ => {
                return Err(temporal.invalid(
                    "DRIVER_SOURCE",
                    raw,
                    "expected OMNIWEB, FILE or MANUAL",
                ));
            }
        };
    }

    let spectrum = doc.require_section(sections::SPECTRUM)?;
    let spectrum_kind: SpectrumKind = keyword(spectrum, "SPECTRUM_TYPE")?;
    cfg.spectrum.model = match spectrum_kind {
        SpectrumKind::Table => SpectrumModel::Table {
            path: text(spectrum, "SPECTRUM_FILE")?,
        },
        other => other.default_model(),
    };

    let output = doc.require_section(sections::OUTPUT)?;
    let domain_kind: OutputDomainKind = keyword(output, "OUTPUT_DOMAIN")?;
    cfg.output.domain = match domain_kind {
        OutputDomainKind::Shells => OutputDomain::Shells {
            altitudes_km: output.numbers("SHELL_ALTITUDES")?,
            resolution_deg: 0.0,
        },
        OutputDomainKind::Points => {
            let positions_re = output
                .get_all("POINT")
                .map(|raw| match parse_numbers(raw).as_deref() {
                    Some(&[x, y, z]) => Ok([x, y, z]),
                    _ => Err(output.invalid("POINT", raw, "expected three coordinates")),
                })
                .collect::<ParamResult<Vec<_>>>()?;
            OutputDomain::Points { positions_re }
        }
        OutputDomainKind::Trajectory => OutputDomain::Trajectory {
            path: text(output, "TRAJECTORY_FILE")?,
        },
    };
    cfg.output.flux_kind = keyword::<FluxKind>(output, "FLUX_TYPE")?;
    cfg.output.format = keyword::<OutputFormat>(output, "OUTPUT_FORMAT")?;
    cfg.output.cutoff_rigidity = flag(output, "CUTOFF_RIGIDITY")?;

    for id in cfg.active_fields() {
        let spec = id.spec();
        let Some(name) = sections::for_step(spec.step) else {
            continue;
        };
        let value = doc.require_section(name)?.number(spec.key)?;
        cfg.set_scalar(id, value)?;
    }

    cfg.particle.species = match species.ion() {
        Some(ion) if ion != cfg.particle.ion() => SpeciesPreset::Custom,
        _ => species,
    };

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParamError;
    use crate::render::render_param_file;
    use amps_config::DerivedValues;

    fn reimport(cfg: &RunConfiguration) -> RunConfiguration {
        let text = render_param_file(cfg, &DerivedValues::compute(cfg));
        import_config(&ParamDocument::parse(&text).unwrap()).unwrap()
    }

    #[test]
    fn default_config_reimports_exactly() {
        let cfg = RunConfiguration::default();
        assert_eq!(reimport(&cfg), cfg);
    }

    #[test]
    fn preset_with_edited_mass_becomes_custom() {
        let text = render_param_file(
            &RunConfiguration::default(),
            &DerivedValues::compute(&RunConfiguration::default()),
        )
        .replace("MASS              1.007300", "MASS              2.014000");
        let cfg = import_config(&ParamDocument::parse(&text).unwrap()).unwrap();
        assert_eq!(cfg.particle.species, SpeciesPreset::Custom);
        assert_eq!(cfg.particle.mass_amu, 2.014);
    }

    #[test]
    fn unknown_model_lists_choices() {
        let text = render_param_file(
            &RunConfiguration::default(),
            &DerivedValues::compute(&RunConfiguration::default()),
        )
        .replace("FIELD_MODEL       TS05", "FIELD_MODEL       T04");
        let err = import_config(&ParamDocument::parse(&text).unwrap()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("FIELD_MODEL"));
        assert!(msg.contains("TS05"));
    }

    #[test]
    fn missing_active_field_is_an_error() {
        let text = render_param_file(
            &RunConfiguration::default(),
            &DerivedValues::compute(&RunConfiguration::default()),
        );
        let text: String = text
            .lines()
            .filter(|l| !l.starts_with("TS05_W4"))
            .map(|l| format!("{l}\n"))
            .collect();
        let err = import_config(&ParamDocument::parse(&text).unwrap()).unwrap_err();
        assert!(matches!(err, ParamError::MissingKey { ref key, .. } if key == "TS05_W4"));
    }
}
