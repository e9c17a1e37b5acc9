//! Submission manifest accompanying a rendered param file.

use amps_config::{CheckReport, DerivedValues, RunConfiguration, SpectrumKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{ParamError, ParamResult};
use crate::render::PARAM_FILE_NAME;
use crate::sections::Keyword;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub name: String,
    pub charge: i32,
    pub mass_amu: f64,
    /// Rigidity at the reference energy; absent for a neutral species.
    pub reference_rigidity_gv: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub warnings: usize,
    pub errors: usize,
}

impl From<&CheckReport> for CheckSummary {
    fn from(report: &CheckReport) -> Self {
        Self {
            warnings: report.warning_count(),
            errors: report.error_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionManifest {
    pub submission_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub tool_version: String,
    pub run_name: String,
    pub param_file: String,
    pub param_sha256: String,
    pub species: SpeciesSummary,
    pub field_model: String,
    pub field_evaluation: String,
    pub spectrum: String,
    pub temporal: String,
    pub checks: CheckSummary,
}

impl SubmissionManifest {
    pub fn to_json(&self) -> ParamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Lowercase hex SHA-256 of the param file text.
pub fn param_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the manifest for `text`, refusing when the report holds errors.
pub fn build_manifest(
    cfg: &RunConfiguration,
    derived: &DerivedValues,
    text: &str,
    report: &CheckReport,
) -> ParamResult<SubmissionManifest> {
    if !report.can_submit() {
        return Err(ParamError::Blocked {
            errors: report.error_count(),
        });
    }

    Ok(SubmissionManifest {
        submission_id: Uuid::new_v4(),
        created_at: Utc::now(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        run_name: cfg.run.run_name.clone(),
        param_file: PARAM_FILE_NAME.to_string(),
        param_sha256: param_digest(text),
        species: SpeciesSummary {
            name: cfg.particle.species.keyword().to_string(),
            charge: cfg.particle.charge,
            mass_amu: cfg.particle.mass_amu,
            reference_rigidity_gv: derived.reference_rigidity_gv,
        },
        field_model: cfg.field.model.kind().keyword().to_string(),
        field_evaluation: cfg.field.evaluation.keyword().to_string(),
        spectrum: SpectrumKind::of(&cfg.spectrum.model).keyword().to_string(),
        temporal: cfg.temporal.kind().keyword().to_string(),
        checks: CheckSummary::from(report),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amps_config::check_config;

    #[test]
    fn digest_is_stable_hex() {
        let a = param_digest("#RUN\n#END\n");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, param_digest("#RUN\n#END\n"));
        assert_ne!(a, param_digest("#RUN\n#END"));
    }

    #[test]
    fn digest_of_empty_text() {
        assert_eq!(
            param_digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn manifest_summarises_default_run() {
        let cfg = RunConfiguration::default();
        let derived = DerivedValues::compute(&cfg);
        let report = check_config(&cfg);
        let m = build_manifest(&cfg, &derived, "text", &report).unwrap();

        assert_eq!(m.run_name, "sep2017_storm");
        assert_eq!(m.param_file, "AMPS_PARAM.in");
        assert_eq!(m.species.name, "PROTON");
        assert_eq!(m.field_model, "TS05");
        assert_eq!(m.field_evaluation, "GRIDLESS");
        assert_eq!(m.spectrum, "POWER_LAW");
        assert_eq!(m.checks.errors, 0);
        assert_eq!(m.param_sha256, param_digest("text"));
    }

    #[test]
    fn errors_block_submission() {
        let mut cfg = RunConfiguration::default();
        cfg.run.run_name.clear();
        let report = check_config(&cfg);
        assert!(report.error_count() > 0);

        let err = build_manifest(&cfg, &DerivedValues::compute(&cfg), "", &report).unwrap_err();
        assert!(matches!(err, ParamError::Blocked { errors } if errors == report.error_count()));
    }

    #[test]
    fn manifest_json_has_expected_keys() {
        let cfg = RunConfiguration::default();
        let m = build_manifest(
            &cfg,
            &DerivedValues::compute(&cfg),
            "",
            &check_config(&cfg),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        for key in ["submission_id", "created_at", "param_sha256", "species", "checks"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
