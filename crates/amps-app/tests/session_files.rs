use std::path::PathBuf;

use amps_app::{
    AppError, Edit, WizardSession, import_param_file, load_session, prepare_submission,
    save_session, write_submission,
};
use amps_config::{FieldEvaluation, FieldModelKind, WizardStep};
use amps_param::param_digest;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("amps_app_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn snapshot_roundtrip_keeps_step_and_config() {
    let dir = temp_dir("snapshot");
    let mut s = WizardSession::default();
    s.apply(Edit::SelectFieldModel(FieldModelKind::T96));
    s.go_to(WizardStep::Spectrum);

    for name in ["session.yaml", "session.json"] {
        let path = dir.join(name);
        save_session(&path, &s).unwrap();
        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.config(), s.config());
        assert_eq!(loaded.step(), WizardStep::Spectrum);
    }
}

#[test]
fn submission_files_match_manifest() {
    let dir = temp_dir("submit");
    let mut s = WizardSession::default();
    s.apply(Edit::SetEvaluation(FieldEvaluation::Gridded));

    let files = write_submission(&dir, &s).unwrap();
    let text = std::fs::read_to_string(&files.param_path).unwrap();
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files.manifest_path).unwrap()).unwrap();

    assert_eq!(manifest["param_sha256"], param_digest(&text));
    assert_eq!(manifest["field_evaluation"], "GRIDDED");

    let imported = import_param_file(&files.param_path).unwrap();
    assert_eq!(imported.config(), s.config());
}

#[test]
fn failing_checks_block_submission() {
    let mut s = WizardSession::default();
    s.apply(Edit::SetRunName(String::new()));

    let err = prepare_submission(&s).unwrap_err();
    assert!(matches!(err, AppError::SubmissionBlocked { errors } if errors > 0));
}

#[test]
fn import_reports_missing_file() {
    let err = import_param_file(&PathBuf::from("/nonexistent/AMPS_PARAM.in")).unwrap_err();
    assert!(matches!(err, AppError::FileRead { .. }));
}
