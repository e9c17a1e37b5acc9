//! Session loading, saving, rendering and submission.

use std::path::{Path, PathBuf};

use amps_config::{CheckReport, load_snapshot, save_snapshot};
use amps_param::{
    PARAM_FILE_NAME, ParamDocument, SubmissionManifest, build_manifest, import_config,
    render_param_file,
};

use crate::error::{AppError, AppResult};
use crate::session::WizardSession;

/// File name of the manifest written next to the param file.
pub const MANIFEST_FILE_NAME: &str = "submission.json";

/// A rendered param file and the manifest describing it.
#[derive(Debug, Clone)]
pub struct Submission {
    pub param_text: String,
    pub manifest: SubmissionManifest,
    pub report: CheckReport,
}

/// Paths written by [`write_submission`].
#[derive(Debug, Clone)]
pub struct SubmissionFiles {
    pub param_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Load a session snapshot (YAML or JSON by extension).
pub fn load_session(path: &Path) -> AppResult<WizardSession> {
    let snapshot = load_snapshot(path)?;
    tracing::info!(path = %path.display(), version = snapshot.version, "session loaded");
    Ok(WizardSession::from_snapshot(snapshot))
}

/// Save a session snapshot (YAML or JSON by extension).
pub fn save_session(path: &Path, session: &WizardSession) -> AppResult<()> {
    save_snapshot(path, &session.snapshot())?;
    tracing::info!(path = %path.display(), "session saved");
    Ok(())
}

/// Render the param file for the current configuration.
///
/// Renders regardless of check results; use [`prepare_submission`] for the
/// gated path.
pub fn render(session: &WizardSession) -> String {
    render_param_file(session.config(), session.derived())
}

/// Render and build the manifest, refusing when any check fails.
pub fn prepare_submission(session: &WizardSession) -> AppResult<Submission> {
    let report = session.check();
    let param_text = render(session);
    let manifest = build_manifest(session.config(), session.derived(), &param_text, &report)
        .inspect_err(|_| {
            tracing::warn!(errors = report.error_count(), "submission blocked");
        })?;
    Ok(Submission {
        param_text,
        manifest,
        report,
    })
}

/// Write `AMPS_PARAM.in` and the manifest into `dir`.
pub fn write_submission(dir: &Path, session: &WizardSession) -> AppResult<SubmissionFiles> {
    let submission = prepare_submission(session)?;
    std::fs::create_dir_all(dir).map_err(|e| AppError::FileWrite {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let param_path = dir.join(PARAM_FILE_NAME);
    write_file(&param_path, &submission.param_text)?;

    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    write_file(&manifest_path, &submission.manifest.to_json()?)?;

    tracing::info!(
        submission_id = %submission.manifest.submission_id,
        dir = %dir.display(),
        "submission written"
    );
    Ok(SubmissionFiles {
        param_path,
        manifest_path,
    })
}

/// Parse an existing param file into a fresh session.
pub fn import_param_file(path: &Path) -> AppResult<WizardSession> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let doc = ParamDocument::parse(&text)?;
    let config = import_config(&doc)?;
    tracing::info!(path = %path.display(), sections = doc.sections.len(), "param file imported");
    Ok(WizardSession::new(config))
}

pub fn write_file(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
